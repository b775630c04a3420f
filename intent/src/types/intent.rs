use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Action requested by a voice command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Send,
    Swap,
    Stake,
    #[default]
    Unknown,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Send => "send",
            Intent::Swap => "swap",
            Intent::Stake => "stake",
            Intent::Unknown => "unknown",
        }
    }

    /// Lenient parse used on raw extraction output. Anything unrecognized is `Unknown`.
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "send" => Intent::Send,
            "swap" => Intent::Swap,
            "stake" => Intent::Stake,
            _ => Intent::Unknown,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RecipientType {
    #[serde(rename = "EOA")]
    Eoa,
    SmartContract,
    #[default]
    Unknown,
}

impl fmt::Display for RecipientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecipientType::Eoa => write!(f, "EOA"),
            RecipientType::SmartContract => write!(f, "SmartContract"),
            RecipientType::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Mechanism suggested for moving value to the destination network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SuggestedProtocol {
    #[serde(rename = "CCIP")]
    Ccip,
    AvalancheTeleporter,
    SameChain,
}

impl SuggestedProtocol {
    pub fn is_cross_chain(&self) -> bool {
        !matches!(self, SuggestedProtocol::SameChain)
    }

    /// Name shown to users, e.g. on a transaction receipt
    pub fn display_name(&self) -> &'static str {
        match self {
            SuggestedProtocol::Ccip => "Chainlink CCIP",
            SuggestedProtocol::AvalancheTeleporter => "Avalanche Teleporter",
            SuggestedProtocol::SameChain => "SameChain",
        }
    }
}

impl fmt::Display for SuggestedProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuggestedProtocol::Ccip => write!(f, "CCIP"),
            SuggestedProtocol::AvalancheTeleporter => write!(f, "AvalancheTeleporter"),
            SuggestedProtocol::SameChain => write!(f, "SameChain"),
        }
    }
}

/// Raw record as produced by the language-understanding collaborator.
///
/// Every field may be missing. `intent` is kept as the raw string so that an
/// unrecognized action still reaches the normalizer instead of failing decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialTransactionIntent {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_type: Option<RecipientType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_chain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_protocol: Option<SuggestedProtocol>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suzaku_action: Option<String>,
}

/// Accepts any JSON scalar for `intent`; numbers and booleans become their text form.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// Finalized transaction descriptor. `recipient_type` and `suggested_protocol`
/// are always populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionIntent {
    pub intent: Intent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_address: Option<String>,
    pub recipient_type: RecipientType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_chain: Option<String>,
    pub suggested_protocol: SuggestedProtocol,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suzaku_action: Option<String>,
}

impl TransactionIntent {
    pub fn is_cross_chain(&self) -> bool {
        self.suggested_protocol.is_cross_chain()
    }

    pub fn is_actionable(&self) -> bool {
        self.intent != Intent::Unknown
    }

    /// One-line description, e.g. `send 1.5 AVAX to bob.avax on Ethereum via CCIP`
    pub fn summary(&self) -> String {
        let mut out = self.intent.to_string();
        if let Some(amount) = self.amount {
            out.push_str(&format!(" {}", amount));
        }
        if let Some(token) = &self.token {
            out.push_str(&format!(" {}", token));
        }
        if let Some(recipient) = &self.recipient_address {
            out.push_str(&format!(" to {}", recipient));
        }
        if let Some(chain) = &self.destination_chain {
            out.push_str(&format!(" on {}", chain));
        }
        out.push_str(&format!(" via {}", self.suggested_protocol));
        out
    }
}

impl From<TransactionIntent> for PartialTransactionIntent {
    fn from(intent: TransactionIntent) -> Self {
        Self {
            intent: Some(intent.intent.as_str().to_string()),
            amount: intent.amount,
            recipient_address: intent.recipient_address,
            recipient_type: Some(intent.recipient_type),
            token: intent.token,
            destination_chain: intent.destination_chain,
            suggested_protocol: Some(intent.suggested_protocol),
            suzaku_action: intent.suzaku_action,
        }
    }
}
