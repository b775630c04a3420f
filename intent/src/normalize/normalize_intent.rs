use crate::types::intent::{
    Intent, PartialTransactionIntent, RecipientType, SuggestedProtocol, TransactionIntent,
};
use log::debug;

/// Destination chain fragments that mean a network outside Avalanche
pub const DEFAULT_NON_AVALANCHE_KEYWORDS: &[&str] =
    &["ethereum", "polygon", "bsc", "solana", "arbitrum", "optimism"];

/// Destination chain fragments that mean another Avalanche subnet
pub const DEFAULT_SUBNET_KEYWORDS: &[&str] = &["subnet", "dfk", "beam"];

/// Fixed keyword table mapping a destination chain name to a protocol.
///
/// Matching is case-insensitive substring containment; the non-Avalanche
/// table is checked first.
#[derive(Debug, Clone)]
pub struct ChainClassifier {
    non_avalanche: Vec<String>,
    subnet: Vec<String>,
}

impl Default for ChainClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_NON_AVALANCHE_KEYWORDS, DEFAULT_SUBNET_KEYWORDS)
    }
}

impl ChainClassifier {
    pub fn new(non_avalanche: &[&str], subnet: &[&str]) -> Self {
        Self {
            non_avalanche: non_avalanche.iter().map(|k| k.to_lowercase()).collect(),
            subnet: subnet.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    pub fn classify(&self, destination_chain: &str) -> SuggestedProtocol {
        let chain = destination_chain.to_lowercase();

        if self.non_avalanche.iter().any(|k| chain.contains(k.as_str())) {
            SuggestedProtocol::Ccip
        } else if self.subnet.iter().any(|k| chain.contains(k.as_str())) {
            SuggestedProtocol::AvalancheTeleporter
        } else {
            SuggestedProtocol::SameChain
        }
    }
}

/// Complete a raw extraction record using the default keyword table
pub fn normalize(raw: PartialTransactionIntent) -> TransactionIntent {
    normalize_with(&ChainClassifier::default(), raw)
}

/// Complete a raw extraction record. Total: every input yields a finalized record.
pub fn normalize_with(
    classifier: &ChainClassifier,
    raw: PartialTransactionIntent,
) -> TransactionIntent {
    // Blank chain names carry no destination
    let destination_chain = raw
        .destination_chain
        .filter(|chain| !chain.trim().is_empty());

    let suggested_protocol = match (raw.suggested_protocol, destination_chain.as_deref()) {
        (Some(protocol), _) => protocol,
        (None, Some(chain)) => {
            let protocol = classifier.classify(chain);
            debug!("Inferred protocol {} from destination chain {:?}", protocol, chain);
            protocol
        }
        (None, None) => {
            debug!("No destination chain, defaulting protocol to SameChain");
            SuggestedProtocol::SameChain
        }
    };

    let recipient_type = raw.recipient_type.unwrap_or_else(|| {
        debug!("Recipient type missing, defaulting to Unknown");
        RecipientType::Unknown
    });

    let intent = raw
        .intent
        .as_deref()
        .map(Intent::from_raw)
        .unwrap_or_default();

    TransactionIntent {
        intent,
        amount: raw.amount,
        recipient_address: raw.recipient_address,
        recipient_type,
        token: raw.token,
        destination_chain,
        suggested_protocol,
        suzaku_action: raw.suzaku_action,
    }
}
