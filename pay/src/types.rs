use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use voxchain_intent::{Intent, SuggestedProtocol, TransactionIntent};

/// Core service types for VoxChain Pay

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WalletAddress(pub String);

impl WalletAddress {
    /// Accepts `0x` followed by 40 hex characters
    pub fn parse(raw: &str) -> Result<Self, PayError> {
        let raw = raw.trim();
        let hex_part = raw
            .strip_prefix("0x")
            .or_else(|| raw.strip_prefix("0X"))
            .ok_or_else(|| PayError::InvalidWallet(format!("address must start with 0x: {}", raw)))?;

        if hex_part.len() != 40 || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(PayError::InvalidWallet(format!(
                "address must be 40 hex characters: {}",
                raw
            )));
        }

        Ok(Self(format!("0x{}", hex_part.to_lowercase())))
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionHash(pub String);

impl fmt::Display for TransactionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of one voice command: either a finalized intent or an error descriptor.
///
/// Serialized untagged, so the wire shape is the intent record itself or
/// `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandOutcome {
    Failed { error: String },
    Parsed(TransactionIntent),
}

impl CommandOutcome {
    pub fn intent(&self) -> Option<&TransactionIntent> {
        match self {
            CommandOutcome::Parsed(intent) => Some(intent),
            CommandOutcome::Failed { .. } => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, CommandOutcome::Failed { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    #[default]
    Idle,
    Processing,
    Success,
    Error,
}

/// Whether the simulated transfer finished on the source chain or was handed to a bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReceiptState {
    Completed,
    Initiated,
}

/// Simulated on-chain receipt for a confirmed intent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub tx_hash: TransactionHash,
    pub block_number: u64,
    pub confirmations: String,
    pub source_network: String,
    pub protocol: SuggestedProtocol,
    pub protocol_display_name: String,
    pub destination_chain: Option<String>,
    pub state: ReceiptState,
    pub title: String,
    pub message: String,
    pub footer: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Transaction processing result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResult {
    pub command_id: Uuid,
    pub intent: Intent,
    pub status: TransactionStatus,
    pub message: String,
    pub receipt: Option<TransactionReceipt>,
    /// A newer command started while this ran; the session kept its feedback
    pub superseded: bool,
    pub processed_at: DateTime<Utc>,
}

impl TransactionResult {
    pub fn success(command_id: Uuid, intent: Intent, message: String, receipt: TransactionReceipt) -> Self {
        Self {
            command_id,
            intent,
            status: TransactionStatus::Success,
            message,
            receipt: Some(receipt),
            superseded: false,
            processed_at: Utc::now(),
        }
    }

    pub fn failure(command_id: Uuid, intent: Intent, message: String) -> Self {
        Self {
            command_id,
            intent,
            status: TransactionStatus::Error,
            message,
            receipt: None,
            superseded: false,
            processed_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthStatus {
    Authenticated,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceAuthResult {
    pub status: AuthStatus,
    pub voice_auth_hash: Option<String>,
    pub message: String,
    pub checked_at: DateTime<Utc>,
}

impl VoiceAuthResult {
    pub fn authenticated(hash: String, message: String) -> Self {
        Self {
            status: AuthStatus::Authenticated,
            voice_auth_hash: Some(hash),
            message,
            checked_at: Utc::now(),
        }
    }

    pub fn failed(hash: Option<String>, message: String) -> Self {
        Self {
            status: AuthStatus::Failed,
            voice_auth_hash: hash,
            message,
            checked_at: Utc::now(),
        }
    }
}

/// What the browser wallet reported on connect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletConnection {
    pub address: WalletAddress,
    pub chain_id: u64,
    pub connected_at: DateTime<Utc>,
}

/// Service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayConfig {
    pub server: ServerConfig,
    pub extractor: ExtractorConfig,
    pub wallet: WalletConfig,
    pub processing: ProcessingConfig,
    pub auth: AuthConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    pub endpoint: String,
    pub model: String,
    /// Empty means read `OPENAI_API_KEY` at startup
    pub api_key: String,
    pub timeout_secs: u64,
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    pub required_chain_id: u64,
    pub network_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub success_rate: f64,
    pub source_network: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub acceptance_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub log_level: String,
}

/// Error types
#[derive(Debug, thiserror::Error)]
pub enum PayError {
    #[error("Intent extraction failed: {0}")]
    Extraction(String),

    #[error("Cannot confirm transaction: {0}")]
    NotConfirmable(String),

    #[error("Invalid wallet: {0}")]
    InvalidWallet(String),

    #[error("Wrong network: expected chain {expected}, wallet is on {actual}")]
    WrongNetwork { expected: u64, actual: u64 },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for PayError {
    fn from(err: serde_json::Error) -> Self {
        PayError::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for PayError {
    fn from(err: reqwest::Error) -> Self {
        PayError::NetworkError(err.to_string())
    }
}

impl From<config::ConfigError> for PayError {
    fn from(err: config::ConfigError) -> Self {
        PayError::ConfigError(err.to_string())
    }
}

impl From<voxchain_intent::IntentError> for PayError {
    fn from(err: voxchain_intent::IntentError) -> Self {
        PayError::Extraction(err.to_string())
    }
}

/// Counters for the status endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ServiceMetrics {
    pub commands_received: u64,
    pub commands_parsed: u64,
    pub extraction_failures: u64,
    pub superseded_commands: u64,
    pub transactions_succeeded: u64,
    pub transactions_failed: u64,
    pub superseded_transactions: u64,
    pub voice_auth_attempts: u64,
    pub last_command_at: Option<DateTime<Utc>>,
}

/// API Response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub request_id: Uuid,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: Utc::now(),
            request_id: Uuid::new_v4(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: Utc::now(),
            request_id: Uuid::new_v4(),
        }
    }
}
