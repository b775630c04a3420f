/// Error types for intent handling
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum IntentError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Inconsistent protocol: {protocol} requires a destination chain")]
    MissingDestination { protocol: String },

    #[error("Malformed intent payload: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for IntentError {
    fn from(err: serde_json::Error) -> Self {
        IntentError::Malformed(err.to_string())
    }
}

/// Failures while turning a voice sample data URI into a hash
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum VoiceprintError {
    #[error("Voice sample is not a data URI")]
    NotDataUri,

    #[error("Voice sample data URI has no payload separator")]
    MissingPayload,

    #[error("Voice sample data URI is not base64 encoded")]
    NotBase64,

    #[error("Voice sample payload could not be decoded: {0}")]
    Decode(String),

    #[error("Voice sample is empty")]
    Empty,
}

impl From<base64::DecodeError> for VoiceprintError {
    fn from(err: base64::DecodeError) -> Self {
        VoiceprintError::Decode(err.to_string())
    }
}
