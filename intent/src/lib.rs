//! Transaction intent contract for VoxChain Pay.
//!
//! Turns a loosely structured extraction record into a complete
//! [`TransactionIntent`](types::intent::TransactionIntent) and hashes voice
//! samples used as an identity proxy.

pub mod types {
    pub mod error;
    pub mod intent;
}

pub mod normalize {
    pub mod normalize_intent;
}

pub mod validate {
    pub mod validate_intent;
}

pub mod voiceprint;

pub use normalize::normalize_intent::{normalize, normalize_with, ChainClassifier};
pub use types::error::{IntentError, VoiceprintError};
pub use types::intent::{
    Intent, PartialTransactionIntent, RecipientType, SuggestedProtocol, TransactionIntent,
};
pub use validate::validate_intent::{parse_extraction, validate_extraction};
pub use voiceprint::{hash_voice_sample, VoiceprintHash};
