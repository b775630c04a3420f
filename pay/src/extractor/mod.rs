pub mod llm;

use crate::types::PayError;
use async_trait::async_trait;
use voxchain_intent::PartialTransactionIntent;

pub use llm::LlmExtractor;

/// Language-understanding collaborator that turns a spoken command into a raw intent record
#[async_trait]
pub trait IntentExtractor: Send + Sync {
    /// Any failure (transport, timeout, undecodable payload) is `PayError::Extraction`
    async fn extract(&self, command: &str) -> Result<PartialTransactionIntent, PayError>;

    fn name(&self) -> &str;
}
