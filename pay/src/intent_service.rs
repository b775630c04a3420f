use crate::{
    extractor::IntentExtractor,
    session::CommandSession,
    types::{CommandOutcome, ServiceMetrics},
};
use chrono::Utc;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;
use voxchain_intent::{normalize_with, validate_extraction, ChainClassifier};

/// Reply to one submitted voice command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResponse {
    pub command_id: Uuid,
    pub transcript: String,
    pub outcome: CommandOutcome,
    /// A newer command started before this one finished; `outcome` was not stored
    pub superseded: bool,
}

/// Runs a voice command through extraction, validation and normalization
pub struct IntentService {
    extractor: Arc<dyn IntentExtractor>,
    session: Arc<CommandSession>,
    classifier: ChainClassifier,
    metrics: Arc<RwLock<ServiceMetrics>>,
}

impl IntentService {
    pub fn new(
        extractor: Arc<dyn IntentExtractor>,
        session: Arc<CommandSession>,
        metrics: Arc<RwLock<ServiceMetrics>>,
    ) -> Self {
        Self {
            extractor,
            session,
            classifier: ChainClassifier::default(),
            metrics,
        }
    }

    /// Blank commands are ignored and return `None` without calling the extractor
    pub async fn submit(&self, command: &str) -> Option<CommandResponse> {
        let command = command.trim();
        if command.is_empty() {
            return None;
        }

        let ticket = self.session.begin(command).await;
        {
            let mut metrics = self.metrics.write().await;
            metrics.commands_received += 1;
            metrics.last_command_at = Some(Utc::now());
        }

        info!("Processing voice command {}: {:?}", ticket.id, command);

        let extracted = self
            .extractor
            .extract(command)
            .await
            .and_then(|raw| validate_extraction(&raw).map(|_| raw).map_err(Into::into));

        let outcome = match extracted {
            Ok(raw) => {
                let intent = normalize_with(&self.classifier, raw);
                info!("Parsed intent for {}: {}", ticket.id, intent.summary());
                CommandOutcome::Parsed(intent)
            }
            Err(e) => {
                error!("Error parsing transaction intent via {}: {}", self.extractor.name(), e);
                CommandOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };

        let stored = self.session.complete(&ticket, outcome.clone()).await;

        let mut metrics = self.metrics.write().await;
        match (&outcome, stored) {
            (_, false) => metrics.superseded_commands += 1,
            (CommandOutcome::Parsed(_), true) => metrics.commands_parsed += 1,
            (CommandOutcome::Failed { .. }, true) => metrics.extraction_failures += 1,
        }

        Some(CommandResponse {
            command_id: ticket.id,
            transcript: ticket.command,
            outcome,
            superseded: !stored,
        })
    }
}
