use crate::types::{CommandOutcome, PayError, TransactionResult, TransactionStatus};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;
use voxchain_intent::TransactionIntent;

/// Identity of one voice command. Only the latest ticket may write results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandTicket {
    pub id: Uuid,
    pub sequence: u64,
    pub command: String,
    pub started_at: DateTime<Utc>,
}

/// Read-only view of the session for the API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub command_id: Option<Uuid>,
    pub transcript: Option<String>,
    pub outcome: Option<CommandOutcome>,
    pub processing_command: bool,
    pub transaction_in_flight: bool,
    pub transaction_status: TransactionStatus,
    pub transaction_message: Option<String>,
}

#[derive(Debug, Default)]
struct SessionState {
    latest: Option<CommandTicket>,
    outcome: Option<CommandOutcome>,
    processing_command: bool,
    /// Survives `begin`; only `finish_transaction` clears it
    transaction_in_flight: bool,
    transaction_status: TransactionStatus,
    transaction_message: Option<String>,
}

impl SessionState {
    fn is_latest(&self, ticket: &CommandTicket) -> bool {
        self.latest
            .as_ref()
            .is_some_and(|latest| latest.sequence == ticket.sequence)
    }
}

/// The single "current command" state shared by request handlers.
///
/// Results are applied last-write-wins by ticket, not by completion order.
#[derive(Debug, Default)]
pub struct CommandSession {
    state: RwLock<SessionState>,
    next_sequence: AtomicU64,
}

impl CommandSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new command, superseding any in-flight one and clearing previous feedback
    pub async fn begin(&self, command: &str) -> CommandTicket {
        let ticket = CommandTicket {
            id: Uuid::new_v4(),
            sequence: self.next_sequence.fetch_add(1, Ordering::SeqCst) + 1,
            command: command.to_string(),
            started_at: Utc::now(),
        };

        let mut state = self.state.write().await;
        if let Some(previous) = state.latest.as_ref().filter(|_| state.processing_command) {
            debug!("Command {} supersedes in-flight command {}", ticket.id, previous.id);
        }
        state.latest = Some(ticket.clone());
        state.outcome = None;
        state.processing_command = true;
        state.transaction_status = TransactionStatus::Idle;
        state.transaction_message = None;

        ticket
    }

    /// Store the outcome for `ticket`. Returns `false` and drops the outcome when superseded.
    pub async fn complete(&self, ticket: &CommandTicket, outcome: CommandOutcome) -> bool {
        let mut state = self.state.write().await;
        if !state.is_latest(ticket) {
            warn!("Discarding result of superseded command {}", ticket.id);
            return false;
        }

        state.outcome = Some(outcome);
        state.processing_command = false;
        true
    }

    pub async fn current_outcome(&self) -> Option<CommandOutcome> {
        self.state.read().await.outcome.clone()
    }

    /// Check the current intent can be confirmed and mark the transaction as processing
    pub async fn start_transaction(&self) -> Result<(CommandTicket, TransactionIntent), PayError> {
        let mut state = self.state.write().await;

        if state.processing_command {
            return Err(PayError::NotConfirmable(
                "a voice command is still being processed".to_string(),
            ));
        }
        if state.transaction_in_flight {
            return Err(PayError::NotConfirmable(
                "a transaction is already in progress".to_string(),
            ));
        }

        let intent = match &state.outcome {
            Some(CommandOutcome::Parsed(intent)) => intent.clone(),
            Some(CommandOutcome::Failed { error }) => {
                return Err(PayError::NotConfirmable(format!(
                    "last command failed to parse: {}",
                    error
                )))
            }
            None => {
                return Err(PayError::NotConfirmable("no parsed intent".to_string()));
            }
        };
        if !intent.is_actionable() {
            return Err(PayError::NotConfirmable(
                "the intent of the command was unclear".to_string(),
            ));
        }

        let ticket = state
            .latest
            .clone()
            .ok_or_else(|| PayError::NotConfirmable("no parsed intent".to_string()))?;

        state.transaction_in_flight = true;
        state.transaction_status = TransactionStatus::Processing;
        state.transaction_message = Some("Submitting your transaction to the network...".to_string());

        Ok((ticket, intent))
    }

    /// Release the in-flight guard and record the result unless a newer command has started since
    pub async fn finish_transaction(&self, ticket: &CommandTicket, result: &TransactionResult) -> bool {
        let mut state = self.state.write().await;
        state.transaction_in_flight = false;
        if !state.is_latest(ticket) {
            warn!("Discarding transaction result for superseded command {}", ticket.id);
            return false;
        }

        state.transaction_status = result.status;
        state.transaction_message = Some(result.message.clone());
        true
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.read().await;
        SessionSnapshot {
            command_id: state.latest.as_ref().map(|t| t.id),
            transcript: state.latest.as_ref().map(|t| t.command.clone()),
            outcome: state.outcome.clone(),
            processing_command: state.processing_command,
            transaction_in_flight: state.transaction_in_flight,
            transaction_status: state.transaction_status,
            transaction_message: state.transaction_message.clone(),
        }
    }
}
