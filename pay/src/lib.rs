//! VoxChain Pay service.
//!
//! Takes spoken payment commands, extracts a transaction intent through a
//! language model, completes it with the normalizer from `voxchain-intent`
//! and simulates submission and voice authentication.
//!
//! # Example
//!
//! ```no_run
//! use voxchain_pay::{app_state, config::ConfigLoader, extractor::LlmExtractor, routes::routes};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigLoader::load()?;
//!     let extractor = Arc::new(LlmExtractor::new(&config.extractor)?);
//!     let app = routes(app_state(&config, extractor));
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod extractor;
pub mod intent_service;
pub mod routes;
pub mod session;
pub mod transaction_processor;
pub mod types;
pub mod voice_auth;
pub mod wallet;

use std::{sync::Arc, time::Instant};
use tokio::sync::RwLock;

pub use extractor::IntentExtractor;
pub use intent_service::{CommandResponse, IntentService};
pub use routes::AppState;
pub use types::{CommandOutcome, PayConfig, PayError};

/// Wire the service components together around one extractor
pub fn app_state(config: &PayConfig, extractor: Arc<dyn IntentExtractor>) -> AppState {
    let session = Arc::new(session::CommandSession::new());
    let wallet = Arc::new(wallet::WalletSession::new(config.wallet.clone()));
    let metrics = Arc::new(RwLock::new(types::ServiceMetrics::default()));

    AppState {
        intents: Arc::new(IntentService::new(
            extractor,
            Arc::clone(&session),
            Arc::clone(&metrics),
        )),
        processor: Arc::new(transaction_processor::TransactionProcessor::new(
            config.processing.clone(),
            Arc::clone(&session),
            Arc::clone(&wallet),
            Arc::clone(&metrics),
        )),
        authenticator: Arc::new(voice_auth::VoiceAuthenticator::new(config.auth.clone())),
        session,
        wallet,
        metrics,
        started_at: Instant::now(),
    }
}
