use crate::{
    intent_service::{CommandResponse, IntentService},
    session::{CommandSession, SessionSnapshot},
    transaction_processor::TransactionProcessor,
    types::{
        ApiResponse, CommandOutcome, PayError, ServiceMetrics, TransactionResult,
        VoiceAuthResult, WalletConnection,
    },
    voice_auth::VoiceAuthenticator,
    wallet::WalletSession,
};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Instant};
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub intents: Arc<IntentService>,
    pub session: Arc<CommandSession>,
    pub wallet: Arc<WalletSession>,
    pub processor: Arc<TransactionProcessor>,
    pub authenticator: Arc<VoiceAuthenticator>,
    pub metrics: Arc<RwLock<ServiceMetrics>>,
    pub started_at: Instant,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceCommandRequest {
    pub voice_command: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletConnectRequest {
    pub address: String,
    pub chain_id: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceAuthRequest {
    pub voice_sample_data_uri: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub session: SessionSnapshot,
    pub wallet: Option<WalletConnection>,
    pub required_chain_id: u64,
    pub metrics: ServiceMetrics,
    pub uptime_seconds: u64,
}

type ApiResult<T> = (StatusCode, Json<ApiResponse<T>>);

fn ok<T>(data: T) -> ApiResult<T> {
    (StatusCode::OK, Json(ApiResponse::success(data)))
}

fn fail<T>(err: PayError) -> ApiResult<T> {
    let status = match err {
        PayError::NotConfirmable(_) => StatusCode::CONFLICT,
        PayError::InvalidWallet(_) | PayError::WrongNetwork { .. } => StatusCode::BAD_REQUEST,
        PayError::Extraction(_) | PayError::NetworkError(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ApiResponse::error(err.to_string())))
}

pub async fn health() -> &'static str {
    "VoxChain Pay API OK"
}

/// `data` is `null` when the command was blank and ignored
pub async fn submit_intent(
    State(state): State<AppState>,
    Json(request): Json<VoiceCommandRequest>,
) -> ApiResult<Option<CommandResponse>> {
    ok(state.intents.submit(&request.voice_command).await)
}

pub async fn current_intent(State(state): State<AppState>) -> ApiResult<Option<CommandOutcome>> {
    ok(state.session.current_outcome().await)
}

pub async fn connect_wallet(
    State(state): State<AppState>,
    Json(request): Json<WalletConnectRequest>,
) -> ApiResult<WalletConnection> {
    match state.wallet.connect(&request.address, request.chain_id).await {
        Ok(connection) => ok(connection),
        Err(e) => fail(e),
    }
}

pub async fn disconnect_wallet(State(state): State<AppState>) -> ApiResult<Option<WalletConnection>> {
    ok(state.wallet.disconnect().await)
}

pub async fn confirm_transaction(State(state): State<AppState>) -> ApiResult<TransactionResult> {
    match state.processor.confirm().await {
        Ok(result) => ok(result),
        Err(e) => fail(e),
    }
}

pub async fn voice_auth(
    State(state): State<AppState>,
    Json(request): Json<VoiceAuthRequest>,
) -> ApiResult<VoiceAuthResult> {
    state.metrics.write().await.voice_auth_attempts += 1;
    ok(state.authenticator.authenticate(&request.voice_sample_data_uri))
}

pub async fn status(State(state): State<AppState>) -> ApiResult<StatusResponse> {
    ok(StatusResponse {
        session: state.session.snapshot().await,
        wallet: state.wallet.current().await,
        required_chain_id: state.wallet.required_chain_id(),
        metrics: state.metrics.read().await.clone(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/status", get(status))
        .route("/intent", post(submit_intent))
        .route("/intent/current", get(current_intent))
        .route("/wallet/connect", post(connect_wallet))
        .route("/wallet/disconnect", post(disconnect_wallet))
        .route("/transaction/confirm", post(confirm_transaction))
        .route("/auth/voice", post(voice_auth))
        .with_state(state)
}
