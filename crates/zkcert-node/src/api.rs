//! HTTP API server for the ZkCert node.
//!
//! A thin transport over [`RegistryService`]: request bodies carry the calling
//! principal (`actor`), which is trusted as already authenticated, and byte
//! payloads travel as hex strings.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use zkcert_core::{
    AuthorizationPolicy, CredentialKey, CredentialRecord, CredentialState, ErrorKind,
    EventRecord, Principal, RegistryError,
};
use zkcert_registry::{RegistryService, RegistrySnapshot};

/// Shared state accessible from HTTP handlers.
pub struct ApiState {
    pub service: Arc<RegistryService>,
    pub start_time: Instant,
}

impl ApiState {
    pub fn new(service: Arc<RegistryService>) -> Self {
        Self {
            service,
            start_time: Instant::now(),
        }
    }
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

// --- Request / response types ---

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub version: String,
    pub administrator: String,
    pub verifier: String,
    pub authorization_policy: AuthorizationPolicy,
    pub issuer_count: usize,
    pub credential_count: usize,
    pub event_count: u64,
    pub uptime_secs: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IssuersResponse {
    pub issuers: Vec<Principal>,
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct IssuerChangeRequest {
    pub identity: String,
    pub actor: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IssuerChangeResponse {
    pub identity: Principal,
    pub authorized: bool,
    /// `None` when the call changed nothing.
    pub event: Option<EventRecord>,
}

#[derive(Debug, Deserialize)]
pub struct IssueCredentialRequest {
    pub key: String,
    #[serde(default)]
    pub credential_type: Option<String>,
    /// Hex-encoded metadata.
    #[serde(default)]
    pub metadata: String,
    /// Hex-encoded issuance proof.
    #[serde(default)]
    pub proof: String,
    pub actor: String,
}

#[derive(Debug, Deserialize)]
pub struct RevokeCredentialRequest {
    pub actor: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMetadataRequest {
    /// Hex-encoded replacement metadata.
    pub metadata: String,
    pub actor: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyCredentialRequest {
    /// Hex-encoded proof.
    #[serde(default)]
    pub proof: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub key: CredentialKey,
    pub valid: bool,
    pub verifier: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CredentialResponse {
    pub key: CredentialKey,
    pub state: CredentialState,
    pub record: CredentialRecord,
}

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    #[serde(default)]
    pub since: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EventsResponse {
    pub events: Vec<EventRecord>,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: ErrorKind,
}

// --- Error mapping ---

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::Forbidden | ErrorKind::NotAdministrator => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::AlreadyExists | ErrorKind::AlreadyRevoked => StatusCode::CONFLICT,
        ErrorKind::Revoked => StatusCode::GONE,
    }
}

fn error_response(err: RegistryError) -> (StatusCode, Json<ErrorResponse>) {
    let kind = err.kind();
    (
        status_for(kind),
        Json(ErrorResponse {
            error: err.to_string(),
            kind,
        }),
    )
}

fn parse_key(raw: &str) -> Result<CredentialKey, RegistryError> {
    raw.parse()
}

fn decode_hex(field: &str, raw: &str) -> Result<Vec<u8>, RegistryError> {
    hex::decode(raw.strip_prefix("0x").unwrap_or(raw))
        .map_err(|e| RegistryError::Validation(format!("{} is not valid hex: {}", field, e)))
}

// --- Handlers ---

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
    })
}

async fn handle_status(State(state): State<Arc<ApiState>>) -> Json<StatusResponse> {
    let service = &state.service;
    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        administrator: service.administrator().to_string(),
        verifier: service.verifier_name().to_string(),
        authorization_policy: service.policy(),
        issuer_count: service.issuers().len(),
        credential_count: service.store().len(),
        event_count: service.event_count(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

async fn handle_list_issuers(State(state): State<Arc<ApiState>>) -> Json<IssuersResponse> {
    let issuers = state.service.issuers().list();
    let count = issuers.len();
    Json(IssuersResponse { issuers, count })
}

async fn handle_authorize_issuer(
    State(state): State<Arc<ApiState>>,
    Json(req): Json<IssuerChangeRequest>,
) -> ApiResult<IssuerChangeResponse> {
    let result = (|| -> Result<_, RegistryError> {
        let identity = Principal::new(req.identity)?;
        let actor = Principal::new(req.actor)?;
        let event = state.service.authorize_issuer(identity.clone(), &actor)?;
        Ok(IssuerChangeResponse {
            identity,
            authorized: true,
            event,
        })
    })();
    result.map(Json).map_err(error_response)
}

async fn handle_deauthorize_issuer(
    State(state): State<Arc<ApiState>>,
    Json(req): Json<IssuerChangeRequest>,
) -> ApiResult<IssuerChangeResponse> {
    let result = (|| -> Result<_, RegistryError> {
        let identity = Principal::new(req.identity)?;
        let actor = Principal::new(req.actor)?;
        let event = state.service.deauthorize_issuer(&identity, &actor)?;
        Ok(IssuerChangeResponse {
            identity,
            authorized: false,
            event,
        })
    })();
    result.map(Json).map_err(error_response)
}

async fn handle_issue_credential(
    State(state): State<Arc<ApiState>>,
    Json(req): Json<IssueCredentialRequest>,
) -> ApiResult<EventRecord> {
    let result = (|| -> Result<_, RegistryError> {
        let key = parse_key(&req.key)?;
        let metadata = decode_hex("metadata", &req.metadata)?;
        let proof = decode_hex("proof", &req.proof)?;
        let actor = Principal::new(req.actor)?;
        state
            .service
            .issue_credential(key, req.credential_type, metadata, proof, &actor)
    })();
    result.map(Json).map_err(error_response)
}

async fn handle_get_credential(
    State(state): State<Arc<ApiState>>,
    Path(key): Path<String>,
) -> ApiResult<CredentialResponse> {
    let result = parse_key(&key).and_then(|key| {
        let record = state.service.get_credential(&key)?;
        Ok(CredentialResponse {
            key,
            state: record.state(),
            record,
        })
    });
    result.map(Json).map_err(error_response)
}

async fn handle_revoke_credential(
    State(state): State<Arc<ApiState>>,
    Path(key): Path<String>,
    Json(req): Json<RevokeCredentialRequest>,
) -> ApiResult<EventRecord> {
    let result = (|| -> Result<_, RegistryError> {
        let key = parse_key(&key)?;
        let actor = Principal::new(req.actor)?;
        state.service.revoke_credential(&key, &actor)
    })();
    result.map(Json).map_err(error_response)
}

async fn handle_update_metadata(
    State(state): State<Arc<ApiState>>,
    Path(key): Path<String>,
    Json(req): Json<UpdateMetadataRequest>,
) -> ApiResult<EventRecord> {
    let result = (|| -> Result<_, RegistryError> {
        let key = parse_key(&key)?;
        let metadata = decode_hex("metadata", &req.metadata)?;
        let actor = Principal::new(req.actor)?;
        state.service.update_metadata(&key, metadata, &actor)
    })();
    result.map(Json).map_err(error_response)
}

async fn handle_verify_credential(
    State(state): State<Arc<ApiState>>,
    Path(key): Path<String>,
    Json(req): Json<VerifyCredentialRequest>,
) -> ApiResult<VerifyResponse> {
    let result = (|| -> Result<_, RegistryError> {
        let key = parse_key(&key)?;
        let proof = decode_hex("proof", &req.proof)?;
        let valid = state.service.verify_credential(&key, &proof)?;
        Ok(VerifyResponse {
            key,
            valid,
            verifier: state.service.verifier_name().to_string(),
        })
    })();
    result.map(Json).map_err(error_response)
}

async fn handle_events(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<EventsQuery>,
) -> Json<EventsResponse> {
    let events = state.service.events_since(query.since);
    let count = events.len();
    Json(EventsResponse { events, count })
}

async fn handle_snapshot(State(state): State<Arc<ApiState>>) -> Json<RegistrySnapshot> {
    Json(state.service.snapshot())
}

// --- Server ---

pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(handle_health))
        .route("/api/v1/status", get(handle_status))
        .route("/api/v1/issuers", get(handle_list_issuers))
        .route("/api/v1/issuers/authorize", post(handle_authorize_issuer))
        .route("/api/v1/issuers/deauthorize", post(handle_deauthorize_issuer))
        .route("/api/v1/credentials/issue", post(handle_issue_credential))
        .route("/api/v1/credentials/{key}", get(handle_get_credential))
        .route("/api/v1/credentials/{key}/revoke", post(handle_revoke_credential))
        .route("/api/v1/credentials/{key}/metadata", post(handle_update_metadata))
        .route("/api/v1/credentials/{key}/verify", post(handle_verify_credential))
        .route("/api/v1/events", get(handle_events))
        .route("/api/v1/snapshot", get(handle_snapshot))
        .with_state(state)
}

pub async fn start_api_server(listen_addr: SocketAddr, state: Arc<ApiState>) -> anyhow::Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!(%listen_addr, "HTTP API server started");
    axum::serve(listener, app).await?;
    Ok(())
}
