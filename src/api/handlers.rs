use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::price::PriceSource;
use crate::register::RegistrationService;
use crate::watch::{ThresholdMode, Watch, WatchRequest, WatchStore};

/// Application state shared across handlers
pub struct AppState {
    pub store: Arc<WatchStore>,
    pub registration: RegistrationService,
    pub prices: Arc<dyn PriceSource>,
}

// ============================================================================
// Health Check
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ============================================================================
// Watch Registration
// ============================================================================

#[derive(Serialize)]
pub struct CreateWatchResponse {
    pub id: u64,
    /// False is the partial-success outcome: the watch is accepted and will
    /// still fire, but the confirmation message could not be delivered.
    pub confirmation_sent: bool,
}

pub async fn create_watch(
    State(state): State<Arc<AppState>>,
    Json(request): Json<WatchRequest>,
) -> Result<(StatusCode, Json<CreateWatchResponse>), ApiError> {
    let registration = state
        .registration
        .register(request)
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(CreateWatchResponse {
            id: registration.id,
            confirmation_sent: registration.confirmation_sent,
        }),
    ))
}

// ============================================================================
// Watch Lookup
// ============================================================================

#[derive(Serialize)]
pub struct WatchInfo {
    pub id: u64,
    pub asset_id: String,
    pub mode: ThresholdMode,
    pub up_limit: Option<f64>,
    pub down_limit: Option<f64>,
    pub recipient: String,
    pub notified: bool,
}

impl From<&Watch> for WatchInfo {
    fn from(watch: &Watch) -> Self {
        Self {
            id: watch.id,
            asset_id: watch.asset_id.clone(),
            mode: watch.mode,
            up_limit: watch.up_limit,
            down_limit: watch.down_limit,
            recipient: watch.recipient.clone(),
            notified: watch.is_notified(),
        }
    }
}

#[derive(Serialize)]
pub struct WatchesResponse {
    pub watches: Vec<WatchInfo>,
}

pub async fn list_watches(State(state): State<Arc<AppState>>) -> Json<WatchesResponse> {
    let watches = state
        .store
        .snapshot()
        .iter()
        .map(|watch| WatchInfo::from(watch.as_ref()))
        .collect();

    Json(WatchesResponse { watches })
}

pub async fn get_watch(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<WatchInfo>, ApiError> {
    let watch = state
        .store
        .get(id)
        .ok_or_else(|| ApiError::NotFound(format!("Watch {} not found", id)))?;

    Ok(Json(WatchInfo::from(watch.as_ref())))
}

// ============================================================================
// Asset Detail
// ============================================================================

pub async fn asset_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let detail = state
        .prices
        .detail(&id)
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;

    Ok(Json(detail))
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Upstream(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}
