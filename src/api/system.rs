//! System API endpoints.

use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, SystemStatus};

#[derive(Debug, Serialize)]
pub struct HealthLiveResponse {
    pub status: &'static str,
}

/// GET /api/system/status
/// Service version, uptime, registered-user count, and store reachability.
pub async fn get_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SystemStatus>>, ApiError> {
    let database = state.store.ping().await.is_ok();
    let registered_users = state.store.user_count().await.unwrap_or(0);

    Ok(Json(ApiResponse::success(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: state.start_time.elapsed().as_secs(),
        registered_users,
        database,
    })))
}

/// GET /api/system/health/live
pub async fn health_live() -> impl IntoResponse {
    Json(HealthLiveResponse { status: "ok" })
}
