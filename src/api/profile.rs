use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::models::profile::FinancialProfile;

#[derive(Serialize)]
pub struct ProfileResponse {
    pub username: String,
    pub email: String,
    pub created_at: String,
    pub financial_profile: FinancialProfile,
    pub score: u32,
}

/// GET /users/{username}/profile
/// Returns the stored profile document together with the derived credit
/// score. The score is recomputed from the document on every read.
pub async fn read_profile(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<ApiResponse<ProfileResponse>>, ApiError> {
    let report = state.accounts.read_profile(&username).await?;

    Ok(Json(ApiResponse::success(ProfileResponse {
        username: report.username,
        email: report.email,
        created_at: report.created_at,
        financial_profile: report.financial_profile,
        score: report.score,
    })))
}
