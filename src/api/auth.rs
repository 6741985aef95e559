use axum::{
    Json,
    extract::{Multipart, State},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use super::{ApiError, ApiResponse, AppState, MessageResponse};
use crate::library::{self, ReceivedUpload};
use crate::models::profile::{FinancialSummary, LoanRecord};
use crate::services::RegistrationRequest;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub username: String,
    pub financial_summary: FinancialSummary,
    pub loan_history: Vec<LoanRecord>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/register
/// Multipart registration: `username`, `email`, `password` text fields plus a
/// `document` file field carrying the financial profile.
///
/// This handler is the upload-receiving layer: it spools the document into
/// the transient upload directory and hands `{path, original filename}` to
/// the onboarding pipeline, which owns all cleanup from there.
pub async fn register(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let mut username = String::new();
    let mut email = String::new();
    let mut password = String::new();
    let mut document: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Malformed multipart request: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "username" => username = read_text_field(field, "username").await?,
            "email" => email = read_text_field(field, "email").await?,
            "password" => password = read_text_field(field, "password").await?,
            "document" => {
                let original_name = field
                    .file_name()
                    .map_or_else(|| "document.json".to_string(), ToString::to_string);
                let bytes = field.bytes().await.map_err(|e| {
                    ApiError::validation(format!("Failed to read uploaded document: {e}"))
                })?;
                document = Some((original_name, bytes.to_vec()));
            }
            _ => {}
        }
    }

    // The document is buffered until the whole request has parsed so a
    // malformed later field cannot leave a stray transient file behind.
    let upload = match document {
        Some((original_name, bytes)) => {
            Some(spool_upload(&state, &original_name, &bytes).await?)
        }
        None => None,
    };

    state
        .onboarding
        .register(RegistrationRequest {
            username,
            email,
            password,
            upload,
        })
        .await?;

    Ok(Json(ApiResponse::success(MessageResponse {
        message: "Registration complete".to_string(),
    })))
}

/// POST /auth/login
/// Verifies credentials and returns the stored financial summary plus raw
/// loan history. Unknown usernames and wrong passwords are indistinguishable.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    // Validate input
    if payload.username.is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let summary = state
        .accounts
        .login(&payload.username, &payload.password)
        .await?;

    Ok(Json(ApiResponse::success(LoginResponse {
        username: summary.username,
        financial_summary: summary.financial_summary,
        loan_history: summary.loan_history,
    })))
}

// ============================================================================
// Helpers
// ============================================================================

async fn read_text_field(
    field: axum::extract::multipart::Field<'_>,
    name: &str,
) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::validation(format!("Failed to read field '{name}': {e}")))
}

/// Writes the uploaded bytes into the transient upload directory and returns
/// the handle the pipeline consumes. A failed write cleans up after itself.
async fn spool_upload(
    state: &AppState,
    original_name: &str,
    bytes: &[u8],
) -> Result<ReceivedUpload, ApiError> {
    let upload_dir = Path::new(&state.config.storage.upload_path);

    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to prepare upload directory: {e}")))?;

    let basename = Path::new(original_name).file_name().map_or_else(
        || "document".to_string(),
        |name| name.to_string_lossy().into_owned(),
    );
    let path = upload_dir.join(format!("{}_{}", Uuid::new_v4(), basename));

    if let Err(e) = tokio::fs::write(&path, bytes).await {
        library::discard(&path).await;
        return Err(ApiError::internal(format!("Failed to store upload: {e}")));
    }

    Ok(ReceivedUpload {
        path,
        original_name: basename,
    })
}
