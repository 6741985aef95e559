//! Default implementation of the [`OnboardingService`] trait.

use async_trait::async_trait;
use tokio::fs;
use tokio::task;
use tracing::{info, warn};

use crate::config::SecurityConfig;
use crate::db::{InsertUserError, NewUser, Store};
use crate::library::{self, ReceivedUpload, UploadVault};
use crate::models::profile::FinancialProfile;
use crate::parser::document::parse_profile;
use crate::services::onboarding::{OnboardingService, RegisterError, RegistrationRequest};

pub struct DefaultOnboardingService {
    store: Store,
    vault: UploadVault,
    security: SecurityConfig,
}

impl DefaultOnboardingService {
    #[must_use]
    pub const fn new(store: Store, vault: UploadVault, security: SecurityConfig) -> Self {
        Self {
            store,
            vault,
            security,
        }
    }
}

#[async_trait]
impl OnboardingService for DefaultOnboardingService {
    async fn register(&self, request: RegistrationRequest) -> Result<(), RegisterError> {
        let Some(upload) = request.upload else {
            return Err(RegisterError::Validation(
                "A financial profile document is required".to_string(),
            ));
        };

        // From here on every exit path discards the transient upload.
        if request.username.trim().is_empty()
            || request.email.trim().is_empty()
            || request.password.is_empty()
        {
            library::discard(&upload.path).await;
            return Err(RegisterError::Validation(
                "Username, email and password are required".to_string(),
            ));
        }

        let password_hash = match hash_blocking(&request.password, &self.security).await {
            Ok(hash) => hash,
            Err(e) => {
                library::discard(&upload.path).await;
                return Err(RegisterError::Internal(format!(
                    "Password hashing failed: {e}"
                )));
            }
        };

        let profile = match read_and_parse(&upload).await {
            Ok(profile) => profile,
            Err(e) => {
                library::discard(&upload.path).await;
                return Err(e);
            }
        };

        let document = match serde_json::to_string(&profile) {
            Ok(document) => document,
            Err(e) => {
                library::discard(&upload.path).await;
                return Err(RegisterError::Internal(format!(
                    "Failed to serialize profile document: {e}"
                )));
            }
        };

        let retained = match self.vault.retain(&upload).await {
            Ok(retained) => retained,
            Err(e) => {
                library::discard(&upload.path).await;
                return Err(RegisterError::Internal(format!(
                    "Failed to retain uploaded document: {e}"
                )));
            }
        };

        // Retain-then-persist bounds the failure window to an orphaned
        // retained file; a stored record always has its backing copy.
        let new_user = NewUser {
            username: request.username.clone(),
            email: request.email,
            password_hash,
            financial_profile: document,
            retained_file_path: retained.path.to_string_lossy().into_owned(),
        };

        match self.store.create_user(new_user).await {
            Ok(()) => {}
            Err(InsertUserError::Conflict) => {
                library::discard(&retained.path).await;
                library::discard(&upload.path).await;
                return Err(RegisterError::Conflict);
            }
            Err(InsertUserError::Database(e)) => {
                library::discard(&retained.path).await;
                library::discard(&upload.path).await;
                return Err(RegisterError::Internal(format!(
                    "Failed to persist user record: {e}"
                )));
            }
        }

        library::discard(&upload.path).await;

        info!(username = %request.username, "Registered new user");

        Ok(())
    }
}

/// Argon2 hashing is CPU-intensive, so it runs on the blocking pool.
async fn hash_blocking(password: &str, security: &SecurityConfig) -> anyhow::Result<String> {
    let password = password.to_string();
    let security = security.clone();

    task::spawn_blocking(move || {
        crate::db::repositories::user::hash_password(&password, Some(&security))
    })
    .await
    .map_err(|e| anyhow::anyhow!("Password hashing task panicked: {e}"))?
}

async fn read_and_parse(upload: &ReceivedUpload) -> Result<FinancialProfile, RegisterError> {
    let raw = fs::read(&upload.path).await.map_err(|e| {
        RegisterError::Internal(format!("Failed to read uploaded document: {e}"))
    })?;

    parse_profile(&raw).map_err(|e| {
        warn!(file = %upload.original_name, "Rejected upload: {e}");
        RegisterError::Validation("Invalid financial profile document".to_string())
    })
}
