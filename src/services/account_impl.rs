//! `SeaORM` implementation of the [`AccountService`] trait.

use async_trait::async_trait;

use crate::db::Store;
use crate::models::profile::{FinancialProfile, FinancialSummary};
use crate::scoring::credit_score;
use crate::services::account::{AccountError, AccountService, LoginSummary, ProfileReport};

pub struct SeaOrmAccountService {
    store: Store,
}

impl SeaOrmAccountService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AccountService for SeaOrmAccountService {
    async fn login(&self, username: &str, password: &str) -> Result<LoginSummary, AccountError> {
        // Verify credentials against database; a missing user and a bad
        // password both come back as false from the same call.
        let is_valid = self.store.verify_user_password(username, password).await?;

        if !is_valid {
            return Err(AccountError::InvalidCredentials);
        }

        let user = self
            .store
            .get_user_by_username(username)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        let profile = parse_stored_profile(&user.financial_profile)?;

        Ok(LoginSummary {
            username: user.username,
            financial_summary: FinancialSummary::from(&profile),
            loan_history: profile.loan_history.unwrap_or_default(),
        })
    }

    async fn read_profile(&self, username: &str) -> Result<ProfileReport, AccountError> {
        let user = self
            .store
            .get_user_by_username(username)
            .await?
            .ok_or_else(|| AccountError::NotFound(username.to_string()))?;

        let profile = parse_stored_profile(&user.financial_profile)?;
        let score = credit_score(&profile);

        Ok(ProfileReport {
            username: user.username,
            email: user.email,
            created_at: user.created_at,
            financial_profile: profile,
            score,
        })
    }
}

/// Stored documents were validated at registration; one that no longer parses
/// means the row was tampered with or corrupted, which is an internal fault,
/// not a caller error.
fn parse_stored_profile(document: &str) -> Result<FinancialProfile, AccountError> {
    serde_json::from_str(document)
        .map_err(|e| AccountError::Internal(format!("Stored profile document is unreadable: {e}")))
}
