//! Domain service for credential verification and profile reads.

use serde::Serialize;
use thiserror::Error;

use crate::models::profile::{FinancialProfile, FinancialSummary, LoanRecord};

/// Errors specific to login and profile reads.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Deliberately undifferentiated: an unknown username and a wrong
    /// password must be indistinguishable to the caller.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AccountError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// What a successful login hands back: the summary projection plus the raw
/// loan history. No score on this path; scoring belongs to the profile read.
#[derive(Debug, Clone, Serialize)]
pub struct LoginSummary {
    pub username: String,
    pub financial_summary: FinancialSummary,
    pub loan_history: Vec<LoanRecord>,
}

/// Score-bearing profile report. The score is recomputed on every read.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileReport {
    pub username: String,
    pub email: String,
    pub created_at: String,
    pub financial_profile: FinancialProfile,
    pub score: u32,
}

/// Domain service trait for account access.
#[async_trait::async_trait]
pub trait AccountService: Send + Sync {
    /// Verifies credentials and returns the stored financial summary.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::InvalidCredentials`] when the username is
    /// unknown or the password does not match, with no distinguishing signal.
    async fn login(&self, username: &str, password: &str) -> Result<LoginSummary, AccountError>;

    /// Returns the stored profile together with its freshly derived score.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::NotFound`] when no such user exists.
    async fn read_profile(&self, username: &str) -> Result<ProfileReport, AccountError>;
}
