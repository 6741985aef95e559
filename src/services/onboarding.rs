//! Domain service for registration.
//!
//! Registration is an all-or-nothing pipeline: hash the credential, validate
//! the uploaded document, retain a durable copy, persist the combined record.
//! Whatever stage fails, the transient upload is discarded before the error
//! surfaces; a retained copy that never made it into the store is discarded
//! with it.

use thiserror::Error;

use crate::library::ReceivedUpload;

/// Errors specific to registration.
#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Username or email already registered")]
    Conflict,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// A registration request as handed over by the upload-receiving layer.
#[derive(Debug)]
pub struct RegistrationRequest {
    pub username: String,

    pub email: String,

    pub password: String,

    /// Transient upload handle; `None` when the request carried no file.
    pub upload: Option<ReceivedUpload>,
}

/// Domain service trait for registration.
#[async_trait::async_trait]
pub trait OnboardingService: Send + Sync {
    /// Runs the full registration pipeline for one request.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterError::Validation`] for missing fields or an
    /// unparseable document, [`RegisterError::Conflict`] when the username or
    /// email is already taken, and [`RegisterError::Internal`] for hashing,
    /// filesystem, or store failures.
    async fn register(&self, request: RegistrationRequest) -> Result<(), RegisterError>;
}
