//! Application error types

use tessera_domain::{DomainError, RenderError};
use thiserror::Error;

use crate::ports::{CredentialsError, SigningError};

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Template rendering failed.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Credentials could not be obtained.
    #[error("credentials error: {0}")]
    Credentials(#[from] CredentialsError),

    /// The signer rejected the request.
    #[error("signing error: {0}")]
    Signing(#[from] SigningError),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
