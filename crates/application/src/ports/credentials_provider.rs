//! Credentials provider port
//!
//! Defines the interface for fetching signing credentials.

use async_trait::async_trait;

use tessera_domain::Credentials;

/// Errors that can occur while fetching credentials.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CredentialsError {
    /// No credentials are configured for the current environment.
    #[error("Credentials not found: {0}")]
    NotFound(String),

    /// The credential source could not be reached.
    #[error("Credential source unavailable: {0}")]
    Unavailable(String),
}

/// Source of credentials for the signing collaborator.
#[async_trait]
pub trait CredentialsProvider: Send + Sync {
    /// Fetches credentials.
    ///
    /// # Errors
    /// Returns an error if credentials cannot be resolved.
    async fn credentials(&self) -> Result<Credentials, CredentialsError>;
}
