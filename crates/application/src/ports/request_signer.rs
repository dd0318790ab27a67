//! Request signer port
//!
//! The signature algorithm lives behind this trait; the application only
//! assembles the input and merges the output.

use tessera_domain::{SignedHeaders, SigningRequest};

/// Errors reported by a signer.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SigningError {
    /// The request cannot be signed as given.
    #[error("Invalid request for signing: {0}")]
    InvalidRequest(String),

    /// The signer failed internally.
    #[error("Signing failed: {0}")]
    Failed(String),
}

/// Computes signed headers for a rendered request.
pub trait RequestSigner: Send + Sync {
    /// Signs the request and returns the headers to merge into it.
    ///
    /// # Errors
    /// Returns an error if the request cannot be signed.
    fn sign(&self, request: &SigningRequest) -> Result<SignedHeaders, SigningError>;
}
