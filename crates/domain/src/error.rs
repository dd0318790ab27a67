//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// A required header name is invalid.
    #[error("invalid header name: {0}")]
    InvalidHeaderName(String),

    /// The signing configuration is incomplete or malformed.
    #[error("invalid signing configuration: {0}")]
    InvalidSigningConfig(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// Fatal conditions raised while rendering templates.
///
/// Everything else (unknown functions, missing variables, malformed call
/// syntax) degrades to literal passthrough or empty text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Function output kept re-triggering expansion past the configured bound.
    #[error("template expansion exceeded {limit} nested passes while rendering `{template}`")]
    RecursionLimit {
        /// The configured maximum depth.
        limit: usize,
        /// The text being rendered when the limit was hit.
        template: String,
    },
}

/// Result type alias for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;
