//! Tessera Domain - Core template and request types
//!
//! This crate defines the data model for rendering request templates:
//! the template context, path resolution, render options, request
//! parameters and the signing boundary types.
//! All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod request;
pub mod signing;
pub mod template;

pub use error::{DomainError, DomainResult, RenderError, RenderResult};
pub use request::{HttpMethod, RequestParams};
pub use signing::{Credentials, SignedHeaders, SigningConfig, SigningRequest};
pub use template::{
    Argument, FunctionRegistry, MissingValuePolicy, RenderOptions, TemplateContext,
    TemplateFunction, display_value,
};
