//! Tessera Application - template rendering engine and signing orchestration
//!
//! This crate renders `{{ ... }}` placeholders inside request data and hands
//! the rendered request to a signing collaborator through ports.

pub mod error;
pub mod ports;
pub mod renderer;
pub mod use_cases;

pub use error::{ApplicationError, ApplicationResult};
pub use renderer::{TemplateRenderer, builtin_functions, render, render_optional};
pub use use_cases::{SignRequest, SignedRequest};
