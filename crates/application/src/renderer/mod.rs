//! Template rendering engine
//!
//! Renders `{{ path }}` placeholders and `{{ $fn(args) }}` call expressions
//! inside arbitrary JSON values.
//!
//! # Usage
//!
//! ```
//! use serde_json::json;
//! use tessera_application::renderer::render;
//! use tessera_domain::{Argument, TemplateContext};
//!
//! let ctx = TemplateContext::new()
//!     .with_vars(json!({"user": {"id": 42, "name": "ada"}}))
//!     .with_function("$now", |_: &[Argument]| json!("2024-01-01"));
//!
//! let rendered = render(
//!     &json!({"id": "{{user.id}}", "greeting": "hi {{user.name}} at {{ $now() }}"}),
//!     &ctx,
//! )
//! .unwrap();
//!
//! assert_eq!(rendered, json!({"id": 42, "greeting": "hi ada at 2024-01-01"}));
//! ```

pub mod builtins;
pub mod call;
pub mod interpolate;
pub mod invoke;
pub mod placeholder;
pub mod traverse;

pub use builtins::builtin_functions;
pub use call::{ParsedCall, find_calls, try_parse_call};
pub use interpolate::render_variables;
pub use invoke::{invoke_calls, render_call};
pub use placeholder::{Placeholder, find_placeholders, has_placeholders};
pub use traverse::{render_map, render_string, render_value};

use serde_json::Value;
use tessera_domain::{
    RenderOptions, RenderResult, RequestParams, TemplateContext, display_value,
};

/// Renders `value` with default options.
///
/// # Errors
/// Returns `RenderError::RecursionLimit` on runaway function expansion.
pub fn render(value: &Value, context: &TemplateContext) -> RenderResult<Value> {
    render_value(value, context, &RenderOptions::default())
}

/// Renders an optional value; `None` passes through untouched.
///
/// # Errors
/// See [`render`].
pub fn render_optional(
    value: Option<&Value>,
    context: &TemplateContext,
) -> RenderResult<Option<Value>> {
    value.map(|value| render(value, context)).transpose()
}

/// Renderer bound to a set of [`RenderOptions`].
#[derive(Debug, Clone, Default)]
pub struct TemplateRenderer {
    options: RenderOptions,
}

impl TemplateRenderer {
    /// Creates a renderer with the given options.
    #[must_use]
    pub const fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Returns the options in use.
    #[must_use]
    pub const fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Renders every string leaf of `value`.
    ///
    /// # Errors
    /// Returns `RenderError::RecursionLimit` on runaway function expansion.
    pub fn render(&self, value: &Value, context: &TemplateContext) -> RenderResult<Value> {
        render_value(value, context, &self.options)
    }

    /// Renders a single string.
    ///
    /// # Errors
    /// See [`TemplateRenderer::render`].
    pub fn render_str(&self, text: &str, context: &TemplateContext) -> RenderResult<Value> {
        render_string(text, context, &self.options)
    }

    /// Renders the path, headers and payload of a request.
    ///
    /// The path is always text; header values and payloads keep whatever
    /// native types whole-value placeholders resolve to.
    ///
    /// # Errors
    /// See [`TemplateRenderer::render`].
    pub fn render_request(
        &self,
        params: &RequestParams,
        context: &TemplateContext,
    ) -> RenderResult<RequestParams> {
        let path = display_value(&self.render_str(&params.path, context)?);
        let headers = render_map(&params.headers, context, &self.options)?;
        let body = params
            .body
            .as_ref()
            .map(|body| self.render(body, context))
            .transpose()?;
        let json = params
            .json
            .as_ref()
            .map(|json| self.render(json, context))
            .transpose()?;

        Ok(RequestParams {
            method: params.method,
            path,
            headers,
            body,
            json,
        })
    }
}
