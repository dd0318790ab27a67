//! Request parameters that are rendered and then signed

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::method::HttpMethod;
use crate::error::{DomainError, DomainResult};
use crate::signing::SignedHeaders;
use crate::template::display_value;

/// Parameters of an outgoing request, possibly containing placeholders.
///
/// `json` takes precedence over `body` when both are present.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RequestParams {
    /// HTTP method
    #[serde(default)]
    pub method: HttpMethod,

    /// Request path (including any query string)
    pub path: String,

    /// Headers in insertion order
    #[serde(default)]
    pub headers: Map<String, Value>,

    /// Raw body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,

    /// JSON payload, serialized when signing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<Value>,
}

impl RequestParams {
    /// Creates parameters with no headers or payload.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            ..Self::default()
        }
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets the raw body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the JSON payload.
    #[must_use]
    pub fn with_json(mut self, json: Value) -> Self {
        self.json = Some(json);
        self
    }

    /// Returns the payload text that gets signed.
    #[must_use]
    pub fn payload(&self) -> Option<String> {
        match (&self.json, &self.body) {
            (Some(json), _) => Some(json.to_string()),
            (None, Some(body)) => Some(display_value(body)),
            (None, None) => None,
        }
    }

    /// Returns headers as text pairs in insertion order.
    #[must_use]
    pub fn header_pairs(&self) -> Vec<(String, String)> {
        self.headers
            .iter()
            .map(|(name, value)| (name.clone(), display_value(value)))
            .collect()
    }

    /// Merges signed headers over the existing ones.
    ///
    /// Header names compare case-insensitively and signed values replace
    /// existing entries.
    pub fn merge_headers(&mut self, signed: &SignedHeaders) {
        for (name, value) in signed.iter() {
            self.headers
                .retain(|existing, _| !existing.eq_ignore_ascii_case(name));
            self.headers
                .insert(name.to_string(), Value::String(value.to_string()));
        }
    }

    /// Checks that every header name is a valid HTTP token.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidHeaderName` for the first offending name.
    pub fn validate(&self) -> DomainResult<()> {
        match self.headers.keys().find(|name| !is_header_token(name)) {
            Some(name) => Err(DomainError::InvalidHeaderName(name.clone())),
            None => Ok(()),
        }
    }
}

fn is_header_token(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_payload_prefers_json() {
        let params = RequestParams::new(HttpMethod::Post, "/items")
            .with_body("raw")
            .with_json(json!({"a": 1}));
        assert_eq!(params.payload(), Some(r#"{"a":1}"#.to_string()));
    }

    #[test]
    fn test_payload_from_body() {
        let params = RequestParams::new(HttpMethod::Post, "/items").with_body("raw text");
        assert_eq!(params.payload(), Some("raw text".to_string()));
        assert_eq!(RequestParams::new(HttpMethod::Get, "/").payload(), None);
    }

    #[test]
    fn test_header_pairs_stringify() {
        let params = RequestParams::new(HttpMethod::Get, "/")
            .with_header("x-count", 3)
            .with_header("accept", "application/json");
        assert_eq!(
            params.header_pairs(),
            vec![
                ("x-count".to_string(), "3".to_string()),
                ("accept".to_string(), "application/json".to_string()),
            ]
        );
    }

    #[test]
    fn test_merge_headers_case_insensitive() {
        let mut params = RequestParams::new(HttpMethod::Get, "/")
            .with_header("Host", "old.example.com")
            .with_header("accept", "*/*");
        let mut signed = SignedHeaders::new();
        signed.insert("host", "new.example.com");
        signed.insert("authorization", "sig");

        params.merge_headers(&signed);

        assert_eq!(params.headers.get("Host"), None);
        assert_eq!(params.headers.get("host"), Some(&json!("new.example.com")));
        assert_eq!(params.headers.get("authorization"), Some(&json!("sig")));
        assert_eq!(params.headers.get("accept"), Some(&json!("*/*")));
    }

    #[test]
    fn test_validate_header_names() {
        let ok = RequestParams::new(HttpMethod::Get, "/").with_header("x-amz-date", "t");
        assert!(ok.validate().is_ok());

        let bad = RequestParams::new(HttpMethod::Get, "/").with_header("bad header", "t");
        assert_eq!(
            bad.validate(),
            Err(DomainError::InvalidHeaderName("bad header".to_string()))
        );
    }
}
