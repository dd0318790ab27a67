//! Signing collaborator types
//!
//! The signature itself is computed outside this workspace; these types carry
//! the explicit configuration and the data handed across that boundary.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::request::HttpMethod;

/// Region and service a request is signed for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningConfig {
    /// Cloud region, e.g. `us-east-1`.
    pub region: String,
    /// Service name, e.g. `execute-api`.
    pub service_name: String,
}

impl SigningConfig {
    /// Creates a signing configuration.
    #[must_use]
    pub fn new(region: impl Into<String>, service_name: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            service_name: service_name.into(),
        }
    }

    /// Checks that region and service are both present.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidSigningConfig` naming the blank field.
    pub fn validate(&self) -> DomainResult<()> {
        if self.region.trim().is_empty() {
            return Err(DomainError::InvalidSigningConfig(
                "region must not be empty".to_string(),
            ));
        }
        if self.service_name.trim().is_empty() {
            return Err(DomainError::InvalidSigningConfig(
                "service name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Access credentials used by the signer.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    /// Access key identifier.
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
    /// Session token for temporary credentials.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
}

impl Credentials {
    /// Creates long-term credentials without a session token.
    #[must_use]
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    /// Attaches a session token.
    #[must_use]
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("session_token", &self.session_token.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Everything the signer consumes for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Request path
    pub path: String,
    /// Rendered headers as text
    pub headers: Vec<(String, String)>,
    /// Payload text
    pub body: Option<String>,
    /// Region from the signing configuration
    pub region: String,
    /// Service name from the signing configuration
    pub service_name: String,
    /// Credentials resolved for this request
    pub credentials: Credentials,
}

/// Headers produced by the signer, in the order it emitted them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SignedHeaders {
    entries: Vec<(String, String)>,
}

impl SignedHeaders {
    /// Creates an empty header set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adds or replaces a header (names compare case-insensitively).
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.entries
            .retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.entries.push((name, value.into()));
    }

    /// Looks up a header value by case-insensitive name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Iterates over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Returns the number of headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for SignedHeaders {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_config_from_json() {
        let config: SigningConfig =
            serde_json::from_str(r#"{"region": "eu-west-1", "serviceName": "es"}"#).unwrap();
        assert_eq!(config, SigningConfig::new("eu-west-1", "es"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        assert_eq!(
            SigningConfig::new(" ", "es").validate(),
            Err(DomainError::InvalidSigningConfig(
                "region must not be empty".to_string()
            ))
        );
        assert!(SigningConfig::new("us-east-1", "").validate().is_err());
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let creds = Credentials::new("AKID", "very-secret").with_session_token("tok");
        let debug = format!("{creds:?}");
        assert!(debug.contains("AKID"));
        assert!(!debug.contains("very-secret"));
        assert!(!debug.contains("tok\""));
    }

    #[test]
    fn test_signed_headers_replace() {
        let mut headers: SignedHeaders =
            [("X-Amz-Date", "1"), ("Authorization", "a")].into_iter().collect();
        headers.insert("x-amz-date", "2");

        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("X-AMZ-DATE"), Some("2"));
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec![("Authorization", "a"), ("x-amz-date", "2")]
        );
    }
}
