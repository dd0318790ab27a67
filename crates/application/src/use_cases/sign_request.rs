//! Sign request use case.
//!
//! Renders request parameters against a template context, then hands them
//! to the signing collaborator with an explicit configuration.

use tessera_domain::{
    Credentials, RequestParams, SignedHeaders, SigningConfig, SigningRequest, TemplateContext,
};
use tokio::sync::OnceCell;
use tracing::debug;

use crate::error::ApplicationResult;
use crate::ports::{CredentialsError, CredentialsProvider, RequestSigner};
use crate::renderer::TemplateRenderer;

/// Output from signing a request.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    /// Rendered parameters with the signed headers merged in.
    pub params: RequestParams,
    /// The headers the signer produced.
    pub signed_headers: SignedHeaders,
}

/// Use case for rendering and signing outgoing requests.
///
/// Credentials are fetched once and shared. Requests that arrive while the
/// first fetch is still pending wait for it; none of them is dropped. A
/// failed fetch is retried by the next request.
pub struct SignRequest<P: CredentialsProvider, S: RequestSigner> {
    config: SigningConfig,
    renderer: TemplateRenderer,
    credentials_provider: P,
    signer: S,
    credentials: OnceCell<Credentials>,
}

impl<P: CredentialsProvider, S: RequestSigner> SignRequest<P, S> {
    /// Creates a new `SignRequest` use case.
    ///
    /// # Errors
    /// Returns `ApplicationError::Domain` if the configuration is incomplete.
    pub fn new(
        config: SigningConfig,
        credentials_provider: P,
        signer: S,
    ) -> ApplicationResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            renderer: TemplateRenderer::default(),
            credentials_provider,
            signer,
            credentials: OnceCell::new(),
        })
    }

    /// Replaces the renderer (and with it the render options).
    #[must_use]
    pub fn with_renderer(mut self, renderer: TemplateRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Returns the signing configuration.
    #[must_use]
    pub const fn config(&self) -> &SigningConfig {
        &self.config
    }

    /// Renders `params`, signs the result and merges the signed headers.
    ///
    /// # Errors
    /// - `ApplicationError::Render` if template expansion does not terminate
    /// - `ApplicationError::Domain` if a header name is invalid
    /// - `ApplicationError::Credentials` if credentials cannot be fetched
    /// - `ApplicationError::Signing` if the signer rejects the request
    pub async fn execute(
        &self,
        params: &RequestParams,
        context: &TemplateContext,
    ) -> ApplicationResult<SignedRequest> {
        let mut rendered = self.renderer.render_request(params, context)?;
        rendered.validate()?;

        let credentials = self.credentials().await?;
        let request = SigningRequest {
            method: rendered.method,
            path: rendered.path.clone(),
            headers: rendered.header_pairs(),
            body: rendered.payload(),
            region: self.config.region.clone(),
            service_name: self.config.service_name.clone(),
            credentials,
        };

        debug!(
            method = %request.method,
            path = %request.path,
            region = %request.region,
            service = %request.service_name,
            "signing rendered request"
        );
        let signed_headers = self.signer.sign(&request)?;
        rendered.merge_headers(&signed_headers);

        Ok(SignedRequest {
            params: rendered,
            signed_headers,
        })
    }

    async fn credentials(&self) -> Result<Credentials, CredentialsError> {
        self.credentials
            .get_or_try_init(|| async {
                debug!("fetching signing credentials");
                self.credentials_provider.credentials().await
            })
            .await
            .cloned()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::significant_drop_tightening
)]
mod tests {
    use super::*;
    use crate::error::ApplicationError;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tessera_domain::{Argument, DomainError, HttpMethod, RenderError, RenderOptions};

    struct MockProvider {
        calls: AtomicUsize,
        failures_left: AtomicUsize,
        delay: Duration,
    }

    impl MockProvider {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                failures_left: AtomicUsize::new(0),
                delay: Duration::ZERO,
            }
        }

        fn failing_once() -> Self {
            let provider = Self::new();
            provider.failures_left.store(1, Ordering::SeqCst);
            provider
        }

        fn slow() -> Self {
            Self {
                delay: Duration::from_millis(20),
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl CredentialsProvider for MockProvider {
        async fn credentials(&self) -> Result<Credentials, CredentialsError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(CredentialsError::Unavailable("metadata endpoint".into()));
            }
            Ok(Credentials::new("AKID", "secret"))
        }
    }

    #[derive(Default)]
    struct MockSigner {
        seen: Mutex<Vec<SigningRequest>>,
    }

    impl RequestSigner for MockSigner {
        fn sign(
            &self,
            request: &SigningRequest,
        ) -> Result<SignedHeaders, crate::ports::SigningError> {
            self.seen.lock().expect("Lock poisoned").push(request.clone());
            let mut headers = SignedHeaders::new();
            headers.insert(
                "Authorization",
                format!(
                    "SIG {} {} {} {}",
                    request.credentials.access_key_id,
                    request.method,
                    request.path,
                    request.service_name
                ),
            );
            headers.insert("x-amz-date", "20240101T000000Z");
            Ok(headers)
        }
    }

    fn config() -> SigningConfig {
        SigningConfig::new("us-east-1", "execute-api")
    }

    fn context() -> TemplateContext {
        TemplateContext::new()
            .with_vars(json!({"stage": "prod", "order": {"id": 9, "qty": 2}}))
            .with_function("$trace", |_: &[Argument]| json!("trace-1"))
    }

    #[tokio::test]
    async fn test_execute_renders_and_signs() {
        let use_case =
            SignRequest::new(config(), MockProvider::new(), MockSigner::default()).unwrap();
        let params = RequestParams::new(HttpMethod::Post, "/{{stage}}/orders")
            .with_header("x-trace", "{{ $trace() }}")
            .with_header("authorization", "stale")
            .with_json(json!({"order": "{{order}}"}));

        let signed = use_case.execute(&params, &context()).await.unwrap();

        assert_eq!(signed.params.path, "/prod/orders");
        assert_eq!(signed.params.headers.get("x-trace"), Some(&json!("trace-1")));
        assert_eq!(signed.params.headers.get("authorization"), None);
        assert_eq!(
            signed.params.headers.get("Authorization"),
            Some(&json!("SIG AKID POST /prod/orders execute-api"))
        );
        assert_eq!(signed.signed_headers.len(), 2);

        let seen = use_case.signer.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].region, "us-east-1");
        assert_eq!(seen[0].body.as_deref(), Some(r#"{"order":{"id":9,"qty":2}}"#));
        assert_eq!(
            seen[0].headers,
            vec![
                ("x-trace".to_string(), "trace-1".to_string()),
                ("authorization".to_string(), "stale".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_one_fetch() {
        let use_case =
            SignRequest::new(config(), MockProvider::slow(), MockSigner::default()).unwrap();
        let ctx = context();
        let first = RequestParams::new(HttpMethod::Get, "/a");
        let second = RequestParams::new(HttpMethod::Get, "/b");
        let third = RequestParams::new(HttpMethod::Get, "/c");

        let (a, b, c) = tokio::join!(
            use_case.execute(&first, &ctx),
            use_case.execute(&second, &ctx),
            use_case.execute(&third, &ctx),
        );

        assert!(a.is_ok() && b.is_ok() && c.is_ok());
        assert_eq!(use_case.credentials_provider.calls.load(Ordering::SeqCst), 1);
        let mut paths: Vec<String> = use_case
            .signer
            .seen
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.path.clone())
            .collect();
        paths.sort();
        assert_eq!(paths, vec!["/a", "/b", "/c"]);
    }

    #[tokio::test]
    async fn test_failed_credential_fetch_is_retried() {
        let use_case =
            SignRequest::new(config(), MockProvider::failing_once(), MockSigner::default())
                .unwrap();
        let params = RequestParams::new(HttpMethod::Get, "/");

        let first = use_case.execute(&params, &context()).await;
        assert!(matches!(first, Err(ApplicationError::Credentials(_))));

        let second = use_case.execute(&params, &context()).await;
        assert!(second.is_ok());
        assert_eq!(use_case.credentials_provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_runaway_template_is_reported() {
        let use_case = SignRequest::new(config(), MockProvider::new(), MockSigner::default())
            .unwrap()
            .with_renderer(TemplateRenderer::new(RenderOptions::default().with_max_depth(3)));
        let ctx =
            TemplateContext::new().with_function("$me", |_: &[Argument]| json!("{{ $me() }}"));
        let params = RequestParams::new(HttpMethod::Get, "/{{ $me() }}");

        let result = use_case.execute(&params, &ctx).await;
        assert!(matches!(
            result,
            Err(ApplicationError::Render(RenderError::RecursionLimit { limit: 3, .. }))
        ));
        assert!(use_case.signer.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = SignRequest::new(
            SigningConfig::new("", "execute-api"),
            MockProvider::new(),
            MockSigner::default(),
        );
        assert!(matches!(
            result,
            Err(ApplicationError::Domain(DomainError::InvalidSigningConfig(_)))
        ));
    }
}
