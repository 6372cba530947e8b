//! Generic gateway request helper.

use std::sync::Arc;

use acl_guard_sdk::{AclError, GatewayTransport, RequestContext, TransportError};
use serde_json::Value;

use super::DomainError;

/// Resolves URLs against the request's gateway and performs the call.
#[derive(Clone)]
pub struct GatewayRequest {
    transport: Arc<dyn GatewayTransport>,
    default_gateway_url: Option<String>,
}

impl GatewayRequest {
    #[must_use]
    pub fn new(transport: Arc<dyn GatewayTransport>) -> Self {
        Self {
            transport,
            default_gateway_url: None,
        }
    }

    #[must_use]
    pub fn with_default_gateway_url(mut self, url: Option<String>) -> Self {
        self.default_gateway_url = url;
        self
    }

    /// Gateway base URL for this request, without a trailing `/`.
    ///
    /// # Errors
    ///
    /// [`DomainError::MissingGatewayUrl`] if neither the request nor the
    /// configuration names a gateway.
    pub fn base_url<'a>(&'a self, ctx: &'a RequestContext) -> Result<&'a str, DomainError> {
        ctx.gateway_url()
            .or(self.default_gateway_url.as_deref())
            .map(|url| url.trim_end_matches('/'))
            .filter(|url| !url.is_empty())
            .ok_or(DomainError::MissingGatewayUrl)
    }

    /// Absolute URL for a path relative to the gateway.
    ///
    /// # Errors
    ///
    /// See [`Self::base_url`].
    pub fn url(&self, ctx: &RequestContext, path: &str) -> Result<String, DomainError> {
        let base = self.base_url(ctx)?;
        if path.starts_with('/') {
            Ok(format!("{base}{path}"))
        } else {
            Ok(format!("{base}/{path}"))
        }
    }

    /// Absolute URL built from path segments, each percent-encoded.
    ///
    /// # Errors
    ///
    /// See [`Self::base_url`].
    pub fn url_from_segments(
        &self,
        ctx: &RequestContext,
        segments: &[&str],
    ) -> Result<String, DomainError> {
        self.url(ctx, &encode_path(segments))
    }

    /// Status-only call; the body is ignored and the caller interprets failures.
    pub(crate) async fn get_ok(&self, url: &str) -> Result<(), TransportError> {
        self.transport.get_ok(url).await
    }

    /// `GET` a gateway path and decode the JSON body.
    ///
    /// # Errors
    ///
    /// - 404 → [`AclError::NotFound`] ("dataset not found")
    /// - 401 → [`AclError::Unauthenticated`] ("Not authenticated")
    /// - 403 → [`AclError::Forbidden`] ("Not authorized")
    /// - any other failure → [`AclError::Upstream`], status unchanged
    /// - no gateway URL → [`AclError::Internal`]
    pub async fn request_json(&self, ctx: &RequestContext, path: &str) -> Result<Value, AclError> {
        let url = self.url(ctx, path)?;
        self.fetch(&url).await
    }

    pub(crate) async fn fetch(&self, url: &str) -> Result<Value, AclError> {
        self.transport.get_json(url).await.map_err(|e| {
            tracing::error!(%url, status = ?e.status, error = %e, "gateway request failed");
            AclError::from_transport(e)
        })
    }
}

impl std::fmt::Debug for GatewayRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayRequest")
            .field("default_gateway_url", &self.default_gateway_url)
            .finish_non_exhaustive()
    }
}

fn encode_path(segments: &[&str]) -> String {
    let mut path = String::new();
    for segment in segments {
        path.push('/');
        path.push_str(&urlencoding::encode(segment));
    }
    path
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
pub(crate) mod tests {
    use std::sync::Mutex;

    use acl_guard_sdk::ErrorKind;
    use async_trait::async_trait;

    use super::*;

    /// Records requested URLs and answers with a canned result.
    pub(crate) struct RecordingTransport {
        urls: Mutex<Vec<String>>,
        // Err(None) simulates an unreachable gateway.
        result: Result<Value, Option<u16>>,
    }

    impl RecordingTransport {
        pub(crate) fn ok(body: Value) -> Arc<Self> {
            Arc::new(Self {
                urls: Mutex::new(Vec::new()),
                result: Ok(body),
            })
        }

        pub(crate) fn failing(status: Option<u16>) -> Arc<Self> {
            Arc::new(Self {
                urls: Mutex::new(Vec::new()),
                result: Err(status),
            })
        }

        pub(crate) fn recorded(&self) -> Vec<String> {
            self.urls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GatewayTransport for RecordingTransport {
        async fn get_json(&self, url: &str) -> Result<Value, TransportError> {
            self.urls.lock().unwrap().push(url.to_owned());
            match &self.result {
                Ok(body) => Ok(body.clone()),
                Err(Some(status)) => Err(TransportError::with_status(*status, "canned")),
                Err(None) => Err(TransportError::unreachable("connection refused")),
            }
        }

        async fn get_ok(&self, url: &str) -> Result<(), TransportError> {
            self.get_json(url).await.map(drop)
        }
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let req = GatewayRequest::new(RecordingTransport::ok(Value::Null));
        let ctx = RequestContext::new().with_gateway_url("http://gw:9000/");
        assert_eq!(req.url(&ctx, "/auth/x").unwrap(), "http://gw:9000/auth/x");
        assert_eq!(req.url(&ctx, "auth/x").unwrap(), "http://gw:9000/auth/x");
    }

    #[test]
    fn segments_are_percent_encoded() {
        let req = GatewayRequest::new(RecordingTransport::ok(Value::Null));
        let ctx = RequestContext::new().with_gateway_url("http://gw");
        let url = req
            .url_from_segments(&ctx, &["auth", "acl", "a b/c", "amazon-*"])
            .unwrap();
        assert_eq!(url, "http://gw/auth/acl/a%20b%2Fc/amazon-%2A");
    }

    #[test]
    fn request_header_wins_over_default() {
        let req = GatewayRequest::new(RecordingTransport::ok(Value::Null))
            .with_default_gateway_url(Some("http://fallback".to_owned()));

        let ctx = RequestContext::new().with_gateway_url("http://primary");
        assert_eq!(req.base_url(&ctx).unwrap(), "http://primary");
        assert_eq!(
            req.base_url(&RequestContext::new()).unwrap(),
            "http://fallback"
        );
    }

    #[tokio::test]
    async fn missing_gateway_url_is_internal() {
        let req = GatewayRequest::new(RecordingTransport::ok(Value::Null));
        let err = req
            .request_json(&RequestContext::new(), "/anything")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[tokio::test]
    async fn status_codes_are_mapped() {
        let ctx = RequestContext::new().with_gateway_url("http://gw");
        let cases = [
            (404, ErrorKind::NotFound, "dataset not found"),
            (401, ErrorKind::Unauthenticated, "Not authenticated"),
            (403, ErrorKind::Forbidden, "Not authorized"),
        ];
        for (status, kind, message) in cases {
            let req = GatewayRequest::new(RecordingTransport::failing(Some(status)));
            let err = req.request_json(&ctx, "/x").await.unwrap_err();
            assert_eq!(err.kind(), kind);
            assert_eq!(err.message(), message);
        }
    }

    #[tokio::test]
    async fn other_statuses_pass_through() {
        let ctx = RequestContext::new().with_gateway_url("http://gw");
        let req = GatewayRequest::new(RecordingTransport::failing(Some(503)));
        let err = req.request_json(&ctx, "/x").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Upstream);
        assert_eq!(err.status(), 503);
    }

    #[tokio::test]
    async fn success_returns_body() {
        let transport = RecordingTransport::ok(serde_json::json!({"ok": true}));
        let req = GatewayRequest::new(transport.clone());
        let ctx = RequestContext::new().with_gateway_url("http://gw");

        let body = req.request_json(&ctx, "/v1/things").await.unwrap();

        assert_eq!(body, serde_json::json!({"ok": true}));
        assert_eq!(transport.recorded(), vec!["http://gw/v1/things".to_owned()]);
    }
}
