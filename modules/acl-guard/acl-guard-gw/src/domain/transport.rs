//! `reqwest`-backed [`GatewayTransport`].

use std::time::Duration;

use acl_guard_sdk::{GatewayTransport, TransportError};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use super::DomainError;

/// HTTP transport attaching the application bearer credential to every call.
#[derive(Debug)]
pub struct HttpGatewayTransport {
    client: reqwest::Client,
    app_token: SecretString,
}

impl HttpGatewayTransport {
    /// # Errors
    ///
    /// [`DomainError::ClientBuild`] if the underlying client cannot be built.
    pub fn new(app_token: SecretString, timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::ClientBuild(e.to_string()))?;
        Ok(Self { client, app_token })
    }
}

impl HttpGatewayTransport {
    async fn send(&self, url: &str) -> Result<reqwest::Response, TransportError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(self.app_token.expose_secret())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| TransportError::unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(%url, status = status.as_u16(), "gateway returned non-success status");
            return Err(TransportError::with_status(
                status.as_u16(),
                format!("gateway responded with {status}"),
            ));
        }
        Ok(response)
    }
}

#[async_trait]
impl GatewayTransport for HttpGatewayTransport {
    async fn get_json(&self, url: &str) -> Result<Value, TransportError> {
        let body = self
            .send(url)
            .await?
            .bytes()
            .await
            .map_err(|e| TransportError::unreachable(e.to_string()))?;

        if body.is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&body)
            .map_err(|e| TransportError::unreachable(format!("invalid JSON from gateway: {e}")))
    }

    async fn get_ok(&self, url: &str) -> Result<(), TransportError> {
        self.send(url).await.map(drop)
    }
}
