//! `GET /health` endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use http::StatusCode;

/// Liveness probe run on every `GET /health`.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// # Errors
    ///
    /// A human-readable reason when the service is unhealthy.
    async fn check(&self) -> Result<(), String>;
}

/// A check that always passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysHealthy;

#[async_trait]
impl HealthCheck for AlwaysHealthy {
    async fn check(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Router serving `GET /health`: 204 when `check` passes, 500 otherwise.
#[must_use]
pub fn health_router(check: Arc<dyn HealthCheck>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(check)
}

async fn health_handler(State(check): State<Arc<dyn HealthCheck>>) -> Response {
    match check.check().await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(reason) => {
            tracing::error!(%reason, "health check failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}
