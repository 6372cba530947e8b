//! Error kind → HTTP response mapping.

use acl_guard_sdk::AclError;
use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde_json::json;

/// Convert an [`AclError`] into a JSON response.
///
/// Body: `{"status": <code>, "message": "..."}`, plus `"params"` for
/// unprocessable-entity errors.
#[must_use]
pub fn acl_error_to_response(err: &AclError) -> Response {
    let status = StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if status.is_server_error() {
        tracing::error!(status = status.as_u16(), error = %err, "acl-guard request failed");
    } else {
        tracing::debug!(status = status.as_u16(), error = %err, "acl-guard rejected request");
    }

    let body = match err {
        AclError::UnprocessableEntity { message, params } => json!({
            "status": status.as_u16(),
            "message": message,
            "params": params,
        }),
        other => json!({
            "status": status.as_u16(),
            "message": other.message(),
        }),
    };

    (status, Json(body)).into_response()
}

/// Lets handlers return `Result<_, AclErrorResponse>` and use `?`.
#[derive(Debug)]
pub struct AclErrorResponse(pub AclError);

impl From<AclError> for AclErrorResponse {
    fn from(err: AclError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AclErrorResponse {
    fn into_response(self) -> Response {
        acl_error_to_response(&self.0)
    }
}
