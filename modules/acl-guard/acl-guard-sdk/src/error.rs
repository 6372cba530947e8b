//! Error kinds produced by the ACL guard.
//!
//! Only the *kind* matters to this crate; the HTTP boundary maps each kind to
//! a status code and a stable message.

use serde_json::Value;

/// Stable message for a denied decision.
pub const MSG_NOT_AUTHORIZED: &str = "Not authorized";
/// Stable message for a missing or unusable caller identity.
pub const MSG_NOT_AUTHENTICATED: &str = "Not authenticated";
/// Stable message for a gateway 404.
pub const MSG_NOT_FOUND: &str = "dataset not found";

/// Discriminant of [`AclError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,
    Unauthenticated,
    Forbidden,
    NotFound,
    UnprocessableEntity,
    Upstream,
    Internal,
}

/// Failure reported by a [`crate::GatewayTransport`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("gateway responded with {status:?}: {message}")]
pub struct TransportError {
    /// HTTP status, `None` when no response was received.
    pub status: Option<u16>,
    pub message: String,
}

impl TransportError {
    #[must_use]
    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AclError {
    /// Malformed caller input.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// No valid caller identity where one is required.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// No matching permission, or the permission lookup itself failed.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The gateway reports the referenced resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Caller-supplied structured parameters failed validation.
    #[error("unprocessable entity: {message}")]
    UnprocessableEntity { message: String, params: Vec<Value> },

    /// A gateway failure without a dedicated kind, passed through unchanged.
    #[error(transparent)]
    Upstream(TransportError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AclError {
    #[must_use]
    pub fn forbidden() -> Self {
        Self::Forbidden(MSG_NOT_AUTHORIZED.to_owned())
    }

    #[must_use]
    pub fn unauthenticated() -> Self {
        Self::Unauthenticated(MSG_NOT_AUTHENTICATED.to_owned())
    }

    /// Build an `UnprocessableEntity` error; a non-array `params` value is
    /// wrapped into a one-element list.
    #[must_use]
    pub fn unprocessable(message: impl Into<String>, params: Value) -> Self {
        let params = match params {
            Value::Array(items) => items,
            other => vec![other],
        };
        Self::UnprocessableEntity {
            message: message.into(),
            params,
        }
    }

    /// Map a transport failure: 401, 403 and 404 get their own kinds, every
    /// other failure is carried through as [`AclError::Upstream`].
    #[must_use]
    pub fn from_transport(err: TransportError) -> Self {
        match err.status {
            Some(401) => Self::unauthenticated(),
            Some(403) => Self::forbidden(),
            Some(404) => Self::NotFound(MSG_NOT_FOUND.to_owned()),
            _ => Self::Upstream(err),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BadRequest(_) => ErrorKind::BadRequest,
            Self::Unauthenticated(_) => ErrorKind::Unauthenticated,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::UnprocessableEntity { .. } => ErrorKind::UnprocessableEntity,
            Self::Upstream(_) => ErrorKind::Upstream,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// HTTP status code for this error. Upstream failures keep the
    /// gateway's status, or 502 when no response was received.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::Unauthenticated(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::UnprocessableEntity { .. } => 422,
            Self::Upstream(err) => err.status.unwrap_or(502),
            Self::Internal(_) => 500,
        }
    }

    /// Human-readable message without the kind prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(msg)
            | Self::Unauthenticated(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg)
            | Self::Internal(msg) => msg,
            Self::UnprocessableEntity { message, .. } => message,
            Self::Upstream(err) => &err.message,
        }
    }
}
