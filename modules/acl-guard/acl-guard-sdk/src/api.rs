//! Collaborator traits consumed by the decision policy.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{AclError, TransportError};
use crate::models::{Permission, RequestContext};

/// Outbound HTTP access to the access-control gateway.
///
/// Implementations attach the application bearer credential to every call
/// and own timeout/retry behaviour.
#[async_trait]
pub trait GatewayTransport: Send + Sync {
    /// `GET` the URL and decode a JSON body.
    ///
    /// # Errors
    ///
    /// [`TransportError`] carrying the HTTP status for non-2xx responses, or
    /// no status when the gateway could not be reached or the body was invalid.
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, TransportError>;

    /// `GET` the URL and discard the body; any 2xx succeeds.
    ///
    /// # Errors
    ///
    /// [`TransportError`] carrying the HTTP status for non-2xx responses, or
    /// no status when the gateway could not be reached.
    async fn get_ok(&self, url: &str) -> Result<(), TransportError>;
}

/// Bulk retrieval of the caller's granted permissions.
///
/// ```ignore
/// let granted = client.list_permissions(&ctx).await?;
/// ```
#[async_trait]
pub trait PermissionListClient: Send + Sync {
    /// Fetch every permission granted to the caller of `ctx`.
    ///
    /// Callers without an identity get the anonymous permission set.
    ///
    /// # Errors
    ///
    /// Any [`AclError`]; the policy collapses kinds other than
    /// `Unauthenticated`, `Forbidden` and `NotFound` into `Forbidden`.
    async fn list_permissions(&self, ctx: &RequestContext) -> Result<Vec<Permission>, AclError>;
}

/// Per-permission existence probe against the gateway.
#[async_trait]
pub trait PermissionProbeClient: Send + Sync {
    /// Ask whether the caller holds `required` for the single `value`.
    ///
    /// Never fails: gateway trouble is reported as
    /// [`AttemptOutcome::TransportError`].
    async fn probe(&self, ctx: &RequestContext, required: &Permission, value: &str)
    -> AttemptOutcome;
}

/// Result of checking one alternative (or one probe).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Matched,
    NotMatched,
    /// The gateway could not answer; treated as not matched.
    TransportError(String),
}

impl AttemptOutcome {
    #[must_use]
    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched)
    }
}

/// How the granted set is obtained when the request does not already carry it.
#[derive(Clone)]
pub enum GrantedPermissionSource {
    /// Fetch the full list once, then match locally.
    BulkFetch(Arc<dyn PermissionListClient>),
    /// Ask the gateway about each alternative in turn.
    ExistenceProbe(Arc<dyn PermissionProbeClient>),
}

impl GrantedPermissionSource {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::BulkFetch(_) => "bulk_fetch",
            Self::ExistenceProbe(_) => "existence_probe",
        }
    }
}

impl std::fmt::Debug for GrantedPermissionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("GrantedPermissionSource")
            .field(&self.name())
            .finish()
    }
}
