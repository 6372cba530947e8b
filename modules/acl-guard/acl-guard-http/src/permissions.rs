//! Request-scoped resolution of the caller's granted permissions.

use std::sync::Arc;

use acl_guard_sdk::pep::{PolicyConfig, fetch_granted};
use acl_guard_sdk::{Permission, PermissionListClient};
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::context::request_context;
use crate::error::acl_error_to_response;

/// Granted permissions resolved once for the current request.
///
/// Later checks in the same request use this list instead of calling the
/// gateway again; handlers may also read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPermissions(pub Vec<Permission>);

/// State for [`obtain_permissions_middleware`].
#[derive(Clone)]
pub struct PermissionResolver {
    client: Arc<dyn PermissionListClient>,
    trust_supplied_permissions: bool,
}

impl PermissionResolver {
    #[must_use]
    pub fn new(client: Arc<dyn PermissionListClient>) -> Self {
        Self {
            client,
            trust_supplied_permissions: PolicyConfig::default().trust_supplied_permissions,
        }
    }

    /// Honour pre-supplied permissions exactly when `policy` does, so the
    /// resolved list never overrides a trusted header.
    #[must_use]
    pub fn with_policy(mut self, policy: &PolicyConfig) -> Self {
        self.trust_supplied_permissions = policy.trust_supplied_permissions;
        self
    }
}

impl std::fmt::Debug for PermissionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionResolver")
            .field("trust_supplied_permissions", &self.trust_supplied_permissions)
            .finish_non_exhaustive()
    }
}

/// Resolve the caller's granted list and store it as [`ResolvedPermissions`].
///
/// Trusted pre-supplied permissions are stored as-is without a lookup.
/// Lookup failures are answered immediately (401/404 pass through,
/// everything else is 403).
pub async fn obtain_permissions_middleware(
    State(resolver): State<PermissionResolver>,
    req: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = req.into_parts();
    let ctx = request_context(&mut parts).await;

    let granted = match ctx.supplied_permissions() {
        Some(supplied) if resolver.trust_supplied_permissions => {
            tracing::debug!(count = supplied.len(), "using pre-supplied permissions");
            supplied.to_vec()
        }
        _ => match fetch_granted(resolver.client.as_ref(), &ctx).await {
            Ok(granted) => {
                tracing::debug!(count = granted.len(), "resolved granted permissions");
                granted
            }
            Err(err) => return acl_error_to_response(&err),
        },
    };

    parts.extensions.insert(ResolvedPermissions(granted));
    next.run(Request::from_parts(parts, body)).await
}
