//! Permission check middleware.

use std::sync::Arc;

use acl_guard_sdk::RequiredPermission;
use acl_guard_sdk::pep::PolicyEnforcer;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::context::request_context;
use crate::error::acl_error_to_response;

/// Shared state for [`check_permissions_middleware`]: the enforcer and the
/// alternatives guarding one route (or group of routes).
#[derive(Debug, Clone)]
pub struct AclGuardState {
    pub enforcer: PolicyEnforcer,
    pub alternatives: Arc<[RequiredPermission]>,
}

impl AclGuardState {
    #[must_use]
    pub fn new(enforcer: PolicyEnforcer, alternatives: impl Into<Arc<[RequiredPermission]>>) -> Self {
        Self {
            enforcer,
            alternatives: alternatives.into(),
        }
    }
}

/// Let the request through iff at least one alternative is satisfied.
///
/// Install with `Router::route_layer` so templated alternatives can read
/// path parameters.
pub async fn check_permissions_middleware(
    State(state): State<AclGuardState>,
    req: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = req.into_parts();
    let ctx = request_context(&mut parts).await;

    match state.enforcer.authorize(&ctx, &state.alternatives).await {
        Ok(()) => next.run(Request::from_parts(parts, body)).await,
        Err(err) => acl_error_to_response(&err),
    }
}
