//! Builds a [`RequestContext`] from an incoming request.

use acl_guard_sdk::{CallerIdentity, RequestContext};
use axum::extract::{FromRequestParts, RawPathParams};
use http::request::Parts;

use crate::headers;
use crate::permissions::ResolvedPermissions;

/// Collect everything a decision needs from the request.
///
/// - gateway URL, pre-supplied permissions from headers
/// - caller identity and resolved permissions from extensions set by
///   earlier middleware
/// - query parameters (repeated keys accumulate)
/// - path parameters, when the matched route has any
pub async fn request_context(parts: &mut Parts) -> RequestContext {
    let mut ctx = RequestContext::new();

    if let Some(url) = headers::gateway_url(&parts.headers) {
        ctx = ctx.with_gateway_url(url);
    }
    if let Some(identity) = parts.extensions.get::<CallerIdentity>() {
        ctx = ctx.with_identity(identity.clone());
    }
    if let Some(ResolvedPermissions(granted)) = parts.extensions.get::<ResolvedPermissions>() {
        ctx = ctx.with_resolved_permissions(granted.clone());
    }
    if let Some(supplied) = headers::supplied_permissions(&parts.headers) {
        ctx = ctx.with_supplied_permissions(supplied);
    }

    if let Some(query) = parts.uri.query() {
        for (name, value) in form_urlencoded::parse(query.as_bytes()) {
            ctx = ctx.with_query_param(name, value);
        }
    }

    // Rejected when the route has no captures or the layer is not a route_layer.
    if let Ok(params) = RawPathParams::from_request_parts(parts, &()).await {
        for (name, value) in &params {
            ctx = ctx.with_path_param(name, value);
        }
    }

    ctx
}
