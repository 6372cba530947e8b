//! Caller identity extraction.

use acl_guard_sdk::AclError;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::error::acl_error_to_response;
use crate::headers;

/// Whether a request without a valid `user` header is rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UserRequirement {
    #[default]
    Required,
    Optional,
}

/// Parse the `user` header into a [`acl_guard_sdk::CallerIdentity`] request
/// extension.
///
/// Missing or malformed headers are rejected with 401 when the identity is
/// [`UserRequirement::Required`]; otherwise the request continues anonymously.
pub async fn obtain_user_middleware(
    State(requirement): State<UserRequirement>,
    mut req: Request,
    next: Next,
) -> Response {
    match headers::caller_identity(req.headers()) {
        Some(identity) => {
            tracing::debug!(caller_id = %identity.id, caller_type = %identity.subject_type, "caller identified");
            req.extensions_mut().insert(identity);
        }
        None if requirement == UserRequirement::Required => {
            return acl_error_to_response(&AclError::unauthenticated());
        }
        None => {}
    }
    next.run(req).await
}
