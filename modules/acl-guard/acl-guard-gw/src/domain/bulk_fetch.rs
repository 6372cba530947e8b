//! Bulk retrieval of the caller's granted permissions.

use acl_guard_sdk::{AclError, Permission, PermissionListClient, RequestContext, TransportError};
use async_trait::async_trait;

use super::GatewayRequest;

/// `GET {gw}/auth/acl/permissions/{type}/{id}` for identified callers,
/// `GET {gw}/auth/acl/permissions/anonymous` otherwise.
#[derive(Debug, Clone)]
pub struct BulkFetchSource {
    request: GatewayRequest,
}

impl BulkFetchSource {
    #[must_use]
    pub fn new(request: GatewayRequest) -> Self {
        Self { request }
    }
}

#[async_trait]
impl PermissionListClient for BulkFetchSource {
    async fn list_permissions(&self, ctx: &RequestContext) -> Result<Vec<Permission>, AclError> {
        let url = match ctx.identity() {
            Some(identity) => self.request.url_from_segments(
                ctx,
                &["auth", "acl", "permissions", &identity.subject_type, &identity.id],
            )?,
            None => self
                .request
                .url_from_segments(ctx, &["auth", "acl", "permissions", "anonymous"])?,
        };

        let body = self.request.fetch(&url).await?;
        let granted: Vec<Permission> = serde_json::from_value(body).map_err(|e| {
            AclError::Upstream(TransportError::unreachable(format!(
                "invalid permission list from gateway: {e}"
            )))
        })?;

        tracing::debug!(count = granted.len(), "fetched granted permissions");
        Ok(granted)
    }
}
