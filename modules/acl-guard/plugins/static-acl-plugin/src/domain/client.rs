//! [`PermissionListClient`] implementation for the static plugin.

use acl_guard_sdk::{AclError, Permission, PermissionListClient, RequestContext};
use async_trait::async_trait;

use super::service::Service;

#[async_trait]
impl PermissionListClient for Service {
    async fn list_permissions(&self, ctx: &RequestContext) -> Result<Vec<Permission>, AclError> {
        Ok(self.granted(ctx.identity()))
    }
}
