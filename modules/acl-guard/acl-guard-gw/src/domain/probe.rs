//! Per-permission existence probes.

use acl_guard_sdk::{AttemptOutcome, Permission, PermissionProbeClient, RequestContext};
use async_trait::async_trait;

use super::GatewayRequest;

/// `GET {gw}/auth/acl/{type}/{id}/has/{action}/{resourceType}/{value}`.
///
/// Any 2xx means the permission exists, whatever the body; any 4xx means it
/// does not. Every other failure is reported as a transport error.
#[derive(Debug, Clone)]
pub struct ExistenceProbeSource {
    request: GatewayRequest,
}

impl ExistenceProbeSource {
    #[must_use]
    pub fn new(request: GatewayRequest) -> Self {
        Self { request }
    }
}

#[async_trait]
impl PermissionProbeClient for ExistenceProbeSource {
    async fn probe(
        &self,
        ctx: &RequestContext,
        required: &Permission,
        value: &str,
    ) -> AttemptOutcome {
        let identity = ctx.effective_identity();
        let url = match self.request.url_from_segments(
            ctx,
            &[
                "auth",
                "acl",
                &identity.subject_type,
                &identity.id,
                "has",
                &required.action,
                &required.resource_type,
                value,
            ],
        ) {
            Ok(url) => url,
            Err(e) => return AttemptOutcome::TransportError(e.to_string()),
        };

        match self.request.get_ok(&url).await {
            Ok(_) => AttemptOutcome::Matched,
            Err(e) if e.status.is_some_and(|s| (400..500).contains(&s)) => {
                tracing::debug!(%url, status = ?e.status, "permission not held");
                AttemptOutcome::NotMatched
            }
            Err(e) => AttemptOutcome::TransportError(e.to_string()),
        }
    }
}
