//! Policy Enforcement Point (`PEP`) object.
//!
//! [`PolicyEnforcer`] encapsulates the full decision flow:
//! materialize alternatives → pick the granted set → match → allow/deny.
//!
//! The granted set is taken, in order of precedence, from:
//! 1. permissions already resolved earlier in the same request,
//! 2. trusted pre-supplied permissions carried by the request,
//! 3. the configured [`GrantedPermissionSource`].
//!
//! Constructed once during service initialisation; cloneable and cheap to
//! pass around (`Arc` inside).

use serde::Deserialize;

use crate::api::{
    AttemptOutcome, GrantedPermissionSource, PermissionListClient, PermissionProbeClient,
};
use crate::error::AclError;
use crate::models::{Permission, RequestContext, RequiredPermission};
use crate::pep::decision::{Decision, Evaluation, GrantBasis, decide};
use crate::pep::materialize::materialize;

/// What to do when an alternative materializes to an empty value sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyValuePolicy {
    /// An empty sequence is satisfied by any non-empty granted set. Existence
    /// probes have no granted set to consult, so there it never matches.
    #[default]
    Vacuous,
    /// An empty sequence is rejected as a bad request.
    Reject,
}

/// Tunables for [`PolicyEnforcer`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyConfig {
    /// Honour permissions pre-supplied by an upstream component.
    pub trust_supplied_permissions: bool,
    pub empty_values: EmptyValuePolicy,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            trust_supplied_permissions: true,
            empty_values: EmptyValuePolicy::Vacuous,
        }
    }
}

/// Policy Enforcement Point.
///
/// # Example
///
/// ```ignore
/// use acl_guard_sdk::pep::PolicyEnforcer;
///
/// let enforcer = PolicyEnforcer::new(GrantedPermissionSource::BulkFetch(client));
/// let alternatives = [RequiredPermission::from_path_param("read", "dataset", "dataset")];
/// enforcer.authorize(&ctx, &alternatives).await?;
/// ```
#[derive(Clone)]
pub struct PolicyEnforcer {
    source: GrantedPermissionSource,
    config: PolicyConfig,
}

impl PolicyEnforcer {
    #[must_use]
    pub fn new(source: GrantedPermissionSource) -> Self {
        Self {
            source,
            config: PolicyConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: PolicyConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    #[must_use]
    pub fn source(&self) -> &GrantedPermissionSource {
        &self.source
    }

    // ── Low-level: materialize only ─────────────────────────────────

    /// Materialize every alternative against the request.
    ///
    /// # Errors
    ///
    /// [`AclError::BadRequest`] when an alternative materializes to an empty
    /// sequence and [`EmptyValuePolicy::Reject`] is configured.
    pub fn materialize_all(
        &self,
        ctx: &RequestContext,
        alternatives: &[RequiredPermission],
    ) -> Result<Vec<Permission>, AclError> {
        alternatives
            .iter()
            .map(|alt| {
                let permission = materialize(alt, ctx);
                if self.config.empty_values == EmptyValuePolicy::Reject
                    && permission.value.is_empty_sequence()
                {
                    return Err(AclError::BadRequest(format!(
                        "no value supplied for {}:{}",
                        permission.resource_type, permission.action
                    )));
                }
                Ok(permission)
            })
            .collect()
    }

    // ── High-level: full flow ───────────────────────────────────────

    /// Evaluate the alternatives and report which one (if any) was satisfied.
    ///
    /// # Errors
    ///
    /// - [`AclError::BadRequest`] from [`Self::materialize_all`]
    /// - [`AclError::Unauthenticated`] / [`AclError::NotFound`] /
    ///   [`AclError::Forbidden`] when the bulk permission lookup reports them;
    ///   any other lookup failure becomes `Forbidden`
    #[tracing::instrument(
        skip_all,
        fields(
            source = self.source.name(),
            alternatives = alternatives.len(),
            caller_id,
            caller_type,
        )
    )]
    pub async fn evaluate(
        &self,
        ctx: &RequestContext,
        alternatives: &[RequiredPermission],
    ) -> Result<Evaluation, AclError> {
        let identity = ctx.effective_identity();
        tracing::Span::current()
            .record("caller_id", identity.id.as_str())
            .record("caller_type", identity.subject_type.as_str());

        let required = self.materialize_all(ctx, alternatives)?;
        if required.is_empty() {
            tracing::debug!("no alternatives declared; denying");
            return Ok(Evaluation::deny(GrantBasis::NotConsulted, Vec::new()));
        }

        if let Some(granted) = ctx.resolved_permissions() {
            return Ok(decide(granted, &required, GrantBasis::Resolved));
        }

        if let Some(granted) = ctx.supplied_permissions() {
            if self.config.trust_supplied_permissions {
                return Ok(decide(granted, &required, GrantBasis::Supplied));
            }
            tracing::debug!("ignoring pre-supplied permissions: trust disabled");
        }

        match &self.source {
            GrantedPermissionSource::BulkFetch(client) => {
                let granted = fetch_granted(client.as_ref(), ctx).await?;
                Ok(decide(&granted, &required, GrantBasis::Fetched))
            }
            GrantedPermissionSource::ExistenceProbe(client) => {
                Ok(probe_alternatives(client.as_ref(), ctx, &required).await)
            }
        }
    }

    /// Succeed iff at least one alternative is satisfied.
    ///
    /// # Errors
    ///
    /// Everything [`Self::evaluate`] returns, plus [`AclError::Forbidden`]
    /// ("Not authorized") when no alternative matches.
    pub async fn authorize(
        &self,
        ctx: &RequestContext,
        alternatives: &[RequiredPermission],
    ) -> Result<(), AclError> {
        let evaluation = self.evaluate(ctx, alternatives).await?;
        match evaluation.decision {
            Decision::Allow { alternative } => {
                tracing::debug!(alternative, basis = ?evaluation.basis, "access granted");
                Ok(())
            }
            Decision::Deny => {
                tracing::debug!(
                    basis = ?evaluation.basis,
                    attempts = evaluation.attempts.len(),
                    "access denied"
                );
                Err(AclError::forbidden())
            }
        }
    }
}

impl std::fmt::Debug for PolicyEnforcer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyEnforcer")
            .field("source", &self.source.name())
            .field("config", &self.config)
            .finish()
    }
}

/// Retrieve the caller's granted list through `client`.
///
/// # Errors
///
/// `Unauthenticated`, `Forbidden` and `NotFound` pass through unchanged;
/// every other failure becomes [`AclError::Forbidden`] ("Not authorized").
pub async fn fetch_granted(
    client: &dyn PermissionListClient,
    ctx: &RequestContext,
) -> Result<Vec<Permission>, AclError> {
    client.list_permissions(ctx).await.map_err(|e| match e {
        e @ (AclError::Unauthenticated(_) | AclError::Forbidden(_) | AclError::NotFound(_)) => e,
        other => {
            tracing::warn!(error = %other, "permission lookup failed; denying");
            AclError::forbidden()
        }
    })
}

async fn probe_alternatives(
    client: &dyn PermissionProbeClient,
    ctx: &RequestContext,
    required: &[Permission],
) -> Evaluation {
    let mut attempts = Vec::with_capacity(required.len());

    for (idx, permission) in required.iter().enumerate() {
        let outcome = probe_all_values(client, ctx, permission).await;
        if let AttemptOutcome::TransportError(reason) = &outcome {
            tracing::warn!(alternative = idx, %reason, "existence probe failed; trying next alternative");
        }
        let matched = outcome.is_matched();
        attempts.push(outcome);
        if matched {
            return Evaluation {
                decision: Decision::Allow { alternative: idx },
                basis: GrantBasis::Probed,
                attempts,
            };
        }
    }

    Evaluation::deny(GrantBasis::Probed, attempts)
}

// Every value of the alternative must be granted; the first miss decides.
// With no values there is nothing to ask the gateway, so nothing is granted.
async fn probe_all_values(
    client: &dyn PermissionProbeClient,
    ctx: &RequestContext,
    permission: &Permission,
) -> AttemptOutcome {
    if permission.value.is_empty_sequence() {
        tracing::debug!(
            action = %permission.action,
            resource_type = %permission.resource_type,
            "no values to probe; not matched"
        );
        return AttemptOutcome::NotMatched;
    }
    for value in permission.value.as_slice() {
        match client.probe(ctx, permission, value).await {
            AttemptOutcome::Matched => {}
            other => return other,
        }
    }
    AttemptOutcome::Matched
}
