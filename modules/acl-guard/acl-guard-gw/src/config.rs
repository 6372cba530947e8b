//! Configuration for the acl-guard gateway client.

use std::time::Duration;

use acl_guard_sdk::pep::{EmptyValuePolicy, PolicyConfig};
use serde::Deserialize;

/// How granted permissions are retrieved from the gateway.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceMode {
    /// Fetch the caller's whole permission list, match locally.
    #[default]
    BulkFetch,
    /// Ask the gateway about each alternative in turn.
    ExistenceProbe,
}

/// Gateway client configuration.
#[derive(Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AclGuardGwConfig {
    pub mode: SourceMode,

    /// Application credential sent as `Authorization: Bearer <token>`.
    pub app_token: String,

    /// Used when a request carries no `x-gateway-url` header.
    pub default_gateway_url: Option<String>,

    /// Per-call timeout in milliseconds.
    pub timeout_ms: u64,

    pub trust_supplied_permissions: bool,
    pub empty_values: EmptyValuePolicy,
}

impl AclGuardGwConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    #[must_use]
    pub fn policy(&self) -> PolicyConfig {
        PolicyConfig {
            trust_supplied_permissions: self.trust_supplied_permissions,
            empty_values: self.empty_values,
        }
    }
}

impl Default for AclGuardGwConfig {
    fn default() -> Self {
        let policy = PolicyConfig::default();
        Self {
            mode: SourceMode::default(),
            app_token: String::new(),
            default_gateway_url: None,
            timeout_ms: 5000,
            trust_supplied_permissions: policy.trust_supplied_permissions,
            empty_values: policy.empty_values,
        }
    }
}

impl std::fmt::Debug for AclGuardGwConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AclGuardGwConfig")
            .field("mode", &self.mode)
            .field("app_token", &"[REDACTED]")
            .field("default_gateway_url", &self.default_gateway_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("trust_supplied_permissions", &self.trust_supplied_permissions)
            .field("empty_values", &self.empty_values)
            .finish()
    }
}
