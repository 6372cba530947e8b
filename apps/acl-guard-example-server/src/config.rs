//! Server configuration: YAML file layered with environment variables.

use std::path::Path;

use acl_guard_gw::AclGuardGwConfig;
use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use serde::Deserialize;
use static_acl_plugin::StaticAclPluginConfig;

/// Prefix for nested overrides, e.g. `ACL_GUARD__ACL__TIMEOUT_MS=250`.
pub const ENV_PREFIX: &str = "ACL_GUARD__";

/// Legacy variable holding the application token.
pub const APP_TOKEN_ENV: &str = "GFW_APP_TOKEN";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionSourceKind {
    /// Remote access-control gateway (`acl.mode` picks the strategy).
    Gateway,
    /// Grants from `static_acl`, no network.
    #[default]
    Static,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8087".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub source: PermissionSourceKind,
    /// Reject requests without a valid `user` header.
    pub require_user: bool,
    pub acl: AclGuardGwConfig,
    pub static_acl: StaticAclPluginConfig,
}

impl AppConfig {
    /// Load defaults, then `path` (if given), then `GFW_APP_TOKEN`, then
    /// `ACL_GUARD__*` variables.
    ///
    /// # Errors
    ///
    /// A missing file, malformed YAML, unknown keys or mistyped values.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            anyhow::ensure!(
                path.is_file(),
                "configuration file {} not found",
                path.display()
            );
            figment = figment.merge(Yaml::file(path));
        }
        let cfg = figment
            .merge(
                Env::raw()
                    .only(&[APP_TOKEN_ENV])
                    .map(|_| "acl.app_token".into()),
            )
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        Ok(cfg)
    }
}
