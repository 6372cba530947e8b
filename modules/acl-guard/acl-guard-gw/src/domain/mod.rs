//! Domain layer for the acl-guard gateway client.

pub mod bulk_fetch;
pub mod error;
pub mod probe;
pub mod request;
pub mod transport;

use std::sync::Arc;

use acl_guard_sdk::pep::PolicyEnforcer;
use acl_guard_sdk::{AclError, GrantedPermissionSource};
use secrecy::SecretString;

pub use bulk_fetch::BulkFetchSource;
pub use error::DomainError;
pub use probe::ExistenceProbeSource;
pub use request::GatewayRequest;
pub use transport::HttpGatewayTransport;

use crate::config::{AclGuardGwConfig, SourceMode};

/// Build a [`PolicyEnforcer`] backed by the gateway, using the source
/// selected by `cfg.mode`.
///
/// # Errors
///
/// [`AclError::Internal`] if the configuration is unusable or the HTTP
/// client cannot be built.
pub fn build_enforcer(cfg: &AclGuardGwConfig) -> Result<PolicyEnforcer, AclError> {
    if cfg.timeout_ms == 0 {
        return Err(DomainError::InvalidConfig("timeout_ms must be greater than zero".to_owned()).into());
    }
    if cfg.app_token.is_empty() {
        tracing::warn!("app_token is empty; gateway calls will carry an empty bearer credential");
    }

    let transport = HttpGatewayTransport::new(SecretString::from(cfg.app_token.clone()), cfg.timeout())?;
    let request = GatewayRequest::new(Arc::new(transport))
        .with_default_gateway_url(cfg.default_gateway_url.clone());

    let source = match cfg.mode {
        SourceMode::BulkFetch => {
            GrantedPermissionSource::BulkFetch(Arc::new(BulkFetchSource::new(request)))
        }
        SourceMode::ExistenceProbe => {
            GrantedPermissionSource::ExistenceProbe(Arc::new(ExistenceProbeSource::new(request)))
        }
    };

    tracing::info!(
        mode = source.name(),
        timeout_ms = cfg.timeout_ms,
        default_gateway_url = ?cfg.default_gateway_url,
        "acl-guard gateway enforcer ready"
    );

    Ok(PolicyEnforcer::new(source).with_config(cfg.policy()))
}
