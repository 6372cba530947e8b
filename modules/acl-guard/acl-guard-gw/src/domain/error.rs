use acl_guard_sdk::AclError;

/// Errors raised while setting up or addressing the gateway.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("no gateway URL on the request and no default configured")]
    MissingGatewayUrl,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl From<DomainError> for AclError {
    fn from(e: DomainError) -> Self {
        AclError::Internal(e.to_string())
    }
}
