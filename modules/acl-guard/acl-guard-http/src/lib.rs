#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! `axum` boundary for acl-guard.
//!
//! Typical wiring:
//!
//! ```ignore
//! let app = Router::new()
//!     .route("/datasets/{dataset}", get(show_dataset))
//!     .route_layer(middleware::from_fn_with_state(guard, check_permissions_middleware))
//!     .layer(middleware::from_fn_with_state(UserRequirement::Optional, obtain_user_middleware))
//!     .merge(health_router(Arc::new(AlwaysHealthy)));
//! ```
//!
//! The check middleware must be installed with `route_layer` so that path
//! parameters are available to templated alternatives.

pub mod check;
pub mod context;
pub mod error;
pub mod headers;
pub mod health;
pub mod identity;
pub mod permissions;

pub use check::{AclGuardState, check_permissions_middleware};
pub use context::request_context;
pub use error::{AclErrorResponse, acl_error_to_response};
pub use headers::{HEADER_GATEWAY_URL, HEADER_SUPPLIED_PERMISSIONS, HEADER_USER};
pub use health::{AlwaysHealthy, HealthCheck, health_router};
pub use identity::{UserRequirement, obtain_user_middleware};
pub use permissions::{PermissionResolver, ResolvedPermissions, obtain_permissions_middleware};
