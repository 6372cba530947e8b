#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! ACL Guard SDK
//!
//! This crate provides the permission model and decision engine used by the
//! `acl-guard` middleware:
//!
//! - [`Permission`], [`PermissionValue`] - Granted/required permission model
//! - [`RequiredPermission`] - Alternative entry, optionally templated from request params
//! - [`RequestContext`], [`CallerIdentity`] - Request-scoped inputs to a decision
//! - [`matcher`] - Wildcard value matching (granted permission is the pattern)
//! - [`GatewayTransport`], [`PermissionListClient`], [`PermissionProbeClient`] - Collaborator traits
//! - [`GrantedPermissionSource`] - Bulk-fetch vs. existence-probe retrieval
//! - [`AclError`] - Error kinds
//! - [`pep`] - Decision policy ([`pep::PolicyEnforcer`])
//!
//! ## Usage
//!
//! ```ignore
//! use acl_guard_sdk::{GrantedPermissionSource, RequiredPermission, RequestContext};
//! use acl_guard_sdk::pep::PolicyEnforcer;
//!
//! let enforcer = PolicyEnforcer::new(GrantedPermissionSource::BulkFetch(client));
//!
//! let alternatives = vec![
//!     RequiredPermission::literal("read", "dataset", "amazon-2020"),
//!     RequiredPermission::from_path_param("read", "dataset", "dataset"),
//! ];
//!
//! enforcer.authorize(&ctx, &alternatives).await?;
//! ```

pub mod api;
pub mod error;
pub mod matcher;
pub mod models;
pub mod pep;

// Re-export main types at crate root
pub use api::{
    AttemptOutcome, GatewayTransport, GrantedPermissionSource, PermissionListClient,
    PermissionProbeClient,
};
pub use error::{AclError, ErrorKind, TransportError};
pub use matcher::{ValuePattern, exists_match, matches, value_matches};
pub use models::{
    ANONYMOUS_ID, CallerIdentity, DEFAULT_SUBJECT_TYPE, Permission, PermissionValue,
    RequestContext, RequiredPermission, ValueSource,
};
