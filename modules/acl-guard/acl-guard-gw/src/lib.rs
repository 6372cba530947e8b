#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Gateway side of acl-guard.
//!
//! Talks to the remote access-control gateway over HTTP and exposes the two
//! granted-permission sources consumed by
//! [`acl_guard_sdk::pep::PolicyEnforcer`]:
//!
//! - [`BulkFetchSource`]: one call returning every permission the caller holds
//! - [`ExistenceProbeSource`]: one call per alternative value
//!
//! [`build_enforcer`] wires the configured source into an enforcer.

pub mod config;
pub mod domain;

pub use config::{AclGuardGwConfig, SourceMode};
pub use domain::{
    BulkFetchSource, DomainError, ExistenceProbeSource, GatewayRequest, HttpGatewayTransport,
    build_enforcer,
};
