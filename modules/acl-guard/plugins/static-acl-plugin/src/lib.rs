#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Static acl-guard permission source.
//!
//! Serves granted-permission lists straight from configuration, with no
//! gateway involved. Intended for local development and tests.

pub mod config;
pub mod domain;

pub use config::{StaticAclPluginConfig, SubjectGrants};
pub use domain::Service;
