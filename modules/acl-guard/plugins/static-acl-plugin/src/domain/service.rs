//! Service implementation for the static acl-guard plugin.

use std::collections::HashMap;

use acl_guard_sdk::{CallerIdentity, Permission};

use crate::config::StaticAclPluginConfig;

/// Static permission service.
///
/// - Callers without an identity get the `anonymous` list.
/// - Identified callers get the list configured for `(type, id)`.
/// - Unknown subjects get an empty list, which never matches.
#[derive(Debug, Clone, Default)]
pub struct Service {
    anonymous: Vec<Permission>,
    subjects: HashMap<(String, String), Vec<Permission>>,
}

impl Service {
    #[must_use]
    pub fn new(config: StaticAclPluginConfig) -> Self {
        let mut subjects: HashMap<(String, String), Vec<Permission>> = HashMap::new();
        for grants in config.subjects {
            // Repeated subjects accumulate.
            subjects
                .entry((grants.subject_type, grants.id))
                .or_default()
                .extend(grants.permissions);
        }

        tracing::info!(
            subjects = subjects.len(),
            anonymous = config.anonymous.len(),
            "static acl plugin loaded"
        );

        Self {
            anonymous: config.anonymous,
            subjects,
        }
    }

    /// Permissions granted to `identity`, or to anonymous callers when `None`.
    #[must_use]
    pub fn granted(&self, identity: Option<&CallerIdentity>) -> Vec<Permission> {
        match identity {
            None => self.anonymous.clone(),
            Some(identity) => self
                .subjects
                .get(&(identity.subject_type.clone(), identity.id.clone()))
                .cloned()
                .unwrap_or_default(),
        }
    }
}
