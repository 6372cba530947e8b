//! Configuration for the static acl-guard plugin.

use acl_guard_sdk::{DEFAULT_SUBJECT_TYPE, Permission};
use serde::Deserialize;

/// Plugin configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticAclPluginConfig {
    /// Permissions granted to callers without an identity.
    pub anonymous: Vec<Permission>,

    /// Permissions granted per identified subject.
    pub subjects: Vec<SubjectGrants>,
}

/// Grants for a single subject.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubjectGrants {
    pub id: String,

    #[serde(rename = "type", default = "default_subject_type")]
    pub subject_type: String,

    #[serde(default)]
    pub permissions: Vec<Permission>,
}

fn default_subject_type() -> String {
    DEFAULT_SUBJECT_TYPE.to_owned()
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn config_parses_subjects_and_anonymous() {
        let yaml = r#"
anonymous:
  - action: read
    type: dataset
    value: "*-public"
subjects:
  - id: u1
    permissions:
      - action: read
        type: dataset
        value: ["amazon-*", "brazil-2020"]
  - id: svc
    type: app
"#;
        let parsed: Result<StaticAclPluginConfig, _> = serde_saphyr::from_str(yaml);
        let cfg = match parsed {
            Ok(cfg) => cfg,
            Err(e) => panic!("failed to parse config: {e}"),
        };

        assert_eq!(cfg.anonymous.len(), 1);
        assert_eq!(cfg.subjects.len(), 2);
        assert_eq!(cfg.subjects[0].subject_type, "user");
        assert_eq!(cfg.subjects[1].subject_type, "app");
        assert!(cfg.subjects[1].permissions.is_empty());
    }

    #[test]
    fn config_allows_empty() {
        let parsed: Result<StaticAclPluginConfig, _> = serde_saphyr::from_str("{}");
        let cfg = match parsed {
            Ok(cfg) => cfg,
            Err(e) => panic!("failed to parse config: {e}"),
        };
        assert!(cfg.anonymous.is_empty());
        assert!(cfg.subjects.is_empty());
    }

    #[test]
    fn config_rejects_unknown_fields() {
        let parsed: Result<StaticAclPluginConfig, _> =
            serde_saphyr::from_str("subjects: []\nunexpected: true\n");
        assert!(parsed.is_err());
    }
}
