//! Domain models for the ACL guard.
//!
//! The same [`Permission`] shape is used for permissions granted to a caller
//! and for permissions required by an endpoint. On the wire the resource type
//! is carried under the `type` key, matching the gateway contract.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Identifier used for callers without an authenticated principal.
pub const ANONYMOUS_ID: &str = "anonymous";

/// Subject type assumed for callers without an authenticated principal.
pub const DEFAULT_SUBJECT_TYPE: &str = "user";

/// Value of a permission: a single resource identifier or an ordered list.
///
/// Granted values may carry `*` markers (see [`crate::matcher`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PermissionValue {
    Single(String),
    Many(Vec<String>),
}

impl PermissionValue {
    /// View the value as a slice, regardless of its shape.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        match self {
            Self::Single(v) => std::slice::from_ref(v),
            Self::Many(values) => values,
        }
    }

    /// `true` for a `Many` value with no elements.
    #[must_use]
    pub fn is_empty_sequence(&self) -> bool {
        matches!(self, Self::Many(values) if values.is_empty())
    }
}

impl From<&str> for PermissionValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_owned())
    }
}

impl From<String> for PermissionValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for PermissionValue {
    fn from(values: Vec<String>) -> Self {
        Self::Many(values)
    }
}

/// An `(action, resource type, value)` triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    /// Verb, e.g. `"read"` or `"write"`.
    pub action: String,
    /// Category of protected resource, e.g. `"dataset"`.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Concrete resource identifier(s), possibly wildcarded.
    pub value: PermissionValue,
}

impl Permission {
    #[must_use]
    pub fn new(
        action: impl Into<String>,
        resource_type: impl Into<String>,
        value: impl Into<PermissionValue>,
    ) -> Self {
        Self {
            action: action.into(),
            resource_type: resource_type.into(),
            value: value.into(),
        }
    }
}

/// The caller on whose behalf a decision is made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    pub id: String,
    #[serde(rename = "type")]
    pub subject_type: String,
}

impl CallerIdentity {
    #[must_use]
    pub fn new(id: impl Into<String>, subject_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            subject_type: subject_type.into(),
        }
    }

    /// `("anonymous", "user")`.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::new(ANONYMOUS_ID, DEFAULT_SUBJECT_TYPE)
    }
}

/// Where the value of a required permission comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Fixed value known when the route is declared.
    Literal(PermissionValue),
    /// Taken from the named path parameter of the current request.
    PathParam(String),
    /// Taken from all values of the named query parameter.
    QueryParam(String),
}

/// One entry of an alternative list (logical OR) demanded by an endpoint.
///
/// Deserializes from `{"action", "type", "value" | "valueParam" | "queryParam"}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawRequiredPermission")]
pub struct RequiredPermission {
    pub action: String,
    pub resource_type: String,
    pub value: ValueSource,
}

impl RequiredPermission {
    #[must_use]
    pub fn literal(
        action: impl Into<String>,
        resource_type: impl Into<String>,
        value: impl Into<PermissionValue>,
    ) -> Self {
        Self {
            action: action.into(),
            resource_type: resource_type.into(),
            value: ValueSource::Literal(value.into()),
        }
    }

    /// Literal alternative whose values must all be granted.
    #[must_use]
    pub fn many<I, S>(action: impl Into<String>, resource_type: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::literal(
            action,
            resource_type,
            PermissionValue::Many(values.into_iter().map(Into::into).collect()),
        )
    }

    #[must_use]
    pub fn from_path_param(
        action: impl Into<String>,
        resource_type: impl Into<String>,
        param: impl Into<String>,
    ) -> Self {
        Self {
            action: action.into(),
            resource_type: resource_type.into(),
            value: ValueSource::PathParam(param.into()),
        }
    }

    #[must_use]
    pub fn from_query_param(
        action: impl Into<String>,
        resource_type: impl Into<String>,
        param: impl Into<String>,
    ) -> Self {
        Self {
            action: action.into(),
            resource_type: resource_type.into(),
            value: ValueSource::QueryParam(param.into()),
        }
    }
}

impl From<Permission> for RequiredPermission {
    fn from(p: Permission) -> Self {
        Self {
            action: p.action,
            resource_type: p.resource_type,
            value: ValueSource::Literal(p.value),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawRequiredPermission {
    action: String,
    #[serde(rename = "type")]
    resource_type: String,
    value: Option<PermissionValue>,
    value_param: Option<String>,
    query_param: Option<String>,
}

impl TryFrom<RawRequiredPermission> for RequiredPermission {
    type Error = String;

    fn try_from(raw: RawRequiredPermission) -> Result<Self, Self::Error> {
        let value = match (raw.value, raw.value_param, raw.query_param) {
            (Some(v), None, None) => ValueSource::Literal(v),
            (None, Some(p), None) => ValueSource::PathParam(p),
            (None, None, Some(q)) => ValueSource::QueryParam(q),
            _ => {
                return Err(format!(
                    "required permission {}/{} must set exactly one of value, valueParam, queryParam",
                    raw.action, raw.resource_type
                ));
            }
        };
        Ok(Self {
            action: raw.action,
            resource_type: raw.resource_type,
            value,
        })
    }
}

/// Request-scoped inputs to an authorization decision.
///
/// Built fresh for every inbound request and discarded afterwards.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    gateway_url: Option<String>,
    path_params: HashMap<String, String>,
    query_params: HashMap<String, Vec<String>>,
    identity: Option<CallerIdentity>,
    supplied_permissions: Option<Vec<Permission>>,
    resolved_permissions: Option<Vec<Permission>>,
}

impl RequestContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Base URL of the access-control gateway for this request.
    #[must_use]
    pub fn with_gateway_url(mut self, url: impl Into<String>) -> Self {
        self.gateway_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_identity(mut self, identity: CallerIdentity) -> Self {
        self.identity = Some(identity);
        self
    }

    #[must_use]
    pub fn with_path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_path_params(mut self, params: HashMap<String, String>) -> Self {
        self.path_params = params;
        self
    }

    /// Append one value for a (possibly repeated) query parameter.
    #[must_use]
    pub fn with_query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params
            .entry(name.into())
            .or_default()
            .push(value.into());
        self
    }

    #[must_use]
    pub fn with_query_params(mut self, params: HashMap<String, Vec<String>>) -> Self {
        self.query_params = params;
        self
    }

    /// Permissions asserted by a trusted upstream (pre-supplied header).
    #[must_use]
    pub fn with_supplied_permissions(mut self, permissions: Vec<Permission>) -> Self {
        self.supplied_permissions = Some(permissions);
        self
    }

    /// Permissions already fetched from the gateway earlier in this request.
    #[must_use]
    pub fn with_resolved_permissions(mut self, permissions: Vec<Permission>) -> Self {
        self.resolved_permissions = Some(permissions);
        self
    }

    #[must_use]
    pub fn gateway_url(&self) -> Option<&str> {
        self.gateway_url.as_deref()
    }

    #[must_use]
    pub fn identity(&self) -> Option<&CallerIdentity> {
        self.identity.as_ref()
    }

    /// The caller identity, or `("anonymous", "user")` when none is present.
    #[must_use]
    pub fn effective_identity(&self) -> CallerIdentity {
        self.identity.clone().unwrap_or_else(CallerIdentity::anonymous)
    }

    #[must_use]
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&[String]> {
        self.query_params.get(name).map(Vec::as_slice)
    }

    #[must_use]
    pub fn supplied_permissions(&self) -> Option<&[Permission]> {
        self.supplied_permissions.as_deref()
    }

    #[must_use]
    pub fn resolved_permissions(&self) -> Option<&[Permission]> {
        self.resolved_permissions.as_deref()
    }
}
