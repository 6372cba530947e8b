//! Request headers understood by acl-guard.

use acl_guard_sdk::{CallerIdentity, Permission};
use http::HeaderMap;

/// Base URL of the access-control gateway for this request.
pub const HEADER_GATEWAY_URL: &str = "x-gateway-url";

/// JSON-encoded caller identity, `{"id": "...", "type": "..."}`.
pub const HEADER_USER: &str = "user";

/// JSON array of permissions already resolved by a trusted upstream component.
pub const HEADER_SUPPLIED_PERMISSIONS: &str = "x-acl-permissions";

#[must_use]
pub fn gateway_url(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(HEADER_GATEWAY_URL)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Parse the caller identity header. Missing or malformed headers yield `None`.
#[must_use]
pub fn caller_identity(headers: &HeaderMap) -> Option<CallerIdentity> {
    let raw = headers.get(HEADER_USER)?.to_str().ok()?;
    match serde_json::from_str(raw) {
        Ok(identity) => Some(identity),
        Err(e) => {
            tracing::debug!(error = %e, "malformed user header");
            None
        }
    }
}

/// Parse pre-supplied permissions. A malformed header is ignored so the
/// decision falls back to the configured source.
#[must_use]
pub fn supplied_permissions(headers: &HeaderMap) -> Option<Vec<Permission>> {
    let raw = headers.get(HEADER_SUPPLIED_PERMISSIONS)?.to_str().ok()?;
    match serde_json::from_str(raw) {
        Ok(permissions) => Some(permissions),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring malformed pre-supplied permissions header");
            None
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use http::HeaderValue;

    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(*k, HeaderValue::from_static(v));
        }
        map
    }

    #[test]
    fn parses_user_header() {
        let map = headers(&[(HEADER_USER, r#"{"id":"u1","type":"user"}"#)]);
        assert_eq!(caller_identity(&map), Some(CallerIdentity::new("u1", "user")));
    }

    #[test]
    fn malformed_user_header_is_none() {
        assert_eq!(caller_identity(&headers(&[(HEADER_USER, "not json")])), None);
        assert_eq!(caller_identity(&HeaderMap::new()), None);
    }

    #[test]
    fn parses_supplied_permissions() {
        let map = headers(&[(
            HEADER_SUPPLIED_PERMISSIONS,
            r#"[{"action":"read","type":"dataset","value":"amazon-*"}]"#,
        )]);
        assert_eq!(
            supplied_permissions(&map),
            Some(vec![Permission::new("read", "dataset", "amazon-*")])
        );
        assert_eq!(
            supplied_permissions(&headers(&[(HEADER_SUPPLIED_PERMISSIONS, "{")])),
            None
        );
    }

    #[test]
    fn blank_gateway_url_is_none() {
        assert_eq!(gateway_url(&headers(&[(HEADER_GATEWAY_URL, "  ")])), None);
        assert_eq!(
            gateway_url(&headers(&[(HEADER_GATEWAY_URL, "http://gw")])),
            Some("http://gw")
        );
    }
}
