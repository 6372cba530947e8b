//! Permission matcher.
//!
//! Pure, synchronous comparison of granted permissions against a required
//! permission. The **granted** permission is always the pattern side: its
//! value may carry `*` markers, the required value is compared literally.
//!
//! | Granted pattern (trimmed) | Matches a required value that... |
//! |---------------------------|----------------------------------|
//! | `*mid*`                   | contains `mid`                   |
//! | `*bar`                    | ends with `bar`                  |
//! | `foo*`                    | starts with `foo`                |
//! | `*`                       | anything (contains `""`)         |
//! | `exact`                   | equals `exact`                   |
//!
//! `action` and `resource_type` are compared exactly and case-sensitively;
//! wildcards apply to `value` only.

use crate::models::{Permission, PermissionValue};

const WILDCARD: char = '*';

/// Parsed form of a granted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValuePattern<'a> {
    /// `*needle*` (also the bare `*`).
    Contains(&'a str),
    /// `prefix*`
    Prefix(&'a str),
    /// `*suffix`
    Suffix(&'a str),
    /// No markers.
    Exact(&'a str),
}

impl<'a> ValuePattern<'a> {
    /// Parse a granted value. Surrounding whitespace is trimmed before marker
    /// detection; only the boundary markers are stripped.
    ///
    /// Interior `*` characters stay literal, so `a*b*` is the prefix `a*b`
    /// rather than `ab`. Grants that relied on every `*` being removed must
    /// be rewritten without interior markers.
    #[must_use]
    pub fn parse(raw: &'a str) -> Self {
        let pattern = raw.trim();
        let leading = pattern.starts_with(WILDCARD);
        let trailing = pattern.ends_with(WILDCARD);

        match (leading, trailing) {
            // A lone `*` is both leading and trailing; stripping both markers
            // from it must not go out of bounds.
            (true, true) => Self::Contains(
                pattern
                    .strip_prefix(WILDCARD)
                    .and_then(|p| p.strip_suffix(WILDCARD))
                    .unwrap_or_default(),
            ),
            (true, false) => Self::Suffix(&pattern[WILDCARD.len_utf8()..]),
            (false, true) => Self::Prefix(&pattern[..pattern.len() - WILDCARD.len_utf8()]),
            (false, false) => Self::Exact(pattern),
        }
    }

    /// Compare a literal (required) value against this pattern.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        match *self {
            Self::Contains(needle) => candidate.contains(needle),
            Self::Prefix(prefix) => candidate.starts_with(prefix),
            Self::Suffix(suffix) => candidate.ends_with(suffix),
            Self::Exact(expected) => candidate == expected,
        }
    }
}

/// `true` if the granted `pattern` covers the required `candidate` value.
#[must_use]
pub fn value_matches(pattern: &str, candidate: &str) -> bool {
    ValuePattern::parse(pattern).matches(candidate)
}

fn same_kind(granted: &Permission, required: &Permission) -> bool {
    granted.action == required.action && granted.resource_type == required.resource_type
}

/// A granted `Many` value is a set of patterns; any of them may cover the value.
fn grant_covers(granted: &PermissionValue, candidate: &str) -> bool {
    granted
        .as_slice()
        .iter()
        .any(|pattern| value_matches(pattern, candidate))
}

/// Pair-level check: does this single grant cover every value of `required`?
///
/// An empty required sequence is covered vacuously once action and type agree.
#[must_use]
pub fn matches(granted: &Permission, required: &Permission) -> bool {
    same_kind(granted, required)
        && required
            .value
            .as_slice()
            .iter()
            .all(|v| grant_covers(&granted.value, v))
}

/// Set-level check against everything the caller holds.
///
/// - An empty granted list never matches.
/// - A single required value must be covered by some grant.
/// - Every element of a required sequence must be covered by some grant,
///   each independently (different grants may cover different elements).
#[must_use]
pub fn exists_match(granted: &[Permission], required: &Permission) -> bool {
    if granted.is_empty() {
        return false;
    }

    required.value.as_slice().iter().all(|v| {
        granted
            .iter()
            .any(|g| same_kind(g, required) && grant_covers(&g.value, v))
    })
}
