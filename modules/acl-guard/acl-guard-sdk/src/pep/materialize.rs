//! Alternative materialization.
//!
//! Substitutes request path/query parameters into templated alternatives,
//! once, immediately before matching.

use crate::models::{Permission, PermissionValue, RequestContext, RequiredPermission, ValueSource};

/// Build the concrete permission for one alternative.
///
/// - `PathParam` → the single path value
/// - `QueryParam` → every value of the query parameter, as a sequence
/// - a missing parameter → an empty sequence (never an error)
#[must_use]
pub fn materialize(alternative: &RequiredPermission, ctx: &RequestContext) -> Permission {
    let value = match &alternative.value {
        ValueSource::Literal(value) => value.clone(),
        ValueSource::PathParam(name) => ctx.path_param(name).map_or_else(
            || PermissionValue::Many(Vec::new()),
            |v| PermissionValue::Single(v.to_owned()),
        ),
        ValueSource::QueryParam(name) => {
            PermissionValue::Many(ctx.query_param(name).map(<[String]>::to_vec).unwrap_or_default())
        }
    };

    Permission {
        action: alternative.action.clone(),
        resource_type: alternative.resource_type.clone(),
        value,
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn literal_is_copied() {
        let alt = RequiredPermission::literal("read", "dataset", "amazon-2020");
        let p = materialize(&alt, &RequestContext::new());
        assert_eq!(p, Permission::new("read", "dataset", "amazon-2020"));
    }

    #[test]
    fn path_param_is_substituted() {
        let alt = RequiredPermission::from_path_param("read", "dataset", "dataset");
        let ctx = RequestContext::new().with_path_param("dataset", "amazon-2021");
        let p = materialize(&alt, &ctx);
        assert_eq!(p.value, PermissionValue::Single("amazon-2021".to_owned()));
        assert_eq!(p.action, "read");
        assert_eq!(p.resource_type, "dataset");
    }

    #[test]
    fn query_param_becomes_a_sequence() {
        let alt = RequiredPermission::from_query_param("read", "dataset", "ids");
        let ctx = RequestContext::new()
            .with_query_param("ids", "a")
            .with_query_param("ids", "b");
        let p = materialize(&alt, &ctx);
        assert_eq!(
            p.value,
            PermissionValue::Many(vec!["a".to_owned(), "b".to_owned()])
        );
    }

    #[test]
    fn missing_params_yield_empty_sequence() {
        let ctx = RequestContext::new();

        let p = materialize(
            &RequiredPermission::from_path_param("read", "dataset", "dataset"),
            &ctx,
        );
        assert!(p.value.is_empty_sequence());

        let p = materialize(
            &RequiredPermission::from_query_param("read", "dataset", "ids"),
            &ctx,
        );
        assert!(p.value.is_empty_sequence());
    }
}
