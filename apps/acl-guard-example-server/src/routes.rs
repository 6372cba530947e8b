//! Demo routes guarded by acl-guard.

use std::sync::Arc;

use acl_guard_http::{
    AclGuardState, AlwaysHealthy, UserRequirement, check_permissions_middleware, health_router,
    obtain_user_middleware,
};
use acl_guard_sdk::pep::PolicyEnforcer;
use acl_guard_sdk::{GrantedPermissionSource, RequiredPermission};
use axum::extract::{Path, RawQuery};
use axum::routing::get;
use axum::{Json, Router, middleware};
use serde_json::{Value, json};
use static_acl_plugin::Service;
use tower_http::trace::TraceLayer;

use crate::config::{AppConfig, PermissionSourceKind};

/// Build the enforcer for the configured permission source.
///
/// # Errors
///
/// Gateway client construction failures.
pub fn build_enforcer(cfg: &AppConfig) -> anyhow::Result<PolicyEnforcer> {
    let enforcer = match cfg.source {
        PermissionSourceKind::Gateway => acl_guard_gw::build_enforcer(&cfg.acl)?,
        PermissionSourceKind::Static => {
            let service = Arc::new(Service::new(cfg.static_acl.clone()));
            PolicyEnforcer::new(GrantedPermissionSource::BulkFetch(service))
                .with_config(cfg.acl.policy())
        }
    };
    Ok(enforcer)
}

/// `GET /datasets/{dataset}` needs `read:dataset:{dataset}`;
/// `GET /datasets?id=a&id=b` needs `read:dataset` for every `id`.
pub fn build_router(cfg: &AppConfig, enforcer: PolicyEnforcer) -> Router {
    let by_path = AclGuardState::new(
        enforcer.clone(),
        vec![RequiredPermission::from_path_param("read", "dataset", "dataset")],
    );
    let by_query = AclGuardState::new(
        enforcer,
        vec![RequiredPermission::from_query_param("read", "dataset", "id")],
    );

    let requirement = if cfg.require_user {
        UserRequirement::Required
    } else {
        UserRequirement::Optional
    };

    let datasets = Router::new()
        .route("/datasets/{dataset}", get(show_dataset))
        .route_layer(middleware::from_fn_with_state(by_path, check_permissions_middleware))
        .merge(
            Router::new()
                .route("/datasets", get(list_datasets))
                .route_layer(middleware::from_fn_with_state(by_query, check_permissions_middleware)),
        )
        .layer(middleware::from_fn_with_state(requirement, obtain_user_middleware));

    Router::new()
        .merge(datasets)
        .merge(health_router(Arc::new(AlwaysHealthy)))
        .layer(TraceLayer::new_for_http())
}

async fn show_dataset(Path(dataset): Path<String>) -> Json<Value> {
    Json(json!({ "dataset": dataset }))
}

async fn list_datasets(RawQuery(query): RawQuery) -> Json<Value> {
    Json(json!({ "query": query.unwrap_or_default() }))
}
