#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Router-level tests: identity, permission resolution and checks wired
//! together the way a service would.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use acl_guard_http::{
    AclGuardState, HEADER_SUPPLIED_PERMISSIONS, HEADER_USER, PermissionResolver,
    ResolvedPermissions, UserRequirement,
    check_permissions_middleware, obtain_permissions_middleware, obtain_user_middleware,
};
use acl_guard_sdk::pep::{PolicyConfig, PolicyEnforcer};
use acl_guard_sdk::{
    AclError, GrantedPermissionSource, Permission, PermissionListClient, RequestContext,
    RequiredPermission,
};
use async_trait::async_trait;
use axum::body::Body;
use axum::routing::get;
use axum::{Extension, Router, middleware};
use http::{Request, StatusCode};
use serde_json::Value;
use static_acl_plugin::{Service, StaticAclPluginConfig, SubjectGrants};
use tower::ServiceExt;

fn static_service() -> Arc<Service> {
    Arc::new(Service::new(StaticAclPluginConfig {
        anonymous: vec![Permission::new("read", "dataset", "*-public")],
        subjects: vec![SubjectGrants {
            id: "u1".to_owned(),
            subject_type: "user".to_owned(),
            permissions: vec![
                Permission::new("read", "dataset", "amazon-*"),
                Permission::new("read", "area", ["brazil", "peru"].map(String::from).to_vec()),
            ],
        }],
    }))
}

/// Counts list calls, delegating to the static service.
struct Counting {
    inner: Arc<Service>,
    calls: AtomicUsize,
}

#[async_trait]
impl PermissionListClient for Counting {
    async fn list_permissions(&self, ctx: &RequestContext) -> Result<Vec<Permission>, AclError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.list_permissions(ctx).await
    }
}

struct NotFoundClient;

#[async_trait]
impl PermissionListClient for NotFoundClient {
    async fn list_permissions(&self, _ctx: &RequestContext) -> Result<Vec<Permission>, AclError> {
        Err(AclError::NotFound("dataset not found".to_owned()))
    }
}

fn guard(client: Arc<dyn PermissionListClient>, alternatives: Vec<RequiredPermission>) -> AclGuardState {
    AclGuardState::new(
        PolicyEnforcer::new(GrantedPermissionSource::BulkFetch(client)),
        alternatives,
    )
}

fn dataset_app(client: Arc<dyn PermissionListClient>, requirement: UserRequirement) -> Router {
    let state = guard(
        client,
        vec![RequiredPermission::from_path_param("read", "dataset", "dataset")],
    );
    Router::new()
        .route("/datasets/{dataset}", get(|| async { "ok" }))
        .route_layer(middleware::from_fn_with_state(state, check_permissions_middleware))
        .layer(middleware::from_fn_with_state(requirement, obtain_user_middleware))
}

fn request(uri: &str, user: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(user) = user {
        builder = builder.header(HEADER_USER, user);
    }
    builder.body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

const U1: &str = r#"{"id":"u1","type":"user"}"#;

#[tokio::test]
async fn granted_dataset_passes() {
    let app = dataset_app(static_service(), UserRequirement::Required);
    let response = app
        .oneshot(request("/datasets/amazon-2020", Some(U1)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn other_dataset_is_forbidden() {
    let app = dataset_app(static_service(), UserRequirement::Required);
    let response = app
        .oneshot(request("/datasets/brazil-2020", Some(U1)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        json_body(response).await,
        serde_json::json!({"status": 403, "message": "Not authorized"})
    );
}

#[tokio::test]
async fn missing_user_is_unauthenticated_when_required() {
    let app = dataset_app(static_service(), UserRequirement::Required);
    let response = app
        .oneshot(request("/datasets/amazon-2020", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let app = dataset_app(static_service(), UserRequirement::Required);
    let response = app
        .oneshot(request("/datasets/amazon-2020", Some("{broken")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn optional_user_falls_back_to_anonymous_grants() {
    let app = dataset_app(static_service(), UserRequirement::Optional);
    let response = app
        .clone()
        .oneshot(request("/datasets/forest-public", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(request("/datasets/amazon-2020", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn gateway_not_found_is_404() {
    let app = dataset_app(Arc::new(NotFoundClient), UserRequirement::Required);
    let response = app
        .oneshot(request("/datasets/amazon-2020", Some(U1)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn supplied_permissions_header_bypasses_lookup() {
    let counting = Arc::new(Counting {
        inner: static_service(),
        calls: AtomicUsize::new(0),
    });
    let app = dataset_app(counting.clone(), UserRequirement::Optional);

    let req = Request::builder()
        .uri("/datasets/anything")
        .header(
            HEADER_SUPPLIED_PERMISSIONS,
            r#"[{"action":"read","type":"dataset","value":"*"}]"#,
        )
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn query_param_alternative_requires_every_value() {
    let state = guard(
        static_service(),
        vec![RequiredPermission::from_query_param("read", "area", "area")],
    );
    let app = Router::new()
        .route("/areas", get(|| async { "ok" }))
        .route_layer(middleware::from_fn_with_state(state, check_permissions_middleware))
        .layer(middleware::from_fn_with_state(
            UserRequirement::Required,
            obtain_user_middleware,
        ));

    let response = app
        .clone()
        .oneshot(request("/areas?area=brazil&area=peru", Some(U1)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(request("/areas?area=brazil&area=chile", Some(U1)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn resolved_permissions_are_fetched_once_per_request() {
    let counting = Arc::new(Counting {
        inner: static_service(),
        calls: AtomicUsize::new(0),
    });
    let client: Arc<dyn PermissionListClient> = counting.clone();

    let read_dataset = guard(
        client.clone(),
        vec![RequiredPermission::from_path_param("read", "dataset", "dataset")],
    );
    let read_area = guard(
        client.clone(),
        vec![RequiredPermission::literal("read", "area", "peru")],
    );

    let app = Router::new()
        .route(
            "/datasets/{dataset}",
            get(|Extension(ResolvedPermissions(granted)): Extension<ResolvedPermissions>| async move {
                granted.len().to_string()
            }),
        )
        .route_layer(middleware::from_fn_with_state(read_dataset, check_permissions_middleware))
        .route_layer(middleware::from_fn_with_state(read_area, check_permissions_middleware))
        .layer(middleware::from_fn_with_state(
            PermissionResolver::new(client),
            obtain_permissions_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            UserRequirement::Required,
            obtain_user_middleware,
        ));

    let response = app
        .oneshot(request("/datasets/amazon-2020", Some(U1)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(counting.calls.load(Ordering::SeqCst), 1);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"2");
}

#[tokio::test]
async fn obtain_permissions_failure_stops_the_request() {
    let client: Arc<dyn PermissionListClient> = Arc::new(NotFoundClient);
    let app = Router::new()
        .route("/anything", get(|| async { "ok" }))
        .layer(middleware::from_fn_with_state(
            PermissionResolver::new(client),
            obtain_permissions_middleware,
        ));

    let response = app.oneshot(request("/anything", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

fn resolving_app(client: Arc<dyn PermissionListClient>, policy: &PolicyConfig) -> Router {
    let state = AclGuardState::new(
        PolicyEnforcer::new(GrantedPermissionSource::BulkFetch(client.clone()))
            .with_config(policy.clone()),
        vec![RequiredPermission::from_path_param("read", "dataset", "dataset")],
    );
    Router::new()
        .route("/datasets/{dataset}", get(|| async { "ok" }))
        .route_layer(middleware::from_fn_with_state(state, check_permissions_middleware))
        .layer(middleware::from_fn_with_state(
            PermissionResolver::new(client).with_policy(policy),
            obtain_permissions_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            UserRequirement::Optional,
            obtain_user_middleware,
        ))
}

fn with_wildcard_header(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(
            HEADER_SUPPLIED_PERMISSIONS,
            r#"[{"action":"read","type":"dataset","value":"*"}]"#,
        )
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn supplied_permissions_header_skips_resolution_lookup() {
    let counting = Arc::new(Counting {
        inner: static_service(),
        calls: AtomicUsize::new(0),
    });
    let app = resolving_app(counting.clone(), &PolicyConfig::default());

    let response = app
        .oneshot(with_wildcard_header("/datasets/amazon-2020"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn untrusted_header_is_resolved_from_the_source() {
    let counting = Arc::new(Counting {
        inner: static_service(),
        calls: AtomicUsize::new(0),
    });
    let policy = PolicyConfig {
        trust_supplied_permissions: false,
        ..PolicyConfig::default()
    };
    let app = resolving_app(counting.clone(), &policy);

    let response = app
        .oneshot(with_wildcard_header("/datasets/amazon-2020"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(counting.calls.load(Ordering::SeqCst), 1);
}
