//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (store reachable)
//!
//! # Auth
//! POST /auth/register          - Create an account, returns an identity (201)
//! POST /auth/login             - Password login, returns an identity
//! POST /auth/logout            - Revoke the presented token (204, bearer)
//! GET  /auth/me                - Profile of the token's user (bearer)
//!
//! # Wishlist (bearer; userId must be the caller)
//! POST /wishlist/add           - Add a product, returns the wishlist
//! GET  /wishlist/{userId}      - The wishlist in insertion order
//! POST /wishlist/remove        - Remove a product, returns the wishlist
//! ```

pub mod auth;
pub mod health;
pub mod wishlist;

use std::time::Duration;

use axum::{
    Router,
    extract::OriginalUri,
    http::{Method, Request, Response, Uri},
    middleware::{from_fn, map_response},
    routing::{get, post},
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::error::AppError;
use crate::middleware::{
    auth_rate_limiter, rate_limited_as_json, request_id_middleware, security_headers_middleware,
};
use crate::state::AppState;

/// Create the auth routes router.
///
/// Register and login are rate limited per client IP when enabled in config.
pub fn auth_routes(rate_limit: bool) -> Router<AppState> {
    let mut credentials = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    if rate_limit {
        credentials = credentials
            .layer(auth_rate_limiter())
            .layer(map_response(rate_limited_as_json));
    }

    Router::new()
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .merge(credentials)
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(wishlist::add))
        .route("/remove", post(wishlist::remove))
        .route("/{user_id}", get(wishlist::show))
}

/// Create all routes for the storefront.
pub fn routes(rate_limit: bool) -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/auth", auth_routes(rate_limit))
        .nest("/wishlist", wishlist_routes())
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(not_found)
}

/// Build the complete application with middleware applied.
pub fn app(state: AppState) -> Router {
    routes(state.config().rate_limit)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(|response: &Response<_>, latency: Duration, span: &Span| {
                    span.record("status", response.status().as_u16());
                    span.record(
                        "latency_ms",
                        u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                    );
                    DefaultOnResponse::default().on_response(response, latency, span);
                }),
        )
        .with_state(state)
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

async fn method_not_allowed(method: Method, OriginalUri(uri): OriginalUri) -> AppError {
    AppError::MethodNotAllowed(format!("{method} is not supported on {}", uri.path()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{StatusCode, header},
    };
    use chrono::{DateTime, Utc};
    use serde::de::DeserializeOwned;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use estore_core::{ErrorBody, Identity, ProductId, UserId, Wishlist};

    use super::*;
    use crate::config::StorefrontConfig;
    use crate::db::{MemoryStore, RepositoryError, Stores, WishlistStore};

    fn test_app() -> Router {
        app(AppState::new(StorefrontConfig::local(), Stores::in_memory()))
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    async fn json_of<T: DeserializeOwned>(response: Response<Body>) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn register(app: &Router, email: &str) -> Identity {
        let response = send(
            app,
            "POST",
            "/auth/register",
            None,
            Some(json!({
                "fullName": "Sana",
                "email": email,
                "password": "hunter22",
                "role": "USER"
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        json_of(response).await
    }

    fn entries(wishlist: &Wishlist) -> Vec<&str> {
        wishlist.product_ids().map(ProductId::as_str).collect()
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app();
        let response = send(&app, "GET", "/health", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(response.headers()["x-content-type-options"], "nosniff");

        let response = send(&app, "GET", "/health/ready", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_request_id_is_propagated() {
        let app = test_app();
        let request = Request::builder()
            .uri("/health")
            .header("x-request-id", "edge-42")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.headers()["x-request-id"], "edge-42");
    }

    #[tokio::test]
    async fn test_wishlist_add_get_remove_scenario() {
        let app = test_app();
        let me = register(&app, "sana@example.com").await;
        let token = me.token.expose();
        let uid = me.id.as_str();

        let fresh: Wishlist =
            json_of(send(&app, "GET", &format!("/wishlist/{uid}"), Some(token), None).await).await;
        assert!(fresh.is_empty());

        for product in ["p1", "p2", "p1"] {
            let response = send(
                &app,
                "POST",
                "/wishlist/add",
                Some(token),
                Some(json!({ "userId": uid, "productId": product })),
            )
            .await;
            assert_eq!(response.status(), StatusCode::OK);
        }

        let listed: Wishlist =
            json_of(send(&app, "GET", &format!("/wishlist/{uid}"), Some(token), None).await).await;
        assert_eq!(entries(&listed), ["p1", "p2"]);

        for _ in 0..2 {
            let response = send(
                &app,
                "POST",
                "/wishlist/remove",
                Some(token),
                Some(json!({ "userId": uid, "productId": "p1" })),
            )
            .await;
            assert_eq!(response.status(), StatusCode::OK);
            let after: Wishlist = json_of(response).await;
            assert_eq!(entries(&after), ["p2"]);
        }
    }

    #[tokio::test]
    async fn test_wishlist_json_shape() {
        let app = test_app();
        let me = register(&app, "shape@example.com").await;
        let response = send(
            &app,
            "POST",
            "/wishlist/add",
            Some(me.token.expose()),
            Some(json!({ "userId": me.id.as_str(), "productId": "p1" })),
        )
        .await;
        let body: Value = json_of(response).await;
        assert_eq!(body["userId"], me.id.as_str());
        assert_eq!(body["entries"][0]["productId"], "p1");
        assert_eq!(body["entries"][0]["userId"], me.id.as_str());
        assert!(body["entries"][0]["addedAt"].is_string());
    }

    #[tokio::test]
    async fn test_wishlist_requires_token() {
        let app = test_app();
        let response = send(
            &app,
            "POST",
            "/wishlist/add",
            None,
            Some(json!({ "userId": "u1", "productId": "p1" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: ErrorBody = json_of(response).await;
        assert_eq!(body.error, "unauthorized");

        let response = send(&app, "GET", "/wishlist/u1", Some("forged"), None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_wishlist_of_another_user_is_forbidden() {
        let app = test_app();
        let alice = register(&app, "alice@example.com").await;
        let bob = register(&app, "bob@example.com").await;

        let response = send(
            &app,
            "POST",
            "/wishlist/add",
            Some(alice.token.expose()),
            Some(json!({ "userId": bob.id.as_str(), "productId": "p1" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = send(
            &app,
            "GET",
            &format!("/wishlist/{}", bob.id),
            Some(alice.token.expose()),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body: ErrorBody = json_of(response).await;
        assert_eq!(body.error, "forbidden");
    }

    #[tokio::test]
    async fn test_wishlist_validation_errors() {
        let app = test_app();
        let me = register(&app, "v@example.com").await;
        let token = me.token.expose();

        let cases = [
            json!({ "userId": me.id.as_str() }),
            json!({ "productId": "p1" }),
            json!({ "userId": me.id.as_str(), "productId": "" }),
            json!({ "userId": me.id.as_str(), "productId": "has space" }),
        ];
        for body in cases {
            let response = send(&app, "POST", "/wishlist/add", Some(token), Some(body)).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let err: ErrorBody = json_of(response).await;
            assert_eq!(err.error, "validation");
        }

        let request = Request::builder()
            .method("POST")
            .uri("/wishlist/add")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_register_login_me_logout() {
        let app = test_app();
        register(&app, "flow@example.com").await;

        let response = send(
            &app,
            "POST",
            "/auth/login",
            None,
            Some(json!({ "email": "flow@example.com", "password": "hunter22" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let identity: Identity = json_of(response).await;
        let token = identity.token.expose();

        let profile: Value = json_of(send(&app, "GET", "/auth/me", Some(token), None).await).await;
        assert_eq!(profile["name"], "Sana");
        assert_eq!(profile["role"], "USER");

        let response = send(&app, "POST", "/auth/logout", Some(token), None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(&app, "GET", "/auth/me", Some(token), None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_register_errors() {
        let app = test_app();
        register(&app, "dup@example.com").await;

        let cases = [
            (
                json!({ "name": "A", "email": "dup@example.com", "password": "hunter22" }),
                StatusCode::CONFLICT,
            ),
            (
                json!({ "name": "A", "email": "short@example.com", "password": "12345" }),
                StatusCode::BAD_REQUEST,
            ),
            (
                json!({ "name": "", "email": "blank@example.com", "password": "hunter22" }),
                StatusCode::BAD_REQUEST,
            ),
            (
                json!({
                    "name": "A",
                    "email": "a@example.com",
                    "password": "hunter22",
                    "role": "admin"
                }),
                StatusCode::BAD_REQUEST,
            ),
        ];
        for (body, expected) in cases {
            let response = send(&app, "POST", "/auth/register", None, Some(body)).await;
            assert_eq!(response.status(), expected);
        }
    }

    #[tokio::test]
    async fn test_login_bad_credentials() {
        let app = test_app();
        let response = send(
            &app,
            "POST",
            "/auth/login",
            None,
            Some(json!({ "email": "ghost@example.com", "password": "whatever" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_not_found() {
        let app = test_app();
        let response = send(&app, "GET", "/cart", None, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: ErrorBody = json_of(response).await;
        assert_eq!(body.error, "not_found");
    }

    #[tokio::test]
    async fn test_wrong_method_is_json_method_not_allowed() {
        let app = test_app();
        let cases = [
            ("PUT", "/wishlist/add"),
            ("DELETE", "/wishlist/u1"),
            ("GET", "/auth/login"),
        ];
        for (method, uri) in cases {
            let response = send(&app, method, uri, None, None).await;
            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{method} {uri}");
            let body: ErrorBody = json_of(response).await;
            assert_eq!(body.error, "method_not_allowed");
            assert!(body.message.contains(uri));
        }
    }

    struct FailingWishlistStore;

    #[async_trait]
    impl WishlistStore for FailingWishlistStore {
        async fn add(
            &self,
            _: &UserId,
            _: &ProductId,
            _: DateTime<Utc>,
        ) -> std::result::Result<Wishlist, RepositoryError> {
            Err(RepositoryError::DataCorruption("disk on fire".to_string()))
        }

        async fn get(&self, _: &UserId) -> std::result::Result<Wishlist, RepositoryError> {
            Err(RepositoryError::DataCorruption("disk on fire".to_string()))
        }

        async fn remove(
            &self,
            _: &UserId,
            _: &ProductId,
        ) -> std::result::Result<Wishlist, RepositoryError> {
            Err(RepositoryError::DataCorruption("disk on fire".to_string()))
        }

        async fn ping(&self) -> std::result::Result<(), RepositoryError> {
            Err(RepositoryError::DataCorruption("disk on fire".to_string()))
        }
    }

    #[tokio::test]
    async fn test_storage_failure_is_500_without_details() {
        let memory = Arc::new(MemoryStore::default());
        let mut stores = Stores::from_memory(&memory);
        stores.wishlists = Arc::new(FailingWishlistStore);
        let app = app(AppState::new(StorefrontConfig::local(), stores));
        let me = register(&app, "fail@example.com").await;

        let response = send(
            &app,
            "POST",
            "/wishlist/add",
            Some(me.token.expose()),
            Some(json!({ "userId": me.id.as_str(), "productId": "p1" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorBody = json_of(response).await;
        assert_eq!(body.error, "storage");
        assert!(!body.message.contains("disk"));

        let response = send(&app, "GET", "/health/ready", None, None).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
