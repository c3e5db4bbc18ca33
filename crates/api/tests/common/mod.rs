#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use reelpick_api::auth::jwt::JwtConfig;
use reelpick_api::config::ServerConfig;
use reelpick_api::router::build_app_router;
use reelpick_api::state::AppState;
use reelpick_core::rate_limit::RateLimitConfig;
use sqlx::PgPool;
use tower::ServiceExt;

/// Default peer address used by request helpers.
pub const CLIENT: &str = "198.51.100.7:40000";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// the production rate limit and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        rate_limit: RateLimitConfig {
            max_requests: 5,
            window: Duration::from_secs(60),
        },
        trust_forwarded_for: false,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// Clones of the returned router share one rate limiter, so tests that
/// exercise admission control must reuse it.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_router(AppState::new(pool, test_config()))
}

/// Send a request from the given peer address.
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
    peer: &str,
    bearer: Option<&str>,
) -> Response {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .extension(ConnectInfo(peer.parse::<SocketAddr>().unwrap()));
    if let Some(token) = bearer {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, CLIENT, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, None, CLIENT, Some(token)).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, Some(body), CLIENT, None).await
}

pub async fn post_json_from(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    peer: &str,
) -> Response {
    send(app, Method::POST, uri, Some(body), peer, None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// A submission body that passes validation.
pub fn valid_submission() -> serde_json::Value {
    serde_json::json!({
        "email": "a@b.com",
        "phone": "123",
        "selected_movies": [{"id": 1, "title": "Inception", "extra": "x"}],
        "movie_ratings": {"1": 5}
    })
}

pub async fn submission_count(pool: &PgPool) -> i64 {
    reelpick_db::repositories::SubmissionRepo::count(pool)
        .await
        .unwrap()
}
