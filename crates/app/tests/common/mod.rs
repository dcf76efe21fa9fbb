//! In-process fake of the House API.

#![allow(clippy::unwrap_used, dead_code)]

use std::time::Duration;

use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    routing::{get, post},
};
use houseprobe_infrastructure::ProbeConfig;
use serde_json::{Value, json};

pub const TOKEN: &str = "token-123";

type Reply = (StatusCode, Json<Value>);

fn unauthorized() -> Reply {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": "Authentication required"})),
    )
}

fn authorized(headers: &HeaderMap) -> bool {
    let expected = format!("Bearer {TOKEN}");
    headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) == Some(expected.as_str())
}

async fn login(Json(body): Json<Value>) -> Reply {
    if body["username"] == "testuser" && body["password"] == "testpass123" {
        (
            StatusCode::OK,
            Json(json!({"token": TOKEN, "user": {"id": 1, "username": "testuser"}})),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Invalid credentials"})),
        )
    }
}

async fn list_properties(headers: HeaderMap) -> Reply {
    if !authorized(&headers) {
        return unauthorized();
    }
    (
        StatusCode::OK,
        Json(json!([
            {"id": 1, "title": "Casa en la playa", "price": 350_000},
            {"id": 2, "title": "Piso céntrico", "price": 180_000},
        ])),
    )
}

async fn create_property(headers: HeaderMap) -> Reply {
    if !authorized(&headers) {
        return unauthorized();
    }
    (StatusCode::CREATED, Json(json!({"id": 3})))
}

async fn profile(headers: HeaderMap) -> Reply {
    if !authorized(&headers) {
        return unauthorized();
    }
    (
        StatusCode::OK,
        Json(json!({"id": 1, "username": "testuser", "email": "test@house-app.casa"})),
    )
}

async fn not_found() -> Reply {
    (StatusCode::NOT_FOUND, Json(json!({"error": "Not found"})))
}

/// A House API that behaves correctly.
pub fn healthy() -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/properties", get(list_properties).post(create_property))
        .route("/api/user/profile", get(profile))
        .fallback(not_found)
}

/// A House API that answers every request with a server error.
pub fn broken() -> Router {
    Router::new().fallback(|| async {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "database unavailable"})),
        )
    })
}

/// A healthy API whose property listing takes `delay`.
pub fn sluggish(delay: Duration) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route(
            "/api/properties",
            get(move |headers: HeaderMap| async move {
                tokio::time::sleep(delay).await;
                list_properties(headers).await
            })
            .post(create_property),
        )
        .route("/api/user/profile", get(profile))
        .fallback(not_found)
}

/// Serves `router` on an ephemeral port and returns its API base URL.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/api")
}

/// Default configuration pointed at `base_url`.
pub fn config_for(base_url: &str) -> ProbeConfig {
    ProbeConfig {
        base_url: base_url.to_string(),
        timeout_ms: 5_000,
        ..ProbeConfig::default()
    }
}
