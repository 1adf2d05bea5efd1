//! Fake runx server used by the integration tests.

use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub const TOKEN: &str = "test-token";

/// Starts the fake server on an ephemeral port and returns its base URL.
pub async fn spawn_server() -> anyhow::Result<String> {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move { axum::serve(listener, router()).await });

    Ok(format!("http://{addr}/api"))
}

fn router() -> Router {
    let api = Router::new()
        .route("/app", get(list_apps))
        .route("/app/{app_id}", get(get_app))
        .route("/app/{app_id}/enable/{enabled}", patch(enable_app))
        .route("/auth", post(auth))
        .route("/catalog", get(catalog))
        .route("/me", get(me))
        .route("/me/billing", get(billing))
        .route("/me/session/{session_id}", delete(delete_session));
    Router::new().nest("/api", api)
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == format!("Bearer {TOKEN}"))
}

async fn list_apps() -> Json<Value> {
    Json(json!({
        "apps": [
            {
                "app": "jupyter",
                "name": "notebook",
                "enabled": true,
                "gpu": 1,
                "created_at": "2024-03-01T10:00:00Z",
                "monitoring": { "cpu": 12.5 }
            },
            { "app": "vscode", "name": "editor", "enabled": false }
        ]
    }))
}

async fn get_app(Path(app_id): Path<String>) -> Response {
    if app_id == "missing" {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "app not found" }))).into_response();
    }
    Json(json!({
        "app": { "id": app_id, "app": "jupyter", "name": app_id },
        "log": "ready"
    }))
    .into_response()
}

async fn enable_app(Path((app_id, enabled)): Path<(String, String)>) -> Json<Value> {
    Json(json!({ "message": format!("{app_id} enabled={enabled}") }))
}

async fn auth(Json(body): Json<Value>) -> Response {
    let number = body.get("number").and_then(Value::as_str).unwrap_or_default();
    if !number.starts_with('+') {
        return (
            StatusCode::NOT_ACCEPTABLE,
            Json(json!({ "error": "invalid phone number" })),
        )
            .into_response();
    }
    Json(json!({ "session": "session-1" })).into_response()
}

async fn catalog() -> Json<Value> {
    Json(json!({ "catalog": "not a list" }))
}

async fn me(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, "unauthorized").into_response();
    }
    Json(json!({
        "user": { "id": "u1", "email": "ada@example.com", "credit": 12.5 },
        "consumptions": []
    }))
    .into_response()
}

async fn billing() -> Response {
    (StatusCode::SERVICE_UNAVAILABLE, "maintenance").into_response()
}

async fn delete_session(Path(_session_id): Path<String>) -> StatusCode {
    StatusCode::NO_CONTENT
}
