use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// Liveness only; does not touch the database.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "timetrack-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
