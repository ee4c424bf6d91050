//! Liveness and readiness endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::http::server::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Store readiness response
#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub store: &'static str,
    pub current_time: String,
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /status - 503 until the store can serve requests
async fn status(State(state): State<Arc<AppState>>) -> (StatusCode, Json<StatusResponse>) {
    let current_time = chrono::Utc::now().to_rfc3339();

    if state.market.is_available().await {
        (
            StatusCode::OK,
            Json(StatusResponse {
                status: "ok",
                store: "available",
                current_time,
            }),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(StatusResponse {
                status: "unavailable",
                store: "disconnected",
                current_time,
            }),
        )
    }
}

/// Health routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/status", get(status))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_returns_ok() {
        let Json(body) = health().await;
        assert_eq!(body.status, "ok");
        assert_eq!(body.version, env!("CARGO_PKG_VERSION"));
    }
}
