//! Marketplace statistics

use std::sync::Arc;

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::db::MarketStats;
use crate::http::error::ApiError;
use crate::http::server::AppState;

#[derive(Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: MarketStats,
    pub generated_at: String,
}

/// GET /api/stats
async fn stats(State(state): State<Arc<AppState>>) -> Result<Json<StatsResponse>, ApiError> {
    let stats = state.market.stats().await?;

    Ok(Json(StatsResponse {
        stats,
        generated_at: chrono::Utc::now().to_rfc3339(),
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/stats", get(stats))
}
