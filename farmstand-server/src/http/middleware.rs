//! Request guards shared by every route

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::Uri;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::error::ApiError;
use super::server::AppState;

/// Paths that answer even while the store is down
const ALWAYS_ON: [&str; 2] = ["/health", "/status"];

/// Reject requests with 503 while the store is unavailable.
pub async fn require_store(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let guarded = !ALWAYS_ON.contains(&request.uri().path());
    if guarded && !state.market.is_available().await {
        tracing::warn!(path = %request.uri().path(), "store unavailable, rejecting request");
        return ApiError::Unavailable.into_response();
    }

    next.run(request).await
}

/// JSON 404 for unmatched routes.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound {
        resource: "route",
        id: uri.path().to_owned(),
    }
}
