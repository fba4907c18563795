//! API route configuration.

use crate::api::handlers::{create_link_handler, stats_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Versioned JSON API routes, nested under `/api/v1`.
///
/// # Endpoints
///
/// - `POST /links`              - Create a short link
/// - `GET  /links/{code}/stats` - Click total for a link
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/links", post(create_link_handler))
        .route("/links/{code}/stats", get(stats_handler))
}
