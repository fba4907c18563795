//! Handler for link statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the persisted click total for a short link.
///
/// # Endpoint
///
/// `GET /api/v1/links/{code}/stats`
///
/// Clicks still waiting in the queue are not counted.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<StatsResponse>, AppError> {
    let stats = state.link_service.get_link_stats(&code).await?;

    Ok(Json(StatsResponse {
        short_code: stats.link.short_code,
        long_url: stats.link.long_url,
        total_clicks: stats.total_clicks,
    }))
}
