//! Handler for link creation.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::links::{CreateLinkRequest, CreateLinkResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for a long URL.
///
/// # Endpoint
///
/// `POST /api/v1/links`
///
/// # Request Body
///
/// ```json
/// { "long_url": "https://example.com/some/long/path" }
/// ```
///
/// # Response
///
/// `201 Created`:
///
/// ```json
/// {
///   "short_code": "aB3xY9",
///   "long_url": "https://example.com/some/long/path",
///   "full_short_url": "http://localhost:8080/aB3xY9"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request` if the URL is empty or not an absolute HTTP(S) URL
/// - `503 Service Unavailable` if no free short code was found
/// - `500 Internal Server Error` on storage failures
pub async fn create_link_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<CreateLinkResponse>), AppError> {
    payload.validate()?;

    let link = state.link_service.create_link(&payload.long_url).await?;

    let full_short_url = state
        .link_service
        .short_url(&state.base_url, &link.short_code);

    Ok((
        StatusCode::CREATED,
        Json(CreateLinkResponse {
            short_code: link.short_code,
            long_url: link.long_url,
            full_short_url,
        }),
    ))
}
