//! Handler for short URL redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use std::net::SocketAddr;

use crate::application::services::ClientInfo;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Look up the link by its exact, case-sensitive code
/// 2. Offer a click event (peer IP, `User-Agent`) to the click queue
/// 3. Return 302 Found with the original URL in `Location`
///
/// # Click Tracking
///
/// The queue never blocks the request. If it is full the click is dropped
/// and the visitor is still redirected.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<impl IntoResponse, AppError> {
    let client = ClientInfo {
        ip: addr.ip().to_string(),
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string(),
    };

    let long_url = state.redirect_service.resolve(&code, client).await?;

    Ok((StatusCode::FOUND, [(header::LOCATION, long_url)]))
}
