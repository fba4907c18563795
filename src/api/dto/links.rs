//! DTOs for link creation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to shorten a single URL.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// Absolute HTTP(S) URL to shorten. Full syntax is checked by the link service.
    #[validate(length(min = 1, max = 2048, message = "long_url must be 1 to 2048 characters"))]
    pub long_url: String,
}

/// A freshly created short link.
#[derive(Debug, Serialize)]
pub struct CreateLinkResponse {
    pub short_code: String,
    pub long_url: String,
    pub full_short_url: String,
}
