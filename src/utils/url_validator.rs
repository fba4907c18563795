//! Long URL validation.

use url::Url;

/// Reasons a long URL is rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,
}

/// Checks that `input` is an absolute HTTP(S) URL with a host.
///
/// `Url::parse` already rejects `http`/`https` URLs without a host, so the
/// scheme check is the only rule past parsing. The URL is stored exactly as
/// given; nothing is normalized.
///
/// # Errors
///
/// Returns the first rule the input violates.
///
/// # Examples
///
/// ```ignore
/// assert!(validate_long_url("https://example.com/a").is_ok());
/// assert_eq!(validate_long_url(""), Err(UrlValidationError::Empty));
/// assert_eq!(validate_long_url("javascript:alert(1)"), Err(UrlValidationError::UnsupportedProtocol));
/// ```
pub fn validate_long_url(input: &str) -> Result<(), UrlValidationError> {
    if input.trim().is_empty() {
        return Err(UrlValidationError::Empty);
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        _ => Err(UrlValidationError::UnsupportedProtocol),
    }
}
