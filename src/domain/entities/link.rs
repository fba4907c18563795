//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A shortened URL mapping.
///
/// Immutable once created. `short_code` is globally unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: i64,
    pub short_code: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(id: i64, short_code: String, long_url: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            short_code,
            long_url,
            created_at,
        }
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub short_code: String,
    pub long_url: String,
}
