//! Click entity representing a single persisted redirect.

use chrono::{DateTime, Utc};

/// A click recorded when a shortened link was followed.
///
/// Created only by the click workers; never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Click {
    pub id: i64,
    pub link_id: i64,
    pub clicked_at: DateTime<Utc>,
    pub user_agent: String,
    pub ip: String,
}

impl Click {
    /// Creates a new Click instance.
    pub fn new(
        id: i64,
        link_id: i64,
        clicked_at: DateTime<Utc>,
        user_agent: String,
        ip: String,
    ) -> Self {
        Self {
            id,
            link_id,
            clicked_at,
            user_agent,
            ip,
        }
    }
}

/// Input data for recording a click.
///
/// `clicked_at` is the time the redirect happened, not the time of the insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClick {
    pub link_id: i64,
    pub clicked_at: DateTime<Utc>,
    pub user_agent: String,
    pub ip: String,
}
