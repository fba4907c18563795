//! Click event model for asynchronous click tracking.

use chrono::{DateTime, Utc};

use crate::domain::entities::NewClick;

/// An in-memory representation of a single redirect, queued for persistence.
///
/// Passed from the redirect path to the click workers through
/// [`crate::domain::click_queue::ClickQueue`], which decouples the redirect
/// response from database writes.
///
/// # Usage Flow
///
/// 1. Created by [`crate::application::services::RedirectService`] with request metadata
/// 2. Offered to the queue without blocking (dropped if the queue is full)
/// 3. Dequeued by exactly one worker in [`crate::domain::click_worker`]
/// 4. Converted to a [`NewClick`] and persisted, or logged and discarded on failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub link_id: i64,
    /// Kept for drop and failure logs; not persisted.
    pub short_code: String,
    pub ip: String,
    pub user_agent: String,
    /// When the redirect happened, not when the click is written.
    pub occurred_at: DateTime<Utc>,
}

impl ClickEvent {
    /// Creates a click event stamped with the current time.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let event = ClickEvent::new(
    ///     42,
    ///     "aB3xY9".to_string(),
    ///     "192.168.1.1".to_string(),
    ///     "Mozilla/5.0".to_string(),
    /// );
    /// ```
    pub fn new(link_id: i64, short_code: String, ip: String, user_agent: String) -> Self {
        Self {
            link_id,
            short_code,
            ip,
            user_agent,
            occurred_at: Utc::now(),
        }
    }

    /// Builds the persistence payload for this event.
    pub fn to_new_click(&self) -> NewClick {
        NewClick {
            link_id: self.link_id,
            clicked_at: self.occurred_at,
            user_agent: self.user_agent.clone(),
            ip: self.ip.clone(),
        }
    }
}
