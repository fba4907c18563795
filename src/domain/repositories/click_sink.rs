//! Persistence trait for clicks.

use crate::domain::entities::{Click, NewClick};
use crate::error::AppError;
use async_trait::async_trait;

/// Persistence interface for click records.
///
/// Written to by the click workers; read by link statistics.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgClickSink`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryClickSink`] - process-local implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickSink: Send + Sync {
    /// Persists a click.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreFailure`] on backend errors.
    async fn create(&self, new_click: NewClick) -> Result<Click, AppError>;

    /// Counts persisted clicks for a link. Unknown ids count as zero.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreFailure`] on backend errors.
    async fn count_by_link_id(&self, link_id: i64) -> Result<i64, AppError>;
}
