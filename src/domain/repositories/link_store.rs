//! Storage trait for short links.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Storage interface for links.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkStore`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryLinkStore`] - process-local implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Persists a new link and returns it with its assigned id and timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short code is already taken.
    /// Returns [`AppError::StoreFailure`] on backend errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its exact short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Link))` if found
    /// - `Ok(None)` if not found
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreFailure`] on backend errors.
    async fn find_by_short_code(&self, short_code: &str) -> Result<Option<Link>, AppError>;

    /// Returns every stored link, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreFailure`] on backend errors.
    async fn list_all(&self) -> Result<Vec<Link>, AppError>;
}
