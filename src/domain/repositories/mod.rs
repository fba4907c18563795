//! Storage capability traits for the domain layer.
//!
//! The service layer and the click workers depend only on these traits, so
//! they can run against PostgreSQL, the in-memory backend, or mocks.
//!
//! # Available Traits
//!
//! - [`LinkStore`] - Link creation and lookup
//! - [`ClickSink`] - Click persistence and counting
//!
//! # Implementations
//!
//! - `crate::infrastructure::persistence::{PgLinkStore, PgClickSink}`
//! - `crate::infrastructure::persistence::{InMemoryLinkStore, InMemoryClickSink}`
//! - Mock implementations are auto-generated via `mockall` for unit tests
//!
//! Implementations must be safe for concurrent calls from many request tasks
//! and click workers at once.

pub mod click_sink;
pub mod link_store;

pub use click_sink::ClickSink;
pub use link_store::LinkStore;

#[cfg(test)]
pub use click_sink::MockClickSink;
#[cfg(test)]
pub use link_store::MockLinkStore;
