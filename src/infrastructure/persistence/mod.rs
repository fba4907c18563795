//! Store implementations.
//!
//! # Stores
//!
//! - [`PgLinkStore`] / [`PgClickSink`] - PostgreSQL via SQLx
//! - [`InMemoryLinkStore`] / [`InMemoryClickSink`] - process-local fallback

pub mod memory;
pub mod pg_click_sink;
pub mod pg_link_store;

pub use memory::{InMemoryClickSink, InMemoryLinkStore};
pub use pg_click_sink::PgClickSink;
pub use pg_link_store::PgLinkStore;
