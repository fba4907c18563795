//! Infrastructure layer for external integrations.
//!
//! Implements the store traits defined by the domain layer.
//!
//! # Modules
//!
//! - [`persistence`] - PostgreSQL and in-memory stores

pub mod persistence;
