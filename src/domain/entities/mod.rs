//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures without business logic.
//!
//! # Entity Types
//!
//! - [`Link`] - A short code to long URL mapping
//! - [`Click`] - A persisted redirect visit
//!
//! # Design Pattern
//!
//! Each entity has a separate `New*` struct carrying only the fields supplied
//! on insert; identifiers are assigned by the store.

pub mod click;
pub mod link;

pub use click::{Click, NewClick};
pub use link::{Link, NewLink};
