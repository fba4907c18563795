//! Application layer services implementing business logic.
//!
//! Services consume the storage traits from [`crate::domain::repositories`]
//! and provide a clean API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Short link creation, lookup and statistics
//! - [`services::redirect_service::RedirectService`] - Redirect resolution and click capture

pub mod services;
