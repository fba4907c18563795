//! Domain layer containing business entities and the click pipeline.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Storage trait definitions
//! - [`click_event`] - Click tracking event model
//! - [`click_queue`] - Bounded, lossy event queue
//! - [`click_worker`] - Background click persistence workers
//!
//! # Click Processing Flow
//!
//! 1. HTTP handler resolves a short code
//! 2. A [`click_event::ClickEvent`] is offered to the [`click_queue::ClickQueue`] (dropped if full)
//! 3. One of the [`click_worker::ClickWorkerPool`] workers dequeues it
//! 4. Click data is persisted via [`repositories::ClickSink`]

pub mod click_event;
pub mod click_queue;
pub mod click_worker;
pub mod entities;
pub mod repositories;
