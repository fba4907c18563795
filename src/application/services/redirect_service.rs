//! Redirect resolution with fire-and-forget click capture.

use std::sync::Arc;

use tracing::debug;

use super::link_service::LinkService;
use crate::domain::click_event::ClickEvent;
use crate::domain::click_queue::ClickQueue;
use crate::domain::repositories::{ClickSink, LinkStore};
use crate::error::AppError;

/// Request metadata recorded with each click.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    pub ip: String,
    pub user_agent: String,
}

/// Resolves short codes for visitors and hands click events to the queue.
pub struct RedirectService<L: LinkStore + ?Sized, C: ClickSink + ?Sized> {
    link_service: Arc<LinkService<L, C>>,
    queue: ClickQueue,
}

impl<L: LinkStore + ?Sized, C: ClickSink + ?Sized> RedirectService<L, C> {
    pub fn new(link_service: Arc<LinkService<L, C>>, queue: ClickQueue) -> Self {
        Self {
            link_service,
            queue,
        }
    }

    /// Looks up `short_code` and returns the destination URL.
    ///
    /// A click event stamped with the current time is offered to the queue
    /// without waiting. Whether the queue accepted it has no effect on the
    /// result: a full or closed queue still yields the redirect target.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown (no event is
    /// enqueued). Returns [`AppError::StoreFailure`] if the lookup fails.
    pub async fn resolve(&self, short_code: &str, client: ClientInfo) -> Result<String, AppError> {
        let link = self.link_service.get_link_by_short_code(short_code).await?;

        let event = ClickEvent::new(
            link.id,
            link.short_code,
            client.ip,
            client.user_agent,
        );

        if !self.queue.try_enqueue(event) {
            debug!(link_id = link.id, "Click not recorded");
        }

        Ok(link.long_url)
    }
}
