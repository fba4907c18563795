//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{LinkService, RedirectService};
use crate::domain::click_queue::ClickQueue;
use crate::domain::repositories::{ClickSink, LinkStore};

/// Link service over type-erased stores.
pub type DynLinkService = LinkService<dyn LinkStore, dyn ClickSink>;

/// Redirect service over type-erased stores.
pub type DynRedirectService = RedirectService<dyn LinkStore, dyn ClickSink>;

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<DynLinkService>,
    pub redirect_service: Arc<DynRedirectService>,
    pub click_queue: ClickQueue,
    /// Public prefix for generated short URLs, without a trailing slash.
    pub base_url: String,
}

impl AppState {
    /// Wires the services around the given stores and click queue.
    pub fn new(
        link_store: Arc<dyn LinkStore>,
        click_sink: Arc<dyn ClickSink>,
        click_queue: ClickQueue,
        base_url: impl Into<String>,
    ) -> Self {
        let link_service = Arc::new(LinkService::new(link_store, click_sink));
        let redirect_service = Arc::new(RedirectService::new(
            link_service.clone(),
            click_queue.clone(),
        ));

        Self {
            link_service,
            redirect_service,
            click_queue,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}
