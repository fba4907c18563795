#![allow(dead_code)]

use axum::extract::ConnectInfo;
use linktrack::domain::click_queue::ClickQueue;
use linktrack::domain::entities::{Link, NewLink};
use linktrack::domain::repositories::LinkStore;
use linktrack::infrastructure::persistence::{InMemoryClickSink, InMemoryLinkStore};
use linktrack::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::Layer;

pub const BASE_URL: &str = "http://sho.rt";
pub const CLIENT_ADDR: &str = "127.0.0.1:12345";

/// Application state over in-memory stores, with handles to inspect them.
pub struct TestContext {
    pub state: AppState,
    pub links: Arc<InMemoryLinkStore>,
    pub clicks: Arc<InMemoryClickSink>,
    pub queue: ClickQueue,
}

pub fn create_test_context(queue_capacity: usize) -> TestContext {
    let links = Arc::new(InMemoryLinkStore::new());
    let clicks = Arc::new(InMemoryClickSink::new());
    let queue = ClickQueue::new(queue_capacity);

    let state = AppState::new(links.clone(), clicks.clone(), queue.clone(), BASE_URL);

    TestContext {
        state,
        links,
        clicks,
        queue,
    }
}

pub async fn create_test_link(store: &InMemoryLinkStore, code: &str, url: &str) -> Link {
    store
        .create(NewLink {
            short_code: code.to_string(),
            long_url: url.to_string(),
        })
        .await
        .unwrap()
}

/// Inserts a fixed peer address, as `into_make_service_with_connect_info` would.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = CLIENT_ADDR.parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
