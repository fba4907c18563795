//! Process-local stores used when no database is configured, and in tests.
//!
//! Contents live only as long as the process.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::entities::{Click, Link, NewClick, NewLink};
use crate::domain::repositories::{ClickSink, LinkStore};
use crate::error::AppError;

#[derive(Default)]
struct LinkTable {
    next_id: i64,
    by_code: HashMap<String, Link>,
}

/// In-memory link store keyed by short code.
#[derive(Default)]
pub struct InMemoryLinkStore {
    table: RwLock<LinkTable>,
}

impl InMemoryLinkStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkStore for InMemoryLinkStore {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut table = self.table.write().await;

        if table.by_code.contains_key(&new_link.short_code) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "links_short_code_key" }),
            ));
        }

        table.next_id += 1;
        let link = Link::new(
            table.next_id,
            new_link.short_code,
            new_link.long_url,
            Utc::now(),
        );
        table.by_code.insert(link.short_code.clone(), link.clone());

        Ok(link)
    }

    async fn find_by_short_code(&self, short_code: &str) -> Result<Option<Link>, AppError> {
        Ok(self.table.read().await.by_code.get(short_code).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Link>, AppError> {
        let mut links: Vec<Link> = self.table.read().await.by_code.values().cloned().collect();
        links.sort_by_key(|link| link.id);
        Ok(links)
    }
}

/// In-memory click sink.
#[derive(Default)]
pub struct InMemoryClickSink {
    clicks: RwLock<Vec<Click>>,
}

impl InMemoryClickSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every recorded click, in insertion order.
    pub async fn all(&self) -> Vec<Click> {
        self.clicks.read().await.clone()
    }
}

#[async_trait]
impl ClickSink for InMemoryClickSink {
    async fn create(&self, new_click: NewClick) -> Result<Click, AppError> {
        let mut clicks = self.clicks.write().await;

        let click = Click::new(
            clicks.len() as i64 + 1,
            new_click.link_id,
            new_click.clicked_at,
            new_click.user_agent,
            new_click.ip,
        );
        clicks.push(click.clone());

        Ok(click)
    }

    async fn count_by_link_id(&self, link_id: i64) -> Result<i64, AppError> {
        let clicks = self.clicks.read().await;
        Ok(clicks.iter().filter(|c| c.link_id == link_id).count() as i64)
    }
}
