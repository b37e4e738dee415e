//! Feed cache port.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::types::{FeedError, FeedItem, FeedKind};

/// Cache of the current items of each feed.
#[async_trait]
pub trait FeedStore: Send + Sync {
    /// Items of `kind` in source order.
    async fn list(&self, kind: FeedKind) -> Result<Vec<FeedItem>, FeedError>;

    /// Replaces every item of `kind` with `items` in one step.
    async fn replace(&self, kind: FeedKind, items: Vec<FeedItem>) -> Result<(), FeedError>;
}

/// [`FeedStore`] kept in process memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFeedStore {
    items: Arc<RwLock<HashMap<FeedKind, Vec<FeedItem>>>>,
}

impl InMemoryFeedStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FeedStore for InMemoryFeedStore {
    async fn list(&self, kind: FeedKind) -> Result<Vec<FeedItem>, FeedError> {
        Ok(self
            .items
            .read()
            .await
            .get(&kind)
            .cloned()
            .unwrap_or_default())
    }

    async fn replace(&self, kind: FeedKind, items: Vec<FeedItem>) -> Result<(), FeedError> {
        self.items.write().await.insert(kind, items);
        Ok(())
    }
}
