//! Periodic feed refresh.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, warn};

use super::fetcher::PageFetcher;
use super::store::FeedStore;
use super::types::{FeedError, FeedItem, FeedKind};

/// Items kept per feed.
pub const MAX_ITEMS: usize = 5;

/// Replaces cached feed items with a fresh fetch.
///
/// Running it twice against an unchanged source leaves the same items.
pub struct FeedRefresher<F: PageFetcher + ?Sized, S: FeedStore + ?Sized> {
    fetcher: Arc<F>,
    store: Arc<S>,
}

impl<F: PageFetcher + ?Sized, S: FeedStore + ?Sized> Clone for FeedRefresher<F, S> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            store: Arc::clone(&self.store),
        }
    }
}

impl<F: PageFetcher + ?Sized, S: FeedStore + ?Sized> FeedRefresher<F, S> {
    /// Creates a refresher.
    #[must_use]
    pub const fn new(fetcher: Arc<F>, store: Arc<S>) -> Self {
        Self { fetcher, store }
    }

    /// Fetches `kind` and replaces its cached items.
    ///
    /// Returns the number of items stored. On a fetch failure the cache keeps
    /// its previous items.
    ///
    /// # Errors
    ///
    /// Returns the fetch or store error.
    pub async fn refresh(&self, kind: FeedKind) -> Result<usize, FeedError> {
        let fetched = match self.fetcher.fetch(kind).await {
            Ok(items) => items,
            Err(e) => {
                warn!(%kind, error = %e, "feed fetch failed, keeping cached items");
                return Err(e);
            }
        };

        let items = select_items(fetched);
        let count = items.len();
        self.store.replace(kind, items).await?;
        info!(%kind, count, "feed refreshed");
        Ok(count)
    }

    /// Refreshes every feed, continuing past failures.
    pub async fn refresh_all(&self) -> Vec<(FeedKind, Result<usize, FeedError>)> {
        let mut results = Vec::with_capacity(FeedKind::ALL.len());
        for kind in FeedKind::ALL {
            results.push((kind, self.refresh(kind).await));
        }
        results
    }
}

/// Keeps the first [`MAX_ITEMS`] usable items, skipping blank and repeated headlines.
fn select_items(fetched: Vec<FeedItem>) -> Vec<FeedItem> {
    let mut seen = HashSet::new();
    fetched
        .into_iter()
        .filter(|item| !item.header.trim().is_empty() && !item.url.trim().is_empty())
        .filter(|item| seen.insert(item.header.trim().to_string()))
        .take(MAX_ITEMS)
        .collect()
}
