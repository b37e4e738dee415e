//! COVID-19 news and construction-sector updates.
//!
//! Items are pulled from an external source by a [`PageFetcher`] and cached
//! in a [`FeedStore`]. [`FeedRefresher`] keeps the cache to the newest few
//! items and is driven by a timer in the server.

mod fetcher;
mod refresher;
mod store;
mod types;

pub use fetcher::{HttpPageFetcher, PageFetcher};
pub use refresher::{FeedRefresher, MAX_ITEMS};
pub use store::{FeedStore, InMemoryFeedStore};
pub use types::{FeedError, FeedItem, FeedKind};
