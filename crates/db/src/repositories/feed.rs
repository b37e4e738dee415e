//! PostgreSQL implementation of the feed cache.

use async_trait::async_trait;
use kaizen_core::feed::{FeedError, FeedItem, FeedKind, FeedStore};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::debug;

use crate::entities::{feed_items, sea_orm_active_enums};

/// [`FeedStore`] backed by the `feed_items` table.
#[derive(Debug, Clone)]
pub struct SeaOrmFeedStore {
    db: DatabaseConnection,
}

impl SeaOrmFeedStore {
    /// Creates a new store.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn store_error(err: DbErr) -> FeedError {
    FeedError::Store(err.to_string())
}

#[async_trait]
impl FeedStore for SeaOrmFeedStore {
    async fn list(&self, kind: FeedKind) -> Result<Vec<FeedItem>, FeedError> {
        let rows = feed_items::Entity::find()
            .filter(feed_items::Column::Kind.eq(sea_orm_active_enums::FeedKind::from(kind)))
            .order_by_asc(feed_items::Column::Position)
            .all(&self.db)
            .await
            .map_err(store_error)?;

        Ok(rows
            .into_iter()
            .map(|row| FeedItem {
                header: row.header,
                url: row.url,
                excerpt: row.excerpt,
                image_url: row.image_url,
                published: row.published,
            })
            .collect())
    }

    async fn replace(&self, kind: FeedKind, items: Vec<FeedItem>) -> Result<(), FeedError> {
        let db_kind = sea_orm_active_enums::FeedKind::from(kind);
        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();
        let count = items.len();

        let txn = self.db.begin().await.map_err(store_error)?;

        feed_items::Entity::delete_many()
            .filter(feed_items::Column::Kind.eq(db_kind))
            .exec(&txn)
            .await
            .map_err(store_error)?;

        if !items.is_empty() {
            let rows = items.into_iter().zip(0i32..).map(|(item, position)| {
                feed_items::ActiveModel {
                    kind: Set(db_kind),
                    position: Set(position),
                    header: Set(item.header),
                    url: Set(item.url),
                    excerpt: Set(item.excerpt),
                    image_url: Set(item.image_url),
                    published: Set(item.published),
                    fetched_at: Set(now),
                    ..Default::default()
                }
            });
            feed_items::Entity::insert_many(rows)
                .exec_without_returning(&txn)
                .await
                .map_err(store_error)?;
        }

        txn.commit().await.map_err(store_error)?;
        debug!(%kind, count, "feed items replaced");
        Ok(())
    }
}
