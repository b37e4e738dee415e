//! Feed source port and HTTP adapter.

use std::time::Duration;

use async_trait::async_trait;
use kaizen_shared::config::FeedConfig;
use reqwest::Client;
use tracing::debug;

use super::types::{FeedError, FeedItem, FeedKind};

/// Pulls the current items of a feed from its source.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the items of `kind`, newest first.
    async fn fetch(&self, kind: FeedKind) -> Result<Vec<FeedItem>, FeedError>;
}

/// [`PageFetcher`] reading pre-extracted items as a JSON array.
pub struct HttpPageFetcher {
    client: Client,
    news_url: Option<String>,
    updates_url: Option<String>,
}

impl HttpPageFetcher {
    /// Creates a fetcher for the configured endpoints.
    ///
    /// # Errors
    ///
    /// Returns `Fetch` if the HTTP client cannot be built.
    pub fn new(config: &FeedConfig) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FeedError::Fetch {
                kind: FeedKind::News,
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            news_url: config.news_url.clone(),
            updates_url: config.updates_url.clone(),
        })
    }

    fn url_for(&self, kind: FeedKind) -> Option<&str> {
        match kind {
            FeedKind::News => self.news_url.as_deref(),
            FeedKind::Updates => self.updates_url.as_deref(),
        }
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, kind: FeedKind) -> Result<Vec<FeedItem>, FeedError> {
        let url = self.url_for(kind).ok_or(FeedError::NotConfigured(kind))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FeedError::Fetch {
                kind,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Fetch {
                kind,
                message: format!("source answered {status}"),
            });
        }

        let items = response
            .json::<Vec<FeedItem>>()
            .await
            .map_err(|e| FeedError::Parse {
                kind,
                message: e.to_string(),
            })?;
        debug!(%kind, count = items.len(), "feed fetched");
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(news_url: Option<String>) -> FeedConfig {
        FeedConfig {
            news_url,
            updates_url: None,
            ..FeedConfig::default()
        }
    }

    #[tokio::test]
    async fn test_fetch_reads_json_items() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/news"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"header": "Dormitory cases fall", "url": "https://example.com/1"},
                {"header": "New testing rules", "url": "https://example.com/2", "excerpt": "From Monday"}
            ])))
            .mount(&server)
            .await;

        let fetcher = HttpPageFetcher::new(&config(Some(format!("{}/news", server.uri())))).unwrap();
        let items = fetcher.fetch(FeedKind::News).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].excerpt.as_deref(), Some("From Monday"));
    }

    #[tokio::test]
    async fn test_unconfigured_feed() {
        let fetcher = HttpPageFetcher::new(&config(None)).unwrap();
        assert!(matches!(
            fetcher.fetch(FeedKind::Updates).await,
            Err(FeedError::NotConfigured(FeedKind::Updates))
        ));
    }

    #[tokio::test]
    async fn test_source_error_and_garbage() {
        let server = MockServer::start().await;
        Mock::given(path("/down"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        Mock::given(path("/garbage"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let down = HttpPageFetcher::new(&config(Some(format!("{}/down", server.uri())))).unwrap();
        assert!(matches!(
            down.fetch(FeedKind::News).await,
            Err(FeedError::Fetch { .. })
        ));

        let garbage =
            HttpPageFetcher::new(&config(Some(format!("{}/garbage", server.uri())))).unwrap();
        assert!(matches!(
            garbage.fetch(FeedKind::News).await,
            Err(FeedError::Parse { .. })
        ));
    }
}
