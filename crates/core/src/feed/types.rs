//! Feed value types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Which feed an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    /// COVID-19 news headlines.
    News,
    /// Construction-sector updates.
    Updates,
}

impl FeedKind {
    /// Both feeds.
    pub const ALL: [Self; 2] = [Self::News, Self::Updates];

    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::News => "news",
            Self::Updates => "updates",
        }
    }

    /// Parses a kind from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "news" => Some(Self::News),
            "updates" => Some(Self::Updates),
            _ => None,
        }
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One headline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    /// Headline text.
    pub header: String,
    /// Link to the article.
    pub url: String,
    /// Opening paragraph.
    #[serde(default)]
    pub excerpt: Option<String>,
    /// Lead image.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Publication date as printed by the source.
    #[serde(default)]
    pub published: Option<String>,
}

/// Errors raised while fetching or caching feed items.
#[derive(Debug, Error)]
pub enum FeedError {
    /// No source is configured for this feed.
    #[error("no source configured for {0} feed")]
    NotConfigured(FeedKind),

    /// The source could not be reached or answered with an error.
    #[error("failed to fetch {kind} feed: {message}")]
    Fetch {
        /// Feed being fetched.
        kind: FeedKind,
        /// Failure detail.
        message: String,
    },

    /// The source answered with something other than a list of items.
    #[error("malformed {kind} feed: {message}")]
    Parse {
        /// Feed being fetched.
        kind: FeedKind,
        /// Failure detail.
        message: String,
    },

    /// The cache could not be read or written.
    #[error("feed store failure: {0}")]
    Store(String),
}

impl FeedError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotConfigured(_) => 503,
            Self::Fetch { .. } | Self::Parse { .. } => 502,
            Self::Store(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotConfigured(_) => "FEED_NOT_CONFIGURED",
            Self::Fetch { .. } => "FEED_FETCH_ERROR",
            Self::Parse { .. } => "FEED_PARSE_ERROR",
            Self::Store(_) => "FEED_STORE_ERROR",
        }
    }
}
