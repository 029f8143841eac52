use crate::types::{FetchedFeed, ParsedEntry, Result};
use async_trait::async_trait;

/// The minimal shape the filter engine and aggregator need from a feed item.
pub trait FeedItem {
    fn title(&self) -> &str;

    fn link(&self) -> &str;

    fn description(&self) -> &str;

    /// Publish date exactly as the source delivered it, in no particular format.
    fn published_raw(&self) -> &str;
}

/// Trait for turning a feed URL into a structured feed.
#[async_trait]
pub trait FeedSource: Send + Sync {
    type Item: FeedItem + Send + Sync + 'static;

    /// Fetch and parse the feed at `url`.
    async fn fetch(&self, url: &str) -> Result<FetchedFeed<Self::Item>>;
}

impl FeedItem for ParsedEntry {
    fn title(&self) -> &str {
        &self.title
    }

    fn link(&self) -> &str {
        &self.link
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn published_raw(&self) -> &str {
        &self.published
    }
}
