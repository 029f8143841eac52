use crate::traits::FeedSource;
use crate::types::{FetchConfig, FetchedFeed, ParsedEntry, Result};
use crate::{FeedParser, Fetcher};
use async_trait::async_trait;
use tracing::info;

/// Feed source backed by live HTTP fetches and feed-rs parsing.
pub struct HttpFeedSource {
    fetcher: Fetcher,
    parser: FeedParser,
}

impl HttpFeedSource {
    pub fn new(fetch_config: FetchConfig) -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::new(fetch_config)?,
            parser: FeedParser::new(),
        })
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    type Item = ParsedEntry;

    async fn fetch(&self, url: &str) -> Result<FetchedFeed<ParsedEntry>> {
        let content = self.fetcher.fetch_feed(url).await?;
        let parsed = self.parser.parse_feed(&content)?;

        info!("Pulled {} items from RSS feed {}", parsed.entries.len(), url);

        Ok(FetchedFeed {
            title: parsed.title.unwrap_or_default(),
            items: parsed.entries,
        })
    }
}
