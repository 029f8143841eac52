#![allow(dead_code)]

use async_trait::async_trait;
use rss_filter::config::{ConfigDocument, ConfigStore};
use rss_filter::{AggregatorError, CategoryRule, FeedItem, FeedSource, FetchedFeed, Result};
use std::collections::HashMap;
use std::sync::Once;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

#[derive(Debug, Clone)]
pub struct StubItem {
    pub title: String,
    pub link: String,
    pub description: String,
    pub published: String,
}

impl StubItem {
    pub fn new(title: &str, description: &str, published: &str) -> Self {
        Self {
            title: title.to_string(),
            link: format!("https://stub.example/{}", title.to_lowercase().replace(' ', "-")),
            description: description.to_string(),
            published: published.to_string(),
        }
    }
}

impl FeedItem for StubItem {
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

/// Serves canned feeds by URL; unknown URLs fail like an unreachable host.
#[derive(Default)]
pub struct StubSource {
    feeds: HashMap<String, FetchedFeed<StubItem>>,
}

impl StubSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed(mut self, url: &str, title: &str, items: Vec<StubItem>) -> Self {
        self.feeds.insert(
            url.to_string(),
            FetchedFeed {
                title: title.to_string(),
                items,
            },
        );
        self
    }
}

#[async_trait]
impl FeedSource for StubSource {
    type Item = StubItem;

    async fn fetch(&self, url: &str) -> Result<FetchedFeed<StubItem>> {
        self.feeds
            .get(url)
            .cloned()
            .ok_or_else(|| AggregatorError::General(format!("connection refused: {}", url)))
    }
}

/// Config store holding a fixed document.
pub struct StaticConfigStore(pub ConfigDocument);

#[async_trait]
impl ConfigStore for StaticConfigStore {
    async fn load(&self) -> Result<ConfigDocument> {
        Ok(self.0.clone())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

pub fn rule(urls: &[&str]) -> CategoryRule {
    CategoryRule {
        category: "games".to_string(),
        description: "Game news".to_string(),
        include_keywords: Vec::new(),
        exclude_keywords: Vec::new(),
        urls: urls.iter().map(|u| u.to_string()).collect(),
    }
}

pub fn keywords(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}
