use serde::{Deserialize, Serialize};

/// One filtering profile, as resolved for a single aggregation run.
///
/// `exclude_keywords` is the effective exclude set: the category's own
/// excludes followed by the global ones, in list order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: String,
    pub description: String,
    pub include_keywords: Vec<String>,
    pub exclude_keywords: Vec<String>,
    pub urls: Vec<String>,
}

/// Cross-category settings carried alongside every rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSettings {
    pub global_exclude_keywords: Vec<String>,
    pub delayed_domains: Vec<String>,
}

impl GlobalSettings {
    /// True when `feed_url` contains any of the delayed domain substrings.
    pub fn requires_delay(&self, feed_url: &str) -> bool {
        self.delayed_domains
            .iter()
            .any(|domain| feed_url.contains(domain.as_str()))
    }
}

/// A feed as handed over by a `FeedSource`: its title plus items in source order.
#[derive(Debug, Clone)]
pub struct FetchedFeed<I> {
    pub title: String,
    pub items: Vec<I>,
}

#[derive(Debug, Clone)]
pub struct ParsedFeed {
    pub title: Option<String>,
    pub entries: Vec<ParsedEntry>,
}

#[derive(Debug, Clone)]
pub struct ParsedEntry {
    pub title: String,
    pub link: String,
    pub description: String,
    pub published: String,
}

/// An item ready for publication in the aggregated channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputItem {
    pub title: String,
    pub link: String,
    pub description: String,
    pub pub_date: String,
}

/// The channel envelope wrapped around the sorted items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RssChannel {
    pub title: String,
    pub description: String,
    pub link: String,
    pub items: Vec<OutputItem>,
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_feed_size_mb: usize,
    pub max_redirects: usize,
    pub max_concurrent_fetches: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "RSS-Filter/1.0".to_string(),
            timeout_seconds: 30,
            max_feed_size_mb: 10,
            max_redirects: 5,
            max_concurrent_fetches: 4,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AggregatorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Feed size exceeds limit: {size_mb}MB")]
    FeedTooLarge { size_mb: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed configuration document: {0}")]
    ConfigDecode(#[from] serde_json::Error),

    #[error("Configuration unavailable: {0}")]
    ConfigUnavailable(String),

    #[error("Category '{category}' not found")]
    CategoryNotFound { category: String },

    #[error("RSS serialization failed: {0}")]
    Serialization(String),

    #[error("General error: {0}")]
    General(String),
}

impl AggregatorError {
    /// Errors that stem from loading or resolving the configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            AggregatorError::ConfigDecode(_)
                | AggregatorError::ConfigUnavailable(_)
                | AggregatorError::CategoryNotFound { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AggregatorError>;
