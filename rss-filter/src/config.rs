//! Configuration document and the stores it is loaded from.

use crate::types::{AggregatorError, CategoryRule, GlobalSettings, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Object `config.json` in the `rss-feed-filtering` bucket.
pub const DEFAULT_CONFIG_LOCATION: &str = "https://rss-feed-filtering.s3.amazonaws.com/config.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigDocument {
    #[serde(default)]
    pub global_exclude_keywords: Vec<String>,
    #[serde(default)]
    pub delayed_domains: Vec<String>,
    #[serde(default)]
    pub configs: Vec<CategoryConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub include_keywords: Vec<String>,
    #[serde(default)]
    pub exclude_keywords: Vec<String>,
    #[serde(default)]
    pub urls: Vec<String>,
}

impl ConfigDocument {
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn global_settings(&self) -> GlobalSettings {
        GlobalSettings {
            global_exclude_keywords: self.global_exclude_keywords.clone(),
            delayed_domains: self.delayed_domains.clone(),
        }
    }

    /// Resolve `category` into its effective rule: own excludes followed by
    /// the global ones. The document itself is left untouched.
    pub fn resolve(&self, category: &str) -> Result<(CategoryRule, GlobalSettings)> {
        let config = self
            .configs
            .iter()
            .find(|c| c.category == category)
            .ok_or_else(|| AggregatorError::CategoryNotFound {
                category: category.to_string(),
            })?;

        let exclude_keywords = config
            .exclude_keywords
            .iter()
            .chain(self.global_exclude_keywords.iter())
            .cloned()
            .collect();

        let rule = CategoryRule {
            category: config.category.clone(),
            description: config.description.clone(),
            include_keywords: config.include_keywords.clone(),
            exclude_keywords,
            urls: config.urls.clone(),
        };
        Ok((rule, self.global_settings()))
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.configs.iter().map(|c| c.category.as_str())
    }
}

/// Where the configuration document lives.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn load(&self) -> Result<ConfigDocument>;

    /// Human-readable location, for logs.
    fn location(&self) -> String;
}

/// Load the document and resolve one category in a single step.
pub async fn load_category(
    store: &dyn ConfigStore,
    category: &str,
) -> Result<(CategoryRule, GlobalSettings)> {
    let document = store.load().await?;
    document.resolve(category)
}

/// Blob store reachable over plain HTTP(S) GET.
pub struct HttpConfigStore {
    client: Client,
    url: Url,
}

impl HttpConfigStore {
    pub fn new(url: &str, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            url: Url::parse(url)?,
        })
    }
}

#[async_trait]
impl ConfigStore for HttpConfigStore {
    async fn load(&self) -> Result<ConfigDocument> {
        debug!("Loading configuration from {}", self.url);

        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| AggregatorError::ConfigUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AggregatorError::ConfigUnavailable(format!(
                "HTTP {} from {}",
                status, self.url
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AggregatorError::ConfigUnavailable(e.to_string()))?;
        let document = ConfigDocument::from_json(&bytes)?;

        info!(
            "Loaded configuration with {} categories from {}",
            document.configs.len(),
            self.url
        );
        Ok(document)
    }

    fn location(&self) -> String {
        self.url.to_string()
    }
}

/// JSON file on the local filesystem.
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn load(&self) -> Result<ConfigDocument> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            AggregatorError::ConfigUnavailable(format!("{}: {}", self.path.display(), e))
        })?;
        let document = ConfigDocument::from_json(&bytes)?;

        info!(
            "Loaded configuration with {} categories from {}",
            document.configs.len(),
            self.path.display()
        );
        Ok(document)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// `http(s)://` locations go through [`HttpConfigStore`], anything else is a file path.
pub fn config_store_from_location(location: &str, timeout_seconds: u64) -> Result<Arc<dyn ConfigStore>> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Ok(Arc::new(HttpConfigStore::new(location, timeout_seconds)?))
    } else {
        Ok(Arc::new(FileConfigStore::new(location)))
    }
}
