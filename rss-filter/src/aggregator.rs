use crate::dates::sort_timestamp;
use crate::filter::passes_filters;
use crate::traits::{FeedItem, FeedSource};
use crate::types::{CategoryRule, FetchedFeed, GlobalSettings, OutputItem, Result, RssChannel};
use crate::writer::write_rss;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

/// Link placed on every generated channel.
pub const CHANNEL_LINK: &str = "https://example.com";

/// Merges the feeds of one category into a single filtered, date-ordered channel.
pub struct Aggregator<S> {
    source: S,
    max_concurrent_fetches: usize,
}

impl<S: FeedSource> Aggregator<S> {
    /// Fetches run one at a time unless widened with
    /// [`with_max_concurrent_fetches`](Self::with_max_concurrent_fetches).
    pub fn new(source: S) -> Self {
        Self {
            source,
            max_concurrent_fetches: 1,
        }
    }

    pub fn with_max_concurrent_fetches(mut self, max: usize) -> Self {
        self.max_concurrent_fetches = max.max(1);
        self
    }

    /// Run the whole pipeline and serialize the result as an RSS 2.0 document.
    ///
    /// Feeds that fail to fetch or parse are logged and left out; only a
    /// serialization failure is reported to the caller.
    pub async fn generate_feed(&self, rule: &CategoryRule, settings: &GlobalSettings) -> Result<String> {
        let items = self.collect_items(rule, settings).await;

        let channel = RssChannel {
            title: rule.description.clone(),
            description: rule.description.clone(),
            link: CHANNEL_LINK.to_string(),
            items,
        };
        write_rss(&channel)
    }

    /// Fetch, filter and delay every feed of `rule`, then merge the survivors
    /// newest first.
    pub async fn collect_items(&self, rule: &CategoryRule, settings: &GlobalSettings) -> Vec<OutputItem> {
        info!(
            category = %rule.category,
            feeds = rule.urls.len(),
            "Aggregating category"
        );

        let fetches: Vec<_> = rule.urls.iter().map(|url| self.fetch_one(url)).collect();
        // `buffered` yields results in URL order no matter which fetch finishes first.
        let fetched: Vec<(&str, Result<FetchedFeed<S::Item>>)> = stream::iter(fetches)
            .buffered(self.max_concurrent_fetches)
            .collect()
            .await;

        let mut items = Vec::new();
        for (url, result) in fetched {
            let feed = match result {
                Ok(feed) => feed,
                Err(e) => {
                    warn!("Failed to fetch RSS feed [{}]: {}", url, e);
                    continue;
                }
            };

            let delayed = settings.requires_delay(url);
            let feed_items = feed_output_items(&feed, rule, delayed);
            info!(
                "Feed {}: {} of {} items kept{}",
                url,
                feed_items.len(),
                feed.items.len(),
                if delayed { " (delayed)" } else { "" }
            );
            items.extend(feed_items);
        }

        sort_by_pub_date_desc(&mut items);
        info!(category = %rule.category, items = items.len(), "Aggregation finished");
        items
    }

    async fn fetch_one<'a>(&self, url: &'a str) -> (&'a str, Result<FetchedFeed<S::Item>>) {
        (url, self.source.fetch(url).await)
    }
}

/// Filter one feed's items and turn the survivors into output items,
/// applying the delay shift when the feed is marked as delayed.
pub fn feed_output_items<I: FeedItem>(
    feed: &FetchedFeed<I>,
    rule: &CategoryRule,
    delayed: bool,
) -> Vec<OutputItem> {
    let surviving: Vec<&I> = feed
        .items
        .iter()
        .filter(|item| {
            let keep = passes_filters(*item, rule);
            if !keep {
                debug!("Filtered out: {}", item.title());
            }
            keep
        })
        .collect();

    let dated = if delayed {
        delay_shift(&surviving)
    } else {
        surviving
            .iter()
            .map(|item| (*item, item.published_raw()))
            .collect()
    };

    dated
        .into_iter()
        .map(|(item, pub_date)| OutputItem {
            title: format!("[{}] {}", feed.title, item.title()),
            link: item.link().to_string(),
            description: item.description().to_string(),
            pub_date: pub_date.to_string(),
        })
        .collect()
}

/// Pair each item after the first with its predecessor's original publish date.
///
/// The first item is never emitted.
pub fn delay_shift<'a, I: FeedItem>(items: &[&'a I]) -> Vec<(&'a I, &'a str)> {
    items
        .windows(2)
        .map(|pair| {
            let previous: &'a I = pair[0];
            (pair[1], previous.published_raw())
        })
        .collect()
}

/// Stable sort, newest first. Unparseable dates sort last.
pub fn sort_by_pub_date_desc(items: &mut Vec<OutputItem>) {
    let mut keyed: Vec<(DateTime<Utc>, OutputItem)> = items
        .drain(..)
        .map(|item| (sort_timestamp(&item.pub_date), item))
        .collect();

    keyed.sort_by(|a, b| b.0.cmp(&a.0));
    items.extend(keyed.into_iter().map(|(_, item)| item));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ParsedEntry;

    fn entry(title: &str, published: &str) -> ParsedEntry {
        ParsedEntry {
            title: title.to_string(),
            link: format!("https://example.org/{}", title),
            description: String::new(),
            published: published.to_string(),
        }
    }

    #[test]
    fn delay_shift_drops_first_and_borrows_previous_date() {
        let a = entry("a", "dA");
        let b = entry("b", "dB");
        let c = entry("c", "dC");

        let shifted = delay_shift(&[&a, &b, &c]);
        let view: Vec<(&str, &str)> = shifted.iter().map(|(item, date)| (item.title(), *date)).collect();

        assert_eq!(view, vec![("b", "dA"), ("c", "dB")]);
    }

    #[test]
    fn delay_shift_of_single_item_is_empty() {
        let a = entry("a", "dA");
        assert!(delay_shift(&[&a]).is_empty());
        assert!(delay_shift::<ParsedEntry>(&[]).is_empty());
    }

    #[test]
    fn equal_timestamps_keep_their_order() {
        let same = "2024-01-01 00:00:00";
        let mut items: Vec<OutputItem> = ["x", "y", "z"]
            .iter()
            .map(|t| OutputItem {
                title: t.to_string(),
                link: String::new(),
                description: String::new(),
                pub_date: same.to_string(),
            })
            .collect();

        sort_by_pub_date_desc(&mut items);

        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["x", "y", "z"]);
    }
}
