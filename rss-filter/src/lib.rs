pub mod types;
pub mod traits;
pub mod filter;
pub mod dates;
pub mod fetcher;
pub mod parser;
pub mod sources;
pub mod aggregator;
pub mod writer;
pub mod config;
pub mod server;

pub use types::*;
pub use traits::{FeedItem, FeedSource};
pub use filter::passes_filters;
pub use dates::{parse_pub_date, sort_timestamp};
pub use fetcher::Fetcher;
pub use parser::FeedParser;
pub use sources::HttpFeedSource;
pub use aggregator::Aggregator;
pub use writer::write_rss;
pub use config::{ConfigDocument, ConfigStore, FileConfigStore, HttpConfigStore};
