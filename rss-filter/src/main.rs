use anyhow::Context;
use clap::{Parser, Subcommand};
use rss_filter::config::{config_store_from_location, load_category, DEFAULT_CONFIG_LOCATION};
use rss_filter::server::{router, AppState};
use rss_filter::{Aggregator, FetchConfig, HttpFeedSource};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "rss-filter", version, about = "Merge, filter and re-date RSS feeds per category")]
struct Cli {
    /// Configuration document: an http(s) URL or a local file path
    #[arg(long, env = "RSS_FILTER_CONFIG", default_value = DEFAULT_CONFIG_LOCATION, global = true)]
    config: String,

    #[arg(long, env = "RSS_FILTER_USER_AGENT", default_value = "RSS-Filter/1.0", global = true)]
    user_agent: String,

    /// Per-request timeout for feed and configuration fetches
    #[arg(long, env = "RSS_FILTER_TIMEOUT_SECS", default_value_t = 30, global = true)]
    timeout_secs: u64,

    #[arg(long, env = "RSS_FILTER_MAX_FEED_MB", default_value_t = 10, global = true)]
    max_feed_mb: usize,

    /// Feeds fetched at once; 1 fetches strictly one after another
    #[arg(long, env = "RSS_FILTER_CONCURRENCY", default_value_t = 4, global = true)]
    concurrency: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the aggregated feed for one category to stdout
    Generate { category: String },
    /// List the categories defined in the configuration
    Categories,
    /// Serve feeds over HTTP
    Serve {
        #[arg(long, env = "RSS_FILTER_BIND", default_value = "0.0.0.0:8080")]
        bind: String,

        /// Shared secret expected in the `token` query parameter
        #[arg(long, env = "RSS_FILTER_TOKEN", hide_env_values = true)]
        token: String,
    },
}

impl Cli {
    fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            user_agent: self.user_agent.clone(),
            timeout_seconds: self.timeout_secs,
            max_feed_size_mb: self.max_feed_mb,
            max_concurrent_fetches: self.concurrency,
            ..FetchConfig::default()
        }
    }

    fn aggregator(&self) -> anyhow::Result<Aggregator<HttpFeedSource>> {
        let fetch_config = self.fetch_config();
        let concurrency = fetch_config.max_concurrent_fetches;
        let source = HttpFeedSource::new(fetch_config).context("failed to build HTTP client")?;
        Ok(Aggregator::new(source).with_max_concurrent_fetches(concurrency))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout is reserved for the generated document.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config_store = config_store_from_location(&cli.config, cli.timeout_secs)
        .with_context(|| format!("invalid configuration location {}", cli.config))?;

    match &cli.command {
        Command::Generate { category } => {
            let (rule, settings) = load_category(config_store.as_ref(), category)
                .await
                .context("failed to load configuration")?;
            let xml = cli
                .aggregator()?
                .generate_feed(&rule, &settings)
                .await
                .context("RSS generation failed")?;
            println!("{}", xml);
        }
        Command::Categories => {
            let document = config_store
                .load()
                .await
                .context("failed to load configuration")?;
            for category in document.categories() {
                println!("{}", category);
            }
        }
        Command::Serve { bind, token } => {
            let location = config_store.location();
            let state = Arc::new(AppState {
                aggregator: cli.aggregator()?,
                config_store,
                access_token: token.clone(),
            });
            let app = router(state);

            let listener = tokio::net::TcpListener::bind(bind)
                .await
                .with_context(|| format!("failed to bind {}", bind))?;
            info!(bind = %bind, config = %location, "Feed server started");
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
