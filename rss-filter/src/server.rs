//! HTTP front end: token check, category lookup, and RSS delivery.

use crate::aggregator::Aggregator;
use crate::config::{load_category, ConfigStore};
use crate::traits::FeedSource;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, warn};

pub const RSS_CONTENT_TYPE: &str = "application/rss+xml";

pub struct AppState<S> {
    pub aggregator: Aggregator<S>,
    pub config_store: Arc<dyn ConfigStore>,
    pub access_token: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    pub token: Option<String>,
    pub category: Option<String>,
}

pub fn router<S: FeedSource + 'static>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/feed", get(feed_handler::<S>))
        .route("/health", get(health_handler))
        .with_state(state)
}

async fn health_handler() -> &'static str {
    "ok"
}

async fn feed_handler<S: FeedSource + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<FeedQuery>,
) -> Response {
    if query.token.as_deref() != Some(state.access_token.as_str()) {
        warn!("Rejected feed request with invalid token");
        return (StatusCode::UNAUTHORIZED, "Unauthorized: invalid token").into_response();
    }

    let category = query.category.unwrap_or_default();
    let (rule, settings) = match load_category(state.config_store.as_ref(), &category).await {
        Ok(resolved) => resolved,
        Err(e) if e.is_config_error() => {
            warn!(category = %category, "Failed to load configuration: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                format!("Failed to load configuration: {}", e),
            )
                .into_response();
        }
        Err(e) => {
            error!(category = %category, "Configuration store failed: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Configuration store failed: {}", e),
            )
                .into_response();
        }
    };

    match state.aggregator.generate_feed(&rule, &settings).await {
        Ok(xml) => {
            info!(category = %category, "Served feed ({} bytes)", xml.len());
            (StatusCode::OK, [(header::CONTENT_TYPE, RSS_CONTENT_TYPE)], xml).into_response()
        }
        Err(e) => {
            error!(category = %category, "RSS generation failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("RSS generation failed: {}", e),
            )
                .into_response()
        }
    }
}
