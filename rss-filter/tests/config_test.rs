mod common;

use common::{init_tracing, keywords, StaticConfigStore};
use rss_filter::config::{
    config_store_from_location, load_category, ConfigDocument, ConfigStore, FileConfigStore,
};
use rss_filter::AggregatorError;
use std::io::Write;

const DOCUMENT: &str = r#"{
    "global_exclude_keywords": ["ad", "sponsored"],
    "delayed_domains": ["slow.example"],
    "configs": [
        {
            "category": "games",
            "description": "Game news",
            "include_keywords": ["nintendo"],
            "exclude_keywords": ["rumor"],
            "urls": ["https://a.example/rss", "https://slow.example/feed"]
        },
        {
            "category": "tech",
            "description": "Tech news",
            "include_keywords": [],
            "exclude_keywords": [],
            "urls": []
        }
    ]
}"#;

#[test]
fn resolve_appends_global_excludes_after_own() {
    let document = ConfigDocument::from_json(DOCUMENT.as_bytes()).unwrap();

    let (rule, settings) = document.resolve("games").unwrap();

    assert_eq!(rule.description, "Game news");
    assert_eq!(rule.include_keywords, keywords(&["nintendo"]));
    assert_eq!(rule.exclude_keywords, keywords(&["rumor", "ad", "sponsored"]));
    assert_eq!(rule.urls.len(), 2);
    assert_eq!(settings.delayed_domains, keywords(&["slow.example"]));
    assert!(settings.requires_delay(&rule.urls[1]));
}

#[test]
fn resolving_twice_does_not_accumulate_excludes() {
    let document = ConfigDocument::from_json(DOCUMENT.as_bytes()).unwrap();

    let (first, _) = document.resolve("tech").unwrap();
    let (second, _) = document.resolve("tech").unwrap();

    assert_eq!(first.exclude_keywords, keywords(&["ad", "sponsored"]));
    assert_eq!(first, second);
    assert!(document.configs[1].exclude_keywords.is_empty());
}

#[test]
fn unknown_category_is_reported() {
    let document = ConfigDocument::from_json(DOCUMENT.as_bytes()).unwrap();

    let err = document.resolve("cooking").unwrap_err();

    assert!(matches!(err, AggregatorError::CategoryNotFound { ref category } if category == "cooking"));
    assert!(err.is_config_error());
}

#[test]
fn missing_lists_default_to_empty() {
    let document = ConfigDocument::from_json(br#"{"configs": [{"category": "bare"}]}"#).unwrap();

    let (rule, settings) = document.resolve("bare").unwrap();

    assert!(rule.include_keywords.is_empty());
    assert!(rule.exclude_keywords.is_empty());
    assert!(rule.urls.is_empty());
    assert!(settings.delayed_domains.is_empty());
}

#[test]
fn malformed_document_is_a_config_error() {
    let err = ConfigDocument::from_json(b"{ not json").unwrap_err();

    assert!(matches!(err, AggregatorError::ConfigDecode(_)));
    assert!(err.is_config_error());
}

#[test]
fn categories_are_listed_in_document_order() {
    let document = ConfigDocument::from_json(DOCUMENT.as_bytes()).unwrap();
    let names: Vec<&str> = document.categories().collect();
    assert_eq!(names, vec!["games", "tech"]);
}

#[tokio::test]
async fn file_store_loads_document() {
    init_tracing();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(DOCUMENT.as_bytes()).unwrap();

    let store = FileConfigStore::new(file.path());
    let (rule, _) = load_category(&store, "tech").await.unwrap();

    assert_eq!(rule.description, "Tech news");
}

#[tokio::test]
async fn missing_file_is_unavailable() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    let store = FileConfigStore::new(dir.path().join("absent.json"));

    let err = store.load().await.unwrap_err();
    assert!(matches!(err, AggregatorError::ConfigUnavailable(_)));
}

#[tokio::test]
async fn load_category_surfaces_not_found() {
    init_tracing();

    let store = StaticConfigStore(ConfigDocument::from_json(DOCUMENT.as_bytes()).unwrap());

    let err = load_category(&store, "").await.unwrap_err();
    assert!(matches!(err, AggregatorError::CategoryNotFound { .. }));
}

#[test]
fn store_kind_follows_location_scheme() {
    let http = config_store_from_location("https://bucket.example/config.json", 5).unwrap();
    assert_eq!(http.location(), "https://bucket.example/config.json");

    let file = config_store_from_location("./config.json", 5).unwrap();
    assert_eq!(file.location(), "./config.json");

    assert!(config_store_from_location("http://", 5).is_err());
}
