//! Keyword rules applied to individual feed items.

use crate::traits::FeedItem;
use crate::types::CategoryRule;

/// Decide whether `item` survives the rule's keyword constraints.
///
/// Title and description are concatenated and matched case-insensitively
/// by substring. A non-empty include list requires at least one hit; any
/// exclude hit rejects the item regardless of includes.
pub fn passes_filters<I: FeedItem + ?Sized>(item: &I, rule: &CategoryRule) -> bool {
    let text = search_text(item);

    if !rule.include_keywords.is_empty() && !contains_any(&text, &rule.include_keywords) {
        return false;
    }

    !contains_any(&text, &rule.exclude_keywords)
}

fn search_text<I: FeedItem + ?Sized>(item: &I) -> String {
    let mut text = String::with_capacity(item.title().len() + item.description().len());
    text.push_str(item.title());
    text.push_str(item.description());
    text.to_lowercase()
}

fn contains_any(text_lower: &str, keywords: &[String]) -> bool {
    keywords
        .iter()
        .any(|word| text_lower.contains(word.to_lowercase().as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ParsedEntry;

    fn entry(title: &str, description: &str) -> ParsedEntry {
        ParsedEntry {
            title: title.to_string(),
            link: String::new(),
            description: description.to_string(),
            published: String::new(),
        }
    }

    #[test]
    fn matches_across_the_title_description_boundary() {
        let rule = CategoryRule {
            category: "c".to_string(),
            description: String::new(),
            include_keywords: vec!["endstart".to_string()],
            exclude_keywords: Vec::new(),
            urls: Vec::new(),
        };

        assert!(passes_filters(&entry("The End", "Start here"), &rule));
    }
}
