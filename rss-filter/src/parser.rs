use crate::types::{AggregatorError, ParsedEntry, ParsedFeed, Result};
use feed_rs::parser;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use tracing::debug;

/// Used only for entries whose source text carries no date element that
/// could be read directly (feed-rs resolved the date some other way).
const RFC1123Z: &str = "%a, %d %b %Y %H:%M:%S %z";

pub struct FeedParser;

impl FeedParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_feed(&self, content: &str) -> Result<ParsedFeed> {
        debug!("Parsing feed content ({} bytes)", content.len());

        let feed = parser::parse(content.as_bytes())
            .map_err(|e| AggregatorError::Parse(format!("Failed to parse feed: {}", e)))?;

        // feed-rs only keeps the dates it could parse, so the publish dates
        // are read again from the document text and paired up by position.
        let raw_dates = match raw_publish_dates(content) {
            Ok(dates) if dates.len() == feed.entries.len() => dates,
            Ok(dates) => {
                debug!(
                    "Found {} dated elements for {} entries, using parsed dates",
                    dates.len(),
                    feed.entries.len()
                );
                vec![None; feed.entries.len()]
            }
            Err(e) => {
                debug!("Raw publish dates unavailable: {}", e);
                vec![None; feed.entries.len()]
            }
        };

        let title = feed.title.map(|t| t.content);
        let entries: Vec<ParsedEntry> = feed
            .entries
            .into_iter()
            .zip(raw_dates)
            .map(|(entry, raw)| Self::parse_entry(entry, raw))
            .collect();

        debug!("Parsed feed with {} entries", entries.len());

        Ok(ParsedFeed { title, entries })
    }

    /// Entries are kept even when fields are missing: an entry without a date
    /// still takes part in filtering and simply sorts last.
    fn parse_entry(entry: feed_rs::model::Entry, raw_published: Option<String>) -> ParsedEntry {
        let title = entry.title.map(|t| t.content).unwrap_or_default();
        let link = entry
            .links
            .first()
            .map(|l| l.href.clone())
            .unwrap_or_default();
        let description = entry.summary.map(|s| s.content).unwrap_or_default();
        let published = match raw_published {
            Some(raw) => raw,
            None => entry
                .published
                .or(entry.updated)
                .map(|dt| dt.format(RFC1123Z).to_string())
                .unwrap_or_default(),
        };

        ParsedEntry {
            title,
            link,
            description,
            published,
        }
    }
}

impl Default for FeedParser {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy)]
enum DateField {
    Published,
    Updated,
}

impl DateField {
    fn from_local_name(name: &[u8]) -> Option<Self> {
        match name {
            b"pubDate" | b"published" => Some(Self::Published),
            b"updated" | b"date" => Some(Self::Updated),
            _ => None,
        }
    }
}

#[derive(Default)]
struct RawDates {
    published: Option<String>,
    updated: Option<String>,
}

impl RawDates {
    fn push_text(&mut self, field: DateField, text: &str) {
        let slot = match field {
            DateField::Published => &mut self.published,
            DateField::Updated => &mut self.updated,
        };
        slot.get_or_insert_with(String::new).push_str(text);
    }

    fn into_published(self) -> Option<String> {
        self.published
            .filter(|s| !s.is_empty())
            .or(self.updated.filter(|s| !s.is_empty()))
    }
}

/// Publish-date text of every `<item>` / `<entry>`, in document order, as
/// written in the source. `pubDate` and `published` win over `updated` and
/// `dc:date`. Only direct children of the item are considered.
fn raw_publish_dates(content: &str) -> Result<Vec<Option<String>>> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut dates = Vec::new();
    let mut current: Option<RawDates> = None;
    let mut field: Option<DateField> = None;
    let mut depth = 0usize;
    let mut item_depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                depth += 1;
                let name = e.local_name();
                if current.is_none() {
                    if matches!(name.as_ref(), b"item" | b"entry") {
                        current = Some(RawDates::default());
                        item_depth = depth;
                    }
                } else if depth == item_depth + 1 {
                    field = DateField::from_local_name(name.as_ref());
                }
            }
            Ok(Event::Empty(e)) => {
                if current.is_none() && matches!(e.local_name().as_ref(), b"item" | b"entry") {
                    dates.push(None);
                }
            }
            Ok(Event::End(_)) => {
                if current.is_some() && depth == item_depth {
                    dates.push(current.take().and_then(RawDates::into_published));
                }
                field = None;
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Text(e)) => {
                if let (Some(item), Some(field)) = (current.as_mut(), field) {
                    let text = e.unescape().unwrap_or_default();
                    item.push_text(field, &text);
                }
            }
            Ok(Event::CData(e)) => {
                if let (Some(item), Some(field)) = (current.as_mut(), field) {
                    item.push_text(field, String::from_utf8_lossy(&e).trim());
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(AggregatorError::Parse(format!(
                    "XML error at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    Ok(dates)
}
