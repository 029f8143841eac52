//! RSS 2.0 serialization.

use crate::types::{AggregatorError, OutputItem, Result, RssChannel};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

/// Serialize `channel` as a pretty-printed (2-space) RSS 2.0 document,
/// preceded by the XML declaration.
pub fn write_rss(channel: &RssChannel) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    write_event(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut rss_start = BytesStart::new("rss");
    rss_start.push_attribute(("version", "2.0"));
    write_event(&mut writer, Event::Start(rss_start))?;
    write_event(&mut writer, Event::Start(BytesStart::new("channel")))?;

    write_text_element(&mut writer, "title", &channel.title)?;
    write_text_element(&mut writer, "description", &channel.description)?;
    write_text_element(&mut writer, "link", &channel.link)?;

    for item in &channel.items {
        write_item(&mut writer, item)?;
    }

    write_event(&mut writer, Event::End(BytesEnd::new("channel")))?;
    write_event(&mut writer, Event::End(BytesEnd::new("rss")))?;

    String::from_utf8(writer.into_inner()).map_err(|e| AggregatorError::Serialization(e.to_string()))
}

fn write_item(w: &mut Writer<Vec<u8>>, item: &OutputItem) -> Result<()> {
    write_event(w, Event::Start(BytesStart::new("item")))?;
    write_text_element(w, "title", &item.title)?;
    write_text_element(w, "link", &item.link)?;
    write_text_element(w, "description", &item.description)?;
    write_text_element(w, "pubDate", &item.pub_date)?;
    write_event(w, Event::End(BytesEnd::new("item")))
}

fn write_text_element(w: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    write_event(w, Event::Start(BytesStart::new(name)))?;
    // Written even when empty so the indenting writer keeps `<x></x>` on one line.
    write_event(w, Event::Text(BytesText::new(&sanitize_text(text))))?;
    write_event(w, Event::End(BytesEnd::new(name)))
}

fn write_event(w: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    w.write_event(event)
        .map_err(|e| AggregatorError::Serialization(e.to_string()))
}

/// Replace characters XML 1.0 cannot carry with U+FFFD.
fn sanitize_text(input: &str) -> String {
    input
        .chars()
        .map(|c| if is_xml_char(c) { c } else { '\u{FFFD}' })
        .collect()
}

fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\u{9}' | '\u{A}' | '\u{D}'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}
