//! RSS 2.0 serialization
//!
//! Entries are written in the order given; ordering belongs to the
//! projection.

use crate::projection::FeedEntry;

/// Channel-level feed metadata
#[derive(Debug, Clone, PartialEq)]
pub struct FeedMetadata {
    pub title: String,
    pub description: String,
    pub feed_url: String,
    pub site_url: String,
    pub language: String,
}

/// Serialize entries into an RSS 2.0 document
pub fn render_feed_document(entries: &[FeedEntry], meta: &FeedMetadata) -> String {
    let mut feed = String::new();
    feed.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    feed.push('\n');
    feed.push_str(r#"<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom">"#);
    feed.push('\n');
    feed.push_str("  <channel>\n");
    feed.push_str(&format!("    <title>{}</title>\n", escape_xml(&meta.title)));
    feed.push_str(&format!("    <link>{}</link>\n", escape_xml(&meta.site_url)));
    feed.push_str(&format!(
        "    <description>{}</description>\n",
        escape_xml(&meta.description)
    ));
    feed.push_str(&format!(
        "    <language>{}</language>\n",
        escape_xml(&meta.language)
    ));
    feed.push_str(&format!(
        "    <generator>skyward {}</generator>\n",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(latest) = entries.iter().map(|e| e.date).max() {
        feed.push_str(&format!(
            "    <lastBuildDate>{}</lastBuildDate>\n",
            latest.to_rfc2822()
        ));
    }
    feed.push_str(&format!(
        "    <atom:link href=\"{}\" rel=\"self\" type=\"application/rss+xml\"/>\n",
        escape_xml(&meta.feed_url)
    ));

    for entry in entries {
        let url = escape_xml(&entry.url);
        feed.push_str("    <item>\n");
        feed.push_str(&format!("      <title>{}</title>\n", escape_xml(&entry.title)));
        feed.push_str(&format!("      <link>{}</link>\n", url));
        feed.push_str(&format!(
            "      <guid isPermaLink=\"true\">{}</guid>\n",
            url
        ));
        feed.push_str(&format!(
            "      <description>{}</description>\n",
            escape_xml(&entry.description)
        ));
        feed.push_str(&format!(
            "      <pubDate>{}</pubDate>\n",
            entry.date.to_rfc2822()
        ));
        feed.push_str("    </item>\n");
    }

    feed.push_str("  </channel>\n");
    feed.push_str("</rss>\n");
    feed
}

/// Escape XML special characters, dropping characters XML 1.0 cannot carry.
/// Carriage returns become character references since parsers normalize raw
/// ones to line feeds.
fn escape_xml(s: &str) -> String {
    strip_invalid_xml_chars(s)
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
        .replace('\r', "&#xD;")
}

/// Strip invalid XML control characters (except tab, newline, carriage return)
/// XML 1.0 only allows: #x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]
fn strip_invalid_xml_chars(s: &str) -> String {
    s.chars()
        .filter(|&c| {
            c == '\t'
                || c == '\n'
                || c == '\r'
                || ('\u{0020}'..='\u{D7FF}').contains(&c)
                || ('\u{E000}'..='\u{FFFD}').contains(&c)
                || ('\u{10000}'..='\u{10FFFF}').contains(&c)
        })
        .collect()
}
