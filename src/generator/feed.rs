//! Atom feed

use chrono::{DateTime, Utc};

use crate::config::SiteConfig;
use crate::content::Document;
use crate::helpers::{absolute_url, date_rfc3339, escape_xml, html_to_absolute_urls, limit};

/// Render the Atom feed for the newest `feed.limit` posts.
/// `posts` must already be sorted newest first.
pub fn render_atom(config: &SiteConfig, posts: &[&Document], now: DateTime<Utc>) -> String {
    let base_url = config.url.trim_end_matches('/');
    let entries = limit(posts, config.feed.limit);
    let updated = entries.first().map(|p| p.date).unwrap_or(now);

    let mut feed = String::new();
    feed.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
    feed.push('\n');
    feed.push_str(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#);
    feed.push('\n');
    feed.push_str(&format!("  <title>{}</title>\n", escape_xml(&config.title)));
    if !config.description.is_empty() {
        feed.push_str(&format!(
            "  <subtitle>{}</subtitle>\n",
            escape_xml(&config.description)
        ));
    }
    feed.push_str(&format!(
        "  <link href=\"{}\" rel=\"self\"/>\n",
        escape_xml(&absolute_url(&config.feed.path, base_url))
    ));
    feed.push_str(&format!("  <link href=\"{}/\"/>\n", escape_xml(base_url)));
    feed.push_str(&format!("  <updated>{}</updated>\n", date_rfc3339(&updated)));
    feed.push_str(&format!("  <id>{}/</id>\n", escape_xml(base_url)));
    if !config.author.is_empty() {
        feed.push_str(&format!(
            "  <author><name>{}</name></author>\n",
            escape_xml(&config.author)
        ));
    }

    for post in entries {
        let link = escape_xml(&absolute_url(&post.url, base_url));
        feed.push_str("  <entry>\n");
        feed.push_str(&format!("    <title>{}</title>\n", escape_xml(&post.title)));
        feed.push_str(&format!("    <link href=\"{}\"/>\n", link));
        feed.push_str(&format!("    <id>{}</id>\n", link));
        feed.push_str(&format!(
            "    <published>{}</published>\n",
            date_rfc3339(&post.date)
        ));
        feed.push_str(&format!(
            "    <updated>{}</updated>\n",
            date_rfc3339(&post.date)
        ));
        for category in &post.categories {
            feed.push_str(&format!(
                "    <category term=\"{}\"/>\n",
                escape_xml(category)
            ));
        }
        let content = strip_invalid_xml_chars(&html_to_absolute_urls(&post.content, base_url));
        feed.push_str(&format!(
            "    <content type=\"html\"><![CDATA[{}]]></content>\n",
            content.replace("]]>", "]]]]><![CDATA[>")
        ));
        feed.push_str("  </entry>\n");
    }

    feed.push_str("</feed>\n");
    feed
}

/// Drop characters XML 1.0 does not allow
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
