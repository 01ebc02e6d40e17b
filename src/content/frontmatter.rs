//! Front-matter parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use super::error::{ContentError, Result};

/// Accepts a single string or a list of strings. Anything else (numbers,
/// maps, null) yields an empty list, and non-string list items are skipped.
fn string_or_vec<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_string<E>(self, value: String) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value])
        }

        fn visit_seq<S>(self, mut seq: S) -> std::result::Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<serde_yaml::Value>()? {
                if let serde_yaml::Value::String(s) = item {
                    vec.push(s);
                }
            }
            Ok(vec)
        }

        fn visit_map<M>(self, mut map: M) -> std::result::Result<Self::Value, M::Error>
        where
            M: MapAccess<'de>,
        {
            while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
            Ok(Vec::new())
        }

        fn visit_bool<E>(self, _: bool) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_i64<E>(self, _: i64) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_u64<E>(self, _: u64) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_f64<E>(self, _: f64) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_none<E>(self) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Front-matter data from a content file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub date: Option<String>,
    #[serde(deserialize_with = "string_or_vec")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "string_or_vec")]
    pub categories: Vec<String>,
    pub layout: Option<String>,
    pub permalink: Option<String>,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str)> {
        let content = content.trim_start();

        if content.starts_with("---") {
            return Ok(Self::parse_yaml(content));
        }

        if content.starts_with(";;;") || content.starts_with('{') {
            return Self::parse_json(content);
        }

        Ok((FrontMatter::default(), content))
    }

    fn parse_yaml(content: &str) -> (Self, &str) {
        let rest = content[3..].trim_start_matches(['\n', '\r']);

        let Some(end_pos) = rest.find("\n---") else {
            return (FrontMatter::default(), content);
        };

        let yaml_content = &rest[..end_pos];
        let remaining = rest[end_pos + 4..].trim_start_matches(['\n', '\r']);

        if yaml_content.trim().is_empty() {
            return (FrontMatter::default(), remaining);
        }

        // A `---` fenced block with no `key: value` line is a markdown rule, not metadata
        let has_yaml_structure = yaml_content.lines().any(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                return false;
            }
            let Some(colon_pos) = trimmed.find(':') else {
                return false;
            };
            let key = &trimmed[..colon_pos];
            let is_valid_key = !key.is_empty()
                && key
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
                && !matches!(key, "http" | "https" | "ftp");
            let after_colon = &trimmed[colon_pos + 1..];
            is_valid_key && (after_colon.is_empty() || after_colon.starts_with(' '))
        });

        if !has_yaml_structure {
            return (FrontMatter::default(), content);
        }

        match serde_yaml::from_str::<FrontMatter>(yaml_content) {
            Ok(fm) => (fm, remaining),
            Err(e) => {
                tracing::warn!(
                    "Failed to parse YAML front-matter, treating as content: {}",
                    e
                );
                (FrontMatter::default(), content)
            }
        }
    }

    fn parse_json(content: &str) -> Result<(Self, &str)> {
        if let Some(rest) = content.strip_prefix(";;;") {
            let end_pos = rest
                .find(";;;")
                .ok_or(ContentError::UnterminatedFrontMatter)?;
            let fm: FrontMatter = serde_json::from_str(&rest[..end_pos])?;
            let remaining = rest[end_pos + 3..].trim_start_matches(['\n', '\r']);
            return Ok((fm, remaining));
        }

        // Leading JSON object; find its matching closing brace
        let mut depth = 0;
        let mut in_string = false;
        let mut escaped = false;
        for (i, c) in content.char_indices() {
            if in_string {
                match c {
                    _ if escaped => escaped = false,
                    '\\' => escaped = true,
                    '"' => in_string = false,
                    _ => {}
                }
                continue;
            }
            match c {
                '"' => in_string = true,
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        let fm: FrontMatter = serde_json::from_str(&content[..=i])?;
                        let remaining = content[i + 1..].trim_start_matches(['\n', '\r']);
                        return Ok((fm, remaining));
                    }
                }
                _ => {}
            }
        }

        Err(ContentError::UnterminatedFrontMatter)
    }

    /// Parse the `date` field. `Ok(None)` when the field is absent.
    pub fn parse_date(&self) -> Result<Option<DateTime<Utc>>> {
        match &self.date {
            Some(s) => parse_date_string(s)
                .map(Some)
                .ok_or_else(|| ContentError::InvalidDate(s.clone())),
            None => Ok(None),
        }
    }
}

/// Parse a date string in various formats. Values without an offset are UTC.
pub fn parse_date_string(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%d %H:%M:%S%z", "%Y-%m-%d %H:%M:%S %z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
date: 2024-01-15 10:30:00
tags:
  - rust
  - blog
categories:
  - programming
---

This is the content.
"#;

        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, Some("Hello World".to_string()));
        assert_eq!(fm.tags, vec!["rust", "blog"]);
        assert_eq!(fm.categories, vec!["programming"]);
        assert!(remaining.contains("This is the content."));
    }

    #[test]
    fn test_parse_json_frontmatter() {
        let content = r#"{"title": "Test {Post}", "tags": ["a", "b"]}

This is content.
"#;

        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, Some("Test {Post}".to_string()));
        assert_eq!(fm.tags, vec!["a", "b"]);
        assert!(remaining.starts_with("This is content."));
    }

    #[test]
    fn test_parse_fenced_json_frontmatter() {
        let content = ";;;\n{\"categories\": \"notes\"}\n;;;\nBody";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.categories, vec!["notes"]);
        assert_eq!(remaining, "Body");
    }

    #[test]
    fn test_unterminated_json_is_error() {
        assert!(FrontMatter::parse("{\"title\": \"x\"").is_err());
    }

    #[test]
    fn test_single_string_tags() {
        let content = "---\ntitle: One\ntags: Notes\ncategories: Blog\n---\nBody\n";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.tags, vec!["Notes"]);
        assert_eq!(fm.categories, vec!["Blog"]);
    }

    #[test]
    fn test_missing_and_malformed_lists_are_empty() {
        let content = "---\ntitle: One\ntags:\ncategories:\n  nested: map\n---\nBody\n";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert!(fm.tags.is_empty());
        assert!(fm.categories.is_empty());

        let content = "---\ntitle: Two\ntags: [rust, 42, web]\n---\nBody\n";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.tags, vec!["rust", "web"]);
    }

    #[test]
    fn test_markdown_separator_not_yaml() {
        let content = "\n---\n\nSome text with a list:\n- Item 1\n\n---\nMore content.\n";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, None);
        assert!(remaining.contains("Some text"));
    }

    #[test]
    fn test_url_line_not_yaml() {
        let content = "---\nSee https://example.com/path\n---\nMore.\n";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, None);
        assert!(remaining.contains("https://example.com"));
    }

    #[test]
    fn test_parse_date() {
        let fm = FrontMatter {
            date: Some("2024-03-05".to_string()),
            ..Default::default()
        };
        let dt = fm.parse_date().unwrap().unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-03-05T00:00:00+00:00");

        let fm = FrontMatter {
            date: Some("2024-01-15T10:30:00+02:00".to_string()),
            ..Default::default()
        };
        let dt = fm.parse_date().unwrap().unwrap();
        assert_eq!(dt.format("%H:%M").to_string(), "08:30");
    }

    #[test]
    fn test_missing_date_is_none() {
        assert!(FrontMatter::default().parse_date().unwrap().is_none());
    }

    #[test]
    fn test_malformed_date_is_error() {
        let fm = FrontMatter {
            date: Some("next tuesday".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            fm.parse_date(),
            Err(ContentError::InvalidDate(value)) if value == "next tuesday"
        ));
    }
}
