//! Document model

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// Computed fields that custom front-matter keys may not shadow
pub const RESERVED_FIELDS: &[&str] = &[
    "file_slug",
    "source",
    "full_source",
    "url",
    "raw",
    "content",
];

/// A content entry (post or page) after loading.
///
/// `categories` and `tags` are always present; documents without them in
/// front-matter carry empty lists.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    /// Title from front-matter, or the file stem
    pub title: String,

    /// Publication date
    pub date: DateTime<Utc>,

    /// Categories in front-matter order
    pub categories: Vec<String>,

    /// Tags in front-matter order, including the post tag for posts
    pub tags: Vec<String>,

    /// Layout template to use
    pub layout: String,

    /// Slug derived from the file name
    pub file_slug: String,

    /// Source file path (relative to the input dir)
    pub source: String,

    /// Full source file path
    pub full_source: PathBuf,

    /// Site-relative URL, e.g. `/2024/03/my-post/`
    pub url: String,

    /// Raw markdown body
    pub raw: String,

    /// Rendered HTML content
    pub content: String,

    /// Custom front-matter fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Document {
    /// Create a document with minimal required fields
    pub fn new(title: String, date: DateTime<Utc>, source: String) -> Self {
        Self {
            title,
            date,
            categories: Vec::new(),
            tags: Vec::new(),
            layout: "page".to_string(),
            file_slug: String::new(),
            full_source: PathBuf::from(&source),
            source,
            url: String::new(),
            raw: String::new(),
            content: String::new(),
            extra: HashMap::new(),
        }
    }

    /// Whether the document carries `tag`
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Whether the document is filed under `category`
    pub fn in_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    /// Output file path relative to the output dir
    pub fn output_path(&self) -> PathBuf {
        let url = self.url.trim_start_matches('/');
        if url.is_empty() {
            PathBuf::from("index.html")
        } else if url.ends_with('/') {
            PathBuf::from(url).join("index.html")
        } else {
            PathBuf::from(url)
        }
    }

    /// Get the previous (newer) document in a date-sorted list
    pub fn prev<'a>(&self, docs: &[&'a Document]) -> Option<&'a Document> {
        let pos = docs.iter().position(|d| d.source == self.source)?;
        if pos > 0 {
            Some(docs[pos - 1])
        } else {
            None
        }
    }

    /// Get the next (older) document in a date-sorted list
    pub fn next<'a>(&self, docs: &[&'a Document]) -> Option<&'a Document> {
        let pos = docs.iter().position(|d| d.source == self.source)?;
        docs.get(pos + 1).copied()
    }
}
