//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::collections::POST_TAG;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,
    pub category_dir: String,
    pub tag_dir: String,

    // Directory
    #[serde(default)]
    pub dir: DirConfig,
    /// Glob (relative to the input dir) selecting post files
    pub posts_glob: String,
    /// Tag that marks a document as a post
    pub post_tag: String,
    /// Files and directories copied verbatim from input to output
    #[serde(default)]
    pub passthrough: Vec<String>,

    // Writing
    pub excerpt_length: usize,
    #[serde(default)]
    pub markdown: MarkdownConfig,
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Feed
    #[serde(default)]
    pub feed: FeedConfig,

    // Appearance
    #[serde(default)]
    pub theme: ThemeConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            description: String::new(),
            author: String::new(),
            language: "en".to_string(),

            url: "http://localhost:8080".to_string(),
            category_dir: "categories".to_string(),
            tag_dir: "tags".to_string(),

            dir: DirConfig::default(),
            posts_glob: "posts/**/*.md".to_string(),
            post_tag: POST_TAG.to_string(),
            passthrough: vec!["assets".to_string(), "favicon.ico".to_string()],

            excerpt_length: 200,
            markdown: MarkdownConfig::default(),
            highlight: HighlightConfig::default(),

            feed: FeedConfig::default(),
            theme: ThemeConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid configuration in {:?}", path))?;
        Ok(config)
    }
}

/// Input/output directory layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirConfig {
    pub input: String,
    pub output: String,
    /// Template overrides, relative to the input dir
    pub includes: String,
}

impl Default for DirConfig {
    fn default() -> Self {
        Self {
            input: "src".to_string(),
            output: "_site".to_string(),
            includes: "_includes".to_string(),
        }
    }
}

/// Markdown rendering options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Pass raw HTML in markdown through to the output
    pub html: bool,
    /// Render single newlines as `<br>`
    pub breaks: bool,
    /// Turn bare URLs into links
    pub linkify: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            html: true,
            breaks: true,
            linkify: true,
        }
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

/// Atom feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub enable: bool,
    pub path: String,
    pub limit: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enable: true,
            path: "feed.xml".to_string(),
            limit: 20,
        }
    }
}

/// Light/dark theme defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Theme rendered into pages before the browser script runs (`light` or `dark`)
    pub default: Option<String>,
    /// Assumed display mode when no default is set
    pub prefers_dark: bool,
}
