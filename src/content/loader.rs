//! Content loader - loads posts and pages from the input directory

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use glob::{MatchOptions, Pattern};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::{Document, FrontMatter, MarkdownRenderer, RESERVED_FIELDS};
use crate::helpers::{file_slug, permalink};
use crate::Site;

const GLOB_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Loads documents from the input directory
pub struct ContentLoader<'a> {
    site: &'a Site,
    renderer: MarkdownRenderer,
    posts_pattern: Pattern,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(site: &'a Site) -> Result<Self> {
        let renderer = MarkdownRenderer::with_options(
            site.config.markdown.clone(),
            site.config.highlight.clone(),
        );
        let posts_pattern = Pattern::new(&site.config.posts_glob)
            .with_context(|| format!("Invalid posts_glob {:?}", site.config.posts_glob))?;

        Ok(Self {
            site,
            renderer,
            posts_pattern,
        })
    }

    /// Load every markdown document (posts and pages), in file name order
    pub fn load(&self) -> Result<Vec<Document>> {
        let input_dir = &self.site.input_dir;
        if !input_dir.exists() {
            tracing::warn!("Input directory {:?} does not exist", input_dir);
            return Ok(Vec::new());
        }

        let mut documents = Vec::new();

        let walker = WalkDir::new(input_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !self.is_skipped(e.path()));

        for entry in walker {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_file() || !is_markdown_file(path) {
                continue;
            }

            let relative = path.strip_prefix(input_dir).unwrap_or(path);
            let is_post = self
                .posts_pattern
                .matches_path_with(relative, GLOB_OPTIONS);

            let document = self
                .load_document(path, relative, is_post)
                .with_context(|| format!("Failed to load {:?}", path))?;
            documents.push(document);
        }

        Ok(documents)
    }

    /// Whether a path is excluded from content loading: `_`/`.` prefixed
    /// entries, passthrough entries, and the output directory
    fn is_skipped(&self, path: &Path) -> bool {
        if path.starts_with(&self.site.output_dir) {
            return true;
        }

        let Ok(relative) = path.strip_prefix(&self.site.input_dir) else {
            return false;
        };

        let hidden = relative.components().any(|c| {
            c.as_os_str()
                .to_str()
                .map(|s| s.starts_with('_') || s.starts_with('.'))
                .unwrap_or(false)
        });

        hidden
            || self
                .site
                .config
                .passthrough
                .iter()
                .any(|p| relative.starts_with(p))
    }

    /// Load a single document from a file
    fn load_document(&self, path: &Path, relative: &Path, is_post: bool) -> Result<Document> {
        let content = fs::read_to_string(path)?;
        let (fm, body) = FrontMatter::parse(&content)?;

        let date = match fm.parse_date()? {
            Some(date) => date,
            None => file_modified(path).unwrap_or_else(Utc::now),
        };

        let slug = file_slug(path);
        let title = fm.title.clone().unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Untitled")
                .to_string()
        });

        let source = relative.to_string_lossy().replace('\\', "/");

        let mut tags = fm.tags;
        let post_tag = &self.site.config.post_tag;
        if is_post && !tags.iter().any(|t| t == post_tag) {
            tags.insert(0, post_tag.clone());
        }

        let url = match fm.permalink.as_deref() {
            Some(custom) => normalize_permalink(custom),
            None if is_post => permalink(&date, &slug),
            None => page_url(&source),
        };

        let default_layout = if is_post { "post" } else { "page" };

        let mut doc = Document::new(title, date, source);
        doc.categories = fm.categories;
        doc.tags = tags;
        doc.layout = fm.layout.unwrap_or_else(|| default_layout.to_string());
        doc.file_slug = slug;
        doc.full_source = path.to_path_buf();
        doc.url = url;
        doc.content = self.renderer.render(body);
        doc.raw = body.to_string();
        doc.extra = fm.extra;
        for key in RESERVED_FIELDS {
            if doc.extra.remove(*key).is_some() {
                tracing::warn!("{}: ignoring reserved front-matter key `{}`", doc.source, key);
            }
        }

        tracing::debug!("Loaded {} -> {}", doc.source, doc.url);

        Ok(doc)
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

fn file_modified(path: &Path) -> Option<DateTime<Utc>> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .map(DateTime::<Utc>::from)
}

/// URL for a page from its source path: `about.md` -> `/about/`,
/// `docs/index.md` -> `/docs/`
fn page_url(source: &str) -> String {
    let without_ext = source
        .trim_end_matches(".md")
        .trim_end_matches(".markdown");

    let path = if without_ext == "index" {
        ""
    } else {
        without_ext.strip_suffix("/index").unwrap_or(without_ext)
    };

    if path.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", path)
    }
}

fn normalize_permalink(permalink: &str) -> String {
    format!("/{}", permalink.trim().trim_start_matches('/'))
}
