//! Tera templates with an embedded default theme
//!
//! The default templates are compiled into the binary. HTML files in the
//! site's includes directory are loaded on top and replace the embedded
//! template with the same name.

use anyhow::{Context as _, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tera::{Context, Tera, Value};
use walkdir::WalkDir;

use crate::config::SiteConfig;
use crate::content::{parse_date_string, Document};
use crate::helpers;

/// Browser script driving the light/dark toggle
pub const THEME_SCRIPT: &str = include_str!("default/theme.js");

/// Output path of the theme script, relative to the output dir
pub const THEME_SCRIPT_PATH: &str = "assets/js/theme.js";

const DEFAULT_TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("default/base.html")),
    ("macros.html", include_str!("default/macros.html")),
    ("index.html", include_str!("default/index.html")),
    ("post.html", include_str!("default/post.html")),
    ("page.html", include_str!("default/page.html")),
    ("categories.html", include_str!("default/categories.html")),
    ("category.html", include_str!("default/category.html")),
    ("tags.html", include_str!("default/tags.html")),
    ("tag.html", include_str!("default/tag.html")),
];

/// Template renderer
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a renderer with the embedded templates only
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let mut tera = Tera::default();

        // Content is already HTML; templates escape text explicitly
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(DEFAULT_TEMPLATES.iter().copied())
            .context("Failed to load built-in templates")?;

        register_filters(&mut tera, config);
        tera.register_function("year", year_function);

        Ok(Self { tera })
    }

    /// Create a renderer and load overrides from `includes_dir`
    pub fn with_overrides(config: &SiteConfig, includes_dir: &Path) -> Result<Self> {
        let mut renderer = Self::new(config)?;
        let count = renderer.load_overrides(includes_dir)?;
        if count > 0 {
            tracing::info!("Loaded {} template(s) from {:?}", count, includes_dir);
        }
        Ok(renderer)
    }

    /// Load every `.html` file under `dir`, named by its relative path
    fn load_overrides(&mut self, dir: &Path) -> Result<usize> {
        if !dir.is_dir() {
            return Ok(0);
        }

        let mut files: Vec<(PathBuf, Option<String>)> = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some("html")
            {
                continue;
            }
            let name = path
                .strip_prefix(dir)?
                .to_string_lossy()
                .replace('\\', "/");
            tracing::debug!("Template override: {}", name);
            files.push((path.to_path_buf(), Some(name)));
        }

        let count = files.len();
        self.tera
            .add_template_files(files)
            .with_context(|| format!("Failed to load templates from {:?}", dir))?;
        Ok(count)
    }

    /// Whether a template with this name is loaded
    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        self.tera
            .render(template_name, context)
            .with_context(|| format!("Failed to render {}", template_name))
    }
}

fn register_filters(tera: &mut Tera, config: &SiteConfig) {
    tera.register_filter("date_display", date_display_filter);
    tera.register_filter("date_iso", date_iso_filter);
    tera.register_filter("date_rfc2822", date_rfc2822_filter);
    tera.register_filter("limit", limit_filter);
    tera.register_filter("slugify", slugify_filter);
    tera.register_filter("posts_by_category", posts_by_category_filter);

    let excerpt_length = config.excerpt_length;
    tera.register_filter(
        "excerpt",
        move |value: &Value, args: &HashMap<String, Value>| -> tera::Result<Value> {
            let s = tera::try_get_value!("excerpt", "value", String, value);
            let length = match args.get("length") {
                Some(val) => tera::try_get_value!("excerpt", "length", usize, val),
                None => excerpt_length,
            };
            Ok(Value::String(helpers::excerpt(&s, length)))
        },
    );

    let site_url = config.url.clone();
    tera.register_filter(
        "absolute_url",
        move |value: &Value, args: &HashMap<String, Value>| -> tera::Result<Value> {
            let path = tera::try_get_value!("absolute_url", "value", String, value);
            let base = match args.get("base") {
                Some(val) => tera::try_get_value!("absolute_url", "base", String, val),
                None => site_url.clone(),
            };
            Ok(Value::String(helpers::absolute_url(&path, &base)))
        },
    );
}

/// Dates reach templates as RFC 3339 strings
fn date_value(filter: &str, value: &Value) -> tera::Result<DateTime<Utc>> {
    let s = tera::try_get_value!(filter, "value", String, value);
    parse_date_string(&s).ok_or_else(|| {
        tera::Error::msg(format!("Filter `{}` got an invalid date {:?}", filter, s))
    })
}

/// Tera filter: "March 5, 2024"
fn date_display_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let date = date_value("date_display", value)?;
    Ok(Value::String(helpers::date_display(&date)))
}

fn date_iso_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let date = date_value("date_iso", value)?;
    Ok(Value::String(helpers::date_iso(&date)))
}

fn date_rfc2822_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let date = date_value("date_rfc2822", value)?;
    Ok(Value::String(helpers::date_rfc2822(&date)))
}

/// Tera function: `{{ year() }}`
fn year_function(_args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::from(helpers::current_year()))
}

/// Tera filter: first `n` items of an array
fn limit_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let items = tera::try_get_value!("limit", "value", Vec<Value>, value);
    let n = match args.get("n") {
        Some(val) => tera::try_get_value!("limit", "n", usize, val),
        None => return Err(tera::Error::msg("Filter `limit` expected an arg called `n`")),
    };
    Ok(Value::Array(helpers::limit(&items, n).to_vec()))
}

/// Tera filter: URL slug
fn slugify_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = tera::try_get_value!("slugify", "value", String, value);
    Ok(Value::String(helpers::slugify(&s)))
}

/// Tera filter: posts filed under `category`, order kept
fn posts_by_category_filter(
    value: &Value,
    args: &HashMap<String, Value>,
) -> tera::Result<Value> {
    let posts = tera::try_get_value!("posts_by_category", "value", Vec<Value>, value);
    let category = match args.get("category") {
        Some(val) => tera::try_get_value!("posts_by_category", "category", String, val),
        None => {
            return Err(tera::Error::msg(
                "Filter `posts_by_category` expected an arg called `category`",
            ))
        }
    };

    let matching = posts
        .into_iter()
        .filter(|post| {
            post.get("categories")
                .and_then(Value::as_array)
                .map(|cats| cats.iter().any(|c| c.as_str() == Some(category.as_str())))
                .unwrap_or(false)
        })
        .collect();
    Ok(Value::Array(matching))
}

/// Site-wide values available as `site` in every template
#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub url: String,
    pub feed_url: Option<String>,
    pub category_dir: String,
    pub tag_dir: String,
    pub post_tag: String,
}

impl SiteData {
    pub fn from_config(config: &SiteConfig) -> Self {
        let feed_url = config
            .feed
            .enable
            .then(|| format!("/{}", config.feed.path.trim_start_matches('/')));

        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            language: config.language.clone(),
            url: config.url.clone(),
            feed_url,
            category_dir: config.category_dir.trim_matches('/').to_string(),
            tag_dir: config.tag_dir.trim_matches('/').to_string(),
            post_tag: config.post_tag.clone(),
        }
    }
}

/// Link to a neighbouring post
#[derive(Debug, Clone, Serialize)]
pub struct NavPost {
    pub title: String,
    pub url: String,
}

impl From<&Document> for NavPost {
    fn from(doc: &Document) -> Self {
        Self {
            title: doc.title.clone(),
            url: doc.url.clone(),
        }
    }
}
