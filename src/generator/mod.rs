//! Generator module - renders documents and collections into the output directory

mod feed;

pub use feed::render_atom;

use anyhow::{Context as _, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tera::Context;
use walkdir::WalkDir;

use crate::collections::Collections;
use crate::content::Document;
use crate::helpers::{posts_by_category, slugify};
use crate::templates::{NavPost, SiteData, TemplateRenderer, THEME_SCRIPT, THEME_SCRIPT_PATH};
use crate::theme::ThemePreference;
use crate::Site;

/// Static site generator using Tera templates
pub struct Generator<'a> {
    site: &'a Site,
    renderer: TemplateRenderer,
    output_dir: PathBuf,
}

impl<'a> Generator<'a> {
    /// Create a generator writing into `output_dir`
    pub fn new(site: &'a Site, output_dir: impl Into<PathBuf>) -> Result<Self> {
        let renderer = TemplateRenderer::with_overrides(&site.config, &site.includes_dir)?;

        Ok(Self {
            site,
            renderer,
            output_dir: output_dir.into(),
        })
    }

    /// Generate the entire site. Returns the number of files written.
    pub fn generate(&self, documents: &[Document]) -> Result<usize> {
        fs::create_dir_all(&self.output_dir)?;

        let mut written = self.copy_passthrough()?;
        written += self.write_theme_script()?;

        let collections = Collections::build(documents, &self.site.config.post_tag);
        let base = self.base_context(&collections)?;

        let pages: Vec<&Document> = documents
            .iter()
            .filter(|d| !d.has_tag(&self.site.config.post_tag))
            .collect();

        written += self.generate_posts(&collections, &base)?;
        written += self.generate_pages(&pages, &base)?;

        if pages.iter().any(|p| p.url == "/") {
            tracing::debug!("Home page supplied by content, skipping index.html");
        } else {
            written += self.generate_index(&base)?;
        }

        written += self.generate_category_pages(&collections, &base)?;
        written += self.generate_tag_pages(&collections, &base)?;

        if self.site.config.feed.enable {
            written += self.generate_feed(&collections)?;
        }

        Ok(written)
    }

    /// Variables shared by every page
    fn base_context(&self, collections: &Collections) -> Result<Context> {
        let config = &self.site.config;
        let theme =
            ThemePreference::load(config.theme.default.as_deref(), config.theme.prefers_dark);

        let mut context = Context::new();
        context.insert("site", &SiteData::from_config(config));
        context.insert(
            "collections",
            &tera::to_value(collections).context("Failed to serialize collections")?,
        );
        context.insert("theme", theme.current().as_str());
        context.insert("theme_script", THEME_SCRIPT_PATH);
        Ok(context)
    }

    /// Render each post at its permalink, with links to its neighbours
    fn generate_posts(&self, collections: &Collections, base: &Context) -> Result<usize> {
        let posts = &collections.posts;

        for post in posts {
            let mut context = base.clone();
            context.insert("page", post);
            context.insert("current_url", &post.url);
            // Posts are newest first: the older neighbour comes after
            if let Some(older) = post.next(posts) {
                context.insert("prev_post", &NavPost::from(older));
            }
            if let Some(newer) = post.prev(posts) {
                context.insert("next_post", &NavPost::from(newer));
            }

            let template = self.template_for(post, "post.html");
            let html = self.renderer.render(&template, &context)?;
            self.write_output(&post.output_path(), html)?;
        }

        tracing::info!("Generated {} posts", posts.len());
        Ok(posts.len())
    }

    /// Render standalone pages
    fn generate_pages(&self, pages: &[&Document], base: &Context) -> Result<usize> {
        for page in pages {
            let mut context = base.clone();
            context.insert("page", page);
            context.insert("current_url", &page.url);

            let template = self.template_for(page, "page.html");
            let html = self.renderer.render(&template, &context)?;
            self.write_output(&page.output_path(), html)?;
        }

        tracing::info!("Generated {} pages", pages.len());
        Ok(pages.len())
    }

    fn generate_index(&self, base: &Context) -> Result<usize> {
        let mut context = base.clone();
        context.insert("current_url", "/");

        let html = self.renderer.render("index.html", &context)?;
        self.write_output(Path::new("index.html"), html)?;
        Ok(1)
    }

    /// `/<category_dir>/` plus one page per category
    fn generate_category_pages(
        &self,
        collections: &Collections,
        base: &Context,
    ) -> Result<usize> {
        let dir = self.site.config.category_dir.trim_matches('/');
        let mut written = self.render_listing("categories.html", dir, base)?;
        let mut seen = HashSet::new();

        for name in &collections.category_list {
            let Some(slug) = unique_slug(name, &mut seen) else {
                continue;
            };
            let posts = posts_by_category(&collections.posts, name);

            let mut context = base.clone();
            context.insert("name", name);
            context.insert("posts", &posts);
            written += self.render_term("category.html", dir, &slug, context)?;
        }

        tracing::info!("Generated {} category pages", collections.category_list.len());
        Ok(written)
    }

    /// `/<tag_dir>/` plus one page per tag
    fn generate_tag_pages(&self, collections: &Collections, base: &Context) -> Result<usize> {
        let dir = self.site.config.tag_dir.trim_matches('/');
        let mut written = self.render_listing("tags.html", dir, base)?;
        let mut seen = HashSet::new();

        for (name, posts) in &collections.tags {
            let Some(slug) = unique_slug(name, &mut seen) else {
                continue;
            };

            let mut context = base.clone();
            context.insert("name", name);
            context.insert("posts", posts);
            written += self.render_term("tag.html", dir, &slug, context)?;
        }

        tracing::info!("Generated {} tag pages", collections.tags.len());
        Ok(written)
    }

    fn render_listing(&self, template: &str, dir: &str, base: &Context) -> Result<usize> {
        let mut context = base.clone();
        context.insert("current_url", &format!("/{}/", dir));

        let html = self.renderer.render(template, &context)?;
        self.write_output(&Path::new(dir).join("index.html"), html)?;
        Ok(1)
    }

    fn render_term(
        &self,
        template: &str,
        dir: &str,
        slug: &str,
        mut context: Context,
    ) -> Result<usize> {
        context.insert("current_url", &format!("/{}/{}/", dir, slug));

        let html = self.renderer.render(template, &context)?;
        self.write_output(&Path::new(dir).join(slug).join("index.html"), html)?;
        Ok(1)
    }

    fn generate_feed(&self, collections: &Collections) -> Result<usize> {
        let feed = render_atom(&self.site.config, &collections.posts, chrono::Utc::now());
        let path = self.site.config.feed.path.trim_start_matches('/');
        self.write_output(Path::new(path), feed)?;
        tracing::info!("Generated {}", path);
        Ok(1)
    }

    /// Template for a document's layout, falling back when it is not loaded
    fn template_for(&self, doc: &Document, fallback: &str) -> String {
        let name = format!("{}.html", doc.layout);
        if self.renderer.has_template(&name) {
            name
        } else {
            tracing::warn!(
                "Layout {:?} not found for {}, using {}",
                doc.layout,
                doc.source,
                fallback
            );
            fallback.to_string()
        }
    }

    /// Copy passthrough files and directories verbatim
    fn copy_passthrough(&self) -> Result<usize> {
        let mut copied = 0;

        for entry in &self.site.config.passthrough {
            let source = self.site.input_dir.join(entry);
            if !source.exists() {
                tracing::debug!("Passthrough {:?} not found, skipping", source);
                continue;
            }

            for file in WalkDir::new(&source).follow_links(true) {
                let file = file?;
                if !file.file_type().is_file() {
                    continue;
                }

                let relative = file.path().strip_prefix(&self.site.input_dir)?;
                let dest = self.output_dir.join(relative);
                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(file.path(), &dest)
                    .with_context(|| format!("Failed to copy {:?}", file.path()))?;
                copied += 1;
            }
        }

        tracing::debug!("Copied {} passthrough files", copied);
        Ok(copied)
    }

    /// Write the theme toggle script unless the site ships its own
    fn write_theme_script(&self) -> Result<usize> {
        let dest = self.output_dir.join(THEME_SCRIPT_PATH);
        if dest.exists() {
            return Ok(0);
        }
        self.write_output(Path::new(THEME_SCRIPT_PATH), THEME_SCRIPT.to_string())?;
        Ok(1)
    }

    fn write_output(&self, relative: &Path, content: String) -> Result<()> {
        let output_path = self.output_dir.join(relative);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create dir {:?}", parent))?;
        }
        fs::write(&output_path, content)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }
}

/// Slug for a category or tag page; `None` when empty or already taken
fn unique_slug(name: &str, seen: &mut HashSet<String>) -> Option<String> {
    let slug = slugify(name);
    if slug.is_empty() {
        tracing::warn!("Skipping {:?}: empty slug", name);
        return None;
    }
    if !seen.insert(slug.clone()) {
        tracing::warn!("Skipping {:?}: slug {:?} already used", name, slug);
        return None;
    }
    Some(slug)
}
