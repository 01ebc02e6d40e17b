//! quire: a small static blog generator
//!
//! Markdown posts and pages are loaded from the input directory, indexed
//! into collections (posts, categories, tags) and rendered with Tera
//! templates into the output directory.

pub mod collections;
pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod server;
pub mod templates;
pub mod theme;

use anyhow::Result;
use std::path::{Component, Path, PathBuf};

/// Configuration file name, relative to the base directory
pub const CONFIG_FILE: &str = "_config.yml";

/// A site rooted at a base directory
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Input (content) directory
    pub input_dir: PathBuf,
    /// Output directory
    pub output_dir: PathBuf,
    /// Template override directory, inside the input directory
    pub includes_dir: PathBuf,
}

impl Site {
    /// Open a site, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Self::with_config(base_dir, config)
    }

    /// Open a site with an explicit configuration.
    ///
    /// The output directory is deleted on every build, so it may not be the
    /// base or input directory or contain either of them.
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let input_dir = base_dir.join(&config.dir.input);
        let output_dir = base_dir.join(&config.dir.output);
        let includes_dir = input_dir.join(&config.dir.includes);

        let output = normalize(&output_dir);
        if normalize(&base_dir).starts_with(&output) || normalize(&input_dir).starts_with(&output) {
            anyhow::bail!(
                "Output directory {:?} would contain the site sources",
                config.dir.output
            );
        }

        Ok(Self {
            config,
            base_dir,
            input_dir,
            output_dir,
            includes_dir,
        })
    }

    /// Path of the configuration file
    pub fn config_path(&self) -> PathBuf {
        self.base_dir.join(CONFIG_FILE)
    }

    /// Generate the static site
    pub fn build(&self) -> Result<()> {
        commands::build::run(self)
    }

    /// Delete the output directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Create a new post, returning its path
    pub fn new_post(&self, title: &str) -> Result<PathBuf> {
        commands::new::create_post(self, title)
    }
}

/// Resolve `.` and `..` lexically so paths can be compared without touching the disk
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_site_defaults_without_config() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();
        assert_eq!(site.input_dir, dir.path().join("src"));
        assert_eq!(site.output_dir, dir.path().join("_site"));
        assert_eq!(site.includes_dir, dir.path().join("src").join("_includes"));
    }

    #[test]
    fn test_site_reads_config_dirs() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "title: Notes\ndir:\n  input: content\n  output: public\n",
        )
        .unwrap();

        let site = Site::new(dir.path()).unwrap();
        assert_eq!(site.config.title, "Notes");
        assert_eq!(site.input_dir, dir.path().join("content"));
        assert_eq!(site.output_dir, dir.path().join("public"));
    }
}
