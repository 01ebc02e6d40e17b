//! Create a new post

use anyhow::Result;
use chrono::{DateTime, Local, TimeZone};
use std::fs;
use std::path::{Path, PathBuf};

use crate::helpers::slugify;
use crate::Site;

/// Front-matter used when the site has no `scaffolds/post.md`
const DEFAULT_SCAFFOLD: &str = r#"---
title: "{{ title }}"
date: {{ date }}
categories: []
tags: []
---
"#;

/// Create `<posts dir>/YYYY-MM-DD-<slug>.md` and return its path
pub fn create_post(site: &Site, title: &str) -> Result<PathBuf> {
    create_post_at(site, title, Local::now())
}

fn create_post_at<Tz: TimeZone>(site: &Site, title: &str, now: DateTime<Tz>) -> Result<PathBuf>
where
    Tz::Offset: std::fmt::Display,
{
    let slug = slugify(title.trim());
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", title);
    }

    let date = now.format("%Y-%m-%d").to_string();
    let target_dir = site.input_dir.join(posts_dir(&site.config.posts_glob));
    let file_path = target_dir.join(format!("{}-{}.md", date, slug));

    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let scaffold_path = site.base_dir.join("scaffolds").join("post.md");
    let scaffold = if scaffold_path.exists() {
        fs::read_to_string(&scaffold_path)?
    } else {
        DEFAULT_SCAFFOLD.to_string()
    };

    let content = scaffold
        .replace("{{ title }}", &title.replace('\\', "\\\\").replace('"', "\\\""))
        .replace("{{ date }}", &date);

    fs::create_dir_all(&target_dir)?;
    fs::write(&file_path, content)?;

    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

/// Literal directory prefix of the posts glob, e.g. `posts` for `posts/**/*.md`
fn posts_dir(glob: &str) -> PathBuf {
    Path::new(glob)
        .components()
        .take_while(|c| {
            !c.as_os_str()
                .to_string_lossy()
                .contains(['*', '?', '[', '{'])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentLoader;
    use chrono::Utc;
    use tempfile::TempDir;

    #[test]
    fn test_posts_dir() {
        assert_eq!(posts_dir("posts/**/*.md"), PathBuf::from("posts"));
        assert_eq!(posts_dir("blog/posts/*.md"), PathBuf::from("blog/posts"));
        assert_eq!(posts_dir("**/*.md"), PathBuf::new());
    }

    #[test]
    fn test_create_post() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap();

        let path = create_post_at(&site, "Hello \"Rust\" World", now).unwrap();
        assert_eq!(path, site.input_dir.join("posts/2024-03-05-hello-rust-world.md"));

        let docs = ContentLoader::new(&site).unwrap().load().unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].title, "Hello \"Rust\" World");
        assert_eq!(docs[0].url, "/2024/03/hello-rust-world/");
        assert!(docs[0].has_tag("posts"));

        assert!(create_post_at(&site, "Hello Rust World", now).is_err());
    }

    #[test]
    fn test_custom_scaffold() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("scaffolds")).unwrap();
        fs::write(
            dir.path().join("scaffolds/post.md"),
            "---\ntitle: \"{{ title }}\"\ndate: {{ date }}\nlayout: note\n---\n",
        )
        .unwrap();
        let site = Site::new(dir.path()).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap();

        let path = create_post_at(&site, "Note", now).unwrap();
        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("layout: note"));
        assert!(content.contains("date: 2024-03-05"));
    }

    #[test]
    fn test_empty_slug_rejected() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();
        assert!(create_post(&site, "???").is_err());
    }
}
