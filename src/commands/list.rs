//! List site content

use anyhow::Result;
use std::fmt::Write;

use crate::collections::Collections;
use crate::content::ContentLoader;
use crate::Site;

/// Print the indexed content of one kind
pub fn run(site: &Site, content_type: &str) -> Result<()> {
    print!("{}", render(site, content_type)?);
    Ok(())
}

/// Listing text for `post`, `page`, `category` or `tag`
pub fn render(site: &Site, content_type: &str) -> Result<String> {
    let documents = ContentLoader::new(site)?.load()?;
    let post_tag = &site.config.post_tag;
    let collections = Collections::build(&documents, post_tag);
    let mut out = String::new();

    match content_type {
        "post" | "posts" => {
            writeln!(out, "Posts ({}):", collections.posts.len())?;
            for post in &collections.posts {
                writeln!(
                    out,
                    "  {} - {} [{}]",
                    post.date.format("%Y-%m-%d"),
                    post.title,
                    post.source
                )?;
            }
        }
        "page" | "pages" => {
            let pages: Vec<_> = documents.iter().filter(|d| !d.has_tag(post_tag)).collect();
            writeln!(out, "Pages ({}):", pages.len())?;
            for page in pages {
                writeln!(out, "  {} [{}]", page.title, page.source)?;
            }
        }
        "category" | "categories" => {
            writeln!(out, "Categories ({}):", collections.category_list.len())?;
            for name in &collections.category_list {
                let count = collections.categories.get(name).map_or(0, Vec::len);
                writeln!(out, "  {} ({})", name, count)?;
            }
        }
        "tag" | "tags" => {
            writeln!(out, "Tags ({}):", collections.tag_list.len())?;
            for name in &collections.tag_list {
                let count = collections.tags.get(name).map_or(0, Vec::len);
                writeln!(out, "  {} ({})", name, count)?;
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, page, category, tag",
                content_type
            );
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(dir: &Path, relative: &str, content: &str) {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn site() -> (TempDir, Site) {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "src/posts/a.md",
            "---\ntitle: Older\ndate: 2024-01-01\ncategories: [web]\ntags: [rust]\n---\nx\n",
        );
        write(
            dir.path(),
            "src/posts/b.md",
            "---\ntitle: Newer\ndate: 2024-02-01\ncategories: [web, cli]\ntags: [rust]\n---\nx\n",
        );
        write(dir.path(), "src/about.md", "---\ntitle: About\n---\nx\n");
        let site = Site::new(dir.path()).unwrap();
        (dir, site)
    }

    #[test]
    fn test_list_posts() {
        let (_dir, site) = site();
        let out = render(&site, "post").unwrap();
        assert_eq!(
            out,
            "Posts (2):\n  2024-02-01 - Newer [posts/b.md]\n  2024-01-01 - Older [posts/a.md]\n"
        );
    }

    #[test]
    fn test_list_categories_and_tags() {
        let (_dir, site) = site();
        assert_eq!(
            render(&site, "category").unwrap(),
            "Categories (2):\n  cli (1)\n  web (2)\n"
        );
        assert_eq!(render(&site, "tags").unwrap(), "Tags (1):\n  rust (2)\n");
    }

    #[test]
    fn test_list_pages() {
        let (_dir, site) = site();
        assert_eq!(render(&site, "page").unwrap(), "Pages (1):\n  About [about.md]\n");
    }

    #[test]
    fn test_unknown_type() {
        let (_dir, site) = site();
        assert!(render(&site, "route").is_err());
    }
}
