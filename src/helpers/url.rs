//! URL helper functions

use chrono::{DateTime, Datelike, TimeZone};
use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

lazy_static! {
    static ref NON_SLUG: Regex = Regex::new(r"[^A-Za-z0-9_\s-]").unwrap();
    static ref SPACES: Regex = Regex::new(r"\s+").unwrap();
    static ref HYPHENS: Regex = Regex::new(r"-+").unwrap();
    static ref DATE_PREFIX: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}-").unwrap();
}

/// URL-friendly form of a name
///
/// # Examples
/// ```ignore
/// slugify("Hello, World!  Foo") // -> "hello-world-foo"
/// ```
pub fn slugify(s: &str) -> String {
    let lower = s.to_lowercase();
    let kept = NON_SLUG.replace_all(&lower, "");
    let dashed = SPACES.replace_all(&kept, "-");
    let collapsed = HYPHENS.replace_all(&dashed, "-");
    collapsed.trim().to_string()
}

/// Post URL of the form `/YYYY/MM/slug/`
pub fn permalink<Tz: TimeZone>(date: &DateTime<Tz>, slug: &str) -> String {
    format!("/{}/{:02}/{}/", date.year(), date.month(), slug)
}

/// Slug taken from a content file name
///
/// A leading `YYYY-MM-DD-` is dropped, and `index` files take the name of
/// their parent directory.
pub fn file_slug(path: &Path) -> String {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");

    let name = if stem == "index" {
        path.parent()
            .and_then(|p| p.file_name())
            .and_then(|s| s.to_str())
            .unwrap_or("")
    } else {
        stem
    };

    DATE_PREFIX.replace(name, "").into_owned()
}

/// Join a site-relative path onto the site URL
///
/// # Examples
/// ```ignore
/// absolute_url("/2024/03/post/", "https://example.com/") // -> "https://example.com/2024/03/post/"
/// ```
pub fn absolute_url(path: &str, base: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") || path.starts_with("//") {
        return path.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Rewrite root-relative `href`/`src` attributes to absolute URLs
pub fn html_to_absolute_urls(content: &str, base: &str) -> String {
    let base = base.trim_end_matches('/');
    content
        .replace("href=\"/", &format!("href=\"{}/", base))
        .replace("src=\"/", &format!("src=\"{}/", base))
        .replace("href='/", &format!("href='{}/", base))
        .replace("src='/", &format!("src='{}/", base))
        // Protocol-relative URLs were caught by the rules above
        .replace(&format!("=\"{}//", base), "=\"//")
        .replace(&format!("='{}//", base), "='//")
}
