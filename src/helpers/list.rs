//! List helper functions

use crate::content::Document;

/// First `n` items of a list
pub fn limit<T>(items: &[T], n: usize) -> &[T] {
    &items[..n.min(items.len())]
}

/// Posts filed under `category`, in their existing order
pub fn posts_by_category<'a>(posts: &[&'a Document], category: &str) -> Vec<&'a Document> {
    posts
        .iter()
        .copied()
        .filter(|post| post.in_category(category))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn post(name: &str, categories: &[&str]) -> Document {
        let date = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut doc = Document::new(name.to_string(), date, format!("{}.md", name));
        doc.categories = categories.iter().map(|c| c.to_string()).collect();
        doc
    }

    #[test]
    fn test_limit() {
        let items = [1, 2, 3];
        assert_eq!(limit(&items, 2), &[1, 2]);
        assert_eq!(limit(&items, 10), &[1, 2, 3]);
        assert!(limit(&items, 0).is_empty());
    }

    #[test]
    fn test_posts_by_category() {
        let a = post("a", &["rust", "web"]);
        let b = post("b", &[]);
        let c = post("c", &["rust"]);
        let posts = vec![&a, &b, &c];

        let titles: Vec<_> = posts_by_category(&posts, "rust")
            .iter()
            .map(|p| p.title.as_str())
            .collect();
        assert_eq!(titles, vec!["a", "c"]);
        assert!(posts_by_category(&posts, "missing").is_empty());
    }
}
