//! Content collections derived from loaded documents
//!
//! Posts are the documents carrying the post tag. Every derived view is
//! recomputed from scratch on each build, and every post sequence is
//! ordered newest first with ties kept in input order.

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeSet;

use crate::content::Document;

/// Tag that marks a document as a post unless configured otherwise
pub const POST_TAG: &str = "posts";

/// Category name -> posts in that category, newest first.
/// Keys keep the order in which they were first seen.
pub type CategoryIndex<'a> = IndexMap<String, Vec<&'a Document>>;

/// Tag name -> posts with that tag, newest first
pub type TagIndex<'a> = IndexMap<String, Vec<&'a Document>>;

/// Stable sort, newest first
fn sort_newest_first(docs: &mut [&Document]) {
    docs.sort_by(|a, b| b.date.cmp(&a.date));
}

/// All documents tagged `post_tag`, newest first
pub fn all_posts<'a>(documents: &'a [Document], post_tag: &str) -> Vec<&'a Document> {
    let mut posts: Vec<&Document> = documents.iter().filter(|d| d.has_tag(post_tag)).collect();
    sort_newest_first(&mut posts);
    posts
}

/// Group documents by each of their categories
pub fn by_category<'a>(documents: &[&'a Document]) -> CategoryIndex<'a> {
    group_by(documents, |doc| doc.categories.iter())
}

/// Group documents by each of their tags, leaving out `post_tag`
pub fn by_tag<'a>(documents: &[&'a Document], post_tag: &str) -> TagIndex<'a> {
    group_by(documents, |doc| doc.tags.iter().filter(move |t| *t != post_tag))
}

fn group_by<'a, F, I>(documents: &[&'a Document], keys: F) -> IndexMap<String, Vec<&'a Document>>
where
    F: Fn(&'a Document) -> I,
    I: Iterator<Item = &'a String>,
{
    let mut index: IndexMap<String, Vec<&'a Document>> = IndexMap::new();

    for &doc in documents {
        for key in keys(doc) {
            index.entry(key.clone()).or_default().push(doc);
        }
    }

    for bucket in index.values_mut() {
        sort_newest_first(bucket);
    }

    index
}

/// Distinct category names, sorted
pub fn category_names(documents: &[&Document]) -> Vec<String> {
    let names: BTreeSet<&String> = documents.iter().flat_map(|d| &d.categories).collect();
    names.into_iter().cloned().collect()
}

/// Distinct tag names other than `post_tag`, sorted
pub fn tag_names(documents: &[&Document], post_tag: &str) -> Vec<String> {
    let names: BTreeSet<&String> = documents
        .iter()
        .flat_map(|d| &d.tags)
        .filter(|t| *t != post_tag)
        .collect();
    names.into_iter().cloned().collect()
}

/// Named collections handed to templates
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Collections<'a> {
    /// `posts`: every post, newest first
    pub posts: Vec<&'a Document>,
    /// `categories`: posts grouped by category
    pub categories: CategoryIndex<'a>,
    /// `categoryList`: sorted category names
    pub category_list: Vec<String>,
    /// `tags`: posts grouped by tag
    pub tags: TagIndex<'a>,
    /// `tagList`: sorted tag names
    pub tag_list: Vec<String>,
}

impl<'a> Collections<'a> {
    /// Build every collection from the loaded documents.
    /// Category and tag views only consider posts.
    pub fn build(documents: &'a [Document], post_tag: &str) -> Self {
        let posts = all_posts(documents, post_tag);
        let categories = by_category(&posts);
        let category_list = category_names(&posts);
        let tags = by_tag(&posts, post_tag);
        let tag_list = tag_names(&posts, post_tag);

        tracing::debug!(
            "Indexed {} posts, {} categories, {} tags",
            posts.len(),
            category_list.len(),
            tag_list.len()
        );

        Self {
            posts,
            categories,
            category_list,
            tags,
            tag_list,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn doc(name: &str, day: u32, categories: &[&str], tags: &[&str]) -> Document {
        let date = Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap();
        let mut d = Document::new(name.to_string(), date, format!("posts/{}.md", name));
        d.categories = categories.iter().map(|s| s.to_string()).collect();
        d.tags = tags.iter().map(|s| s.to_string()).collect();
        d
    }

    fn titles(docs: &[&Document]) -> Vec<String> {
        docs.iter().map(|d| d.title.clone()).collect()
    }

    #[test]
    fn test_all_posts_filters_and_sorts() {
        let docs = vec![
            doc("old", 1, &[], &["posts"]),
            doc("page", 9, &[], &[]),
            doc("new", 3, &[], &["posts", "rust"]),
            doc("mid", 2, &[], &["posts"]),
        ];
        let posts = all_posts(&docs, POST_TAG);
        assert_eq!(titles(&posts), vec!["new", "mid", "old"]);
        assert_eq!(
            posts.len(),
            docs.iter().filter(|d| d.has_tag(POST_TAG)).count()
        );
    }

    #[test]
    fn test_all_posts_empty() {
        assert!(all_posts(&[], POST_TAG).is_empty());
    }

    #[test]
    fn test_sort_is_stable_for_equal_dates() {
        let docs = vec![
            doc("first", 5, &[], &["posts"]),
            doc("second", 5, &[], &["posts"]),
            doc("newer", 6, &[], &["posts"]),
            doc("third", 5, &[], &["posts"]),
        ];
        let posts = all_posts(&docs, POST_TAG);
        assert_eq!(titles(&posts), vec!["newer", "first", "second", "third"]);
    }

    #[test]
    fn test_by_category_sorts_each_bucket() {
        let a = doc("A", 2, &["x"], &[]);
        let b = doc("B", 1, &["x"], &[]);
        let c = doc("C", 3, &["x"], &[]);
        let index = by_category(&[&a, &b, &c]);
        assert_eq!(titles(&index["x"]), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_by_category_membership() {
        let a = doc("A", 1, &["rust", "web"], &[]);
        let b = doc("B", 2, &[], &[]);
        let c = doc("C", 3, &["web"], &[]);
        let docs = [&a, &b, &c];
        let index = by_category(&docs);

        assert_eq!(index.keys().collect::<Vec<_>>(), vec!["rust", "web"]);
        for (category, bucket) in &index {
            for d in docs {
                let in_bucket = bucket.iter().any(|p| p.title == d.title);
                assert_eq!(in_bucket, d.in_category(category));
            }
        }
        assert_eq!(titles(&index["web"]), vec!["C", "A"]);
    }

    #[test]
    fn test_by_tag_skips_post_tag() {
        let a = doc("A", 1, &[], &["posts", "rust"]);
        let b = doc("B", 2, &[], &["posts", "rust", "cli"]);
        let index = by_tag(&[&a, &b], POST_TAG);
        assert!(!index.contains_key(POST_TAG));
        assert_eq!(titles(&index["rust"]), vec!["B", "A"]);
        assert_eq!(titles(&index["cli"]), vec!["B"]);
    }

    #[test]
    fn test_category_names_sorted_and_unique() {
        let a = doc("A", 1, &["web", "rust"], &[]);
        let b = doc("B", 2, &["rust", "Zig", "apple"], &[]);
        assert_eq!(
            category_names(&[&a, &b]),
            vec!["Zig", "apple", "rust", "web"]
        );
        assert!(category_names(&[]).is_empty());
    }

    #[test]
    fn test_tag_names_exclude_post_tag() {
        let a = doc("A", 1, &[], &["posts", "rust", "cli"]);
        let b = doc("B", 2, &[], &["rust", "posts"]);
        assert_eq!(tag_names(&[&a, &b], POST_TAG), vec!["cli", "rust"]);
        assert!(tag_names(&[], POST_TAG).is_empty());
    }

    #[test]
    fn test_collections_only_index_posts() {
        let docs = vec![
            doc("post", 2, &["notes"], &["posts", "rust"]),
            doc("about", 3, &["meta"], &["misc"]),
        ];
        let collections = Collections::build(&docs, POST_TAG);
        assert_eq!(titles(&collections.posts), vec!["post"]);
        assert_eq!(collections.category_list, vec!["notes"]);
        assert_eq!(collections.tag_list, vec!["rust"]);
        assert!(collections.categories.contains_key("notes"));
        assert!(!collections.categories.contains_key("meta"));
        assert!(collections.tags.contains_key("rust"));
    }
}
