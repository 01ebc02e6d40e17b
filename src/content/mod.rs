//! Content module - front-matter, markdown and document loading

mod document;
mod error;
mod frontmatter;
pub mod loader;
mod markdown;

pub use document::{Document, RESERVED_FIELDS};
pub use error::ContentError;
pub use frontmatter::{parse_date_string, FrontMatter};
pub use loader::ContentLoader;
pub use markdown::MarkdownRenderer;
