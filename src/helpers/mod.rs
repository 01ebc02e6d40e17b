//! Helper functions for content and templates
//!
//! Pure text, date and URL transforms. The template layer exposes most of
//! them as Tera filters.

mod date;
mod html;
mod list;
mod url;

pub use date::*;
pub use html::*;
pub use list::*;
pub use url::*;
