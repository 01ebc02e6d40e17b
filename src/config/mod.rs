//! Configuration module

mod site;

pub use site::DirConfig;
pub use site::FeedConfig;
pub use site::HighlightConfig;
pub use site::MarkdownConfig;
pub use site::SiteConfig;
pub use site::ThemeConfig;
