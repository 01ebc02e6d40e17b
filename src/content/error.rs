//! Errors raised while turning source files into documents

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Invalid JSON front-matter: {0}")]
    JsonFrontMatter(#[from] serde_json::Error),

    #[error("Unterminated JSON front-matter")]
    UnterminatedFrontMatter,

    #[error("Invalid date: {0:?}")]
    InvalidDate(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ContentError>;
