//! Error types for format-to-as.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort the rewrite of a whole source unit.
///
/// Per-call problems never surface here: they are reported through
/// [`crate::rewrite::Rewritten::failures`] and the call is left untouched.
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("Failed to initialise the Ruby parser: {0}")]
    ParserInit(String),

    #[error("tree-sitter returned no tree for the input")]
    ParseFailed,

    #[error("Syntax error at {line}:{column}, refusing to rewrite")]
    Syntax { line: usize, column: usize },

    #[error("Invalid config {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for format-to-as operations.
pub type Result<T> = std::result::Result<T, RewriteError>;
