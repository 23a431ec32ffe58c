//! Error types for tree building and persistence.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building, loading or saving a tree.
#[derive(Debug, Error)]
pub enum TreeError {
    /// A path with no segments was inserted.
    #[error("Cannot insert an empty path")]
    EmptyPath,

    /// A numstat line had fewer than three fields.
    #[error("Malformed numstat record on line {line}: {content:?}")]
    MalformedRecord { line: usize, content: String },

    /// I/O error while reading or writing a tree file.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The tree could not be encoded or decoded as JSON.
    #[error("Invalid tree JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl TreeError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a malformed record error for a 1-based line number.
    pub fn malformed(line: usize, content: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line,
            content: content.into(),
        }
    }
}
