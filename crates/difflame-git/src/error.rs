//! Error types for diff extraction.

use std::path::PathBuf;

use difflame_core::TreeError;
use thiserror::Error;

/// Errors that can occur while extracting a diff.
#[derive(Debug, Error)]
pub enum SourceError {
    /// No repository at or above the given path.
    #[error("No git repository at {path}: {source}")]
    Repository {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    /// A revision could not be resolved to a tree.
    #[error("Unknown revision `{rev}`: {source}")]
    Revision {
        rev: String,
        #[source]
        source: git2::Error,
    },

    /// A revision that could be mistaken for a command-line option.
    #[error("Invalid revision `{rev}`")]
    InvalidRevision { rev: String },

    /// Other libgit2 failure.
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    /// The `git` executable could not be started.
    #[error("Failed to run git: {0}")]
    Spawn(#[source] std::io::Error),

    /// `git diff` exited unsuccessfully.
    #[error("git diff failed ({status}): {stderr}")]
    Command { status: String, stderr: String },

    /// Diff output was not UTF-8.
    #[error("Diff output is not valid UTF-8")]
    NotUtf8,

    /// Diff output could not be turned into a tree.
    #[error(transparent)]
    Tree(#[from] TreeError),
}

impl SourceError {
    /// Create a repository-open error with path context.
    pub fn repository(path: impl Into<PathBuf>, source: git2::Error) -> Self {
        Self::Repository {
            path: path.into(),
            source,
        }
    }

    /// Create an unresolvable revision error.
    pub fn revision(rev: impl Into<String>, source: git2::Error) -> Self {
        Self::Revision {
            rev: rev.into(),
            source,
        }
    }
}
