//! Git diff extraction for difflame.
//!
//! A [`ChangeSource`] runs a numstat diff between two revisions of a
//! repository and aggregates it into a weighted directory tree.
//!
//! ```rust,no_run
//! use difflame_git::{ChangeSource, RevisionRange};
//!
//! let source = ChangeSource::new(".");
//! let root = source.changes(&RevisionRange::default()).unwrap();
//!
//! println!("{} lines changed", root.value());
//! ```
//!
//! Two backends produce the numstat text: libgit2 (the default) and the
//! `git` command line. See [`DiffBackend`].

mod backend;
mod error;
mod source;

pub use backend::DiffBackend;
pub use error::SourceError;
pub use source::{changes_between, ChangeSource};

// Re-export core types for convenience
pub use difflame_core::{AggregatedNode, RevisionRange, TreeError};
