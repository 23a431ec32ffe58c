//! Core types for difflame.
//!
//! This crate turns a flat line-diff summary into a weighted directory tree
//! suitable for flame-graph rendering:
//!
//! - [`PathTree`] collects per-file added/removed counts, creating
//!   intermediate directories on demand.
//! - [`aggregate`] folds a tree into an [`AggregatedNode`] where every
//!   directory carries the totals of everything below it.
//! - [`tree_from_numstat`] and [`tree_from_numstat_z`] feed `git diff --numstat`
//!   output into a tree.
//!
//! ```rust
//! use difflame_core::{aggregate, PathTree};
//!
//! let mut tree = PathTree::new();
//! tree.insert(["src", "main.rs"], 3, 2).unwrap();
//! tree.insert(["src", "lib.rs"], 0, 5).unwrap();
//!
//! let root = aggregate(tree.root(), "root");
//! assert_eq!(root.value(), 10);
//! ```

mod config;
mod error;
mod node;
mod numstat;
mod persist;
mod tree;

pub use config::{RevisionRange, RevisionRangeBuilder, DEFAULT_FROM_REV, DEFAULT_TO_REV};
pub use error::TreeError;
pub use node::{LineCounts, PathNode, PathTree};
pub use numstat::{
    parse_count, parse_record, parse_tab_record, tree_from_numstat, tree_from_numstat_z,
    NumstatRecord,
};
pub use persist::{read_tree, write_tree, write_tree_to};
pub use tree::{aggregate, AggregatedNode, TreeSummary, ROOT_NAME};
