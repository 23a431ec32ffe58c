//! Path tree nodes built from per-file line counts.

use compact_str::CompactString;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::TreeError;

/// Added and removed line counts recorded for a single changed file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineCounts {
    /// Lines added.
    pub added: u64,
    /// Lines removed.
    pub removed: u64,
}

impl LineCounts {
    /// Create a new pair of counts.
    pub fn new(added: u64, removed: u64) -> Self {
        Self { added, removed }
    }

    /// Total lines touched.
    pub fn total(&self) -> u64 {
        self.added + self.removed
    }
}

/// A single path segment in the tree.
///
/// Directories are pure aggregation points and carry no counts of their own;
/// only the terminal segment of an inserted path holds [`LineCounts`].
#[derive(Debug, Clone, Default)]
pub struct PathNode {
    /// Children keyed by segment name, in first-insertion order.
    children: IndexMap<CompactString, PathNode>,

    /// Counts for a changed file (files only).
    counts: Option<LineCounts>,
}

impl PathNode {
    /// Create an empty aggregation node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts recorded on this node, if it is a changed file.
    pub fn counts(&self) -> Option<LineCounts> {
        self.counts
    }

    /// Iterate children in insertion order.
    pub fn children(&self) -> impl Iterator<Item = (&str, &PathNode)> {
        self.children.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// Look up a direct child by name.
    pub fn child(&self, name: &str) -> Option<&PathNode> {
        self.children.get(name)
    }

    /// Get the number of direct children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Check if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Get the child named `name`, creating an empty one if missing.
    fn child_or_insert(&mut self, name: &str) -> &mut PathNode {
        self.children.entry(CompactString::new(name)).or_default()
    }
}

/// Tree of changed paths rooted at an unnamed directory.
#[derive(Debug, Clone, Default)]
pub struct PathTree {
    root: PathNode,
    files: usize,
}

impl PathTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Root node of the tree.
    pub fn root(&self) -> &PathNode {
        &self.root
    }

    /// Number of file records inserted, counting overwrites.
    pub fn records(&self) -> usize {
        self.files
    }

    /// Check if nothing has been inserted.
    pub fn is_empty(&self) -> bool {
        self.root.is_leaf()
    }

    /// Record counts for the file at `segments`.
    ///
    /// Missing intermediate directories are created. Inserting the same path
    /// twice overwrites the earlier counts.
    pub fn insert<I, S>(&mut self, segments: I, added: u64, removed: u64) -> Result<(), TreeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut segments = segments.into_iter().peekable();
        if segments.peek().is_none() {
            return Err(TreeError::EmptyPath);
        }

        let mut node = &mut self.root;
        for segment in segments {
            node = node.child_or_insert(segment.as_ref());
        }
        node.counts = Some(LineCounts::new(added, removed));
        self.files += 1;

        Ok(())
    }

    /// Record counts for a `/`-separated path.
    pub fn insert_path(&mut self, path: &str, added: u64, removed: u64) -> Result<(), TreeError> {
        self.insert(path.split('/'), added, removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_creates_intermediates() {
        let mut tree = PathTree::new();
        tree.insert(["a", "b", "c.txt"], 1, 2).unwrap();

        let a = tree.root().child("a").unwrap();
        let b = a.child("b").unwrap();
        let file = b.child("c.txt").unwrap();

        assert!(a.counts().is_none());
        assert!(b.counts().is_none());
        assert_eq!(file.counts(), Some(LineCounts::new(1, 2)));
        assert!(file.is_leaf());
    }

    #[test]
    fn test_insert_empty_path_rejected() {
        let mut tree = PathTree::new();
        let err = tree.insert(Vec::<&str>::new(), 1, 1).unwrap_err();
        assert!(matches!(err, TreeError::EmptyPath));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_last_write_wins() {
        let mut tree = PathTree::new();
        tree.insert(["x"], 1, 1).unwrap();
        tree.insert(["x"], 2, 2).unwrap();

        assert_eq!(tree.root().child_count(), 1);
        assert_eq!(tree.root().child("x").unwrap().counts(), Some(LineCounts::new(2, 2)));
        assert_eq!(tree.records(), 2);
    }

    #[test]
    fn test_children_keep_insertion_order() {
        let mut tree = PathTree::new();
        tree.insert_path("zeta.rs", 1, 0).unwrap();
        tree.insert_path("alpha.rs", 1, 0).unwrap();
        tree.insert_path("mid/x.rs", 1, 0).unwrap();
        tree.insert_path("zeta.rs", 4, 0).unwrap();

        let names: Vec<_> = tree.root().children().map(|(name, _)| name).collect();
        assert_eq!(names, ["zeta.rs", "alpha.rs", "mid"]);
    }

    #[test]
    fn test_line_counts_total() {
        assert_eq!(LineCounts::new(3, 4).total(), 7);
        assert_eq!(LineCounts::default().total(), 0);
    }
}
