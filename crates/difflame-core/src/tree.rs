//! Aggregated, serializable view of a path tree.

use compact_str::CompactString;
use serde::{Deserialize, Serialize, Serializer};

use crate::node::PathNode;

/// Name given to the top node of an aggregated diff.
pub const ROOT_NAME: &str = "root";

/// One node of the aggregated tree.
///
/// Every node carries the totals of itself and everything below it. In JSON a
/// leaf has no `children` key at all, which keeps "changed file" distinct from
/// "directory" for the flame-graph client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "NodeRepr<Vec<AggregatedNode>>")]
pub enum AggregatedNode {
    /// A changed file, or a tree with nothing in it.
    Leaf {
        name: CompactString,
        added: u64,
        removed: u64,
    },
    /// A directory; `children` is never empty.
    Branch {
        name: CompactString,
        added: u64,
        removed: u64,
        children: Vec<AggregatedNode>,
    },
}

impl AggregatedNode {
    /// Segment name of this node (`"root"` for the top of a diff).
    pub fn name(&self) -> &str {
        match self {
            Self::Leaf { name, .. } | Self::Branch { name, .. } => name.as_str(),
        }
    }

    /// Lines added in this subtree.
    pub fn added(&self) -> u64 {
        match self {
            Self::Leaf { added, .. } | Self::Branch { added, .. } => *added,
        }
    }

    /// Lines removed in this subtree.
    pub fn removed(&self) -> u64 {
        match self {
            Self::Leaf { removed, .. } | Self::Branch { removed, .. } => *removed,
        }
    }

    /// Flame-graph weight: added plus removed.
    pub fn value(&self) -> u64 {
        self.added() + self.removed()
    }

    /// Direct children; empty for leaves.
    pub fn children(&self) -> &[AggregatedNode] {
        match self {
            Self::Leaf { .. } => &[],
            Self::Branch { children, .. } => children,
        }
    }

    /// Check if this is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    /// Find a descendant by `/`-separated path relative to this node.
    pub fn get(&self, path: &str) -> Option<&AggregatedNode> {
        path.split('/').try_fold(self, |node, segment| {
            node.children().iter().find(|child| child.name() == segment)
        })
    }

    /// Count files, directories and depth below this node.
    pub fn summary(&self) -> TreeSummary {
        let mut summary = TreeSummary::default();
        for child in self.children() {
            summary.record(child, 1);
        }
        summary
    }
}

/// Fold `node` and its descendants into an [`AggregatedNode`] named `name`.
///
/// Children are visited in insertion order, so the same tree always produces
/// the same output.
pub fn aggregate(node: &PathNode, name: &str) -> AggregatedNode {
    let own = node.counts().unwrap_or_default();
    let name = CompactString::new(name);

    if node.is_leaf() {
        return AggregatedNode::Leaf {
            name,
            added: own.added,
            removed: own.removed,
        };
    }

    let mut added = own.added;
    let mut removed = own.removed;
    let mut children = Vec::with_capacity(node.child_count());

    for (child_name, child) in node.children() {
        let child = aggregate(child, child_name);
        added += child.added();
        removed += child.removed();
        children.push(child);
    }

    AggregatedNode::Branch {
        name,
        added,
        removed,
        children,
    }
}

/// Shape statistics for an aggregated tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSummary {
    /// Changed files (leaves) below the node.
    pub files: u64,
    /// Directories below the node.
    pub directories: u64,
    /// Deepest leaf, counting the summarized node as depth 0.
    pub max_depth: u32,
}

impl TreeSummary {
    fn record(&mut self, node: &AggregatedNode, depth: u32) {
        match node {
            AggregatedNode::Leaf { .. } => {
                self.files += 1;
                self.max_depth = self.max_depth.max(depth);
            }
            AggregatedNode::Branch { children, .. } => {
                self.directories += 1;
                for child in children {
                    self.record(child, depth + 1);
                }
            }
        }
    }
}

/// Wire representation shared by both variants.
#[derive(Serialize, Deserialize)]
struct NodeRepr<C> {
    name: CompactString,
    #[serde(default)]
    value: u64,
    #[serde(default)]
    added: u64,
    #[serde(default)]
    removed: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    children: Option<C>,
}

impl Serialize for AggregatedNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let children = match self {
            Self::Leaf { .. } => None,
            Self::Branch { children, .. } => Some(children.as_slice()),
        };
        NodeRepr {
            name: CompactString::new(self.name()),
            value: self.value(),
            added: self.added(),
            removed: self.removed(),
            children,
        }
        .serialize(serializer)
    }
}

impl From<NodeRepr<Vec<AggregatedNode>>> for AggregatedNode {
    // `value` is derived, so the stored one is ignored.
    fn from(repr: NodeRepr<Vec<AggregatedNode>>) -> Self {
        match repr.children {
            Some(children) if !children.is_empty() => Self::Branch {
                name: repr.name,
                added: repr.added,
                removed: repr.removed,
                children,
            },
            _ => Self::Leaf {
                name: repr.name,
                added: repr.added,
                removed: repr.removed,
            },
        }
    }
}
