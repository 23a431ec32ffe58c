//! Saving and loading aggregated trees as JSON.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::TreeError;
use crate::tree::AggregatedNode;

/// Write `tree` as JSON to an arbitrary writer.
pub fn write_tree_to<W: Write>(tree: &AggregatedNode, mut writer: W) -> Result<(), TreeError> {
    serde_json::to_writer(&mut writer, tree)?;
    writer
        .flush()
        .map_err(|e| TreeError::io("<writer>", e))
}

/// Atomically write `tree` as JSON to `path`.
///
/// The tree is written to a temporary file in the same directory and then
/// renamed over `path`, so readers never observe a partial document.
pub fn write_tree(tree: &AggregatedNode, path: &Path) -> Result<(), TreeError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(|e| TreeError::io(dir, e))?;
    write_tree_to(tree, &mut file)?;
    file.persist(path).map_err(|e| TreeError::io(path, e.error))?;

    tracing::debug!(path = %path.display(), "saved tree");
    Ok(())
}

/// Load a tree previously written by [`write_tree`].
pub fn read_tree(path: &Path) -> Result<AggregatedNode, TreeError> {
    let bytes = std::fs::read(path).map_err(|e| TreeError::io(path, e))?;
    Ok(serde_json::from_slice(&bytes)?)
}
