//! Diff-to-tree adapter.

use std::path::{Path, PathBuf};
use std::time::Instant;

use difflame_core::{aggregate, tree_from_numstat_z, AggregatedNode, RevisionRange, ROOT_NAME};

use crate::backend::DiffBackend;
use crate::error::SourceError;

/// Produces aggregated change trees for one repository.
///
/// Holds no tree state: every call builds and discards its own tree, so a
/// single source can be shared between concurrent requests.
#[derive(Debug, Clone)]
pub struct ChangeSource {
    repository: PathBuf,
    backend: DiffBackend,
}

impl ChangeSource {
    /// Create a source for the repository at or above `repository`.
    pub fn new(repository: impl Into<PathBuf>) -> Self {
        Self {
            repository: repository.into(),
            backend: DiffBackend::default(),
        }
    }

    /// Use a specific diff backend.
    pub fn with_backend(mut self, backend: DiffBackend) -> Self {
        self.backend = backend;
        self
    }

    /// Repository location this source reads from.
    pub fn repository(&self) -> &Path {
        &self.repository
    }

    /// Backend used to produce numstat output.
    pub fn backend(&self) -> DiffBackend {
        self.backend
    }

    /// Raw NUL-terminated numstat records for `range`.
    pub fn numstat(&self, range: &RevisionRange) -> Result<String, SourceError> {
        for rev in [&range.from, &range.to] {
            if rev.is_empty() || rev.starts_with('-') {
                return Err(SourceError::InvalidRevision { rev: rev.clone() });
            }
        }
        self.backend.numstat(&self.repository, range)
    }

    /// Aggregate the changes between the two revisions of `range`.
    pub fn changes(&self, range: &RevisionRange) -> Result<AggregatedNode, SourceError> {
        let start = Instant::now();

        let text = self.numstat(range)?;
        let tree = tree_from_numstat_z(&text)?;
        let root = aggregate(tree.root(), ROOT_NAME);

        let summary = root.summary();
        tracing::info!(
            range = %range,
            backend = %self.backend,
            files = summary.files,
            lines = root.value(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "aggregated diff"
        );

        Ok(root)
    }
}

/// Aggregate the changes between `from` and `to` in `repository` using the
/// default backend.
pub fn changes_between(
    repository: impl AsRef<Path>,
    from: &str,
    to: &str,
) -> Result<AggregatedNode, SourceError> {
    ChangeSource::new(repository.as_ref()).changes(&RevisionRange::new(from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_option_like_revision() {
        let source = ChangeSource::new(".").with_backend(DiffBackend::Git);
        let err = source
            .changes(&RevisionRange::new("--output=/tmp/x", "HEAD"))
            .unwrap_err();
        assert!(matches!(err, SourceError::InvalidRevision { .. }));
    }

    #[test]
    fn test_rejects_empty_revision() {
        let err = ChangeSource::new(".")
            .numstat(&RevisionRange::new("HEAD~1", ""))
            .unwrap_err();
        assert!(matches!(err, SourceError::InvalidRevision { .. }));
    }

    #[test]
    fn test_builder_methods() {
        let source = ChangeSource::new("/repo").with_backend(DiffBackend::Git);
        assert_eq!(source.repository(), Path::new("/repo"));
        assert_eq!(source.backend(), DiffBackend::Git);
    }
}
