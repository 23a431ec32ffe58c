//! Numstat producers.

use std::fmt;
use std::path::Path;
use std::process::Command;
use std::str::FromStr;

use git2::{Patch, Repository, Tree};
use serde::{Deserialize, Serialize};

use difflame_core::RevisionRange;

use crate::error::SourceError;

/// How the per-file line counts are obtained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffBackend {
    /// In-process diff through libgit2.
    #[default]
    Libgit2,
    /// `git diff --numstat` run as a child process.
    Git,
}

impl DiffBackend {
    /// Produce NUL-terminated numstat records (the `--numstat -z` format) for
    /// `range` in the repository containing `dir`.
    pub fn numstat(&self, dir: &Path, range: &RevisionRange) -> Result<String, SourceError> {
        match self {
            Self::Libgit2 => libgit2_numstat(dir, range),
            Self::Git => git_numstat(dir, range),
        }
    }
}

impl fmt::Display for DiffBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Libgit2 => f.write_str("libgit2"),
            Self::Git => f.write_str("git"),
        }
    }
}

impl FromStr for DiffBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "libgit2" => Ok(Self::Libgit2),
            "git" => Ok(Self::Git),
            other => Err(format!("unknown diff backend `{other}` (expected libgit2 or git)")),
        }
    }
}

fn resolve_tree<'r>(repo: &'r Repository, rev: &str) -> Result<Tree<'r>, SourceError> {
    repo.revparse_single(rev)
        .and_then(|object| object.peel_to_tree())
        .map_err(|e| SourceError::revision(rev, e))
}

fn libgit2_numstat(dir: &Path, range: &RevisionRange) -> Result<String, SourceError> {
    let repo = Repository::discover(dir).map_err(|e| SourceError::repository(dir, e))?;
    let from = resolve_tree(&repo, &range.from)?;
    let to = resolve_tree(&repo, &range.to)?;

    let diff = repo.diff_tree_to_tree(Some(&from), Some(&to), None)?;
    let mut out = String::new();

    for index in 0..diff.deltas().len() {
        let Some(delta) = diff.get_delta(index) else {
            continue;
        };
        let Some(path) = delta.new_file().path().or_else(|| delta.old_file().path()) else {
            continue;
        };
        let path = path.to_str().ok_or(SourceError::NotUtf8)?;

        // No patch is produced for binary content.
        let counts = match Patch::from_diff(&diff, index)? {
            Some(patch) if !patch.delta().flags().is_binary() => {
                let (_, added, removed) = patch.line_stats()?;
                Some((added, removed))
            }
            _ => None,
        };

        match counts {
            Some((added, removed)) => out.push_str(&format!("{added}\t{removed}\t")),
            None => out.push_str("-\t-\t"),
        }
        out.push_str(path);
        out.push('\0');
    }

    Ok(out)
}

fn git_numstat(dir: &Path, range: &RevisionRange) -> Result<String, SourceError> {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(["diff", "--numstat", "-z", "--no-renames"])
        .arg(&range.from)
        .arg(&range.to)
        .arg("--")
        .output()
        .map_err(SourceError::Spawn)?;

    if !output.status.success() {
        return Err(SourceError::Command {
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    String::from_utf8(output.stdout).map_err(|_| SourceError::NotUtf8)
}
