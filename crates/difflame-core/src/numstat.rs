//! Parsing of `--numstat` diff summaries.
//!
//! Each line has the form `<added>\t<removed>\t<path>`. Binary files report
//! `-` for both counts; any count that is not a number is treated as a single
//! unit of change so binary files still show up in the graph.
//!
//! Two framings are accepted: newline-terminated text as printed by
//! `git diff --numstat`, and the NUL-terminated form of `--numstat -z`, where
//! paths are never quoted and may contain any byte but NUL.

use crate::error::TreeError;
use crate::node::PathTree;

/// One parsed numstat line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumstatRecord<'a> {
    /// Lines added.
    pub added: u64,
    /// Lines removed.
    pub removed: u64,
    /// Path of the changed file, `/`-separated.
    pub path: &'a str,
}

impl<'a> NumstatRecord<'a> {
    /// Path segments of the changed file.
    pub fn segments(&self) -> impl Iterator<Item = &'a str> {
        self.path.split('/')
    }
}

/// Parse a count token, mapping anything non-numeric to 1.
pub fn parse_count(token: &str) -> u64 {
    token.trim().parse().unwrap_or(1)
}

/// Parse a single non-blank numstat line.
///
/// Returns `None` when the line has no path field. The path is everything
/// after the second delimiter, so it may contain whitespace.
pub fn parse_record(line: &str) -> Option<NumstatRecord<'_>> {
    // `git diff --numstat` separates fields with tabs, padded summaries use
    // runs of spaces. The first delimiter decides which one this line uses.
    let line = line.trim_start_matches(' ');
    let tab_separated = line
        .find(char::is_whitespace)
        .is_some_and(|i| line[i..].starts_with('\t'));

    if tab_separated {
        return parse_tab_record(line);
    }

    let (added, rest) = line.trim_start().split_once(char::is_whitespace)?;
    let (removed, path) = rest.trim_start().split_once(char::is_whitespace)?;
    record(added, removed, path.trim_start())
}

/// Parse one record of `--numstat -z` output.
///
/// The path is taken verbatim after the second tab, so leading spaces, tabs
/// and newlines in file names survive.
pub fn parse_tab_record(record_text: &str) -> Option<NumstatRecord<'_>> {
    let mut fields = record_text.splitn(3, '\t');
    record(fields.next()?, fields.next()?, fields.next()?)
}

fn record<'a>(added: &str, removed: &str, path: &'a str) -> Option<NumstatRecord<'a>> {
    if path.is_empty() {
        return None;
    }

    Some(NumstatRecord {
        added: parse_count(added),
        removed: parse_count(removed),
        path,
    })
}

/// Build a [`PathTree`] from numstat output.
///
/// Blank lines are skipped. A non-blank line without a path field is a
/// [`TreeError::MalformedRecord`].
pub fn tree_from_numstat(text: &str) -> Result<PathTree, TreeError> {
    let mut tree = PathTree::new();

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let record = parse_record(line).ok_or_else(|| TreeError::malformed(index + 1, line))?;
        tree.insert(record.segments(), record.added, record.removed)?;
    }

    tracing::debug!(records = tree.records(), "built path tree from numstat");
    Ok(tree)
}

/// Build a [`PathTree`] from NUL-terminated `--numstat -z` output.
///
/// Empty records are skipped. Error line numbers count records, starting at 1.
pub fn tree_from_numstat_z(text: &str) -> Result<PathTree, TreeError> {
    let mut tree = PathTree::new();

    for (index, entry) in text.split('\0').enumerate() {
        if entry.is_empty() {
            continue;
        }

        let record =
            parse_tab_record(entry).ok_or_else(|| TreeError::malformed(index + 1, entry))?;
        tree.insert(record.segments(), record.added, record.removed)?;
    }

    tracing::debug!(records = tree.records(), "built path tree from numstat -z");
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::LineCounts;

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("42"), 42);
        assert_eq!(parse_count("0"), 0);
        assert_eq!(parse_count("-"), 1);
        assert_eq!(parse_count("abc"), 1);
        assert_eq!(parse_count("-3"), 1);
    }

    #[test]
    fn test_parse_tab_record() {
        let record = parse_record("10\t2\tsrc/lib.rs").unwrap();
        assert_eq!(record.added, 10);
        assert_eq!(record.removed, 2);
        assert_eq!(record.path, "src/lib.rs");
        assert_eq!(record.segments().collect::<Vec<_>>(), ["src", "lib.rs"]);
    }

    #[test]
    fn test_parse_path_with_whitespace() {
        let record = parse_record("1\t1\tdocs/release notes.md").unwrap();
        assert_eq!(record.path, "docs/release notes.md");

        let record = parse_record("4 5  my file.txt").unwrap();
        assert_eq!(record.added, 4);
        assert_eq!(record.removed, 5);
        assert_eq!(record.path, "my file.txt");
    }

    #[test]
    fn test_parse_padded_record() {
        let record = parse_record("12      0       src/lib.rs").unwrap();
        assert_eq!((record.added, record.removed), (12, 0));
        assert_eq!(record.path, "src/lib.rs");

        let record = parse_record("-       -       logo.png").unwrap();
        assert_eq!((record.added, record.removed), (1, 1));
    }

    #[test]
    fn test_parse_missing_path() {
        assert!(parse_record("1\t2").is_none());
        assert!(parse_record("1\t2\t").is_none());
        assert!(parse_record("12").is_none());
    }

    #[test]
    fn test_binary_file_counts_as_one() {
        let tree = tree_from_numstat("-\t-\tfoo/bar.bin\n").unwrap();
        let leaf = tree.root().child("foo").unwrap().child("bar.bin").unwrap();
        assert_eq!(leaf.counts(), Some(LineCounts::new(1, 1)));
    }

    #[test]
    fn test_blank_lines_skipped() {
        let tree = tree_from_numstat("1\t0\ta.txt\n\n2\t0\tb.txt\n").unwrap();
        assert_eq!(tree.root().child_count(), 2);
    }

    #[test]
    fn test_empty_output() {
        let tree = tree_from_numstat("").unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_nul_records_keep_paths_verbatim() {
        let text = "1\t0\t lead.txt\03\t2\tdocs/tab\tname.txt\0-\t-\tnew\nline.bin\0";
        let tree = tree_from_numstat_z(text).unwrap();
        let root = tree.root();

        assert_eq!(root.child(" lead.txt").unwrap().counts(), Some(LineCounts::new(1, 0)));
        assert_eq!(
            root.child("docs").unwrap().child("tab\tname.txt").unwrap().counts(),
            Some(LineCounts::new(3, 2))
        );
        assert_eq!(root.child("new\nline.bin").unwrap().counts(), Some(LineCounts::new(1, 1)));
        assert!(root.child("lead.txt").is_none());
    }

    #[test]
    fn test_nul_records_with_wide_counts() {
        let tree = tree_from_numstat_z("123456789\t98765432\tbig.sql\0").unwrap();
        let leaf = tree.root().child("big.sql").unwrap();
        assert_eq!(leaf.counts(), Some(LineCounts::new(123_456_789, 98_765_432)));
    }

    #[test]
    fn test_nul_malformed_record() {
        assert!(tree_from_numstat_z("").unwrap().is_empty());
        let err = tree_from_numstat_z("1\t0\ta.txt\01\t2\0").unwrap_err();
        assert!(matches!(err, TreeError::MalformedRecord { line: 2, .. }));
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let err = tree_from_numstat("1\t0\ta.txt\ngarbage\n").unwrap_err();
        assert!(matches!(err, TreeError::MalformedRecord { line: 2, .. }));
    }
}
