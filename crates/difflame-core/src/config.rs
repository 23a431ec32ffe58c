//! Revision range configuration.

use derive_builder::Builder;

/// Revision diffed from when none is given.
pub const DEFAULT_FROM_REV: &str = "HEAD~1";

/// Revision diffed to when none is given.
pub const DEFAULT_TO_REV: &str = "HEAD";

/// Pair of revisions to diff between.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct RevisionRange {
    /// Older revision.
    #[builder(default = "DEFAULT_FROM_REV.to_string()")]
    pub from: String,

    /// Newer revision.
    #[builder(default = "DEFAULT_TO_REV.to_string()")]
    pub to: String,
}

impl RevisionRangeBuilder {
    fn validate(&self) -> Result<(), String> {
        for (field, rev) in [("from", &self.from), ("to", &self.to)] {
            if rev.as_ref().is_some_and(|r| r.trim().is_empty()) {
                return Err(format!("Revision `{field}` cannot be empty"));
            }
        }
        Ok(())
    }
}

impl RevisionRange {
    /// Create a new range builder.
    pub fn builder() -> RevisionRangeBuilder {
        RevisionRangeBuilder::default()
    }

    /// Create a range between two revisions.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Range from optional user input such as form fields. Missing or blank
    /// revisions fall back to `HEAD~1..HEAD`.
    pub fn or_defaults(from: Option<&str>, to: Option<&str>) -> Self {
        let pick = |value: Option<&str>, default: &str| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
                .to_string()
        };
        Self::new(pick(from, DEFAULT_FROM_REV), pick(to, DEFAULT_TO_REV))
    }
}

impl Default for RevisionRange {
    fn default() -> Self {
        Self::new(DEFAULT_FROM_REV, DEFAULT_TO_REV)
    }
}

impl std::fmt::Display for RevisionRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let range = RevisionRange::builder().build().unwrap();
        assert_eq!(range, RevisionRange::default());
        assert_eq!(range.from, "HEAD~1");
        assert_eq!(range.to, "HEAD");
    }

    #[test]
    fn test_builder_rejects_empty_revision() {
        let result = RevisionRange::builder().from("  ").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_or_defaults() {
        assert_eq!(RevisionRange::or_defaults(None, None), RevisionRange::default());
        assert_eq!(
            RevisionRange::or_defaults(Some(" "), Some("main")),
            RevisionRange::new("HEAD~1", "main")
        );
        assert_eq!(
            RevisionRange::or_defaults(Some(" v1 "), Some("")),
            RevisionRange::new("v1", "HEAD")
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(RevisionRange::new("v1", "v2").to_string(), "v1..v2");
    }
}
