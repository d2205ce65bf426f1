//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`Oid`] - Git object identifier (SHA)
//! - [`IgnoreSet`] - Commit hashes to drop from resolved ranges
//! - [`RangeDescriptor`] - One of the three supported range shapes
//! - [`SingleCommitPolicy`] - Whether single-commit lookups honor the ignore set
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs.
//!
//! # Examples
//!
//! ```
//! use rangelog::core::types::{IgnoreSet, Oid, RangeDescriptor};
//!
//! let oid = Oid::new("abc123def4567890abc123def4567890abc12345").unwrap();
//! assert!(Oid::new("not-a-sha").is_err());
//!
//! let ignore: IgnoreSet = ["abc123def4567890abc123def4567890abc12345"].into_iter().collect();
//! assert!(ignore.contains(oid.as_str()));
//!
//! let range = RangeDescriptor::parse("v1.0..v1.1").unwrap();
//! assert!(matches!(range, RangeDescriptor::Reachability { .. }));
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid object id: {0}")]
    InvalidOid(String),

    #[error("invalid range: {0}")]
    InvalidRange(String),
}

/// A Git object identifier.
///
/// Stored as lowercase hex. Both SHA-1 (40 chars) and SHA-256 (64 chars)
/// object formats are accepted.
///
/// # Example
///
/// ```
/// use rangelog::core::types::Oid;
///
/// let oid = Oid::new("ABC123DEF4567890ABC123DEF4567890ABC12345").unwrap();
/// assert_eq!(oid.as_str(), "abc123def4567890abc123def4567890abc12345");
/// assert_eq!(oid.short(7), "abc123d");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Oid(String);

impl Oid {
    /// Create a new validated object id.
    ///
    /// The OID is normalized to lowercase.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidOid` if the string is not a valid hex OID.
    pub fn new(oid: impl Into<String>) -> Result<Self, TypeError> {
        let oid = oid.into().to_ascii_lowercase();
        Self::validate(&oid)?;
        Ok(Self(oid))
    }

    /// Get an abbreviated form of the OID.
    ///
    /// Returns the first `len` characters. If `len` exceeds the OID length,
    /// returns the full OID.
    pub fn short(&self, len: usize) -> &str {
        let end = len.min(self.0.len());
        &self.0[..end]
    }

    fn validate(oid: &str) -> Result<(), TypeError> {
        // SHA-1 is 40 hex chars, SHA-256 is 64
        if oid.len() != 40 && oid.len() != 64 {
            return Err(TypeError::InvalidOid(format!(
                "expected 40 or 64 hex characters, got {}",
                oid.len()
            )));
        }
        if !oid.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidOid(
                "object id must be hexadecimal".into(),
            ));
        }
        Ok(())
    }

    /// Get the object id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Oid {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Oid> for String {
    fn from(oid: Oid) -> Self {
        oid.0
    }
}

impl AsRef<str> for Oid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Oid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Commit hashes the caller wants excluded from resolved ranges.
///
/// Membership is exact string equality. A hash that differs only by case,
/// or an abbreviated prefix of a stored hash, is not a member.
///
/// # Example
///
/// ```
/// use rangelog::core::types::IgnoreSet;
///
/// let ignore = IgnoreSet::from_iter(["abc123"]);
/// assert!(ignore.contains("abc123"));
/// assert!(!ignore.contains("ABC123"));
/// assert!(!ignore.contains("abc1"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSet(HashSet<String>);

impl IgnoreSet {
    /// Create an empty ignore set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether `hash` is ignored.
    pub fn contains(&self, hash: &str) -> bool {
        self.0.contains(hash)
    }

    /// Add a hash. Returns false if it was already present.
    pub fn insert(&mut self, hash: impl Into<String>) -> bool {
        self.0.insert(hash.into())
    }

    /// Number of ignored hashes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nothing is ignored.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate the ignored hashes in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Parse an ignore list: one hash per line.
    ///
    /// Surrounding whitespace is trimmed; blank lines and lines starting
    /// with `#` are skipped. Hashes are kept verbatim otherwise.
    pub fn parse(contents: &str) -> Self {
        contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .collect()
    }

    /// Read an ignore list file (see [`IgnoreSet::parse`]).
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(Self::parse(&contents))
    }
}

impl<S: Into<String>> FromIterator<S> for IgnoreSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl IntoIterator for IgnoreSet {
    type Item = String;
    type IntoIter = std::collections::hash_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<S: Into<String>> Extend<S> for IgnoreSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

/// The shape of a commit range request.
///
/// References are kept as raw strings and resolved by the repository:
/// a full or abbreviated hash, a branch, a tag, or any revspec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeDescriptor {
    /// Commits reachable from `include_from` but not from `exclude_from`.
    Reachability {
        exclude_from: String,
        include_from: String,
    },

    /// A single commit identified by its full hash.
    Single { hash: String },

    /// Commits of `base_branch` with no patch-equivalent on `branch`, as
    /// listed by `git cherry -v <branch> <base_branch>`.
    BranchComparison { base_branch: String, branch: String },
}

impl RangeDescriptor {
    /// Parse revision-range notation.
    ///
    /// - `A...B` is a branch comparison with base `A` and branch `B`
    /// - `A..B` is the reachability range `B` minus `A`
    /// - anything else is a single commit hash
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidRange` for empty input or an empty side.
    ///
    /// # Example
    ///
    /// ```
    /// use rangelog::core::types::RangeDescriptor;
    ///
    /// assert_eq!(
    ///     RangeDescriptor::parse("main...feature").unwrap(),
    ///     RangeDescriptor::BranchComparison {
    ///         base_branch: "main".into(),
    ///         branch: "feature".into(),
    ///     }
    /// );
    /// assert!(RangeDescriptor::parse("main..").is_err());
    /// ```
    pub fn parse(spec: &str) -> Result<Self, TypeError> {
        let spec = spec.trim();
        if spec.is_empty() {
            return Err(TypeError::InvalidRange("range cannot be empty".into()));
        }

        if let Some((base, branch)) = spec.split_once("...") {
            let (base_branch, branch) = Self::sides(spec, base, branch)?;
            return Ok(Self::BranchComparison {
                base_branch,
                branch,
            });
        }

        if let Some((exclude, include)) = spec.split_once("..") {
            let (exclude_from, include_from) = Self::sides(spec, exclude, include)?;
            return Ok(Self::Reachability {
                exclude_from,
                include_from,
            });
        }

        Ok(Self::Single {
            hash: spec.to_string(),
        })
    }

    fn sides(spec: &str, left: &str, right: &str) -> Result<(String, String), TypeError> {
        if left.is_empty() || right.is_empty() {
            return Err(TypeError::InvalidRange(format!(
                "'{}' needs a reference on both sides",
                spec
            )));
        }
        Ok((left.to_string(), right.to_string()))
    }
}

impl std::fmt::Display for RangeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RangeDescriptor::Reachability {
                exclude_from,
                include_from,
            } => write!(f, "{}..{}", exclude_from, include_from),
            RangeDescriptor::Single { hash } => write!(f, "{}", hash),
            RangeDescriptor::BranchComparison {
                base_branch,
                branch,
            } => write!(f, "{}...{}", base_branch, branch),
        }
    }
}

/// Whether single-commit lookups are filtered through the ignore set.
///
/// Single lookups are explicit requests, so by default the ignore set is
/// bypassed for them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SingleCommitPolicy {
    /// Return the commit even if it is in the ignore set.
    #[default]
    Bypass,
    /// Drop the commit if it is in the ignore set.
    Apply,
}

#[cfg(test)]
mod tests {
    use super::*;

    mod oid {
        use super::*;

        #[test]
        fn valid_sha1() {
            assert!(Oid::new("abc123def4567890abc123def4567890abc12345").is_ok());
        }

        #[test]
        fn valid_sha256() {
            let sha256 = "a".repeat(64);
            assert!(Oid::new(sha256).is_ok());
        }

        #[test]
        fn normalized_to_lowercase() {
            let oid = Oid::new("ABC123DEF4567890ABC123DEF4567890ABC12345").unwrap();
            assert_eq!(oid.as_str(), "abc123def4567890abc123def4567890abc12345");
        }

        #[test]
        fn wrong_length_rejected() {
            assert!(Oid::new("abc123").is_err());
            assert!(Oid::new("").is_err());
        }

        #[test]
        fn non_hex_rejected() {
            assert!(Oid::new("xyz123def4567890abc123def4567890abc12345").is_err());
        }

        #[test]
        fn short_clamps_to_length() {
            let oid = Oid::new("abc123def4567890abc123def4567890abc12345").unwrap();
            assert_eq!(oid.short(7), "abc123d");
            assert_eq!(oid.short(100).len(), 40);
        }

        #[test]
        fn serde_roundtrip() {
            let oid = Oid::new("abc123def4567890abc123def4567890abc12345").unwrap();
            let json = serde_json::to_string(&oid).unwrap();
            assert_eq!(json, "\"abc123def4567890abc123def4567890abc12345\"");
            let parsed: Oid = serde_json::from_str(&json).unwrap();
            assert_eq!(oid, parsed);
        }
    }

    mod ignore_set {
        use super::*;

        #[test]
        fn exact_match_only() {
            let ignore = IgnoreSet::from_iter(["ghi789"]);
            assert!(ignore.contains("ghi789"));
            assert!(!ignore.contains("GHI789"));
            assert!(!ignore.contains("ghi78"));
            assert!(!ignore.contains("ghi7890"));
        }

        #[test]
        fn parse_skips_blanks_and_comments() {
            let ignore = IgnoreSet::parse(
                "# release bumps\n\
                 abc123\n\
                 \n\
                 \x20 def456  \n\
                 #ghi789\n",
            );
            assert_eq!(ignore.len(), 2);
            assert!(ignore.contains("abc123"));
            assert!(ignore.contains("def456"));
            assert!(!ignore.contains("ghi789"));
        }

        #[test]
        fn from_file_reads_lines() {
            let dir = tempfile::TempDir::new().unwrap();
            let path = dir.path().join("ignore.txt");
            std::fs::write(&path, "abc123\ndef456\n").unwrap();

            let ignore = IgnoreSet::from_file(&path).unwrap();
            assert_eq!(ignore.len(), 2);
        }

        #[test]
        fn extend_and_insert() {
            let mut ignore = IgnoreSet::new();
            assert!(ignore.is_empty());
            assert!(ignore.insert("abc"));
            assert!(!ignore.insert("abc"));
            ignore.extend(vec!["def".to_string()]);
            assert_eq!(ignore.len(), 2);
        }
    }

    mod range_descriptor {
        use super::*;

        #[test]
        fn two_dots_is_reachability() {
            assert_eq!(
                RangeDescriptor::parse("v1.0..HEAD").unwrap(),
                RangeDescriptor::Reachability {
                    exclude_from: "v1.0".into(),
                    include_from: "HEAD".into(),
                }
            );
        }

        #[test]
        fn three_dots_is_branch_comparison() {
            assert_eq!(
                RangeDescriptor::parse("main...topic").unwrap(),
                RangeDescriptor::BranchComparison {
                    base_branch: "main".into(),
                    branch: "topic".into(),
                }
            );
        }

        #[test]
        fn bare_hash_is_single() {
            assert_eq!(
                RangeDescriptor::parse(" abc123 ").unwrap(),
                RangeDescriptor::Single {
                    hash: "abc123".into()
                }
            );
        }

        #[test]
        fn empty_sides_rejected() {
            assert!(RangeDescriptor::parse("").is_err());
            assert!(RangeDescriptor::parse("..HEAD").is_err());
            assert!(RangeDescriptor::parse("main...").is_err());
        }

        #[test]
        fn display_matches_notation() {
            for spec in ["a..b", "a...b", "abc123"] {
                assert_eq!(RangeDescriptor::parse(spec).unwrap().to_string(), spec);
            }
        }
    }

    #[test]
    fn single_commit_policy_defaults_to_bypass() {
        assert_eq!(SingleCommitPolicy::default(), SingleCommitPolicy::Bypass);
    }
}
