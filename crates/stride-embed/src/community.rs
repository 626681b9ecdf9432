//! Community membership oracle.
//!
//! Loads a partition file where each line is one community - its 0-based
//! line index is the community id - holding whitespace-separated node keys.
//! The trainer consults [`Communities::overlap`] to decide whether a sampled
//! (source, context) pair may count as a positive example.

use crate::error::Result;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Node key -> community-id sets, answering overlap queries.
#[derive(Debug, Clone)]
pub struct Communities {
    membership: HashMap<String, Vec<u32>>,
}

impl Communities {
    /// Load a partition file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_text(&fs::read_to_string(path)?))
    }

    /// Parse partition text; one community per line, keys may appear on
    /// several lines (overlapping communities).
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let mut membership: HashMap<String, Vec<u32>> = HashMap::new();
        for (community, line) in text.lines().enumerate() {
            for key in line.split_whitespace() {
                membership
                    .entry(key.to_owned())
                    .or_default()
                    .push(community as u32);
            }
        }
        Self { membership }
    }

    /// True iff both keys are known and their community sets intersect.
    #[must_use]
    pub fn overlap(&self, a: &str, b: &str) -> bool {
        let (Some(ca), Some(cb)) = (self.membership.get(a), self.membership.get(b)) else {
            return false;
        };
        ca.iter().any(|c| cb.contains(c))
    }

    /// Number of distinct keys with at least one community.
    #[must_use]
    pub fn len(&self) -> usize {
        self.membership.len()
    }

    /// Whether no key has a community.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.membership.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_line_keys_overlap() {
        let communities = Communities::from_text("a b c\nd e\n");
        assert!(communities.overlap("a", "c"));
        assert!(communities.overlap("d", "e"));
        assert!(!communities.overlap("a", "d"));
    }

    #[test]
    fn unknown_keys_never_overlap() {
        let communities = Communities::from_text("a b\n");
        assert!(!communities.overlap("a", "ghost"));
        assert!(!communities.overlap("ghost", "phantom"));
    }

    #[test]
    fn overlapping_membership_spans_lines() {
        // "b" sits in both communities, bridging "a" and "c".
        let communities = Communities::from_text("a b\nb c\n");
        assert!(communities.overlap("a", "b"));
        assert!(communities.overlap("b", "c"));
        assert!(!communities.overlap("a", "c"));
    }

    #[test]
    fn a_key_overlaps_itself_when_known() {
        let communities = Communities::from_text("a b\n");
        assert!(communities.overlap("a", "a"));
        assert!(!communities.overlap("ghost", "ghost"));
    }
}
