//! Immutable pre-write captures
//!
//! A [`Snapshot`] is taken immediately before a file is overwritten and
//! never mutated afterwards - only superseded by newer snapshots for the
//! same path, or purged. [`PatchSummary`] records the rough shape of the
//! change that followed the capture.

use crate::hash::ContentHash;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Line-group summary of an edit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchSummary {
    /// Lines present only in the new content
    pub lines_added: usize,
    /// Lines present only in the old content
    pub lines_removed: usize,
    /// Lines changed in place
    pub lines_modified: usize,
}

impl PatchSummary {
    /// Summarize the difference between two contents
    ///
    /// Positional comparison after trimming the common prefix and suffix
    /// line runs. Deliberately approximate: the pipeline needs a cheap
    /// signal for history inspection, not a minimal diff.
    #[must_use]
    pub fn between(old: &str, new: &str) -> Self {
        let old_lines: Vec<&str> = old.lines().collect();
        let new_lines: Vec<&str> = new.lines().collect();

        let mut prefix = 0;
        while prefix < old_lines.len()
            && prefix < new_lines.len()
            && old_lines[prefix] == new_lines[prefix]
        {
            prefix += 1;
        }

        let mut suffix = 0;
        while suffix < old_lines.len() - prefix
            && suffix < new_lines.len() - prefix
            && old_lines[old_lines.len() - 1 - suffix] == new_lines[new_lines.len() - 1 - suffix]
        {
            suffix += 1;
        }

        let old_mid = old_lines.len() - prefix - suffix;
        let new_mid = new_lines.len() - prefix - suffix;
        let modified = old_mid.min(new_mid);

        Self {
            lines_added: new_mid - modified,
            lines_removed: old_mid - modified,
            lines_modified: modified,
        }
    }

    /// True when the summary records no change at all
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Immutable capture of a file's content at a point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Path the content belonged to
    pub file_path: PathBuf,
    /// Full content at capture time
    pub content: String,
    /// Capture timestamp (UTC)
    pub captured_at: DateTime<Utc>,
    /// Shape of the edit that followed this capture
    pub patch_summary: PatchSummary,
    /// Rough token cost of the content (~4 bytes per token)
    pub estimated_cost: u64,
    /// Blake3 checksum of the content
    pub checksum: ContentHash,
}

impl Snapshot {
    /// Capture `content` for `path` now
    #[must_use]
    pub fn capture(path: impl AsRef<Path>, content: impl Into<String>, patch_summary: PatchSummary) -> Self {
        let content = content.into();
        let checksum = ContentHash::compute(content.as_bytes());
        let estimated_cost = (content.len() as u64).div_ceil(4);
        Self {
            file_path: path.as_ref().to_path_buf(),
            content,
            captured_at: Utc::now(),
            patch_summary,
            estimated_cost,
            checksum,
        }
    }

    /// Verify the stored checksum still matches the content
    #[inline]
    #[must_use]
    pub fn verify(&self) -> bool {
        self.checksum == ContentHash::compute(self.content.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn snapshot_checksum_matches_content() {
        let snapshot = Snapshot::capture("a.luau", "print(1)", PatchSummary::default());
        assert!(snapshot.verify());
        assert_eq!(snapshot.estimated_cost, 2);
    }

    #[test]
    fn empty_content_costs_nothing() {
        let snapshot = Snapshot::capture("a.luau", "", PatchSummary::default());
        assert_eq!(snapshot.estimated_cost, 0);
    }

    #[test]
    fn summary_identical_contents_is_empty() {
        let summary = PatchSummary::between("a\nb\nc", "a\nb\nc");
        assert!(summary.is_empty());
    }

    #[test]
    fn summary_pure_addition() {
        let summary = PatchSummary::between("a\nb", "a\nx\ny\nb");
        assert_eq!(summary, PatchSummary {
            lines_added: 2,
            lines_removed: 0,
            lines_modified: 0,
        });
    }

    #[test]
    fn summary_pure_removal() {
        let summary = PatchSummary::between("a\nx\ny\nb", "a\nb");
        assert_eq!(summary, PatchSummary {
            lines_added: 0,
            lines_removed: 2,
            lines_modified: 0,
        });
    }

    #[test]
    fn summary_in_place_change() {
        let summary = PatchSummary::between("a\nold\nb", "a\nnew\nb");
        assert_eq!(summary, PatchSummary {
            lines_added: 0,
            lines_removed: 0,
            lines_modified: 1,
        });
    }

    #[test]
    fn summary_mixed_change() {
        let summary = PatchSummary::between("keep\none\nkeep2", "keep\ntwo\nthree\nkeep2");
        assert_eq!(summary, PatchSummary {
            lines_added: 1,
            lines_removed: 0,
            lines_modified: 1,
        });
    }

    #[test]
    fn summary_from_empty_counts_all_added() {
        let summary = PatchSummary::between("", "a\nb\nc");
        assert_eq!(summary.lines_added, 3);
    }
}
