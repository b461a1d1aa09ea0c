//! The version store
//!
//! Keyed, append-oriented snapshot history per file path. Rollback is a
//! read of history - the store never touches the filesystem; writing a
//! restored payload back to disk is the orchestrator's job.

use crate::snapshot::{PatchSummary, Snapshot};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};

/// Failures when reading history
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    /// No snapshots recorded for the path
    #[error("no rollback history for path: {path}")]
    PathNotFound {
        /// The unknown path
        path: PathBuf,
    },

    /// Version index outside the recorded range
    #[error("version {version} out of range for {path} ({available} snapshots)")]
    VersionNotFound {
        /// The requested path
        path: PathBuf,
        /// The out-of-range index
        version: usize,
        /// How many snapshots exist
        available: usize,
    },
}

/// Append-only snapshot history, one ordered list per path
///
/// Index 0 is the oldest snapshot; the last index is the content that
/// immediately preceded the latest attempted mutation. Interior mutability
/// behind a [`RwLock`] keeps concurrent save/rollback calls serialized.
#[derive(Debug, Default)]
pub struct VersionStore {
    histories: RwLock<IndexMap<PathBuf, Vec<Snapshot>>>,
    /// When set, oldest snapshots are evicted once a path exceeds the cap
    max_per_path: Option<usize>,
}

impl VersionStore {
    /// Create an unbounded store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that keeps at most `cap` snapshots per path
    ///
    /// The newest snapshot is never evicted: it is the rollback target
    /// for the mutation in flight, so a cap below 1 is treated as 1.
    #[inline]
    #[must_use]
    pub fn with_cap(cap: usize) -> Self {
        Self {
            histories: RwLock::new(IndexMap::new()),
            max_per_path: Some(cap.max(1)),
        }
    }

    /// Append a snapshot of `content` for `path`
    ///
    /// Always succeeds; no validation happens here.
    pub fn save_snapshot(
        &self,
        path: impl AsRef<Path>,
        content: impl Into<String>,
        patch_summary: PatchSummary,
    ) {
        let path = path.as_ref();
        let snapshot = Snapshot::capture(path, content, patch_summary);
        tracing::debug!(
            path = %path.display(),
            checksum = %snapshot.checksum.short(),
            cost = snapshot.estimated_cost,
            "snapshot saved"
        );

        let mut histories = self.histories.write();
        let history = histories.entry(path.to_path_buf()).or_default();
        history.push(snapshot);
        if let Some(cap) = self.max_per_path {
            while history.len() > cap {
                history.remove(0);
            }
        }
    }

    /// Fetch a snapshot for rollback
    ///
    /// `version` is the chronological index (0 = oldest); omitted means
    /// the most recent capture.
    ///
    /// # Errors
    /// [`HistoryError::PathNotFound`] for an unknown path,
    /// [`HistoryError::VersionNotFound`] for an out-of-range index.
    pub fn rollback(
        &self,
        path: impl AsRef<Path>,
        version: Option<usize>,
    ) -> Result<Snapshot, HistoryError> {
        let path = path.as_ref();
        let histories = self.histories.read();
        let history = histories
            .get(path)
            .filter(|h| !h.is_empty())
            .ok_or_else(|| HistoryError::PathNotFound {
                path: path.to_path_buf(),
            })?;

        let snapshot = match version {
            None => history.last(),
            Some(v) => history.get(v),
        }
        .ok_or_else(|| HistoryError::VersionNotFound {
            path: path.to_path_buf(),
            version: version.unwrap_or(0),
            available: history.len(),
        })?;

        Ok(snapshot.clone())
    }

    /// Snapshot lists per path, in path insertion order
    ///
    /// With a path argument, the result contains at most that one entry.
    #[must_use]
    pub fn history(&self, path: Option<&Path>) -> IndexMap<PathBuf, Vec<Snapshot>> {
        let histories = self.histories.read();
        match path {
            None => histories.clone(),
            Some(p) => histories
                .get_key_value(p)
                .map(|(k, v)| IndexMap::from_iter([(k.clone(), v.clone())]))
                .unwrap_or_default(),
        }
    }

    /// Number of snapshots recorded for `path`
    #[must_use]
    pub fn version_count(&self, path: impl AsRef<Path>) -> usize {
        self.histories
            .read()
            .get(path.as_ref())
            .map_or(0, Vec::len)
    }

    /// Purge history for one path, or everything when omitted
    pub fn clear(&self, path: Option<&Path>) {
        let mut histories = self.histories.write();
        match path {
            None => {
                tracing::debug!("clearing all rollback history");
                histories.clear();
            }
            Some(p) => {
                tracing::debug!(path = %p.display(), "clearing rollback history");
                histories.shift_remove(p);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn store_with(entries: &[(&str, &str)]) -> VersionStore {
        let store = VersionStore::new();
        for (path, content) in entries {
            store.save_snapshot(path, *content, PatchSummary::default());
        }
        store
    }

    #[test]
    fn rollback_without_version_returns_latest() {
        let store = store_with(&[("a.luau", "v1"), ("a.luau", "v2")]);
        let snapshot = store.rollback("a.luau", None).unwrap();
        assert_eq!(snapshot.content, "v2");
    }

    #[test]
    fn rollback_by_index_returns_exact_version() {
        let store = store_with(&[("a.luau", "v1"), ("a.luau", "v2")]);
        let snapshot = store.rollback("a.luau", Some(0)).unwrap();
        assert_eq!(snapshot.content, "v1");
    }

    #[test]
    fn rollback_unknown_path_is_not_found() {
        let store = VersionStore::new();
        let err = store.rollback("missing.luau", None).unwrap_err();
        assert!(matches!(err, HistoryError::PathNotFound { .. }));
    }

    #[test]
    fn rollback_out_of_range_version_is_not_found() {
        let store = store_with(&[("a.luau", "v1")]);
        let err = store.rollback("a.luau", Some(5)).unwrap_err();
        assert!(matches!(
            err,
            HistoryError::VersionNotFound {
                version: 5,
                available: 1,
                ..
            }
        ));
    }

    #[test]
    fn history_preserves_chronological_order() {
        let store = store_with(&[("a.luau", "v1"), ("a.luau", "v2"), ("a.luau", "v3")]);
        let all = store.history(Some(Path::new("a.luau")));
        let contents: Vec<_> = all[Path::new("a.luau")]
            .iter()
            .map(|s| s.content.as_str())
            .collect();
        assert_eq!(contents, vec!["v1", "v2", "v3"]);
    }

    #[test]
    fn history_without_path_returns_all_paths() {
        let store = store_with(&[("a.luau", "a1"), ("b.luau", "b1")]);
        let all = store.history(None);
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn clear_single_path_keeps_others() {
        let store = store_with(&[("a.luau", "a1"), ("b.luau", "b1")]);
        store.clear(Some(Path::new("a.luau")));
        assert_eq!(store.version_count("a.luau"), 0);
        assert_eq!(store.version_count("b.luau"), 1);
    }

    #[test]
    fn clear_all_purges_everything() {
        let store = store_with(&[("a.luau", "a1"), ("b.luau", "b1")]);
        store.clear(None);
        assert!(store.history(None).is_empty());
    }

    #[test]
    fn cap_evicts_oldest_first() {
        let store = VersionStore::with_cap(2);
        for content in ["v1", "v2", "v3"] {
            store.save_snapshot("a.luau", content, PatchSummary::default());
        }
        assert_eq!(store.version_count("a.luau"), 2);
        assert_eq!(store.rollback("a.luau", Some(0)).unwrap().content, "v2");
        assert_eq!(store.rollback("a.luau", None).unwrap().content, "v3");
    }

    #[test]
    fn cap_of_zero_still_keeps_the_latest_snapshot() {
        let store = VersionStore::with_cap(0);
        store.save_snapshot("a.luau", "v1", PatchSummary::default());
        store.save_snapshot("a.luau", "v2", PatchSummary::default());
        assert_eq!(store.version_count("a.luau"), 1);
        assert_eq!(store.rollback("a.luau", None).unwrap().content, "v2");
    }

    #[test]
    fn save_never_fails_on_odd_content() {
        let store = VersionStore::new();
        store.save_snapshot("a.luau", "", PatchSummary::default());
        store.save_snapshot("a.luau", "function f(", PatchSummary::default());
        assert_eq!(store.version_count("a.luau"), 2);
    }
}
