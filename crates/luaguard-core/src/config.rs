//! Pipeline configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the mutation pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// File suffixes subject to structural validation; anything else
    /// commits without it
    pub governed_extensions: Vec<String>,
    /// Largest proposed content accepted, in bytes
    pub max_file_size: usize,
    /// Optional per-path snapshot cap; unbounded when absent. The store
    /// treats a cap below 1 as 1 - the newest snapshot is never evicted.
    pub history_cap: Option<usize>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            governed_extensions: vec!["lua".to_string(), "luau".to_string()],
            max_file_size: 10 * 1024 * 1024, // 10MB
            history_cap: None,
        }
    }
}

impl GuardConfig {
    /// Whether `path` falls under structural validation
    ///
    /// Extension comparison is case-insensitive; files without an
    /// extension are not governed.
    #[must_use]
    pub fn is_governed(&self, path: impl AsRef<Path>) -> bool {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.governed_extensions
                    .iter()
                    .any(|g| g.eq_ignore_ascii_case(ext))
            })
    }
}
