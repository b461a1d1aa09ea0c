//! Error types for the mutation pipeline
//!
//! Structural validation failures are NOT errors here - the orchestrator
//! handles them via automatic rollback and surfaces them inside the
//! outcome. These types cover the conditions that escape that envelope:
//! file access failures and pipeline misuse.

use luaguard_history::HistoryError;
use std::path::PathBuf;

/// Failures from the file access collaborator
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    /// Path does not exist
    #[error("file not found: {path}")]
    NotFound {
        /// The missing path
        path: PathBuf,
    },

    /// Underlying IO failure
    #[error("io error on {path}: {source}")]
    Io {
        /// The path being accessed
        path: PathBuf,
        /// The OS-level cause
        #[source]
        source: std::io::Error,
    },
}

impl FileError {
    /// Create an IO error for a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failures of a mutation attempt, before the outcome stage
#[derive(Debug, thiserror::Error)]
pub enum MutationError {
    /// A mutation for this path is already between begin and
    /// committed/failed; the rollback target would be lost
    #[error("mutation already in flight for path: {path}")]
    AlreadyInFlight {
        /// The contended path
        path: PathBuf,
    },

    /// Proposed content exceeds the configured size limit
    #[error("proposed content too large: {size} bytes (max: {max})")]
    ContentTooLarge {
        /// Proposed content size
        size: usize,
        /// Configured limit
        max: usize,
    },

    /// File collaborator failure outside the rollback path
    #[error(transparent)]
    File(#[from] FileError),

    /// Version store lookup failure (manual rollback)
    #[error(transparent)]
    History(#[from] HistoryError),
}
