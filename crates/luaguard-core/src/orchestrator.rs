//! The mutation orchestrator
//!
//! Drives one file mutation attempt through its state machine:
//!
//! ```text
//! Idle -> Snapshotting -> Validating -> {Committed | RollingBack} -> {Idle | Failed}
//! ```
//!
//! The orchestrator holds exactly one pending previous-content reference
//! per path; a second attempt for the same path is rejected until the
//! first reaches Committed or Failed. There is no cancellation: once an
//! attempt begins, it runs to an outcome.

use crate::config::GuardConfig;
use crate::error::{FileError, MutationError};
use crate::fs::FileAccess;
use luaguard_history::{PatchSummary, VersionStore};
use luaguard_validate::{ValidationMode, ValidationResult, Validator};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Fatal outcome message when the rollback write itself fails
///
/// Surfaced verbatim to the caller; the on-disk state may now differ
/// from both the proposed and the last-known-good content.
pub const ROLLBACK_FAILED: &str = "critical: syntax invalid and rollback failed";

/// Phase of an in-flight mutation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationState {
    /// No in-flight mutation for the path
    Idle,
    /// Pre-write snapshot being captured
    Snapshotting,
    /// Proposed content under structural validation
    Validating,
    /// Mutation accepted; the snapshot stays in history
    Committed,
    /// Validation failed; restoring the snapshot
    RollingBack,
    /// Rollback write failed; unrecoverable without manual action
    Failed,
}

impl MutationState {
    /// Whether `next` is a legal successor of `self`
    #[must_use]
    pub fn can_transition(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Snapshotting)
                | (Self::Snapshotting, Self::Validating | Self::Committed)
                | (Self::Validating, Self::Committed | Self::RollingBack)
                | (Self::RollingBack, Self::Idle | Self::Failed)
        )
    }
}

/// Result of a mutation attempt - the sole contract surfaced to callers
#[derive(Debug, Clone, Serialize)]
pub struct MutationOutcome {
    /// True iff the proposed content was committed
    pub success: bool,
    /// Validation details, when structural validation ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationResult>,
    /// True when the previous content was restored
    pub rollback_performed: bool,
    /// Fatal error text, when the pipeline could not recover
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MutationOutcome {
    fn committed(validation: Option<ValidationResult>) -> Self {
        Self {
            success: true,
            validation,
            rollback_performed: false,
            error: None,
        }
    }

    fn rolled_back(validation: ValidationResult) -> Self {
        Self {
            success: false,
            validation: Some(validation),
            rollback_performed: true,
            error: None,
        }
    }

    fn fatal(validation: ValidationResult) -> Self {
        Self {
            success: false,
            validation: Some(validation),
            rollback_performed: false,
            error: Some(ROLLBACK_FAILED.to_string()),
        }
    }
}

/// Coordinates snapshot, validation, and rollback for file mutations
///
/// Explicitly constructed with its collaborators injected - no ambient
/// or static instance. Owns the in-flight bookkeeping; the
/// [`VersionStore`] owns all snapshots.
pub struct Orchestrator {
    config: GuardConfig,
    store: Arc<VersionStore>,
    validator: Validator,
    files: Arc<dyn FileAccess>,
    in_flight: Mutex<HashMap<PathBuf, MutationState>>,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("config", &self.config)
            .field("in_flight", &self.in_flight.lock().len())
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    /// Create an orchestrator with a fresh version store
    #[must_use]
    pub fn new(config: GuardConfig, files: Arc<dyn FileAccess>) -> Self {
        let store = match config.history_cap {
            Some(cap) => VersionStore::with_cap(cap),
            None => VersionStore::new(),
        };
        Self::with_store(config, files, Arc::new(store))
    }

    /// Create an orchestrator around an existing version store
    #[must_use]
    pub fn with_store(
        config: GuardConfig,
        files: Arc<dyn FileAccess>,
        store: Arc<VersionStore>,
    ) -> Self {
        Self {
            config,
            store,
            validator: Validator::new(),
            files,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// The version store backing this orchestrator
    #[inline]
    #[must_use]
    pub fn store(&self) -> &Arc<VersionStore> {
        &self.store
    }

    /// The active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Run one full mutation attempt for `path`
    ///
    /// Snapshots the current content, writes `proposed`, validates it
    /// when the extension is governed, and rolls back on failure. The
    /// returned [`MutationOutcome`] carries the result either way.
    ///
    /// # Errors
    /// [`MutationError::AlreadyInFlight`] when another attempt for the
    /// path has not completed, [`MutationError::ContentTooLarge`] when
    /// `proposed` exceeds the configured limit, and
    /// [`MutationError::File`] for read or initial-write failures.
    /// Validation failures are not errors: they surface in the outcome.
    pub async fn apply(
        &self,
        path: impl AsRef<Path>,
        proposed: &str,
    ) -> Result<MutationOutcome, MutationError> {
        let path = path.as_ref();
        if proposed.len() > self.config.max_file_size {
            return Err(MutationError::ContentTooLarge {
                size: proposed.len(),
                max: self.config.max_file_size,
            });
        }

        self.begin(path)?;
        let result = self.run(path, proposed).await;
        self.release(path);
        result
    }

    /// Restore a snapshot from history to disk
    ///
    /// `version` is the chronological index (0 = oldest); omitted means
    /// the most recent snapshot.
    ///
    /// # Errors
    /// [`MutationError::History`] when the path is unknown or the
    /// version is out of range - recoverable, treat as "nothing to roll
    /// back". [`MutationError::File`] when the restore write fails.
    pub async fn manual_rollback(
        &self,
        path: impl AsRef<Path>,
        version: Option<usize>,
    ) -> Result<MutationOutcome, MutationError> {
        let path = path.as_ref();
        let snapshot = self.store.rollback(path, version)?;
        self.files.write(path, &snapshot.content).await?;
        tracing::info!(
            path = %path.display(),
            version = ?version,
            checksum = %snapshot.checksum.short(),
            "manual rollback restored"
        );
        Ok(MutationOutcome {
            success: true,
            validation: None,
            rollback_performed: true,
            error: None,
        })
    }

    async fn run(&self, path: &Path, proposed: &str) -> Result<MutationOutcome, MutationError> {
        self.advance(path, MutationState::Snapshotting);
        let previous = match self.files.read(path).await {
            Ok(content) => content,
            // new file: snapshot an empty baseline so a failed first
            // write still has a rollback target
            Err(FileError::NotFound { .. }) => String::new(),
            Err(e) => return Err(e.into()),
        };
        self.store.save_snapshot(
            path,
            previous.clone(),
            PatchSummary::between(&previous, proposed),
        );

        self.files.write(path, proposed).await?;

        if !self.config.is_governed(path) {
            self.advance(path, MutationState::Committed);
            return Ok(MutationOutcome::committed(None));
        }

        self.advance(path, MutationState::Validating);
        let validation = self
            .validator
            .validate(&previous, proposed, ValidationMode::Strict)
            .for_file(&path.display().to_string());

        if validation.is_valid() {
            self.advance(path, MutationState::Committed);
            return Ok(MutationOutcome::committed(Some(validation)));
        }

        self.advance(path, MutationState::RollingBack);
        tracing::warn!(
            path = %path.display(),
            errors = validation.errors.len(),
            "structural validation failed, rolling back"
        );

        let snapshot = self.store.rollback(path, None)?;
        match self.files.write(path, &snapshot.content).await {
            Ok(()) => Ok(MutationOutcome::rolled_back(validation)),
            Err(e) => {
                self.advance(path, MutationState::Failed);
                tracing::error!(
                    path = %path.display(),
                    error = %e,
                    "rollback write failed; on-disk state is unknown"
                );
                Ok(MutationOutcome::fatal(validation))
            }
        }
    }

    fn begin(&self, path: &Path) -> Result<(), MutationError> {
        let mut in_flight = self.in_flight.lock();
        if in_flight.contains_key(path) {
            return Err(MutationError::AlreadyInFlight {
                path: path.to_path_buf(),
            });
        }
        in_flight.insert(path.to_path_buf(), MutationState::Idle);
        Ok(())
    }

    fn advance(&self, path: &Path, next: MutationState) {
        let mut in_flight = self.in_flight.lock();
        if let Some(state) = in_flight.get_mut(path) {
            tracing::debug!(path = %path.display(), from = ?state, to = ?next, "state transition");
            *state = next;
        }
    }

    fn release(&self, path: &Path) {
        self.in_flight.lock().remove(path);
    }
}
