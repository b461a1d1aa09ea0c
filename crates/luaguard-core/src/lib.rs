//! luaguard core - the safe-mutation pipeline
//!
//! Coordinates a single file mutation attempt: capture a recoverable
//! snapshot, write the proposed content, structurally validate it, and
//! automatically revert to the snapshot when validation fails. History
//! stays queryable for manual multi-step rollback, and committed content
//! can be scanned for known anti-patterns reported as non-blocking
//! diagnostics.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use luaguard_core::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let orchestrator = Orchestrator::new(
//!     GuardConfig::default(),
//!     Arc::new(TokioFileAccess),
//! );
//!
//! let outcome = orchestrator.apply("game/init.luau", "function f()\nend").await?;
//! assert!(outcome.success);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod fs;
pub mod orchestrator;
pub mod report;

pub use config::GuardConfig;
pub use error::{FileError, MutationError};
pub use fs::{FileAccess, MemoryFileAccess, TokioFileAccess};
pub use orchestrator::{MutationOutcome, MutationState, Orchestrator};
pub use report::{DiagnosticReport, ReportEntry, ReportGenerator};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the safe-mutation pipeline
    pub use crate::config::GuardConfig;
    pub use crate::error::{FileError, MutationError};
    pub use crate::fs::{FileAccess, MemoryFileAccess, TokioFileAccess};
    pub use crate::orchestrator::{MutationOutcome, Orchestrator};
    pub use crate::report::{DiagnosticReport, ReportGenerator};
    pub use luaguard_history::{PatchSummary, Snapshot, VersionStore};
    pub use luaguard_patterns::{DetectionHit, Scanner};
    pub use luaguard_validate::{ValidationMode, ValidationResult, Validator};
}
