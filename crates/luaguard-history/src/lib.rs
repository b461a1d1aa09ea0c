//! Snapshot history for the safe-mutation pipeline
//!
//! [`VersionStore`] owns every [`Snapshot`]: a pre-write capture of a
//! file's content, appended per path in chronological order. History is
//! in-memory by design - the store's contract does not depend on memory
//! residency, so a durable backend can replace it without touching
//! callers.

pub mod hash;
pub mod snapshot;
pub mod store;

pub use hash::ContentHash;
pub use snapshot::{PatchSummary, Snapshot};
pub use store::{HistoryError, VersionStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
