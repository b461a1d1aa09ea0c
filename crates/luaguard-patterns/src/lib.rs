//! Anti-pattern detection for Luau/Lua sources
//!
//! A fixed, ordered catalog of textual rules evaluated against file
//! content. Findings are advisory only - they never block a commit.
//! Regex matching is inherently approximate (it cannot fully tell code
//! from strings/comments for every rule); the one rule where precision
//! matters, the busy-wait loop check, leans on the structural scanner
//! from `luaguard-validate` to scope itself to the loop body.

pub mod catalog;
pub mod rule;
pub mod scanner;

pub use catalog::catalog;
pub use rule::{AntiPatternRule, Matcher, PatternSeverity};
pub use scanner::{DetectionHit, Scanner};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
