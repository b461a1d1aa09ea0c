//! Structural validation for Luau/Lua sources
//!
//! The scanner distinguishes code from string/comment content, then checks
//! that every block construct (`function`, `if`, `for`, `while`, `do`,
//! `repeat`) and every `(`/`{` bracket pair has a matching, correctly
//! nested counterpart. It never builds an AST and never resolves
//! identifiers - structure only.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use luaguard_validate::{ValidationMode, Validator};
//!
//! let validator = Validator::new();
//! let result = validator.check_balance("function f()\nend");
//! assert!(result.is_valid());
//! ```

pub mod balance;
pub mod lexer;
pub mod result;
pub mod validator;

pub use balance::loop_body_span;
pub use result::{
    ErrorKind, Severity, ValidationError, ValidationResult, ValidationWarning,
};
pub use validator::{ValidationMode, Validator};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
