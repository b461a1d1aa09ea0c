//! Validation result types
//!
//! [`ValidationResult`] is produced fresh for every validation call and is
//! never persisted. `is_valid` is true iff the error list is empty; the
//! warning tier exists for completeness but the structural validator never
//! populates it - advisory findings belong to the anti-pattern scanner.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Classification of a structural finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Unterminated string, comment, or long-bracket literal
    Syntax,
    /// Unbalanced block construct or bracket pair
    Structure,
    /// Reserved for future rule classes; never produced by this crate
    Security,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => write!(f, "syntax"),
            Self::Structure => write!(f, "structure"),
            Self::Security => write!(f, "security"),
        }
    }
}

/// How severe a structural finding is
///
/// `Critical` marks findings that prevent the file from loading at all;
/// everything else is `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Recoverable structural problem
    Error,
    /// File cannot be loaded past this point
    Critical,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// A single structural finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// File the finding belongs to, when known
    pub file: Option<String>,
    /// 1-based line number, when attributable
    pub line: Option<u32>,
    /// Finding classification
    pub kind: ErrorKind,
    /// Human-readable description
    pub message: String,
    /// Blocking severity
    pub severity: Severity,
}

impl ValidationError {
    /// Create a `structure` finding at a line
    #[must_use]
    pub fn structure(line: u32, message: impl Into<String>) -> Self {
        Self {
            file: None,
            line: Some(line),
            kind: ErrorKind::Structure,
            message: message.into(),
            severity: Severity::Error,
        }
    }

    /// Create a critical `syntax` finding at a line
    #[must_use]
    pub fn syntax(line: u32, message: impl Into<String>) -> Self {
        Self {
            file: None,
            line: Some(line),
            kind: ErrorKind::Syntax,
            message: message.into(),
            severity: Severity::Critical,
        }
    }

    /// Stable identity of a finding, independent of line drift
    ///
    /// Used by differential validation to recognize findings that already
    /// existed in the previous content even after the edit shifted lines.
    #[must_use]
    pub fn fingerprint(&self) -> (ErrorKind, String) {
        let normalized: String = self
            .message
            .chars()
            .filter(|c| !c.is_ascii_digit())
            .collect();
        (self.kind, normalized)
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(
                f,
                "[{}/{}] line {}: {}",
                self.severity, self.kind, line, self.message
            ),
            None => write!(f, "[{}/{}] {}", self.severity, self.kind, self.message),
        }
    }
}

/// Non-blocking remark attached to a validation pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationWarning {
    /// File the warning belongs to, when known
    pub file: Option<String>,
    /// 1-based line number, when attributable
    pub line: Option<u32>,
    /// Human-readable description
    pub message: String,
}

/// Outcome of a single validation call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Blocking findings, in source order
    pub errors: Vec<ValidationError>,
    /// Advisory remarks, in source order
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    /// Result with no findings
    #[inline]
    #[must_use]
    pub fn valid() -> Self {
        Self::default()
    }

    /// Result carrying the given errors
    #[inline]
    #[must_use]
    pub fn with_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            errors,
            warnings: Vec::new(),
        }
    }

    /// True iff no blocking findings were produced
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Highest severity among the errors, if any
    #[must_use]
    pub fn max_severity(&self) -> Option<Severity> {
        self.errors.iter().map(|e| e.severity).max()
    }

    /// Attach a file name to every finding that lacks one
    #[must_use]
    pub fn for_file(mut self, file: &str) -> Self {
        for error in &mut self.errors {
            error.file.get_or_insert_with(|| file.to_string());
        }
        for warning in &mut self.warnings {
            warning.file.get_or_insert_with(|| file.to_string());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result_is_valid() {
        let result = ValidationResult::valid();
        assert!(result.is_valid());
        assert!(result.max_severity().is_none());
    }

    #[test]
    fn errors_invalidate_result() {
        let result =
            ValidationResult::with_errors(vec![ValidationError::structure(3, "missing close")]);
        assert!(!result.is_valid());
        assert_eq!(result.max_severity(), Some(Severity::Error));
    }

    #[test]
    fn critical_outranks_error() {
        let result = ValidationResult::with_errors(vec![
            ValidationError::structure(1, "missing close"),
            ValidationError::syntax(2, "unterminated string"),
        ]);
        assert_eq!(result.max_severity(), Some(Severity::Critical));
    }

    #[test]
    fn fingerprint_ignores_line_numbers_in_message() {
        let a = ValidationError::structure(1, "missing close for function opened at line 1");
        let b = ValidationError::structure(9, "missing close for function opened at line 42");
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn for_file_fills_missing_names_only() {
        let mut error = ValidationError::structure(1, "oops");
        error.file = Some("keep.luau".to_string());
        let result = ValidationResult {
            errors: vec![error, ValidationError::syntax(2, "bad")],
            warnings: Vec::new(),
        }
        .for_file("fill.luau");

        assert_eq!(result.errors[0].file.as_deref(), Some("keep.luau"));
        assert_eq!(result.errors[1].file.as_deref(), Some("fill.luau"));
    }

    #[test]
    fn error_display_includes_line() {
        let error = ValidationError::structure(7, "orphan 'end'");
        assert_eq!(error.to_string(), "[error/structure] line 7: orphan 'end'");
    }
}
