//! Validator entry points
//!
//! [`Validator::check_balance`] audits a single piece of content;
//! [`Validator::validate`] compares a proposed edit against the previous
//! content, optionally forgiving findings the file already had before the
//! edit (differential mode).

use crate::balance;
use crate::result::ValidationResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How pre-existing breakage in the previous content is treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Report every finding in the proposed content
    #[default]
    Strict,
    /// Drop findings the previous content already produced; the edit is
    /// not blamed for breakage that predates it
    Differential,
}

/// Structural validator for Luau/Lua content
///
/// Stateless and cheap to construct; one instance can serve any number
/// of validation calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator;

impl Validator {
    /// Create a new validator
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Check block/bracket balance of `content` with no baseline
    #[must_use]
    pub fn check_balance(&self, content: &str) -> ValidationResult {
        let errors = balance::check(content);
        tracing::debug!(errors = errors.len(), "balance check complete");
        ValidationResult::with_errors(errors)
    }

    /// Validate proposed content against the previous content
    ///
    /// In [`ValidationMode::Strict`] this is equivalent to
    /// [`check_balance`](Self::check_balance) on the proposed content. In
    /// [`ValidationMode::Differential`] findings whose fingerprint also
    /// appears when scanning `previous` are dropped. Fingerprints are
    /// counted as a multiset: each baseline occurrence forgives exactly
    /// one proposed finding, so an edit that adds a second instance of a
    /// pre-existing problem is still reported.
    #[must_use]
    pub fn validate(
        &self,
        previous: &str,
        proposed: &str,
        mode: ValidationMode,
    ) -> ValidationResult {
        let mut result = self.check_balance(proposed);
        if mode == ValidationMode::Differential && !result.is_valid() {
            let mut baseline: HashMap<_, usize> = HashMap::new();
            for error in balance::check(previous) {
                *baseline.entry(error.fingerprint()).or_default() += 1;
            }
            result.errors.retain(|e| match baseline.get_mut(&e.fingerprint()) {
                Some(count) if *count > 0 => {
                    *count -= 1;
                    false
                }
                _ => true,
            });
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const BALANCED: &str = "function f()\n  if true then\n    print(1)\n  end\nend";

    #[test]
    fn balanced_function_is_valid() {
        let result = Validator::new().check_balance(BALANCED);
        assert!(result.is_valid());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn missing_end_is_invalid() {
        let result =
            Validator::new().check_balance("function f()\n  if true then\n    print(1)\n  end");
        assert!(!result.is_valid());
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].line, Some(1));
    }

    #[test]
    fn validator_never_emits_warnings() {
        let result = Validator::new().check_balance("end end end");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn strict_mode_reports_pre_existing_breakage() {
        let broken = "function f()";
        let result = Validator::new().validate(broken, broken, ValidationMode::Strict);
        assert!(!result.is_valid());
    }

    #[test]
    fn differential_mode_forgives_pre_existing_breakage() {
        let broken = "function f()";
        let edited = "function f()\nlocal x = 1";
        let result = Validator::new().validate(broken, edited, ValidationMode::Differential);
        assert!(result.is_valid());
    }

    #[test]
    fn differential_mode_still_reports_new_breakage() {
        let previous = "function f()"; // already missing an end
        let edited = "function f()\nif x then"; // adds a second problem
        let result = Validator::new().validate(previous, edited, ValidationMode::Differential);
        assert!(!result.is_valid());
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].message.contains("if"));
    }

    #[test]
    fn differential_mode_reports_a_second_instance_of_old_breakage() {
        let previous = "function f()"; // one unclosed function
        let edited = "function f()\nfunction g()"; // now two
        let result = Validator::new().validate(previous, edited, ValidationMode::Differential);
        assert!(!result.is_valid());
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].message.contains("function"));
    }

    #[test]
    fn differential_on_clean_previous_matches_strict() {
        let previous = "print(1)";
        let edited = "function f()";
        let strict = Validator::new().validate(previous, edited, ValidationMode::Strict);
        let diff = Validator::new().validate(previous, edited, ValidationMode::Differential);
        assert_eq!(strict, diff);
    }

    /// Build nested balanced source with the given shape choices.
    fn nested(levels: &[u8]) -> String {
        let mut src = String::new();
        for (depth, kind) in levels.iter().enumerate() {
            let indent = "  ".repeat(depth);
            match kind % 4 {
                0 => src.push_str(&format!("{indent}function f{depth}()\n")),
                1 => src.push_str(&format!("{indent}if x{depth} then\n")),
                2 => src.push_str(&format!("{indent}while x{depth} do\n")),
                _ => src.push_str(&format!("{indent}for i{depth} = 1, 2 do\n")),
            }
        }
        for depth in (0..levels.len()).rev() {
            src.push_str(&format!("{}end\n", "  ".repeat(depth)));
        }
        src
    }

    proptest! {
        #[test]
        fn prop_properly_nested_blocks_are_valid(levels in proptest::collection::vec(any::<u8>(), 0..12)) {
            let src = nested(&levels);
            let result = Validator::new().check_balance(&src);
            prop_assert!(result.is_valid(), "expected valid, got {:?}", result.errors);
        }

        #[test]
        fn prop_dropping_last_end_invalidates(levels in proptest::collection::vec(any::<u8>(), 1..12)) {
            let src = nested(&levels);
            let truncated = src.trim_end().trim_end_matches("end").to_string();
            let result = Validator::new().check_balance(&truncated);
            prop_assert!(!result.is_valid());
        }

        #[test]
        fn prop_check_balance_is_deterministic(levels in proptest::collection::vec(any::<u8>(), 0..8)) {
            let src = nested(&levels);
            let a = Validator::new().check_balance(&src);
            let b = Validator::new().check_balance(&src);
            prop_assert_eq!(a, b);
        }
    }
}
