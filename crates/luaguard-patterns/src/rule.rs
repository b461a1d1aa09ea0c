//! Anti-pattern rule definitions

use luaguard_validate::loop_body_span;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Advisory severity scale, separate from the structural validator's
///
/// Even `Error`-level rules never prevent a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternSeverity {
    /// Informational note
    Info,
    /// Should be fixed
    Warning,
    /// Known to cause real problems
    Error,
}

impl Display for PatternSeverity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

static WAIT_CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:task\s*\.\s*)?wait\s*\(").expect("static regex"));

/// How a rule locates its first occurrence
#[derive(Debug)]
pub enum Matcher {
    /// First match of a compiled pattern, anywhere in the content
    Regex(Regex),
    /// `while true do` loop whose own body never yields
    ///
    /// Scoped to the enclosing block: a `wait` call elsewhere in the file
    /// does not excuse the loop. Occurrences inside comments or strings
    /// are rejected by the structural scanner.
    BusyLoop,
}

static WHILE_TRUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bwhile\s+true\s+do\b").expect("static regex"));

impl Matcher {
    /// Byte offset and matched text of the first occurrence, if any
    #[must_use]
    pub fn first_match<'c>(&self, content: &'c str) -> Option<(usize, &'c str)> {
        match self {
            // group 1, when present, isolates the pattern from a
            // boundary-guard prefix such as `(?:^|[^.\w])`
            Self::Regex(re) => re.captures(content).and_then(|caps| {
                let m = caps.get(1).or_else(|| caps.get(0))?;
                Some((m.start(), m.as_str()))
            }),
            Self::BusyLoop => {
                for m in WHILE_TRUE.find_iter(content) {
                    let Some((start, end)) = loop_body_span(content, m.start()) else {
                        // not a real loop keyword (comment/string) or never closed
                        continue;
                    };
                    if !WAIT_CALL.is_match(&content[start..end]) {
                        return Some((m.start(), m.as_str()));
                    }
                }
                None
            }
        }
    }
}

/// One entry of the anti-pattern catalog
///
/// Static for the process lifetime; the catalog is loaded once and
/// read-only afterwards.
#[derive(Debug)]
pub struct AntiPatternRule {
    /// Unique rule name
    pub name: &'static str,
    /// What the pattern means and why it is a problem
    pub description: &'static str,
    /// Advisory severity
    pub severity: PatternSeverity,
    /// How the rule finds its first occurrence
    pub matcher: Matcher,
    /// Suggested fix, when one exists
    pub fix_hint: Option<&'static str>,
    /// Short example of the corrected form
    pub example: Option<&'static str>,
}
