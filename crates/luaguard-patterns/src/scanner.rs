//! The anti-pattern scanner
//!
//! Evaluates the catalog in order against content; each rule contributes
//! at most one hit, attributed to its first occurrence. The scanner holds
//! no state between calls - hits are recomputed on every scan because
//! file content changes between calls.

use crate::catalog::catalog;
use crate::rule::AntiPatternRule;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Longest matched-text fragment carried in a hit
const MATCH_DISPLAY_LIMIT: usize = 80;

/// One detected anti-pattern occurrence
#[derive(Debug, Clone)]
pub struct DetectionHit {
    /// The rule that fired
    pub rule: &'static AntiPatternRule,
    /// 1-based line of the first occurrence
    pub line: u32,
    /// Matched text, truncated for display
    pub matched_text: String,
}

// Flattened view: the borrowed rule is reduced to its name and severity
// so hits can travel over a JSON surface.
impl Serialize for DetectionHit {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("DetectionHit", 4)?;
        state.serialize_field("rule", self.rule.name)?;
        state.serialize_field("severity", &self.rule.severity)?;
        state.serialize_field("line", &self.line)?;
        state.serialize_field("matched_text", &self.matched_text)?;
        state.end()
    }
}

/// Map a 0-based byte offset to a 1-based line number
///
/// Accumulates line lengths (+1 per line break) until the offset falls
/// within a line's span; the first containing line wins on boundary ties.
fn line_of(content: &str, offset: usize) -> u32 {
    let mut line: u32 = 1;
    let mut consumed = 0;
    for text in content.split('\n') {
        let span_end = consumed + text.len() + 1;
        if offset < span_end {
            return line;
        }
        consumed = span_end;
        line += 1;
    }
    line.saturating_sub(1).max(1)
}

fn truncate_for_display(text: &str) -> String {
    if text.chars().count() <= MATCH_DISPLAY_LIMIT {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(MATCH_DISPLAY_LIMIT).collect();
        out.push('…');
        out
    }
}

/// Stateless scanner over the static catalog
#[derive(Debug, Clone, Copy, Default)]
pub struct Scanner;

impl Scanner {
    /// Create a new scanner
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Scan `content`, producing hits in catalog order
    ///
    /// Flag-the-first-occurrence policy: a rule matching five times still
    /// yields exactly one hit, at the earliest match.
    #[must_use]
    pub fn scan(&self, content: &str) -> Vec<DetectionHit> {
        let mut hits = Vec::new();
        for rule in catalog() {
            if let Some((offset, text)) = rule.matcher.first_match(content) {
                hits.push(DetectionHit {
                    rule,
                    line: line_of(content, offset),
                    matched_text: truncate_for_display(text),
                });
            }
        }
        tracing::debug!(hits = hits.len(), "anti-pattern scan complete");
        hits
    }
}
