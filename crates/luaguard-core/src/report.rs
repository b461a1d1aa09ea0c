//! Diagnostic report generation
//!
//! Merges structural findings and anti-pattern hits into one
//! severity-grouped report: critical/error structural findings first,
//! then anti-pattern warnings, then informational notes.

use luaguard_patterns::{DetectionHit, PatternSeverity};
use luaguard_validate::{Severity, ValidationResult};
use serde::Serialize;
use std::fmt::Write as _;

/// One rendered diagnostic
#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    /// File the entry belongs to, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// 1-based line, when attributable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// Severity label as shown to the caller
    pub severity: String,
    /// Description of the finding
    pub description: String,
    /// Suggested fix, when one exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix_hint: Option<String>,
    /// Example of the corrected form
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

/// Severity-grouped diagnostic report
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiagnosticReport {
    /// Blocking structural findings, critical first
    pub structural: Vec<ReportEntry>,
    /// Advisory anti-pattern findings (error and warning tiers)
    pub warnings: Vec<ReportEntry>,
    /// Informational notes
    pub notes: Vec<ReportEntry>,
}

impl DiagnosticReport {
    /// True when nothing was found at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.structural.is_empty() && self.warnings.is_empty() && self.notes.is_empty()
    }

    /// Total number of entries across all groups
    #[must_use]
    pub fn len(&self) -> usize {
        self.structural.len() + self.warnings.len() + self.notes.len()
    }

    /// Caller-facing text rendering
    #[must_use]
    pub fn render(&self) -> String {
        if self.is_empty() {
            return "no findings\n".to_string();
        }

        let mut out = String::new();
        let sections: [(&str, &[ReportEntry]); 3] = [
            ("structural errors", &self.structural),
            ("anti-pattern warnings", &self.warnings),
            ("notes", &self.notes),
        ];
        for (title, entries) in sections {
            if entries.is_empty() {
                continue;
            }
            let _ = writeln!(out, "== {title} ==");
            for entry in entries {
                let location = match (&entry.file, entry.line) {
                    (Some(file), Some(line)) => format!("{file}:{line}"),
                    (Some(file), None) => file.clone(),
                    (None, Some(line)) => format!("line {line}"),
                    (None, None) => "<content>".to_string(),
                };
                let _ = writeln!(
                    out,
                    "  [{}] {}: {}",
                    entry.severity, location, entry.description
                );
                if let Some(hint) = &entry.fix_hint {
                    let _ = writeln!(out, "      fix: {hint}");
                }
                if let Some(example) = &entry.example {
                    for line in example.lines() {
                        let _ = writeln!(out, "      | {line}");
                    }
                }
            }
        }
        out
    }
}

/// Builds [`DiagnosticReport`]s from validation results and scan hits
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportGenerator;

impl ReportGenerator {
    /// Create a new generator
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Merge structural findings and anti-pattern hits into one report
    ///
    /// `file` fills in entries that do not already carry a file name.
    #[must_use]
    pub fn generate(
        &self,
        file: Option<&str>,
        validation: &ValidationResult,
        hits: &[DetectionHit],
    ) -> DiagnosticReport {
        let mut report = DiagnosticReport::default();

        // structural findings: critical first, then error, source order
        // preserved within each tier
        for severity in [Severity::Critical, Severity::Error] {
            for error in validation.errors.iter().filter(|e| e.severity == severity) {
                report.structural.push(ReportEntry {
                    file: error.file.clone().or_else(|| file.map(String::from)),
                    line: error.line,
                    severity: format!("{}/{}", error.severity, error.kind),
                    description: error.message.clone(),
                    fix_hint: None,
                    example: None,
                });
            }
        }

        for hit in hits {
            let entry = ReportEntry {
                file: file.map(String::from),
                line: Some(hit.line),
                severity: hit.rule.severity.to_string(),
                description: format!("{}: {}", hit.rule.name, hit.rule.description),
                fix_hint: hit.rule.fix_hint.map(String::from),
                example: hit.rule.example.map(String::from),
            };
            match hit.rule.severity {
                PatternSeverity::Info => report.notes.push(entry),
                PatternSeverity::Warning | PatternSeverity::Error => {
                    report.warnings.push(entry);
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use luaguard_patterns::Scanner;
    use luaguard_validate::Validator;
    use pretty_assertions::assert_eq;

    fn report_for(content: &str) -> DiagnosticReport {
        let validation = Validator::new().check_balance(content);
        let hits = Scanner::new().scan(content);
        ReportGenerator::new().generate(Some("test.luau"), &validation, &hits)
    }

    #[test]
    fn clean_content_renders_no_findings() {
        let report = report_for("local x = 1");
        assert!(report.is_empty());
        assert_eq!(report.render(), "no findings\n");
    }

    #[test]
    fn structural_findings_come_before_warnings() {
        let report = report_for("function broken()\nwait(1)");
        assert!(!report.structural.is_empty());
        assert!(!report.warnings.is_empty());

        let rendered = report.render();
        let structural_pos = rendered.find("structural errors").unwrap();
        let warnings_pos = rendered.find("anti-pattern warnings").unwrap();
        assert!(structural_pos < warnings_pos);
    }

    #[test]
    fn critical_findings_sort_ahead_of_errors() {
        // unmatched function (error) on line 1, unterminated string
        // (critical) later in the file
        let report = report_for("function broken()\nlocal s = 'oops");
        assert!(report.structural[0].severity.starts_with("critical"));
    }

    #[test]
    fn info_hits_land_in_notes() {
        let report = report_for("print('debug')");
        assert!(report.structural.is_empty());
        assert!(report.warnings.is_empty());
        assert_eq!(report.notes.len(), 1);
        assert!(report.notes[0].description.contains("leftover-print"));
    }

    #[test]
    fn entries_carry_file_and_line() {
        let report = report_for("wait(1)");
        assert_eq!(report.warnings[0].file.as_deref(), Some("test.luau"));
        assert_eq!(report.warnings[0].line, Some(1));
    }

    #[test]
    fn fix_hints_and_examples_render() {
        let report = report_for("while true do\n  spin()\nend");
        let rendered = report.render();
        assert!(rendered.contains("fix: call task.wait() inside the loop body"));
        assert!(rendered.contains("| while true do"));
    }

    #[test]
    fn report_serializes_to_json() {
        let report = report_for("wait(1)");
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("deprecated-wait"));
    }

    #[test]
    fn len_counts_all_groups() {
        let report = report_for("function broken()\nwait(1)\nprint(2)");
        assert_eq!(
            report.len(),
            report.structural.len() + report.warnings.len() + report.notes.len()
        );
        assert!(report.len() >= 3);
    }
}
