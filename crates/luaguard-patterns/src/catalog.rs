//! The static anti-pattern catalog
//!
//! Catalog order is fixed and meaningful: scans evaluate rules in this
//! order, not sorted by severity. Loaded once, read-only for the process
//! lifetime.

use crate::rule::{AntiPatternRule, Matcher, PatternSeverity};
use once_cell::sync::Lazy;
use regex::Regex;

fn regex(pattern: &str) -> Matcher {
    Matcher::Regex(Regex::new(pattern).expect("static catalog regex"))
}

static CATALOG: Lazy<Vec<AntiPatternRule>> = Lazy::new(|| {
    vec![
        AntiPatternRule {
            name: "busy-wait-loop",
            description: "infinite loop without a yielding wait call; freezes the scheduler",
            severity: PatternSeverity::Error,
            matcher: Matcher::BusyLoop,
            fix_hint: Some("call task.wait() inside the loop body"),
            example: Some("while true do\n  task.wait(0.1)\n  step()\nend"),
        },
        AntiPatternRule {
            name: "loadstring-use",
            description: "loadstring executes arbitrary strings as code; a code-injection risk",
            severity: PatternSeverity::Error,
            matcher: regex(r"\bloadstring\s*\("),
            fix_hint: Some("replace dynamic code loading with ModuleScripts"),
            example: None,
        },
        AntiPatternRule {
            name: "deprecated-wait",
            description: "global wait() is deprecated and has poor resolution",
            severity: PatternSeverity::Warning,
            matcher: regex(r"(?:^|[^.\w])(wait\s*\()"),
            fix_hint: Some("use task.wait() instead"),
            example: Some("task.wait(0.1)"),
        },
        AntiPatternRule {
            name: "deprecated-spawn",
            description: "global spawn() is deprecated and throttles execution",
            severity: PatternSeverity::Warning,
            matcher: regex(r"(?:^|[^.\w])(spawn\s*\()"),
            fix_hint: Some("use task.spawn() instead"),
            example: Some("task.spawn(function() step() end)"),
        },
        AntiPatternRule {
            name: "deprecated-delay",
            description: "global delay() is deprecated and throttles execution",
            severity: PatternSeverity::Warning,
            matcher: regex(r"(?:^|[^.\w])(delay\s*\()"),
            fix_hint: Some("use task.delay() instead"),
            example: None,
        },
        AntiPatternRule {
            name: "getfenv-setfenv",
            description: "getfenv/setfenv disable Luau optimizations for the whole script",
            severity: PatternSeverity::Warning,
            matcher: regex(r"\b(?:getfenv|setfenv)\s*\("),
            fix_hint: Some("avoid environment manipulation; pass values explicitly"),
            example: None,
        },
        AntiPatternRule {
            name: "instance-new-parent-arg",
            description: "second argument of Instance.new is deprecated; parenting before \
                          configuring causes extra replication work",
            severity: PatternSeverity::Warning,
            matcher: regex(r#"Instance\.new\s*\(\s*"[^"]+"\s*,"#),
            fix_hint: Some("set .Parent last, after configuring the instance"),
            example: Some("local p = Instance.new(\"Part\")\np.Anchored = true\np.Parent = workspace"),
        },
        AntiPatternRule {
            name: "lowercase-connect",
            description: "lowercase :connect() is deprecated casing",
            severity: PatternSeverity::Warning,
            matcher: regex(r":connect\s*\("),
            fix_hint: Some("use :Connect()"),
            example: None,
        },
        AntiPatternRule {
            name: "leftover-print",
            description: "stray print() call, likely leftover debugging output",
            severity: PatternSeverity::Info,
            matcher: regex(r"(?:^|[^.\w])(print\s*\()"),
            fix_hint: Some("remove or route through a logging utility"),
            example: None,
        },
    ]
});

/// The process-wide rule catalog, in evaluation order
#[must_use]
pub fn catalog() -> &'static [AntiPatternRule] {
    &CATALOG
}
