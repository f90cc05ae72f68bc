//! Output formatting for a coverage diff.

use std::fmt::Write;

use crate::diff::{DiffKind, DiffReport};

/// Trait for rendering diff reports.
pub trait ReportFormatter {
    /// Render the report to a string.
    fn format(&self, report: &DiffReport) -> String;
}

/// Plain text formatter, one line per diff element.
pub struct TextFormatter;

impl ReportFormatter for TextFormatter {
    fn format(&self, report: &DiffReport) -> String {
        let mut out = String::new();

        if report.is_empty() {
            out.push_str("Coverage is equivalent: no differences.\n");
            return out;
        }

        writeln!(out, "Coverage differs: {} differences", report.len()).unwrap();

        if !report.classes.is_empty() {
            writeln!(out, "\nClasses:").unwrap();
            for d in &report.classes {
                writeln!(out, "  {} {}", marker(d.kind), d.class).unwrap();
            }
        }

        if !report.lines.is_empty() {
            writeln!(out, "\nLines:").unwrap();
            for d in &report.lines {
                match (d.before, d.after) {
                    (Some(before), Some(after)) => {
                        writeln!(out, "  ~ {}:{}  {} -> {}", d.class, d.line, before, after)
                            .unwrap();
                    }
                    (before, after) => {
                        let status = before.or(after).map(|s| s.to_string()).unwrap_or_default();
                        writeln!(
                            out,
                            "  {} {}:{}  {}",
                            marker(d.kind),
                            d.class,
                            d.line,
                            status
                        )
                        .unwrap();
                    }
                }
            }
        }

        if !report.jumps.is_empty() {
            writeln!(out, "\nJumps:").unwrap();
            for d in &report.jumps {
                write!(out, "  {} {}:{} jump {}", marker(d.kind), d.class, d.line, d.index)
                    .unwrap();
                match (d.before, d.after) {
                    (Some(before), Some(after)) => {
                        writeln!(out, "  {} -> {}", jump_outcome(before), jump_outcome(after))
                            .unwrap();
                    }
                    (before, after) => {
                        let outcome = before.or(after).map(jump_outcome).unwrap_or_default();
                        writeln!(out, "  {}", outcome).unwrap();
                    }
                }
            }
        }

        if !report.switches.is_empty() {
            writeln!(out, "\nSwitches:").unwrap();
            for d in &report.switches {
                write!(
                    out,
                    "  {} {}:{} switch {}",
                    marker(d.kind),
                    d.class,
                    d.line,
                    d.index
                )
                .unwrap();
                match (&d.before, &d.after) {
                    (Some(before), Some(after)) => {
                        writeln!(
                            out,
                            "  cases {} -> {}",
                            switch_outcome(before),
                            switch_outcome(after)
                        )
                        .unwrap();
                    }
                    (before, after) => {
                        let outcome = before
                            .as_ref()
                            .or(after.as_ref())
                            .map(|o| switch_outcome(o))
                            .unwrap_or_default();
                        writeln!(out, "  cases {}", outcome).unwrap();
                    }
                }
            }
        }

        out
    }
}

/// JSON formatter for machine consumption.
pub struct JsonFormatter;

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &DiffReport) -> String {
        let mut out = serde_json::to_string_pretty(report).unwrap();
        out.push('\n');
        out
    }
}

fn marker(kind: DiffKind) -> char {
    match kind {
        DiffKind::Added => '+',
        DiffKind::Removed => '-',
        DiffKind::Changed => '~',
    }
}

/// Render a jump outcome pair, e.g. "true=taken false=missed".
fn jump_outcome((true_taken, false_taken): (bool, bool)) -> String {
    format!(
        "true={} false={}",
        taken(true_taken),
        taken(false_taken)
    )
}

/// Render a switch outcome as one digit per case, e.g. "101".
fn switch_outcome(cases: &[bool]) -> String {
    cases.iter().map(|&c| if c { '1' } else { '0' }).collect()
}

fn taken(hit: bool) -> &'static str {
    if hit {
        "taken"
    } else {
        "missed"
    }
}
