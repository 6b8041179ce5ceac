//! Output formatting utilities for the CLI.

use console::{style, StyledObject};
use serde::Serialize;

use crate::domain::models::{Issue, PhaseStatus, ValidationReport};

pub trait CommandOutput: Serialize {
    fn to_human(&self) -> String;
    fn to_json(&self) -> serde_json::Value;
}

pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&result.to_json()).unwrap_or_default());
    } else {
        println!("{}", result.to_human());
    }
}

/// Colour a phase status word. `blocked` is derived, so it is passed as a flag.
pub fn styled_status(status: PhaseStatus, blocked: bool) -> StyledObject<&'static str> {
    if blocked {
        return style("blocked").red();
    }
    match status {
        PhaseStatus::Complete => style(status.as_str()).green().bold(),
        PhaseStatus::InProgress => style(status.as_str()).yellow(),
        PhaseStatus::Pending => style(status.as_str()).blue(),
    }
}

/// Human rendering of a validation report's issues, one per line.
pub fn report_lines(report: &ValidationReport) -> Vec<String> {
    let issue_line = |label: StyledObject<&str>, issue: &Issue| {
        format!("  {label} [{}] {}", issue.kind, issue.message)
    };

    let mut lines = Vec::with_capacity(report.errors.len() + report.warnings.len());
    for issue in &report.errors {
        lines.push(issue_line(style("error").red().bold(), issue));
    }
    for issue in &report.warnings {
        lines.push(issue_line(style("warning").yellow(), issue));
    }
    lines
}
