//! Validation issues and reports.
//!
//! Rule violations are values, not errors: the caller renders them and
//! decides whether to proceed.

use serde::{Deserialize, Serialize};

use super::phase::DependencyConstraint;

/// Kind of rule violation found by the validation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// The referenced phase is not in the in-scope phase set.
    UnknownPhase,
    /// A mandatory prerequisite is not complete.
    HardDependencyUnmet,
    /// A best-practice prerequisite is not complete.
    SoftDependencyUnmet,
    /// A proposed order places a phase before a mandatory prerequisite.
    HardOrderViolation,
    /// A proposed order places a phase before a best-practice prerequisite.
    SoftOrderViolation,
    /// Resetting a phase whose dependents are already complete.
    DependentAlreadyComplete,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownPhase => "unknown_phase",
            Self::HardDependencyUnmet => "hard_dependency_unmet",
            Self::SoftDependencyUnmet => "soft_dependency_unmet",
            Self::HardOrderViolation => "hard_order_violation",
            Self::SoftOrderViolation => "soft_order_violation",
            Self::DependentAlreadyComplete => "dependent_already_complete",
        }
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single error or warning produced by validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub kind: IssueKind,
    /// Phase the issue is about.
    pub phase_id: String,
    /// Other phase involved (the prerequisite or dependent), if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_phase_id: Option<String>,
    pub message: String,
}

impl Issue {
    pub fn new(kind: IssueKind, phase_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            phase_id: phase_id.into(),
            related_phase_id: None,
            message: message.into(),
        }
    }

    pub fn with_related(mut self, related_phase_id: impl Into<String>) -> Self {
        self.related_phase_id = Some(related_phase_id.into());
        self
    }

    pub fn unknown_phase(phase_id: &str) -> Self {
        Self::new(
            IssueKind::UnknownPhase,
            phase_id,
            format!("Phase '{phase_id}' is not part of this project"),
        )
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// Outcome of a completion, reorder or reset check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// False when any error is present; the change must not be applied.
    pub valid: bool,
    /// Phase a completion or reset check was run for; `None` for a sequence check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase_id: Option<String>,
    pub errors: Vec<Issue>,
    pub warnings: Vec<Issue>,
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            valid: true,
            phase_id: None,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Empty report for a check about one phase.
    pub fn for_phase(phase_id: impl Into<String>) -> Self {
        Self {
            phase_id: Some(phase_id.into()),
            ..Self::new()
        }
    }

    pub fn from_issues(errors: Vec<Issue>, warnings: Vec<Issue>) -> Self {
        Self {
            valid: errors.is_empty(),
            phase_id: None,
            errors,
            warnings,
        }
    }

    pub fn with_phase(mut self, phase_id: impl Into<String>) -> Self {
        self.phase_id = Some(phase_id.into());
        self
    }

    /// Whether this report was produced for `phase_id`.
    pub fn is_for(&self, phase_id: &str) -> bool {
        self.phase_id.as_deref() == Some(phase_id)
    }

    pub fn add_error(&mut self, issue: Issue) {
        self.valid = false;
        self.errors.push(issue);
    }

    pub fn add_warning(&mut self, issue: Issue) {
        self.warnings.push(issue);
    }

    /// Valid and nothing to acknowledge.
    pub fn is_clear(&self) -> bool {
        self.valid && self.warnings.is_empty()
    }

    /// Valid, but only after the warnings are explicitly overridden.
    pub fn requires_override(&self) -> bool {
        self.valid && !self.warnings.is_empty()
    }
}

/// A hard dependency that is not yet satisfied, annotated for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmetDependency {
    #[serde(flatten)]
    pub constraint: DependencyConstraint,
    /// Display name of the prerequisite phase.
    pub requires_phase_name: String,
}
