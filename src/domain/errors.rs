//! Domain errors for the phasegate engine.
//!
//! Rule violations (unmet dependencies, ordering conflicts) are reported as
//! [`Issue`](crate::domain::models::Issue)s inside a validation report. The
//! variants here cover template integrity problems and mutations the caller
//! should never have attempted.

use thiserror::Error;

/// Format a cycle path as a human-readable string: `a -> b -> a`.
fn format_cycle_path(path: &[String]) -> String {
    path.join(" -> ")
}

/// Domain-level errors that can occur in the phasegate engine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Phase not found: {0}")]
    PhaseNotFound(String),

    #[error("Template '{0}' is already registered")]
    DuplicateTemplate(String),

    #[error("Template '{0}' must contain at least one phase")]
    EmptyTemplate(String),

    #[error("Phase '{phase_id}' appears more than once in template '{template_id}'")]
    DuplicatePhase { template_id: String, phase_id: String },

    #[error("Phase '{phase_id}' in template '{template_id}' depends on itself")]
    SelfDependency { template_id: String, phase_id: String },

    #[error("Phase dependency cycle detected: {}", format_cycle_path(.0))]
    CyclicDependency(Vec<String>),

    #[error("Invalid state transition from {from} to {to}: {reason}")]
    InvalidStateTransition { from: String, to: String, reason: String },

    #[error("Completion of phase '{0}' was rejected by validation")]
    CompletionRejected(String),

    #[error("Validation report was not produced for phase '{0}'")]
    ReportMismatch(String),

    #[error("Reorder was rejected by validation")]
    ReorderRejected,

    #[error("{0} warning(s) must be acknowledged before this change can be committed")]
    OverrideRequired(usize),

    #[error("Invalid reorder: {0}")]
    InvalidReorder(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
