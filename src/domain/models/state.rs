//! Per-project phase state.
//!
//! Only `pending`, `in_progress` and `complete` are stored. Whether a phase
//! is blocked is derived from the dependency graph on every read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::issue::Issue;

/// Stored status of a phase within a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    #[default]
    Pending,
    InProgress,
    Complete,
}

impl PhaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Complete => "complete",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "in_progress" | "in-progress" | "started" => Some(Self::InProgress),
            "complete" | "completed" => Some(Self::Complete),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }

    /// Valid transitions from this status.
    ///
    /// Marking a pending phase complete without a recorded start is allowed.
    /// Any started or finished phase can be reset to pending.
    pub fn valid_transitions(&self) -> Vec<PhaseStatus> {
        match self {
            Self::Pending => vec![Self::InProgress, Self::Complete],
            Self::InProgress => vec![Self::Complete, Self::Pending],
            Self::Complete => vec![Self::Pending],
        }
    }

    pub fn can_transition_to(&self, new_status: Self) -> bool {
        self.valid_transitions().contains(&new_status)
    }
}

impl std::fmt::Display for PhaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status and position of one phase in one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPhaseState {
    pub phase_id: String,
    #[serde(default)]
    pub status: PhaseStatus,
    /// Position in the project's customized sequence.
    pub order: usize,
}

impl ProjectPhaseState {
    pub fn pending(phase_id: impl Into<String>, order: usize) -> Self {
        Self {
            phase_id: phase_id.into(),
            status: PhaseStatus::Pending,
            order,
        }
    }

    pub fn with_status(mut self, status: PhaseStatus) -> Self {
        self.status = status;
        self
    }
}

/// Mutation that was committed despite warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideAction {
    Complete,
    Reorder,
    Reset,
}

/// Record of an explicit override of soft-dependency warnings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoftOverride {
    /// Phase that was changed; `None` when the whole sequence was reordered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase_id: Option<String>,
    pub action: OverrideAction,
    pub acknowledged: Vec<Issue>,
    pub recorded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        assert!(PhaseStatus::Pending.can_transition_to(PhaseStatus::InProgress));
        assert!(PhaseStatus::Pending.can_transition_to(PhaseStatus::Complete));
        assert!(PhaseStatus::InProgress.can_transition_to(PhaseStatus::Complete));
        assert!(PhaseStatus::InProgress.can_transition_to(PhaseStatus::Pending));
        assert!(PhaseStatus::Complete.can_transition_to(PhaseStatus::Pending));

        assert!(!PhaseStatus::Pending.can_transition_to(PhaseStatus::Pending));
        assert!(!PhaseStatus::Complete.can_transition_to(PhaseStatus::InProgress));
        assert!(!PhaseStatus::Complete.can_transition_to(PhaseStatus::Complete));
    }

    #[test]
    fn test_from_str_aliases() {
        assert_eq!(PhaseStatus::from_str("Completed"), Some(PhaseStatus::Complete));
        assert_eq!(PhaseStatus::from_str("in-progress"), Some(PhaseStatus::InProgress));
        assert_eq!(PhaseStatus::from_str("blocked"), None);
    }

    #[test]
    fn test_state_serde() {
        let state = ProjectPhaseState::pending("framing", 3).with_status(PhaseStatus::InProgress);
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"in_progress\""));
        let back: ProjectPhaseState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
