//! Holds the mutable phase state of one project.
//!
//! The tracker is the only place project state changes. Completion, reorder
//! and reset commits take the `ValidationReport` the engine produced for the
//! proposed change and refuse to apply it when the report rejects it, or when
//! it carries warnings the caller has not acknowledged.

use std::collections::HashSet;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    OverrideAction, PhaseDefinition, PhaseStatus, ProjectPhaseState, SoftOverride,
    ValidationReport,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StateTracker {
    states: Vec<ProjectPhaseState>,
    #[serde(default)]
    overrides: Vec<SoftOverride>,
}

impl StateTracker {
    /// One pending state per phase, ordered by position.
    pub fn from_phases(phases: &[PhaseDefinition]) -> Self {
        Self {
            states: phases
                .iter()
                .enumerate()
                .map(|(order, phase)| ProjectPhaseState::pending(&phase.id, order))
                .collect(),
            overrides: Vec::new(),
        }
    }

    /// States in creation order.
    pub fn states(&self) -> &[ProjectPhaseState] {
        &self.states
    }

    /// States sorted by their current `order`.
    pub fn ordered_states(&self) -> Vec<&ProjectPhaseState> {
        let mut ordered: Vec<&ProjectPhaseState> = self.states.iter().collect();
        ordered.sort_by_key(|s| s.order);
        ordered
    }

    /// Phase ids in current sequence order.
    pub fn ordered_ids(&self) -> Vec<String> {
        self.ordered_states()
            .into_iter()
            .map(|s| s.phase_id.clone())
            .collect()
    }

    pub fn overrides(&self) -> &[SoftOverride] {
        &self.overrides
    }

    pub fn status_of(&self, phase_id: &str) -> Option<PhaseStatus> {
        self.states
            .iter()
            .find(|s| s.phase_id == phase_id)
            .map(|s| s.status)
    }

    fn state_mut(&mut self, phase_id: &str) -> DomainResult<&mut ProjectPhaseState> {
        self.states
            .iter_mut()
            .find(|s| s.phase_id == phase_id)
            .ok_or_else(|| DomainError::PhaseNotFound(phase_id.to_string()))
    }

    /// Move a phase to `status` following the lifecycle state machine.
    pub fn transition(&mut self, phase_id: &str, status: PhaseStatus) -> DomainResult<()> {
        let state = self.state_mut(phase_id)?;
        let from = state.status;

        if !from.can_transition_to(status) {
            return Err(DomainError::InvalidStateTransition {
                from: from.to_string(),
                to: status.to_string(),
                reason: format!(
                    "allowed from {from}: {}",
                    from.valid_transitions()
                        .iter()
                        .map(PhaseStatus::as_str)
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            });
        }

        state.status = status;
        info!(phase_id = %phase_id, from = %from, to = %status, "Phase status changed");
        Ok(())
    }

    /// Refuse rejected reports and unacknowledged warnings.
    fn check_report(
        report: &ValidationReport,
        acknowledge_warnings: bool,
        rejected: impl FnOnce() -> DomainError,
    ) -> DomainResult<()> {
        if !report.valid {
            return Err(rejected());
        }
        if !report.warnings.is_empty() && !acknowledge_warnings {
            return Err(DomainError::OverrideRequired(report.warnings.len()));
        }
        Ok(())
    }

    fn record_override(
        &mut self,
        phase_id: Option<&str>,
        action: OverrideAction,
        report: &ValidationReport,
    ) {
        if report.warnings.is_empty() {
            return;
        }
        warn!(
            phase_id = phase_id.unwrap_or("-"),
            action = ?action,
            warnings = report.warnings.len(),
            "Soft dependency warnings overridden"
        );
        self.overrides.push(SoftOverride {
            phase_id: phase_id.map(ToString::to_string),
            action,
            acknowledged: report.warnings.clone(),
            recorded_at: Utc::now(),
        });
    }

    /// A completion or reset may only be committed with the report checked for that phase.
    fn check_subject(phase_id: &str, report: &ValidationReport) -> DomainResult<()> {
        if report.is_for(phase_id) {
            Ok(())
        } else {
            Err(DomainError::ReportMismatch(phase_id.to_string()))
        }
    }

    /// Mark a phase complete after the engine accepted the completion.
    pub fn commit_completion(
        &mut self,
        phase_id: &str,
        report: &ValidationReport,
        acknowledge_warnings: bool,
    ) -> DomainResult<()> {
        Self::check_subject(phase_id, report)?;
        Self::check_report(report, acknowledge_warnings, || {
            DomainError::CompletionRejected(phase_id.to_string())
        })?;
        self.transition(phase_id, PhaseStatus::Complete)?;
        self.record_override(Some(phase_id), OverrideAction::Complete, report);
        Ok(())
    }

    /// Reset a phase to pending after the engine checked the reset.
    pub fn commit_reset(
        &mut self,
        phase_id: &str,
        report: &ValidationReport,
        acknowledge_warnings: bool,
    ) -> DomainResult<()> {
        Self::check_subject(phase_id, report)?;
        Self::check_report(report, acknowledge_warnings, || {
            DomainError::ValidationFailed(format!("Reset of phase '{phase_id}' was rejected"))
        })?;
        self.transition(phase_id, PhaseStatus::Pending)?;
        self.record_override(Some(phase_id), OverrideAction::Reset, report);
        Ok(())
    }

    /// Reassign `order` to match `new_order` after the engine accepted it.
    ///
    /// `new_order` must list every tracked phase exactly once. Nothing is
    /// changed unless every check passes.
    pub fn commit_reorder(
        &mut self,
        new_order: &[String],
        report: &ValidationReport,
        acknowledge_warnings: bool,
    ) -> DomainResult<()> {
        Self::check_report(report, acknowledge_warnings, || DomainError::ReorderRejected)?;

        if new_order.len() != self.states.len() {
            return Err(DomainError::InvalidReorder(format!(
                "expected {} phases, got {}",
                self.states.len(),
                new_order.len()
            )));
        }

        let mut seen = HashSet::new();
        for phase_id in new_order {
            if !seen.insert(phase_id.as_str()) {
                return Err(DomainError::InvalidReorder(format!(
                    "phase '{phase_id}' listed more than once"
                )));
            }
            if self.status_of(phase_id).is_none() {
                return Err(DomainError::InvalidReorder(format!(
                    "phase '{phase_id}' is not tracked"
                )));
            }
        }

        for state in &mut self.states {
            if let Some(position) = new_order.iter().position(|id| *id == state.phase_id) {
                state.order = position;
            }
        }

        info!(phases = new_order.len(), "Phase sequence reordered");
        self.record_override(None, OverrideAction::Reorder, report);
        Ok(())
    }

    /// Align the tracked phases with `phases`.
    ///
    /// States for phases that are no longer present are dropped and new
    /// phases are appended as pending after the current sequence. Orders are
    /// renumbered so they stay contiguous. Returns `(added, dropped)` ids.
    pub fn reconcile(&mut self, phases: &[PhaseDefinition]) -> (Vec<String>, Vec<String>) {
        let wanted: HashSet<&str> = phases.iter().map(|p| p.id.as_str()).collect();

        let dropped: Vec<String> = self
            .states
            .iter()
            .filter(|s| !wanted.contains(s.phase_id.as_str()))
            .map(|s| s.phase_id.clone())
            .collect();
        self.states.retain(|s| wanted.contains(s.phase_id.as_str()));

        let sequence = self.ordered_ids();
        for state in &mut self.states {
            if let Some(position) = sequence.iter().position(|id| *id == state.phase_id) {
                state.order = position;
            }
        }

        let mut added = Vec::new();
        for phase in phases {
            if self.status_of(&phase.id).is_none() {
                let order = self.states.len();
                self.states.push(ProjectPhaseState::pending(&phase.id, order));
                added.push(phase.id.clone());
            }
        }

        (added, dropped)
    }
}
