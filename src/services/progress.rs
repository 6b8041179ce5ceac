use std::collections::HashSet;

use crate::domain::models::{PhaseDefinition, PhaseProgress, PhaseStatus, ProjectPhaseState};
use crate::services::validation_engine::ValidationEngine;

/// Reduces a project's phase states to summary counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressAggregator {
    engine: ValidationEngine,
}

/// `round(100 * part / total)` with halves rounding up; 0 when `total` is 0.
fn rounded_percent(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let percent = (part * 200 + total) / (total * 2);
    u8::try_from(percent.min(100)).unwrap_or(100)
}

impl ProgressAggregator {
    pub fn new() -> Self {
        Self {
            engine: ValidationEngine::new(),
        }
    }

    /// Count stored statuses and overlay the derived blocked count.
    ///
    /// Only phases with a stored state are counted, so `blocked` never
    /// exceeds `pending + in_progress`.
    pub fn calculate(
        &self,
        phases: &[PhaseDefinition],
        states: &[ProjectPhaseState],
    ) -> PhaseProgress {
        let mut progress = PhaseProgress {
            total: states.len(),
            ..Default::default()
        };

        for state in states {
            match state.status {
                PhaseStatus::Pending => progress.pending += 1,
                PhaseStatus::InProgress => progress.in_progress += 1,
                PhaseStatus::Complete => progress.completed += 1,
            }
        }

        let tracked: HashSet<&str> = states.iter().map(|s| s.phase_id.as_str()).collect();
        progress.blocked = self
            .engine
            .blocked_phases(phases, states)
            .keys()
            .filter(|phase_id| tracked.contains(phase_id.as_str()))
            .count();
        progress.percent_complete = rounded_percent(progress.completed, progress.total);
        progress
    }
}
