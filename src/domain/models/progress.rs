use serde::{Deserialize, Serialize};

/// Summary counters for a project's phases.
///
/// `blocked` overlays the stored buckets: a blocked phase is also counted as
/// pending or in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PhaseProgress {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub pending: usize,
    pub blocked: usize,
    /// Rounded percentage of completed phases, 0 for an empty project.
    pub percent_complete: u8,
}

impl PhaseProgress {
    pub fn is_finished(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

impl std::fmt::Display for PhaseProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}% complete ({}/{} phases, {} in progress, {} blocked)",
            self.percent_complete, self.completed, self.total, self.in_progress, self.blocked
        )
    }
}
