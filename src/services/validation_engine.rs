//! Phase validation engine.
//!
//! Every method is a pure function of the in-scope phases and a snapshot of
//! their states. Nothing here mutates project state or caches results: the
//! blocked set is recomputed on every call.
//!
//! A dependency whose prerequisite is not in the in-scope phase set counts
//! as satisfied. A phase with no stored state counts as `pending`.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::domain::models::{
    DependencyConstraint, DependencyKind, Issue, IssueKind, PhaseDefinition, PhaseStatus,
    ProjectPhaseState, UnmetDependency, ValidationReport,
};
use crate::services::dependency_graph::DependencyGraph;

/// Stored status lookup with the `pending` default.
struct StatusIndex<'a>(HashMap<&'a str, PhaseStatus>);

impl<'a> StatusIndex<'a> {
    fn new(states: &'a [ProjectPhaseState]) -> Self {
        Self(
            states
                .iter()
                .map(|s| (s.phase_id.as_str(), s.status))
                .collect(),
        )
    }

    fn status(&self, phase_id: &str) -> PhaseStatus {
        self.0.get(phase_id).copied().unwrap_or_default()
    }

    fn is_complete(&self, phase_id: &str) -> bool {
        self.status(phase_id).is_complete()
    }
}

/// Computes blocked and ready phases and checks proposed mutations.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationEngine;

impl ValidationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Unmet in-scope dependencies of `phase` of the given kind.
    fn unmet<'a>(
        graph: &DependencyGraph<'a>,
        statuses: &StatusIndex<'_>,
        phase_id: &str,
        kind: DependencyKind,
    ) -> Vec<&'a DependencyConstraint> {
        graph
            .dependencies_of(phase_id)
            .into_iter()
            .filter(|d| d.kind == kind && !statuses.is_complete(&d.requires_phase_id))
            .collect()
    }

    /// Phases that are pending or in progress with at least one incomplete
    /// hard prerequisite, mapped to those prerequisites.
    ///
    /// Completed phases are never reported, even if a prerequisite was reset
    /// after they were completed.
    pub fn blocked_phases(
        &self,
        phases: &[PhaseDefinition],
        states: &[ProjectPhaseState],
    ) -> BTreeMap<String, Vec<UnmetDependency>> {
        let graph = DependencyGraph::build(phases);
        let statuses = StatusIndex::new(states);

        let mut blocked = BTreeMap::new();
        for phase in phases {
            if statuses.is_complete(&phase.id) {
                continue;
            }

            let unmet: Vec<UnmetDependency> =
                Self::unmet(&graph, &statuses, &phase.id, DependencyKind::Hard)
                    .into_iter()
                    .map(|d| UnmetDependency {
                        constraint: d.clone(),
                        requires_phase_name: graph.display_name(&d.requires_phase_id),
                    })
                    .collect();

            if !unmet.is_empty() {
                blocked.insert(phase.id.clone(), unmet);
            }
        }

        debug!(blocked = blocked.len(), phases = phases.len(), "Computed blocked phases");
        blocked
    }

    /// Pending phases with no unmet hard prerequisite, in input order.
    ///
    /// Soft prerequisites never affect readiness.
    pub fn ready_phases(
        &self,
        phases: &[PhaseDefinition],
        states: &[ProjectPhaseState],
    ) -> Vec<PhaseDefinition> {
        let blocked = self.blocked_phases(phases, states);
        let statuses = StatusIndex::new(states);

        phases
            .iter()
            .filter(|p| statuses.status(&p.id) == PhaseStatus::Pending)
            .filter(|p| !blocked.contains_key(&p.id))
            .cloned()
            .collect()
    }

    /// Check whether `phase_id` may be marked complete.
    ///
    /// Unmet hard prerequisites are errors; unmet soft prerequisites are
    /// warnings that the caller may override.
    pub fn validate_phase_completion(
        &self,
        phase_id: &str,
        phases: &[PhaseDefinition],
        states: &[ProjectPhaseState],
    ) -> ValidationReport {
        let graph = DependencyGraph::build(phases);
        let mut report = ValidationReport::for_phase(phase_id);

        if !graph.contains(phase_id) {
            report.add_error(Issue::unknown_phase(phase_id));
            return report;
        }

        let statuses = StatusIndex::new(states);
        let name = graph.display_name(phase_id);

        for dep in Self::unmet(&graph, &statuses, phase_id, DependencyKind::Hard) {
            let required = graph.display_name(&dep.requires_phase_id);
            report.add_error(
                Issue::new(
                    IssueKind::HardDependencyUnmet,
                    phase_id,
                    format!(
                        "'{name}' cannot be completed until '{required}' is complete: {}",
                        dep.reason
                    ),
                )
                .with_related(&dep.requires_phase_id),
            );
        }

        for dep in Self::unmet(&graph, &statuses, phase_id, DependencyKind::Soft) {
            let required = graph.display_name(&dep.requires_phase_id);
            report.add_warning(
                Issue::new(
                    IssueKind::SoftDependencyUnmet,
                    phase_id,
                    format!(
                        "'{required}' is recommended before completing '{name}': {}",
                        dep.reason
                    ),
                )
                .with_related(&dep.requires_phase_id),
            );
        }

        debug!(
            phase_id = %phase_id,
            valid = report.valid,
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "Validated phase completion"
        );
        report
    }

    /// Check a proposed full sequence against the dependency graph.
    ///
    /// Each prerequisite present in `new_order` must appear strictly before
    /// its dependent. Current statuses are not consulted, so completed phases
    /// get no exemption.
    pub fn validate_phase_reorder(&self, new_order: &[PhaseDefinition]) -> ValidationReport {
        let graph = DependencyGraph::build(new_order);
        let mut position: HashMap<&str, usize> = HashMap::new();
        for (index, phase) in new_order.iter().enumerate() {
            position.entry(phase.id.as_str()).or_insert(index);
        }

        let mut report = ValidationReport::new();
        for (index, phase) in new_order.iter().enumerate() {
            for dep in graph.dependencies_of(&phase.id) {
                let Some(&required_at) = position.get(dep.requires_phase_id.as_str()) else {
                    continue;
                };
                if required_at < index {
                    continue;
                }

                let required = graph.display_name(&dep.requires_phase_id);
                match dep.kind {
                    DependencyKind::Hard => report.add_error(
                        Issue::new(
                            IssueKind::HardOrderViolation,
                            &phase.id,
                            format!(
                                "'{}' must come after '{required}': {}",
                                phase.name, dep.reason
                            ),
                        )
                        .with_related(&dep.requires_phase_id),
                    ),
                    DependencyKind::Soft => report.add_warning(
                        Issue::new(
                            IssueKind::SoftOrderViolation,
                            &phase.id,
                            format!(
                                "'{}' is placed before '{required}', which is recommended first: {}",
                                phase.name, dep.reason
                            ),
                        )
                        .with_related(&dep.requires_phase_id),
                    ),
                }
            }
        }

        debug!(
            phases = new_order.len(),
            valid = report.valid,
            warnings = report.warnings.len(),
            "Validated phase reorder"
        );
        report
    }

    /// Check whether `phase_id` can be reset to pending.
    ///
    /// Never fails: completed dependents stay complete, but each one is
    /// reported as a warning.
    pub fn validate_phase_reset(
        &self,
        phase_id: &str,
        phases: &[PhaseDefinition],
        states: &[ProjectPhaseState],
    ) -> ValidationReport {
        let graph = DependencyGraph::build(phases);
        let mut report = ValidationReport::for_phase(phase_id);

        if !graph.contains(phase_id) {
            report.add_error(Issue::unknown_phase(phase_id));
            return report;
        }

        let statuses = StatusIndex::new(states);
        let name = graph.display_name(phase_id);
        for dependent in graph.dependents_of(phase_id) {
            if statuses.is_complete(dependent) {
                report.add_warning(
                    Issue::new(
                        IssueKind::DependentAlreadyComplete,
                        phase_id,
                        format!(
                            "'{}' is already complete and depends on '{name}'",
                            graph.display_name(dependent)
                        ),
                    )
                    .with_related(dependent),
                );
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A (no deps), B (hard on A), C (soft on B)
    fn abc() -> Vec<PhaseDefinition> {
        vec![
            PhaseDefinition::new("a", "Alpha"),
            PhaseDefinition::new("b", "Bravo")
                .with_dependency(DependencyConstraint::hard("a", "B sits on A")),
            PhaseDefinition::new("c", "Charlie")
                .with_dependency(DependencyConstraint::soft("b", "C is easier after B")),
        ]
    }

    fn states(entries: &[(&str, PhaseStatus)]) -> Vec<ProjectPhaseState> {
        entries
            .iter()
            .enumerate()
            .map(|(i, (id, status))| ProjectPhaseState::pending(*id, i).with_status(*status))
            .collect()
    }

    fn all_pending() -> Vec<ProjectPhaseState> {
        states(&[
            ("a", PhaseStatus::Pending),
            ("b", PhaseStatus::Pending),
            ("c", PhaseStatus::Pending),
        ])
    }

    fn ids(phases: &[PhaseDefinition]) -> Vec<&str> {
        phases.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_blocked_and_ready_initial() {
        let engine = ValidationEngine::new();
        let phases = abc();

        let blocked = engine.blocked_phases(&phases, &all_pending());
        assert_eq!(blocked.len(), 1);
        let unmet = &blocked["b"];
        assert_eq!(unmet.len(), 1);
        assert_eq!(unmet[0].constraint.requires_phase_id, "a");
        assert_eq!(unmet[0].requires_phase_name, "Alpha");

        let ready = engine.ready_phases(&phases, &all_pending());
        assert_eq!(ids(&ready), vec!["a", "c"]);
    }

    #[test]
    fn test_completing_prerequisite_unblocks() {
        let engine = ValidationEngine::new();
        let phases = abc();
        let s = states(&[
            ("a", PhaseStatus::Complete),
            ("b", PhaseStatus::Pending),
            ("c", PhaseStatus::Pending),
        ]);

        assert!(engine.blocked_phases(&phases, &s).is_empty());
        assert_eq!(ids(&engine.ready_phases(&phases, &s)), vec!["b", "c"]);
    }

    #[test]
    fn test_in_progress_can_be_blocked_but_is_not_ready() {
        let engine = ValidationEngine::new();
        let phases = abc();
        let s = states(&[
            ("a", PhaseStatus::Pending),
            ("b", PhaseStatus::InProgress),
            ("c", PhaseStatus::InProgress),
        ]);

        assert!(engine.blocked_phases(&phases, &s).contains_key("b"));
        assert_eq!(ids(&engine.ready_phases(&phases, &s)), vec!["a"]);
    }

    #[test]
    fn test_complete_phase_never_blocked() {
        let engine = ValidationEngine::new();
        let s = states(&[
            ("a", PhaseStatus::Pending),
            ("b", PhaseStatus::Complete),
            ("c", PhaseStatus::Pending),
        ]);
        assert!(engine.blocked_phases(&abc(), &s).is_empty());
    }

    #[test]
    fn test_missing_state_counts_as_pending() {
        let engine = ValidationEngine::new();
        let blocked = engine.blocked_phases(&abc(), &[]);
        assert!(blocked.contains_key("b"));
    }

    #[test]
    fn test_excluded_prerequisite_is_satisfied() {
        let engine = ValidationEngine::new();
        let phases: Vec<PhaseDefinition> = abc().into_iter().skip(1).collect();
        let s = states(&[("b", PhaseStatus::Pending), ("c", PhaseStatus::Pending)]);

        assert!(engine.blocked_phases(&phases, &s).is_empty());
        assert!(engine.validate_phase_completion("b", &phases, &s).is_clear());
    }

    #[test]
    fn test_completion_hard_error_names_prerequisite() {
        let engine = ValidationEngine::new();
        let report = engine.validate_phase_completion("b", &abc(), &all_pending());

        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].kind, IssueKind::HardDependencyUnmet);
        assert_eq!(report.errors[0].related_phase_id.as_deref(), Some("a"));
        assert!(report.errors[0].message.contains("Alpha"));
        assert!(report.errors[0].message.contains("B sits on A"));
        assert!(report.is_for("b"));
    }

    #[test]
    fn test_completion_soft_is_warning_only() {
        let engine = ValidationEngine::new();
        let report = engine.validate_phase_completion("c", &abc(), &all_pending());

        assert!(report.valid);
        assert!(report.errors.is_empty());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].kind, IssueKind::SoftDependencyUnmet);
        assert!(report.requires_override());
    }

    #[test]
    fn test_completion_unknown_phase() {
        let engine = ValidationEngine::new();
        let report = engine.validate_phase_completion("zzz", &abc(), &all_pending());

        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].kind, IssueKind::UnknownPhase);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_completion_clear_when_all_met() {
        let engine = ValidationEngine::new();
        let s = states(&[
            ("a", PhaseStatus::Complete),
            ("b", PhaseStatus::Complete),
            ("c", PhaseStatus::InProgress),
        ]);
        assert!(engine.validate_phase_completion("c", &abc(), &s).is_clear());
    }

    #[test]
    fn test_reorder_hard_violation() {
        let engine = ValidationEngine::new();
        let phases = abc();
        let proposed = vec![phases[1].clone(), phases[0].clone(), phases[2].clone()];

        let report = engine.validate_phase_reorder(&proposed);
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].kind, IssueKind::HardOrderViolation);
        assert_eq!(report.errors[0].phase_id, "b");
        assert_eq!(report.errors[0].related_phase_id.as_deref(), Some("a"));
        assert!(report.phase_id.is_none());
    }

    #[test]
    fn test_reorder_soft_violation_is_warning() {
        let engine = ValidationEngine::new();
        let phases = abc();
        let proposed = vec![phases[0].clone(), phases[2].clone(), phases[1].clone()];

        let report = engine.validate_phase_reorder(&proposed);
        assert!(report.valid);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].kind, IssueKind::SoftOrderViolation);
        assert_eq!(report.warnings[0].phase_id, "c");
    }

    #[test]
    fn test_reorder_default_order_is_clear() {
        let engine = ValidationEngine::new();
        assert!(engine.validate_phase_reorder(&abc()).is_clear());
    }

    #[test]
    fn test_reset_warns_about_completed_dependents() {
        let engine = ValidationEngine::new();
        let s = states(&[
            ("a", PhaseStatus::Complete),
            ("b", PhaseStatus::Complete),
            ("c", PhaseStatus::Pending),
        ]);

        let report = engine.validate_phase_reset("a", &abc(), &s);
        assert!(report.valid);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].kind, IssueKind::DependentAlreadyComplete);
        assert_eq!(report.warnings[0].related_phase_id.as_deref(), Some("b"));
        assert!(report.is_for("a"));

        assert!(engine.validate_phase_reset("b", &abc(), &s).is_clear());
        assert!(!engine.validate_phase_reset("nope", &abc(), &s).valid);
    }
}
