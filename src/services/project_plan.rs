//! Applying a template to a project and querying the result.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::errors::DomainResult;
use crate::domain::models::{
    Issue, PhaseDefinition, PhaseProgress, ProjectConfig, UnmetDependency, ValidationReport,
};
use crate::domain::ports::TemplateRegistry;
use crate::services::progress::ProgressAggregator;
use crate::services::scope_filter::ScopeFilter;
use crate::services::state_tracker::StateTracker;
use crate::services::validation_engine::ValidationEngine;

/// Persistable project record: which template, which building, which state.
///
/// The in-scope phase list is not stored; it is derived again from the
/// template and the building configuration when the record is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub template_id: String,
    pub config: ProjectConfig,
    pub tracker: StateTracker,
}

/// A template applied to one project.
#[derive(Debug, Clone)]
pub struct ProjectPlan {
    template_id: String,
    config: ProjectConfig,
    phases: Vec<PhaseDefinition>,
    tracker: StateTracker,
    engine: ValidationEngine,
}

impl ProjectPlan {
    /// Look up `template_id`, prune it to `config`, and start every phase as pending.
    pub fn apply<R: TemplateRegistry + ?Sized>(
        registry: &R,
        template_id: &str,
        config: ProjectConfig,
    ) -> DomainResult<Self> {
        let template = registry.require_template(template_id)?;
        let phases = ScopeFilter::new().apply(template, &config);
        let tracker = StateTracker::from_phases(&phases);

        info!(
            template_id = %template_id,
            phases = phases.len(),
            "Applied template to project"
        );

        Ok(Self {
            template_id: template_id.to_string(),
            config,
            phases,
            tracker,
            engine: ValidationEngine::new(),
        })
    }

    /// Rebuild a plan from a stored record.
    ///
    /// The stored tracker is aligned with the in-scope phases derived now:
    /// phases that appeared since the record was saved start as pending at
    /// the end of the sequence, and states for phases that left scope are
    /// dropped.
    pub fn from_record<R: TemplateRegistry + ?Sized>(
        registry: &R,
        record: ProjectRecord,
    ) -> DomainResult<Self> {
        let template = registry.require_template(&record.template_id)?;
        let phases = ScopeFilter::new().apply(template, &record.config);

        let mut tracker = record.tracker;
        let (added, dropped) = tracker.reconcile(&phases);
        if !added.is_empty() || !dropped.is_empty() {
            warn!(
                template_id = %record.template_id,
                added = ?added,
                dropped = ?dropped,
                "Project record did not match the template's in-scope phases"
            );
        }

        Ok(Self {
            template_id: record.template_id,
            config: record.config,
            phases,
            tracker,
            engine: ValidationEngine::new(),
        })
    }

    pub fn record(&self) -> ProjectRecord {
        ProjectRecord {
            template_id: self.template_id.clone(),
            config: self.config.clone(),
            tracker: self.tracker.clone(),
        }
    }

    pub fn template_id(&self) -> &str {
        &self.template_id
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// In-scope phases in template order.
    pub fn phases(&self) -> &[PhaseDefinition] {
        &self.phases
    }

    pub fn phase(&self, phase_id: &str) -> Option<&PhaseDefinition> {
        self.phases.iter().find(|p| p.id == phase_id)
    }

    pub fn tracker(&self) -> &StateTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut StateTracker {
        &mut self.tracker
    }

    /// In-scope phases in the project's current sequence.
    pub fn ordered_phases(&self) -> Vec<&PhaseDefinition> {
        self.tracker
            .ordered_states()
            .into_iter()
            .filter_map(|s| self.phase(&s.phase_id))
            .collect()
    }

    /// Discard all progress and custom ordering.
    pub fn reset_to_template_defaults(&mut self) {
        self.tracker = StateTracker::from_phases(&self.phases);
        info!(template_id = %self.template_id, "Project reset to template defaults");
    }

    pub fn blocked_phases(&self) -> BTreeMap<String, Vec<UnmetDependency>> {
        self.engine.blocked_phases(&self.phases, self.tracker.states())
    }

    pub fn ready_phases(&self) -> Vec<PhaseDefinition> {
        self.engine.ready_phases(&self.phases, self.tracker.states())
    }

    pub fn progress(&self) -> PhaseProgress {
        ProgressAggregator::new().calculate(&self.phases, self.tracker.states())
    }

    pub fn check_completion(&self, phase_id: &str) -> ValidationReport {
        self.engine
            .validate_phase_completion(phase_id, &self.phases, self.tracker.states())
    }

    pub fn check_reset(&self, phase_id: &str) -> ValidationReport {
        self.engine
            .validate_phase_reset(phase_id, &self.phases, self.tracker.states())
    }

    /// Check a proposed sequence given as phase ids.
    ///
    /// Ids that are not in scope are reported as `UnknownPhase` errors.
    pub fn check_reorder(&self, new_order: &[String]) -> ValidationReport {
        let mut unknown = Vec::new();
        let mut proposed = Vec::with_capacity(new_order.len());
        for phase_id in new_order {
            match self.phase(phase_id) {
                Some(phase) => proposed.push(phase.clone()),
                None => unknown.push(Issue::unknown_phase(phase_id)),
            }
        }

        let mut report = self.engine.validate_phase_reorder(&proposed);
        for issue in unknown {
            report.add_error(issue);
        }
        report
    }

    /// Validate then commit a completion.
    pub fn complete(
        &mut self,
        phase_id: &str,
        acknowledge_warnings: bool,
    ) -> DomainResult<ValidationReport> {
        let report = self.check_completion(phase_id);
        self.tracker
            .commit_completion(phase_id, &report, acknowledge_warnings)?;
        Ok(report)
    }

    /// Validate then commit a reset to pending.
    pub fn reset(
        &mut self,
        phase_id: &str,
        acknowledge_warnings: bool,
    ) -> DomainResult<ValidationReport> {
        let report = self.check_reset(phase_id);
        self.tracker
            .commit_reset(phase_id, &report, acknowledge_warnings)?;
        Ok(report)
    }

    /// Validate then commit a new sequence.
    pub fn reorder(
        &mut self,
        new_order: &[String],
        acknowledge_warnings: bool,
    ) -> DomainResult<ValidationReport> {
        let report = self.check_reorder(new_order);
        self.tracker
            .commit_reorder(new_order, &report, acknowledge_warnings)?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::DomainError;
    use crate::domain::models::{IssueKind, PhaseStatus, PhaseTemplate};
    use crate::services::template_registry::InMemoryTemplateRegistry;

    fn registry() -> InMemoryTemplateRegistry {
        InMemoryTemplateRegistry::with_builtin().unwrap()
    }

    fn kitchen() -> ProjectConfig {
        ProjectConfig {
            rooms: vec!["kitchen".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_apply_filters_scope() {
        let plan = ProjectPlan::apply(&registry(), "kitchen_remodel", kitchen()).unwrap();
        assert!(plan.phase("kitchen_cabinets").is_some());
        assert_eq!(plan.tracker().states().len(), plan.phases().len());

        let plan = ProjectPlan::apply(&registry(), "kitchen_remodel", ProjectConfig::default()).unwrap();
        assert!(plan.phase("kitchen_cabinets").is_none());
        assert!(plan.phase("countertops").is_none());
    }

    #[test]
    fn test_apply_unknown_template() {
        let err = ProjectPlan::apply(&registry(), "treehouse", kitchen()).unwrap_err();
        assert_eq!(err, DomainError::TemplateNotFound("treehouse".to_string()));
    }

    #[test]
    fn test_complete_then_reset_to_defaults() {
        let mut plan = ProjectPlan::apply(&registry(), "kitchen_remodel", kitchen()).unwrap();
        plan.complete("demolition", false).unwrap();
        assert_eq!(plan.tracker().status_of("demolition"), Some(PhaseStatus::Complete));
        assert!(plan.progress().completed == 1);

        plan.reset_to_template_defaults();
        assert_eq!(plan.progress().completed, 0);
    }

    #[test]
    fn test_complete_blocked_phase_fails() {
        let mut plan = ProjectPlan::apply(&registry(), "kitchen_remodel", kitchen()).unwrap();
        let err = plan.complete("countertops", true).unwrap_err();
        assert_eq!(err, DomainError::CompletionRejected("countertops".to_string()));
    }

    #[test]
    fn test_check_reorder_unknown_id() {
        let plan = ProjectPlan::apply(&registry(), "kitchen_remodel", kitchen()).unwrap();
        let mut order = plan.tracker().ordered_ids();
        order.push("moat".to_string());

        let report = plan.check_reorder(&order);
        assert!(!report.valid);
        assert!(report.errors.iter().any(|e| e.kind == IssueKind::UnknownPhase));
    }

    #[test]
    fn test_record_roundtrip() {
        let registry = registry();
        let mut plan = ProjectPlan::apply(&registry, "bathroom_remodel", ProjectConfig::default()).unwrap();
        plan.complete("demolition", false).unwrap();

        let json = serde_json::to_string(&plan.record()).unwrap();
        let record: ProjectRecord = serde_json::from_str(&json).unwrap();
        let restored = ProjectPlan::from_record(&registry, record).unwrap();

        assert_eq!(restored.phases(), plan.phases());
        assert_eq!(restored.progress(), plan.progress());
        assert_eq!(restored.ordered_phases().len(), plan.phases().len());
    }

    fn registry_with(phases: Vec<PhaseDefinition>) -> InMemoryTemplateRegistry {
        let mut registry = InMemoryTemplateRegistry::new();
        registry
            .register(PhaseTemplate::new("shed", "Shed").with_phases(phases))
            .unwrap();
        registry
    }

    #[test]
    fn test_from_record_picks_up_added_phase() {
        let two = registry_with(vec![
            PhaseDefinition::new("a", "A"),
            PhaseDefinition::new("b", "B"),
        ]);
        let mut plan = ProjectPlan::apply(&two, "shed", ProjectConfig::default()).unwrap();
        plan.complete("a", false).unwrap();

        let three = registry_with(vec![
            PhaseDefinition::new("a", "A"),
            PhaseDefinition::new("b", "B"),
            PhaseDefinition::new("c", "C"),
        ]);
        let mut plan = ProjectPlan::from_record(&three, plan.record()).unwrap();

        assert_eq!(plan.progress().total, 3);
        assert_eq!(plan.tracker().status_of("a"), Some(PhaseStatus::Complete));
        assert_eq!(plan.tracker().ordered_ids(), vec!["a", "b", "c"]);

        // The reorder must now cover all three phases.
        let partial = vec!["b".to_string(), "a".to_string()];
        assert!(plan.reorder(&partial, true).is_err());
        let full = vec!["c".to_string(), "a".to_string(), "b".to_string()];
        plan.reorder(&full, true).unwrap();

        plan.complete("c", false).unwrap();
        assert_eq!(plan.tracker().status_of("c"), Some(PhaseStatus::Complete));
    }

    #[test]
    fn test_from_record_drops_phase_out_of_scope() {
        let registry = registry();
        let plan = ProjectPlan::apply(&registry, "kitchen_remodel", kitchen()).unwrap();
        assert!(plan.tracker().status_of("kitchen_cabinets").is_some());

        let mut record = plan.record();
        record.config = ProjectConfig::default();
        let plan = ProjectPlan::from_record(&registry, record).unwrap();

        assert!(plan.tracker().status_of("kitchen_cabinets").is_none());
        assert_eq!(plan.tracker().states().len(), plan.phases().len());
        assert_eq!(plan.progress().total, plan.phases().len());
    }
}
