//! Phase template model.
//!
//! A `PhaseTemplate` is a named, ordered collection of phases for a kind of
//! project. The stored order is the default sequence offered to a project;
//! only the dependency graph decides what is legal.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::phase::PhaseDefinition;
use crate::domain::errors::{DomainError, DomainResult};

/// A named, ordered catalog of phases applicable to certain project types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PhaseTemplate {
    /// Unique id (e.g., "kitchen_remodel").
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Project type tags this template applies to.
    #[serde(default)]
    pub project_types: Vec<String>,
    /// Default ordered phase sequence.
    pub phases: Vec<PhaseDefinition>,
}

impl PhaseTemplate {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_project_types(mut self, types: &[&str]) -> Self {
        self.project_types = types.iter().map(ToString::to_string).collect();
        self
    }

    pub fn with_phases(mut self, phases: Vec<PhaseDefinition>) -> Self {
        self.phases = phases;
        self
    }

    /// Look up a phase by id.
    pub fn phase(&self, phase_id: &str) -> Option<&PhaseDefinition> {
        self.phases.iter().find(|p| p.id == phase_id)
    }

    /// Whether the template applies to the given project type (ASCII case-insensitive).
    pub fn applies_to(&self, project_type: &str) -> bool {
        self.project_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(project_type))
    }

    /// `(phase_id, requires_phase_id)` pairs whose prerequisite is not part
    /// of this template. Such dependencies are always treated as satisfied.
    pub fn external_dependencies(&self) -> Vec<(String, String)> {
        self.phases
            .iter()
            .flat_map(|phase| {
                phase
                    .dependencies
                    .iter()
                    .filter(|dep| self.phase(&dep.requires_phase_id).is_none())
                    .map(|dep| (phase.id.clone(), dep.requires_phase_id.clone()))
            })
            .collect()
    }

    /// Structural checks that need no graph traversal.
    ///
    /// Cycle detection is done by the registry on top of this.
    pub fn validate(&self) -> DomainResult<()> {
        if self.id.trim().is_empty() {
            return Err(DomainError::ValidationFailed(
                "Template id cannot be empty".to_string(),
            ));
        }

        if self.phases.is_empty() {
            return Err(DomainError::EmptyTemplate(self.id.clone()));
        }

        let mut seen = HashSet::new();
        for phase in &self.phases {
            if phase.id.trim().is_empty() {
                return Err(DomainError::ValidationFailed(format!(
                    "Template '{}' contains a phase with an empty id",
                    self.id
                )));
            }

            if !seen.insert(phase.id.as_str()) {
                return Err(DomainError::DuplicatePhase {
                    template_id: self.id.clone(),
                    phase_id: phase.id.clone(),
                });
            }

            if phase.depends_on(&phase.id) {
                return Err(DomainError::SelfDependency {
                    template_id: self.id.clone(),
                    phase_id: phase.id.clone(),
                });
            }
        }

        Ok(())
    }
}
