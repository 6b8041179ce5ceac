use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::PhaseTemplate;
use crate::domain::ports::TemplateRegistry;
use crate::services::dependency_graph::DependencyGraph;
use crate::services::phase_catalog;
use tracing::debug;

/// Template registry backed by a `Vec`, preserving registration order.
///
/// Every template is checked on registration: structural checks from
/// [`PhaseTemplate::validate`] plus cycle detection over all hard and soft
/// edges. A template that fails is not registered.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTemplateRegistry {
    templates: Vec<PhaseTemplate>,
}

impl InMemoryTemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-loaded with the built-in templates.
    pub fn with_builtin() -> DomainResult<Self> {
        let mut registry = Self::new();
        for template in phase_catalog::builtin_templates() {
            registry.register(template)?;
        }
        Ok(registry)
    }

    /// Check a template without registering it.
    pub fn check(template: &PhaseTemplate) -> DomainResult<()> {
        template.validate()?;

        let graph = DependencyGraph::build(&template.phases);
        if let Some(cycle) = graph.detect_cycle() {
            return Err(DomainError::CyclicDependency(cycle));
        }

        for (phase_id, requires) in template.external_dependencies() {
            debug!(
                template_id = %template.id,
                phase_id = %phase_id,
                requires = %requires,
                "Dependency on a phase outside the template is treated as satisfied"
            );
        }

        Ok(())
    }

    /// Validate and append a template.
    pub fn register(&mut self, template: PhaseTemplate) -> DomainResult<()> {
        if self.get_template(&template.id).is_some() {
            return Err(DomainError::DuplicateTemplate(template.id));
        }

        Self::check(&template)?;

        debug!(
            template_id = %template.id,
            phases = template.phases.len(),
            "Registered phase template"
        );
        self.templates.push(template);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl TemplateRegistry for InMemoryTemplateRegistry {
    fn get_template(&self, id: &str) -> Option<&PhaseTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    fn list_templates(&self) -> &[PhaseTemplate] {
        &self.templates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{DependencyConstraint, PhaseDefinition};

    fn template(id: &str, phases: Vec<PhaseDefinition>) -> PhaseTemplate {
        PhaseTemplate::new(id, id).with_phases(phases)
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = InMemoryTemplateRegistry::new();
        registry
            .register(template("a", vec![PhaseDefinition::new("p", "P")]))
            .unwrap();
        registry
            .register(template("b", vec![PhaseDefinition::new("q", "Q")]))
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get_template("b").unwrap().id, "b");
        assert!(registry.get_template("c").is_none());
        let ids: Vec<&str> = registry.list_templates().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_require_template_not_found() {
        let registry = InMemoryTemplateRegistry::new();
        assert_eq!(
            registry.require_template("missing").unwrap_err(),
            DomainError::TemplateNotFound("missing".to_string())
        );
    }

    #[test]
    fn test_duplicate_template_rejected() {
        let mut registry = InMemoryTemplateRegistry::new();
        registry
            .register(template("a", vec![PhaseDefinition::new("p", "P")]))
            .unwrap();
        let err = registry
            .register(template("a", vec![PhaseDefinition::new("p", "P")]))
            .unwrap_err();
        assert_eq!(err, DomainError::DuplicateTemplate("a".to_string()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_cycle_rejected_at_registration() {
        let mut registry = InMemoryTemplateRegistry::new();
        let err = registry
            .register(template(
                "loop",
                vec![
                    PhaseDefinition::new("x", "X").with_dependency(DependencyConstraint::hard("y", "")),
                    PhaseDefinition::new("y", "Y").with_dependency(DependencyConstraint::soft("x", "")),
                ],
            ))
            .unwrap_err();

        assert!(matches!(err, DomainError::CyclicDependency(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_dangling_dependency_is_allowed() {
        let mut registry = InMemoryTemplateRegistry::new();
        let result = registry.register(template(
            "partial",
            vec![PhaseDefinition::new("paint", "Paint")
                .with_dependency(DependencyConstraint::hard("drywall", "Paint needs walls"))],
        ));
        assert!(result.is_ok());
    }

    #[test]
    fn test_builtin_templates_register() {
        let registry = InMemoryTemplateRegistry::with_builtin().unwrap();
        assert!(!registry.is_empty());
        assert_eq!(registry.list_templates()[0].id, "residential_new_build");
    }
}
