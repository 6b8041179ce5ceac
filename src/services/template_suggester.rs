use crate::domain::models::{PhaseTemplate, ProjectAttributes};
use crate::domain::ports::TemplateRegistry;
use tracing::debug;

/// Suggests a template for a project from its declared type.
///
/// Templates are tried in registry order and the first one tagged with the
/// project type wins. Suggesting never applies the template.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateSuggester;

impl TemplateSuggester {
    pub fn new() -> Self {
        Self
    }

    pub fn suggest<R: TemplateRegistry + ?Sized>(
        &self,
        registry: &R,
        attributes: &ProjectAttributes,
    ) -> Option<PhaseTemplate> {
        let suggestion = registry
            .list_templates()
            .iter()
            .find(|t| t.applies_to(&attributes.project_type))
            .cloned();

        debug!(
            project_type = %attributes.project_type,
            template_id = suggestion.as_ref().map_or("-", |t| t.id.as_str()),
            "Template suggestion"
        );

        suggestion
    }
}
