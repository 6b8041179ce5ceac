//! Template registry port.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::PhaseTemplate;

/// Read interface over a set of registered phase templates.
pub trait TemplateRegistry {
    /// Get a template by id.
    fn get_template(&self, id: &str) -> Option<&PhaseTemplate>;

    /// All templates, in registration order.
    fn list_templates(&self) -> &[PhaseTemplate];

    /// Get a template by id, failing with `TemplateNotFound`.
    fn require_template(&self, id: &str) -> DomainResult<&PhaseTemplate> {
        self.get_template(id)
            .ok_or_else(|| DomainError::TemplateNotFound(id.to_string()))
    }
}
