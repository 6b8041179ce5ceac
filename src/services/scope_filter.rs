use crate::domain::models::{LocationScope, PhaseDefinition, PhaseTemplate, ProjectConfig};
use tracing::debug;

/// Prunes a template's phases to the ones that apply to a building.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopeFilter;

impl ScopeFilter {
    pub fn new() -> Self {
        Self
    }

    /// Whether a single location scope matches the project configuration.
    pub fn matches(scope: &LocationScope, config: &ProjectConfig) -> bool {
        match scope {
            LocationScope::All => true,
            LocationScope::Floors { floors } => floors.iter().any(|f| config.has_level(f)),
            LocationScope::Rooms { room_types } => room_types.iter().any(|r| config.has_room(r)),
            LocationScope::Zones { zones } => zones.iter().any(|z| config.has_zone(z)),
        }
    }

    /// In-scope phases of `template`, in template order.
    pub fn apply(&self, template: &PhaseTemplate, config: &ProjectConfig) -> Vec<PhaseDefinition> {
        let phases: Vec<PhaseDefinition> = template
            .phases
            .iter()
            .filter(|phase| {
                let keep = Self::matches(&phase.location_scope, config);
                if !keep {
                    debug!(
                        template_id = %template.id,
                        phase_id = %phase.id,
                        "Phase excluded by location scope"
                    );
                }
                keep
            })
            .cloned()
            .collect();

        debug!(
            template_id = %template.id,
            in_scope = phases.len(),
            total = template.phases.len(),
            "Applied location scope"
        );

        phases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scoped(id: &str, scope: LocationScope) -> PhaseDefinition {
        PhaseDefinition::new(id, id).with_scope(scope)
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    fn template() -> PhaseTemplate {
        PhaseTemplate::new("t", "Test").with_phases(vec![
            scoped("site", LocationScope::All),
            scoped("basement_walls", LocationScope::Floors { floors: strings(&["basement"]) }),
            scoped("upper_framing", LocationScope::Floors { floors: strings(&["level_2", "level_3"]) }),
            scoped("cabinets", LocationScope::Rooms { room_types: strings(&["kitchen"]) }),
            scoped("tile", LocationScope::Rooms { room_types: strings(&["bathroom", "laundry"]) }),
            scoped("garage_slab", LocationScope::Zones { zones: strings(&["garage"]) }),
        ])
    }

    fn ids(phases: &[PhaseDefinition]) -> Vec<&str> {
        phases.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_minimal_project_keeps_only_all_scoped() {
        let phases = ScopeFilter::new().apply(&template(), &ProjectConfig::default());
        assert_eq!(ids(&phases), vec!["site"]);
    }

    #[test]
    fn test_full_project_keeps_everything_in_order() {
        let config = ProjectConfig {
            storeys: 3,
            has_basement: true,
            rooms: strings(&["kitchen", "laundry"]),
            zones: strings(&["garage"]),
            project_type: None,
        };
        let phases = ScopeFilter::new().apply(&template(), &config);
        assert_eq!(
            ids(&phases),
            vec!["site", "basement_walls", "upper_framing", "cabinets", "tile", "garage_slab"]
        );
    }

    #[test]
    fn test_any_listed_floor_is_enough() {
        let config = ProjectConfig {
            storeys: 2,
            ..Default::default()
        };
        let phases = ScopeFilter::new().apply(&template(), &config);
        assert_eq!(ids(&phases), vec!["site", "upper_framing"]);
    }

    #[test]
    fn test_empty_scope_lists_never_match() {
        let config = ProjectConfig::default();
        assert!(!ScopeFilter::matches(&LocationScope::Rooms { room_types: vec![] }, &config));
        assert!(!ScopeFilter::matches(&LocationScope::Zones { zones: vec![] }, &config));
    }
}
