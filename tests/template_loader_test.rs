//! Custom template files loaded next to the built-ins.

mod common;

use common::{temp_dir, write_file};
use phasegate::domain::models::TemplatesConfig;
use phasegate::infrastructure::templates::{build_registry, TemplateLoader};
use phasegate::{
    LocationScope, ProjectAttributes, ProjectConfig, ProjectPlan, TemplateRegistry,
    TemplateSuggester,
};

const DECK: &str = r"
id: deck
name: Backyard Deck
project_types: [deck, outdoor]
phases:
  - id: footings
    name: Footings
    category: structural
  - id: deck_framing
    name: Deck Framing
    category: structural
    dependencies:
      - requires_phase_id: footings
        kind: hard
        reason: Beams sit on footings
  - id: railings
    name: Railings
    category: finish
    location_scope:
      type: zones
      zones: [elevated]
    dependencies:
      - requires_phase_id: deck_framing
        kind: hard
  - id: stain
    name: Stain
    category: finish
    dependencies:
      - requires_phase_id: railings
        kind: soft
        reason: Stain everything at once
";

const CYCLE: &str = r"
id: loop
name: Loop
phases:
  - id: a
    name: A
    dependencies:
      - requires_phase_id: b
        kind: soft
  - id: b
    name: B
    dependencies:
      - requires_phase_id: a
        kind: hard
";

#[test]
fn test_custom_template_after_builtins() {
    let dir = temp_dir();
    write_file(&dir, "deck.yaml", DECK);

    let registry = build_registry(&TemplatesConfig {
        directory: Some(dir.path().display().to_string()),
        include_builtin: true,
    })
    .unwrap();

    let last = registry.list_templates().last().unwrap();
    assert_eq!(last.id, "deck");

    let suggestion = TemplateSuggester::new()
        .suggest(&registry, &ProjectAttributes::new("Deck"))
        .unwrap();
    assert_eq!(suggestion.id, "deck");
}

#[test]
fn test_location_scope_from_yaml() {
    let template = TemplateLoader::load_from_yaml(DECK).unwrap();
    let railings = template.phase("railings").unwrap();
    assert_eq!(
        railings.location_scope,
        LocationScope::Zones {
            zones: vec!["elevated".to_string()]
        }
    );
}

#[test]
fn test_scope_prunes_custom_template() {
    let dir = temp_dir();
    write_file(&dir, "deck.yaml", DECK);
    let registry = build_registry(&TemplatesConfig {
        directory: Some(dir.path().display().to_string()),
        include_builtin: false,
    })
    .unwrap();

    let plan = ProjectPlan::apply(&registry, "deck", ProjectConfig::default()).unwrap();
    assert!(plan.phase("railings").is_none());

    // Stain's soft dependency on the pruned railings no longer warns.
    let report = plan.check_completion("stain");
    assert!(report.is_clear());
}

#[test]
fn test_cyclic_template_file_rejected() {
    let dir = temp_dir();
    write_file(&dir, "loop.yaml", CYCLE);

    let err = build_registry(&TemplatesConfig {
        directory: Some(dir.path().display().to_string()),
        include_builtin: false,
    })
    .unwrap_err();

    let message = format!("{err:#}");
    assert!(message.contains("cycle"), "unexpected error: {message}");
}

#[test]
fn test_unparseable_file_names_path() {
    let dir = temp_dir();
    write_file(&dir, "broken.yaml", "id: [unclosed\n");

    let err = TemplateLoader::new(dir.path()).load_all().unwrap_err();
    assert!(format!("{err:#}").contains("broken.yaml"));
}
