//! Template suggestion command.

use anyhow::Result;
use clap::Args;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Config, ProjectAttributes};
use crate::infrastructure::templates::build_registry;
use crate::services::TemplateSuggester;

#[derive(Args, Debug)]
pub struct SuggestArgs {
    /// Project type tag (e.g., "kitchen_remodel", "new_build")
    #[arg(short, long)]
    pub project_type: String,
}

#[derive(Debug, serde::Serialize)]
struct SuggestOutput {
    project_type: String,
    template_id: Option<String>,
    template_name: Option<String>,
    phase_count: usize,
}

impl CommandOutput for SuggestOutput {
    fn to_human(&self) -> String {
        match (&self.template_id, &self.template_name) {
            (Some(id), Some(name)) => format!(
                "Suggested template for '{}': {} - {} [{} phases]",
                self.project_type, id, name, self.phase_count
            ),
            _ => format!("No template matches project type '{}'.", self.project_type),
        }
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn execute(args: SuggestArgs, config: &Config, json_mode: bool) -> Result<()> {
    let registry = build_registry(&config.templates)?;
    let attributes = ProjectAttributes::new(args.project_type.clone());
    let suggestion = TemplateSuggester::new().suggest(&registry, &attributes);

    let out = SuggestOutput {
        project_type: args.project_type,
        phase_count: suggestion.as_ref().map_or(0, |t| t.phases.len()),
        template_id: suggestion.as_ref().map(|t| t.id.clone()),
        template_name: suggestion.map(|t| t.name),
    };
    output(&out, json_mode);
    Ok(())
}
