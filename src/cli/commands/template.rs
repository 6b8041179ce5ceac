//! Phase template CLI commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::collections::HashSet;
use std::path::Path;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Config, PhaseTemplate};
use crate::domain::ports::TemplateRegistry;
use crate::infrastructure::templates::{build_registry, TemplateLoader};
use crate::services::{phase_catalog, InMemoryTemplateRegistry};

#[derive(Args, Debug)]
pub struct TemplateArgs {
    #[command(subcommand)]
    pub command: TemplateCommands,
}

#[derive(Subcommand, Debug)]
pub enum TemplateCommands {
    /// List available phase templates
    List,
    /// Show the phases and dependencies of a template
    Show {
        /// Template id (e.g., "kitchen_remodel")
        id: String,
    },
    /// Validate built-in and configured template files
    Validate,
}

// ── Output structs ──────────────────────────────────────────────────────

#[derive(Debug, serde::Serialize)]
struct TemplateSummary {
    id: String,
    name: String,
    project_types: Vec<String>,
    phase_count: usize,
}

#[derive(Debug, serde::Serialize)]
struct TemplateListOutput {
    templates: Vec<TemplateSummary>,
}

impl CommandOutput for TemplateListOutput {
    fn to_human(&self) -> String {
        if self.templates.is_empty() {
            return "No templates found.".to_string();
        }
        let mut lines = vec!["Available templates:".to_string()];
        for t in &self.templates {
            lines.push(format!(
                "  {} - {} [{} phases] ({})",
                t.id,
                t.name,
                t.phase_count,
                t.project_types.join(", ")
            ));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
struct TemplateDetailOutput {
    template: PhaseTemplate,
    external_dependencies: Vec<(String, String)>,
}

impl CommandOutput for TemplateDetailOutput {
    fn to_human(&self) -> String {
        let t = &self.template;
        let mut lines = vec![format!("Template: {} ({})", t.name, t.id)];
        if !t.description.is_empty() {
            lines.push(format!("Description: {}", t.description));
        }
        lines.push(format!("Project types: {}", t.project_types.join(", ")));
        lines.push(format!("Phases ({}):", t.phases.len()));

        for (i, phase) in t.phases.iter().enumerate() {
            lines.push(format!(
                "\n  {}. {} [{}] ({})",
                i + 1,
                phase.name,
                phase.id,
                phase.category
            ));
            for dep in &phase.dependencies {
                let kind = if dep.is_hard() { "requires" } else { "prefers" };
                let mut line = format!("     {kind} {}", dep.requires_phase_id);
                if !dep.reason.is_empty() {
                    line.push_str(&format!(": {}", dep.reason));
                }
                lines.push(line);
            }
        }

        if !self.external_dependencies.is_empty() {
            lines.push("\nPrerequisites outside this template (treated as satisfied):".to_string());
            for (phase_id, requires) in &self.external_dependencies {
                lines.push(format!("  {phase_id} -> {requires}"));
            }
        }

        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
struct ValidationResult {
    source: String,
    template_id: Option<String>,
    valid: bool,
    error: Option<String>,
}

#[derive(Debug, serde::Serialize)]
struct ValidateOutput {
    results: Vec<ValidationResult>,
    all_valid: bool,
}

impl CommandOutput for ValidateOutput {
    fn to_human(&self) -> String {
        let mut lines = vec!["Template validation:".to_string()];
        for r in &self.results {
            let status = if r.valid { "OK" } else { "FAIL" };
            let name = r.template_id.as_deref().unwrap_or("?");
            let mut line = format!("  {name} ({}) - {status}", r.source);
            if let Some(err) = &r.error {
                line.push_str(&format!(": {err}"));
            }
            lines.push(line);
        }
        if self.all_valid {
            lines.push("\nAll templates are valid.".to_string());
        } else {
            lines.push("\nSome templates have errors.".to_string());
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

// ── Command execution ───────────────────────────────────────────────────

pub fn execute(args: TemplateArgs, config: &Config, json_mode: bool) -> Result<()> {
    match args.command {
        TemplateCommands::List => list_templates(config, json_mode),
        TemplateCommands::Show { id } => show_template(config, &id, json_mode),
        TemplateCommands::Validate => validate_templates(config, json_mode),
    }
}

fn list_templates(config: &Config, json_mode: bool) -> Result<()> {
    let registry = build_registry(&config.templates)?;

    let templates = registry
        .list_templates()
        .iter()
        .map(|t| TemplateSummary {
            id: t.id.clone(),
            name: t.name.clone(),
            project_types: t.project_types.clone(),
            phase_count: t.phases.len(),
        })
        .collect();

    output(&TemplateListOutput { templates }, json_mode);
    Ok(())
}

fn show_template(config: &Config, id: &str, json_mode: bool) -> Result<()> {
    let registry = build_registry(&config.templates)?;
    let template = registry.require_template(id)?.clone();

    let out = TemplateDetailOutput {
        external_dependencies: template.external_dependencies(),
        template,
    };
    output(&out, json_mode);
    Ok(())
}

/// Check every template source on its own so one bad file does not hide others.
fn validate_templates(config: &Config, json_mode: bool) -> Result<()> {
    let mut results = Vec::new();
    let mut seen = HashSet::new();

    if config.templates.include_builtin {
        for template in phase_catalog::builtin_templates() {
            results.push(check_template("built-in", &template, &mut seen));
        }
    }

    if let Some(dir) = &config.templates.directory {
        let loader = TemplateLoader::new(dir);
        for path in loader.template_files()? {
            let source = path.display().to_string();
            let file_name = path
                .file_name()
                .map(Path::new)
                .context("Template path has no file name")?;
            match loader.load_from_file(file_name) {
                Ok(template) => results.push(check_template(&source, &template, &mut seen)),
                Err(err) => results.push(ValidationResult {
                    source,
                    template_id: None,
                    valid: false,
                    error: Some(format!("{err:#}")),
                }),
            }
        }
    }

    let all_valid = results.iter().all(|r| r.valid);
    output(&ValidateOutput { results, all_valid }, json_mode);

    if all_valid {
        Ok(())
    } else {
        anyhow::bail!("Template validation failed")
    }
}

fn check_template(
    source: &str,
    template: &PhaseTemplate,
    seen: &mut HashSet<String>,
) -> ValidationResult {
    let error = if seen.insert(template.id.clone()) {
        InMemoryTemplateRegistry::check(template)
            .err()
            .map(|e| e.to_string())
    } else {
        Some(format!("Duplicate template id: {}", template.id))
    };

    ValidationResult {
        source: source.to_string(),
        template_id: Some(template.id.clone()),
        valid: error.is_none(),
        error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_template_flags_duplicates() {
        let mut seen = HashSet::new();
        let template = phase_catalog::kitchen_remodel();

        assert!(check_template("built-in", &template, &mut seen).valid);
        let second = check_template("custom.yaml", &template, &mut seen);
        assert!(!second.valid);
        assert!(second.error.unwrap().contains("kitchen_remodel"));
    }

    #[test]
    fn test_detail_lists_external_dependencies() {
        let template = phase_catalog::kitchen_remodel();
        let out = TemplateDetailOutput {
            external_dependencies: template.external_dependencies(),
            template,
        };
        let text = out.to_human();
        assert!(text.contains("outside this template"));
        assert!(text.contains("framing"));
    }
}
