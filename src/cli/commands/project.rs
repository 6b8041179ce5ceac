//! Project tracking CLI commands.
//!
//! Every mutating command runs load, validate, commit and save within one
//! invocation. A rejected or unacknowledged change leaves the record file
//! untouched.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::cli::output::{output, report_lines, styled_status, CommandOutput};
use crate::cli::table::{PhaseRow, TableFormatter};
use crate::domain::models::{
    Config, PhaseProgress, PhaseStatus, ProjectConfig, UnmetDependency, ValidationReport,
};
use crate::domain::DomainResult;
use crate::domain::ports::TemplateRegistry;
use crate::infrastructure::templates::build_registry;
use crate::services::{InMemoryTemplateRegistry, ProjectPlan, ProjectRecord, TemplateSuggester};

#[derive(Args, Debug)]
pub struct ProjectArgs {
    /// Project record file (defaults to `project.record_path` from config)
    #[arg(long, global = true)]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: ProjectCommands,
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// Apply a template to a building configuration and create the record
    Init {
        /// Building configuration (YAML)
        #[arg(short, long)]
        config: PathBuf,

        /// Template id; suggested from the configuration's project_type when omitted
        #[arg(short, long)]
        template: Option<String>,

        /// Overwrite an existing record
        #[arg(long)]
        force: bool,
    },
    /// Show every phase in project order with progress
    Status,
    /// List pending phases whose hard prerequisites are complete
    Ready,
    /// List blocked phases and what they wait on
    Blocked,
    /// Mark a phase as in progress
    Start {
        /// Phase id
        phase: String,
    },
    /// Mark a phase complete
    Complete {
        /// Phase id
        phase: String,

        /// Acknowledge soft dependency warnings
        #[arg(short, long)]
        force: bool,
    },
    /// Return a phase to pending
    Reset {
        /// Phase id
        phase: String,

        /// Acknowledge warnings about completed dependents
        #[arg(short, long)]
        force: bool,
    },
    /// Propose a new phase sequence (every phase id, in the new order)
    Reorder {
        #[arg(required = true, num_args = 1..)]
        phases: Vec<String>,

        /// Acknowledge soft ordering warnings
        #[arg(short, long)]
        force: bool,
    },
    /// Discard all progress and the custom sequence
    ResetAll,
}

// ── Output structs ──────────────────────────────────────────────────────

#[derive(Debug, serde::Serialize)]
struct InitOutput {
    record_path: PathBuf,
    template_id: String,
    suggested: bool,
    phase_count: usize,
    out_of_scope: Vec<String>,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let how = if self.suggested { " (suggested)" } else { "" };
        let mut lines = vec![
            format!(
                "Applied template {}{how}: {} phases in scope",
                self.template_id, self.phase_count
            ),
            format!("Record written to {}", self.record_path.display()),
        ];
        if !self.out_of_scope.is_empty() {
            lines.push(format!("Out of scope: {}", self.out_of_scope.join(", ")));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
struct StatusOutput {
    template_id: String,
    progress: PhaseProgress,
    phases: Vec<PhaseRow>,
}

impl CommandOutput for StatusOutput {
    fn to_human(&self) -> String {
        format!(
            "Template: {}\n{}\nProgress: {}",
            self.template_id,
            TableFormatter::new().format_phases(&self.phases),
            self.progress
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
struct PhaseRef {
    id: String,
    name: String,
}

#[derive(Debug, serde::Serialize)]
struct ReadyOutput {
    ready: Vec<PhaseRef>,
}

impl CommandOutput for ReadyOutput {
    fn to_human(&self) -> String {
        if self.ready.is_empty() {
            return "No phases are ready to start.".to_string();
        }
        let mut lines = vec![format!("Ready to start ({}):", self.ready.len())];
        for p in &self.ready {
            lines.push(format!("  {} [{}]", p.name, p.id));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
struct BlockedOutput {
    blocked: BTreeMap<String, Vec<UnmetDependency>>,
}

impl CommandOutput for BlockedOutput {
    fn to_human(&self) -> String {
        if self.blocked.is_empty() {
            return "No phases are blocked.".to_string();
        }
        let mut lines = vec![format!("Blocked phases ({}):", self.blocked.len())];
        for (phase_id, unmet) in &self.blocked {
            lines.push(format!("  {phase_id}"));
            for dep in unmet {
                let mut line = format!("    waiting on {}", dep.requires_phase_name);
                if !dep.constraint.reason.is_empty() {
                    line.push_str(&format!(" ({})", dep.constraint.reason));
                }
                lines.push(line);
            }
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
struct ChangeOutput {
    action: &'static str,
    phase_id: Option<String>,
    committed: bool,
    status: Option<PhaseStatus>,
    report: ValidationReport,
}

impl CommandOutput for ChangeOutput {
    fn to_human(&self) -> String {
        let target = self.phase_id.as_deref().unwrap_or("sequence");
        let mut lines = vec![match (self.committed, self.status) {
            (true, Some(status)) => {
                format!("{} {target}: now {}", self.action, styled_status(status, false))
            }
            (true, None) => format!("{} {target}: done", self.action),
            (false, _) => format!("{} {target}: not applied", self.action),
        }];
        lines.extend(report_lines(&self.report));
        if !self.committed && self.report.valid && !self.report.warnings.is_empty() {
            lines.push("Re-run with --force to acknowledge the warnings.".to_string());
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

// ── Command execution ───────────────────────────────────────────────────

pub fn execute(args: ProjectArgs, config: &Config, json_mode: bool) -> Result<()> {
    let path = args
        .file
        .unwrap_or_else(|| PathBuf::from(&config.project.record_path));
    let registry = build_registry(&config.templates)?;

    match args.command {
        ProjectCommands::Init {
            config: config_path,
            template,
            force,
        } => init_project(&registry, &path, &config_path, template, force, json_mode),
        ProjectCommands::Status => show_status(&load_plan(&registry, &path)?, json_mode),
        ProjectCommands::Ready => show_ready(&load_plan(&registry, &path)?, json_mode),
        ProjectCommands::Blocked => show_blocked(&load_plan(&registry, &path)?, json_mode),
        ProjectCommands::Start { phase } => {
            let mut plan = load_plan(&registry, &path)?;
            start_phase(&mut plan, &path, &phase, json_mode)
        }
        ProjectCommands::Complete { phase, force } => {
            let mut plan = load_plan(&registry, &path)?;
            let result = plan.complete(&phase, force);
            finish_change(&plan, &path, "complete", Some(phase), result, json_mode, |p, id| {
                p.check_completion(id)
            })
        }
        ProjectCommands::Reset { phase, force } => {
            let mut plan = load_plan(&registry, &path)?;
            let result = plan.reset(&phase, force);
            finish_change(&plan, &path, "reset", Some(phase), result, json_mode, |p, id| {
                p.check_reset(id)
            })
        }
        ProjectCommands::Reorder { phases, force } => {
            let mut plan = load_plan(&registry, &path)?;
            let result = plan.reorder(&phases, force);
            finish_change(&plan, &path, "reorder", None, result, json_mode, |p, _| {
                p.check_reorder(&phases)
            })
        }
        ProjectCommands::ResetAll => {
            let mut plan = load_plan(&registry, &path)?;
            plan.reset_to_template_defaults();
            save_plan(&plan, &path)?;
            let out = ChangeOutput {
                action: "reset-all",
                phase_id: None,
                committed: true,
                status: None,
                report: ValidationReport::new(),
            };
            output(&out, json_mode);
            Ok(())
        }
    }
}

fn init_project(
    registry: &InMemoryTemplateRegistry,
    path: &Path,
    config_path: &Path,
    template: Option<String>,
    force: bool,
    json_mode: bool,
) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Project record already exists at {} (use --force to overwrite)",
            path.display()
        );
    }

    let content = std::fs::read_to_string(config_path).context(format!(
        "Failed to read project config: {}",
        config_path.display()
    ))?;
    let project: ProjectConfig = serde_yaml::from_str(&content).context(format!(
        "Failed to parse project config: {}",
        config_path.display()
    ))?;

    let (template_id, suggested) = match template {
        Some(id) => (id, false),
        None => {
            let attributes = project.attributes().context(
                "No --template given and the project config declares no project_type",
            )?;
            let suggestion = TemplateSuggester::new()
                .suggest(registry, &attributes)
                .with_context(|| {
                    format!(
                        "No template matches project type '{}'",
                        attributes.project_type
                    )
                })?;
            (suggestion.id, true)
        }
    };

    let plan = ProjectPlan::apply(registry, &template_id, project)?;
    save_plan(&plan, path)?;

    let out_of_scope = registry
        .require_template(&template_id)?
        .phases
        .iter()
        .filter(|p| plan.phase(&p.id).is_none())
        .map(|p| p.id.clone())
        .collect();

    let out = InitOutput {
        record_path: path.to_path_buf(),
        template_id,
        suggested,
        phase_count: plan.phases().len(),
        out_of_scope,
    };
    output(&out, json_mode);
    Ok(())
}

fn phase_rows(plan: &ProjectPlan) -> Vec<PhaseRow> {
    let blocked = plan.blocked_phases();

    plan.ordered_phases()
        .into_iter()
        .enumerate()
        .map(|(position, phase)| {
            let waiting_on: Vec<String> = blocked
                .get(&phase.id)
                .map(|unmet| unmet.iter().map(|d| d.requires_phase_name.clone()).collect())
                .unwrap_or_default();

            PhaseRow {
                position,
                phase_id: phase.id.clone(),
                name: phase.name.clone(),
                category: phase.category.to_string(),
                status: plan.tracker().status_of(&phase.id).unwrap_or_default(),
                blocked: !waiting_on.is_empty(),
                waiting_on,
            }
        })
        .collect()
}

fn show_status(plan: &ProjectPlan, json_mode: bool) -> Result<()> {
    let out = StatusOutput {
        template_id: plan.template_id().to_string(),
        progress: plan.progress(),
        phases: phase_rows(plan),
    };
    output(&out, json_mode);
    Ok(())
}

fn show_ready(plan: &ProjectPlan, json_mode: bool) -> Result<()> {
    let ready = plan
        .ready_phases()
        .into_iter()
        .map(|p| PhaseRef { id: p.id, name: p.name })
        .collect();
    output(&ReadyOutput { ready }, json_mode);
    Ok(())
}

fn show_blocked(plan: &ProjectPlan, json_mode: bool) -> Result<()> {
    output(
        &BlockedOutput {
            blocked: plan.blocked_phases(),
        },
        json_mode,
    );
    Ok(())
}

fn start_phase(
    plan: &mut ProjectPlan,
    path: &Path,
    phase_id: &str,
    json_mode: bool,
) -> Result<()> {
    plan.tracker_mut()
        .transition(phase_id, PhaseStatus::InProgress)?;
    save_plan(plan, path)?;

    let out = ChangeOutput {
        action: "start",
        phase_id: Some(phase_id.to_string()),
        committed: true,
        status: Some(PhaseStatus::InProgress),
        report: ValidationReport::new(),
    };
    output(&out, json_mode);
    Ok(())
}

/// Save on success. On failure the state is unchanged, so `recheck`
/// reproduces the report that explains the refusal.
fn finish_change(
    plan: &ProjectPlan,
    path: &Path,
    action: &'static str,
    phase_id: Option<String>,
    result: DomainResult<ValidationReport>,
    json_mode: bool,
    recheck: impl FnOnce(&ProjectPlan, &str) -> ValidationReport,
) -> Result<()> {
    match result {
        Ok(report) => {
            save_plan(plan, path)?;
            let status = phase_id
                .as_deref()
                .and_then(|id| plan.tracker().status_of(id));
            let out = ChangeOutput {
                action,
                phase_id,
                committed: true,
                status,
                report,
            };
            output(&out, json_mode);
            Ok(())
        }
        Err(err) => {
            let report = recheck(plan, phase_id.as_deref().unwrap_or_default());
            let out = ChangeOutput {
                action,
                phase_id,
                committed: false,
                status: None,
                report,
            };
            output(&out, json_mode);
            Err(err.into())
        }
    }
}

pub fn load_plan<R: TemplateRegistry + ?Sized>(registry: &R, path: &Path) -> Result<ProjectPlan> {
    let content = std::fs::read_to_string(path).context(format!(
        "Failed to read project record: {} (run `phasegate project init` first)",
        path.display()
    ))?;
    let record: ProjectRecord = serde_json::from_str(&content)
        .context(format!("Failed to parse project record: {}", path.display()))?;

    Ok(ProjectPlan::from_record(registry, record)?)
}

pub fn save_plan(plan: &ProjectPlan, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .context(format!("Failed to create directory: {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(&plan.record())
        .context("Failed to serialize project record")?;
    std::fs::write(path, json)
        .context(format!("Failed to write project record: {}", path.display()))?;

    info!(path = %path.display(), "Saved project record");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Issue, IssueKind};

    fn kitchen_plan() -> (InMemoryTemplateRegistry, ProjectPlan) {
        let registry = InMemoryTemplateRegistry::with_builtin().unwrap();
        let config = ProjectConfig {
            rooms: vec!["kitchen".to_string()],
            ..Default::default()
        };
        let plan = ProjectPlan::apply(&registry, "kitchen_remodel", config).unwrap();
        (registry, plan)
    }

    #[test]
    fn test_save_and_load_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("project.json");
        let (registry, mut plan) = kitchen_plan();
        plan.complete("demolition", false).unwrap();

        save_plan(&plan, &path).unwrap();
        let loaded = load_plan(&registry, &path).unwrap();
        assert_eq!(loaded.progress(), plan.progress());
        assert_eq!(
            loaded.tracker().status_of("demolition"),
            Some(PhaseStatus::Complete)
        );
    }

    #[test]
    fn test_load_missing_record() {
        let dir = tempfile::tempdir().unwrap();
        let registry = InMemoryTemplateRegistry::with_builtin().unwrap();
        let err = load_plan(&registry, &dir.path().join("none.json")).unwrap_err();
        assert!(err.to_string().contains("project init"));
    }

    #[test]
    fn test_rejected_change_does_not_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.json");
        let (_, mut plan) = kitchen_plan();

        let result = plan.complete("countertops", true);
        let finished = finish_change(
            &plan,
            &path,
            "complete",
            Some("countertops".to_string()),
            result,
            true,
            |p, id| p.check_completion(id),
        );
        assert!(finished.is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_phase_rows_follow_project_order() {
        let (_, plan) = kitchen_plan();
        let rows = phase_rows(&plan);
        assert_eq!(rows.len(), plan.phases().len());
        assert_eq!(rows[0].position, 0);
        assert!(rows.iter().any(|r| r.blocked && !r.waiting_on.is_empty()));
        assert!(rows.iter().all(|r| r.status == PhaseStatus::Pending));
    }

    #[test]
    fn test_change_output_hints_force() {
        let mut report = ValidationReport::new();
        report.add_warning(Issue::new(
            IssueKind::SoftDependencyUnmet,
            "paint",
            "primer not done",
        ));
        let out = ChangeOutput {
            action: "complete",
            phase_id: Some("paint".to_string()),
            committed: false,
            status: None,
            report,
        };
        assert!(out.to_human().contains("--force"));
    }
}
