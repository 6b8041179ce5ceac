//! Command-line interface for phasegate.

pub mod commands;
pub mod output;
pub mod table;

use clap::{Parser, Subcommand};

use commands::project::ProjectArgs;
use commands::suggest::SuggestArgs;
use commands::template::TemplateArgs;

#[derive(Parser, Debug)]
#[command(name = "phasegate")]
#[command(about = "Phasegate - construction phase dependency validation and sequencing", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inspect and validate phase templates
    Template(TemplateArgs),

    /// Suggest a template for a project type
    Suggest(SuggestArgs),

    /// Track phases of a project
    Project(ProjectArgs),
}

/// Print an error to stderr (as JSON in JSON mode) and exit non-zero.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let chain: Vec<String> = err.chain().skip(1).map(ToString::to_string).collect();
        let value = serde_json::json!({
            "success": false,
            "error": err.to_string(),
            "causes": chain,
        });
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&value).unwrap_or_default()
        );
    } else {
        eprintln!("{} {err:#}", console::style("Error:").red().bold());
    }
    std::process::exit(1);
}
