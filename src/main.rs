//! Phasegate CLI entry point.

use anyhow::Context;
use clap::Parser;

use phasegate::cli::{commands, handle_error, Cli, Commands};
use phasegate::infrastructure::logging::{LogConfig, LoggerImpl};
use phasegate::ConfigLoader;

fn main() {
    let cli = Cli::parse();

    let config = match ConfigLoader::load().context("Failed to load configuration") {
        Ok(config) => config,
        Err(err) => handle_error(err, cli.json),
    };

    let _logger = match LoggerImpl::init(&LogConfig::from(&config.logging)) {
        Ok(logger) => logger,
        Err(err) => handle_error(err, cli.json),
    };

    let result = match cli.command {
        Commands::Template(args) => commands::template::execute(args, &config, cli.json),
        Commands::Suggest(args) => commands::suggest::execute(args, &config, cli.json),
        Commands::Project(args) => commands::project::execute(args, &config, cli.json),
    };

    if let Err(err) = result {
        handle_error(err, cli.json);
    }
}
