//! Protograph CLI - schema graph inspector

use anyhow::Result;
use clap::Parser;
use protograph_cli::{commands, logging, Cli, Commands, OutputFormat};
use protograph_core::ProtographConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let cwd = std::env::current_dir()?;
    let config = ProtographConfig::find_and_load(&cwd)?;
    logging::init_logging(cli.verbose, config.output.color);
    if !config.output.color {
        colored::control::set_override(false);
    }
    let format = OutputFormat::resolve(cli.format, &config.output.format);

    match &cli.command {
        Commands::Init { path } => {
            commands::init::run(path.as_deref())?;
        }
        Commands::Inspect { graph } => {
            commands::inspect::run(graph, format, &config)?;
        }
        Commands::Fields { graph } => {
            commands::fields::run(graph, format, &config)?;
        }
        Commands::Paths { graph, from, to } => {
            commands::paths::run(graph, from, to, format, &config)?;
        }
    }

    Ok(())
}
