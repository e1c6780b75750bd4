//! cfgtree CLI
//!
//! Inspect cfg files and resolve them into parameter values.

mod cli;
mod commands;
mod context;
mod error;
mod logging;

use clap::{CommandFactory, Parser};
use colored::Colorize;

use cli::{Cli, Commands};
use context::CliContext;
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose).map_err(|e| CliError::user(e.to_string()))?;
    tracing::debug!("Verbose mode enabled");

    let Some(command) = cli.command.clone() else {
        println!("{} Resolve sectioned cfg files", "cfgtree".green().bold());
        println!();
        println!("Run {} for available commands.", "cfgtree --help".cyan());
        return Ok(());
    };

    let cwd = std::env::current_dir()?;
    let context = CliContext::load(&cli, &cwd)?;

    match command {
        Commands::Sections { file } => {
            let use_cache = !cli.no_cache && context.files.cache.unwrap_or(true);
            commands::run_sections(&file, use_cache)
        }
        Commands::Args {
            specs,
            defaults,
            args,
        } => commands::run_args(&context, &specs, defaults.as_deref(), &args),
        Commands::Resolve {
            defaults,
            specs,
            json,
            args,
        } => commands::run_resolve(&context, &defaults, &specs, json, &args),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "cfgtree", &mut std::io::stdout());
            Ok(())
        }
    }
}
