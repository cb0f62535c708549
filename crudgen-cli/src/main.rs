//! crudgen - generate controllers, schemas, and routes for a Sails-style
//! REST project
//!
//! # Usage
//!
//! ```bash
//! crudgen generate controller "order item" --type sql
//! crudgen generate schema "order item" --types json,sql --fields quantity,unitPrice
//! crudgen generate route "order item"
//! crudgen generate api "order item" --type sql --fields quantity,unitPrice
//! crudgen generate sync
//! crudgen config
//! ```

mod commands;
mod observability;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::{style, Emoji};
use std::path::PathBuf;
use std::process::ExitCode;

use commands::{ConfigCommand, GenerateCommand, ProjectContext};

static FAILED: Emoji<'_, '_> = Emoji("✗ ", "x ");

#[derive(Parser)]
#[command(name = "crudgen")]
#[command(version)]
#[command(about = "Code generators for Sails-style REST projects", long_about = None)]
struct Cli {
    /// Project root
    #[arg(long, global = true, default_value = ".")]
    project: PathBuf,

    /// Configuration file (defaults to <project>/crudgen.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a generator
    Generate {
        /// Generator to run
        #[command(subcommand)]
        command: GenerateCommand,
    },
    /// Print the effective configuration
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = observability::init(cli.verbose) {
        eprintln!("{} {e:#}", style("warning:").yellow().bold());
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{FAILED}{}", style(format!("{e:#}")).yellow());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let context = ProjectContext::load(&cli.project, cli.config.as_deref())
        .context("Failed to load configuration")?;

    match cli.command {
        Commands::Generate { command } => command.execute(&context),
        Commands::Config => ConfigCommand.execute(&context),
    }
}
