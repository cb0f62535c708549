//! `crudgen generate <generator>`

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use console::{style, Emoji};
use crudgen::args::GeneratorArgs;
use crudgen::generators::{api, controller, route, schema, sync};
use crudgen::workspace::{Action, Report, Workspace, WriteOptions};
use serde_json::Value;

use super::ProjectContext;

static SUCCESS: Emoji<'_, '_> = Emoji("✓", "√");
static SKIPPED: Emoji<'_, '_> = Emoji("·", "-");
static FAILED: Emoji<'_, '_> = Emoji("✗", "x");

/// Flags shared by generators that write files
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct WriteFlags {
    /// Overwrite files that already exist
    #[arg(long)]
    force: bool,

    /// Show what would change without writing anything
    #[arg(long)]
    dry_run: bool,
}

impl From<WriteFlags> for WriteOptions {
    fn from(flags: WriteFlags) -> Self {
        Self {
            dry_run: flags.dry_run,
            force: flags.force,
        }
    }
}

/// Generators
#[derive(Debug, Subcommand)]
pub enum GenerateCommand {
    /// Generate a CRUD controller and its API test suite
    ///
    /// Example:
    ///   crudgen generate controller "order item" --type sql
    Controller {
        /// Entity name, e.g. "order item"
        name: Option<String>,

        /// Storage type: json, sql or mongo
        #[arg(long = "type", value_name = "TYPE")]
        storage_type: Option<String>,

        #[command(flatten)]
        write: WriteFlags,
    },

    /// Generate schema files
    ///
    /// Example:
    ///   crudgen generate schema "order item" --types json,sql --fields quantity,unitPrice
    Schema {
        /// Entity name
        name: Option<String>,

        /// Comma separated schema types: json, sql
        #[arg(long)]
        types: Option<String>,

        /// Comma separated field names
        #[arg(long)]
        fields: Option<String>,

        #[command(flatten)]
        write: WriteFlags,
    },

    /// Add routes and a policy for an entity
    Route {
        /// Entity name
        name: Option<String>,

        /// Show what would change without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate schema, controller, and routes in one go
    ///
    /// Example:
    ///   crudgen generate api "order item" --type sql --fields quantity,unitPrice
    Api {
        /// Entity name
        name: Option<String>,

        /// Storage type: json, sql or mongo
        #[arg(long = "type", value_name = "TYPE")]
        storage_type: Option<String>,

        /// Comma separated field names
        #[arg(long)]
        fields: Option<String>,

        /// Run the remaining steps when one fails
        #[arg(long)]
        keep_going: bool,

        #[command(flatten)]
        write: WriteFlags,
    },

    /// Sync the SQL models with the database
    Sync {
        /// Print the command instead of running it
        #[arg(long)]
        dry_run: bool,
    },
}

impl GenerateCommand {
    /// Execute the generator
    ///
    /// # Errors
    ///
    /// Returns the generator's error, or an error listing failed steps of
    /// `api --keep-going`.
    pub fn execute(&self, context: &ProjectContext) -> Result<()> {
        let workspace = Workspace::open(&context.root, context.config.clone(), self.write_options())?;

        let report = match self {
            Self::Controller { name, storage_type, .. } => {
                let mut args = generator_args(name.as_deref());
                args.storage_type.clone_from(storage_type);
                controller::run(&workspace, &args)?
            }
            Self::Schema { name, types, fields, .. } => {
                let mut args = generator_args(name.as_deref());
                args.types.clone_from(types);
                args.fields.clone_from(fields);
                schema::run(&workspace, &args)?
            }
            Self::Route { name, .. } => route::run(&workspace, &generator_args(name.as_deref()))?,
            Self::Api {
                name,
                storage_type,
                fields,
                keep_going,
                ..
            } => {
                let mut args = generator_args(name.as_deref());
                args.storage_type.clone_from(storage_type);
                args.fields.clone_from(fields);
                api::run(&workspace, &args, *keep_going)?
            }
            Self::Sync { dry_run } => return run_sync(&workspace, *dry_run),
        };

        print_report(&report);

        if !report.is_success() {
            bail!("{} step(s) failed", report.failures.len());
        }
        Ok(())
    }

    fn write_options(&self) -> WriteOptions {
        match self {
            Self::Controller { write, .. } | Self::Schema { write, .. } | Self::Api { write, .. } => {
                (*write).into()
            }
            Self::Route { dry_run, .. } | Self::Sync { dry_run } => WriteOptions {
                dry_run: *dry_run,
                force: false,
            },
        }
    }
}

fn generator_args(name: Option<&str>) -> GeneratorArgs {
    GeneratorArgs {
        args: name.map(|n| Value::String(n.to_string())).into_iter().collect(),
        ..GeneratorArgs::default()
    }
}

fn run_sync(workspace: &Workspace, dry_run: bool) -> Result<()> {
    let settings = &workspace.config().sync;

    if dry_run {
        println!(
            "{} {} {}",
            style("Would run").cyan().bold(),
            style(&settings.program).yellow(),
            style(settings.args.join(" ")).dim()
        );
        return Ok(());
    }

    println!("{} {}", style("Syncing").green().bold(), style("database models...").bold());
    sync::run(workspace)?;
    println!("{}", style(format!("{SUCCESS} Database synced")).green().bold());
    Ok(())
}

fn print_report(report: &Report) {
    if report.dry_run {
        println!("{}", style("Dry run, nothing written:").cyan().bold());
    }

    for change in &report.changes {
        let label = format!("{:>9}", change.action.label());
        match change.action {
            Action::Unchanged => println!(
                "  {} {} {}",
                SKIPPED,
                style(label).dim(),
                style(change.path.display()).dim()
            ),
            _ => println!(
                "  {} {} {}",
                style(SUCCESS.to_string()).green(),
                style(label).green(),
                change.path.display()
            ),
        }
    }

    for failure in &report.failures {
        println!(
            "  {} {} {}",
            style(FAILED.to_string()).red(),
            style(format!("{:>9}", failure.step)).red(),
            style(&failure.message).yellow()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crudgen::config::GeneratorConfig;
    use std::fs;
    use tempfile::tempdir;

    fn context(root: &std::path::Path) -> ProjectContext {
        ProjectContext {
            root: root.to_path_buf(),
            config: GeneratorConfig {
                templates_dir: Some(root.join(".templates")),
                ..GeneratorConfig::default()
            },
        }
    }

    #[test]
    fn test_missing_name_maps_to_empty_args() {
        assert!(generator_args(None).args.is_empty());
        assert_eq!(generator_args(Some("post")), GeneratorArgs::named("post"));
    }

    #[test]
    fn test_controller_command_writes_files() {
        let dir = tempdir().unwrap();
        let command = GenerateCommand::Controller {
            name: Some("post".to_string()),
            storage_type: Some("json".to_string()),
            write: WriteFlags::default(),
        };

        command.execute(&context(dir.path())).unwrap();

        assert!(dir.path().join("api/controllers/PostController.js").is_file());
    }

    #[test]
    fn test_keep_going_failure_is_an_error() {
        let dir = tempdir().unwrap();
        let command = GenerateCommand::Api {
            name: Some("post".to_string()),
            storage_type: Some("json".to_string()),
            fields: Some("title".to_string()),
            keep_going: true,
            write: WriteFlags::default(),
        };

        let err = command.execute(&context(dir.path())).unwrap_err();

        assert!(err.to_string().contains("1 step(s) failed"));
        assert!(fs::metadata(dir.path().join("api/models/schema/Post.js")).is_ok());
    }
}
