//! Database sync generator
//!
//! Runs the configured sync command in the project root. The default is a
//! Node one-liner that calls `sequelize.sync({ alter: true })` on the
//! models in `resources/sql/models`.

use std::process::Command;
use tracing::info;

use crate::error::{GenerateError, Result};
use crate::workspace::Workspace;

/// Generator name
pub const NAME: &str = "sync";

/// Run the sync command and wait for it
///
/// Does nothing under `--dry-run`.
///
/// # Errors
///
/// Returns [`GenerateError::DatabaseSync`] if the command cannot be started
/// or exits unsuccessfully.
pub fn run(workspace: &Workspace) -> Result<()> {
    let settings = &workspace.config().sync;

    if workspace.options().dry_run {
        info!(program = %settings.program, "dry run, skipping database sync");
        return Ok(());
    }

    info!(program = %settings.program, root = %workspace.root().display(), "syncing database");
    let status = Command::new(&settings.program)
        .args(&settings.args)
        .current_dir(workspace.root())
        .status()
        .map_err(|e| GenerateError::DatabaseSync(format!("could not start `{}`: {e}", settings.program)))?;

    if !status.success() {
        return Err(GenerateError::DatabaseSync(format!(
            "`{}` exited with {status}",
            settings.program
        )));
    }

    info!("database synced");
    Ok(())
}
