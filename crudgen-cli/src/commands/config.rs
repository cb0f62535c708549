//! Print the effective configuration

use anyhow::{Context, Result};
use console::style;

use super::ProjectContext;

/// `crudgen config`
pub struct ConfigCommand;

impl ConfigCommand {
    /// Print the merged configuration as TOML
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized.
    pub fn execute(&self, context: &ProjectContext) -> Result<()> {
        let rendered =
            toml::to_string_pretty(&context.config).context("Failed to serialize configuration")?;

        println!(
            "{} {}\n",
            style("# Effective configuration for").dim(),
            style(context.root.display()).dim()
        );
        print!("{rendered}");
        Ok(())
    }
}
