//! CLI commands

mod config;
mod generate;

pub use config::ConfigCommand;
pub use generate::GenerateCommand;

use anyhow::{Context, Result};
use crudgen::config::GeneratorConfig;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Project root plus its loaded configuration
pub struct ProjectContext {
    /// Absolute project root
    pub root: PathBuf,
    /// Effective configuration
    pub config: GeneratorConfig,
}

impl ProjectContext {
    /// Resolve the project root and load its configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the root does not exist or the configuration is
    /// invalid.
    pub fn load(project: &Path, config_file: Option<&Path>) -> Result<Self> {
        let root = project
            .canonicalize()
            .with_context(|| format!("Project directory not found: {}", project.display()))?;
        let config = GeneratorConfig::load(&root, config_file)?;
        debug!(root = %root.display(), ?config, "configuration loaded");
        Ok(Self { root, config })
    }
}
