//! Generator configuration
//!
//! Loaded from several sources, highest priority last:
//!
//! 1. Built-in defaults
//! 2. `<project>/crudgen.toml`, or the file passed with `--config`
//! 3. Environment variables with the `CRUDGEN_` prefix, `__` for nesting
//!    (e.g. `CRUDGEN_SYNC__PROGRAM=npx`)
//!
//! # Example Configuration
//!
//! ```toml
//! routes_file = "config/routes.js"
//! policies_file = "config/policies.js"
//! api_prefix = "/api"
//! default_policy = "isAuthorized"
//! templates_dir = ".crudgen/templates"
//!
//! [sync]
//! program = "node"
//! args = ["scripts/sync-db.js"]
//! ```

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{GenerateError, Result};
use crate::patch::{Marker, DEFAULT_MARKER_PATTERN};

/// Name of the per-project configuration file
pub const CONFIG_FILE_NAME: &str = "crudgen.toml";

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "CRUDGEN_";

const DEFAULT_SYNC_SCRIPT: &str = "require('./resources/sql/models').sequelize.sync({ alter: true }).then(() => process.exit(0), (err) => { console.error(err); process.exit(1); });";

/// External command used by the database sync generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Program to run
    pub program: String,
    /// Arguments passed to the program
    pub args: Vec<String>,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            program: "node".to_string(),
            args: vec!["-e".to_string(), DEFAULT_SYNC_SCRIPT.to_string()],
        }
    }
}

/// Settings shared by all generators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Route table, relative to the project root
    pub routes_file: PathBuf,
    /// Policy table, relative to the project root
    pub policies_file: PathBuf,
    /// Regex recognizing the sentinel line in both tables
    pub marker_pattern: String,
    /// Prefix of every generated route
    pub api_prefix: String,
    /// Policy applied to generated controllers
    pub default_policy: String,
    /// Directory of template overrides
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates_dir: Option<PathBuf>,
    /// Database sync command
    pub sync: SyncSettings,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            routes_file: PathBuf::from("config/routes.js"),
            policies_file: PathBuf::from("config/policies.js"),
            marker_pattern: DEFAULT_MARKER_PATTERN.to_string(),
            api_prefix: "/api".to_string(),
            default_policy: "isAuthorized".to_string(),
            templates_dir: None,
            sync: SyncSettings::default(),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration for a project
    ///
    /// Uses `explicit` instead of `<project_root>/crudgen.toml` when given.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named file is missing, a file
    /// contains invalid TOML, or a value has the wrong type.
    pub fn load(project_root: &Path, explicit: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(GenerateError::config(format!(
                        "config file {} does not exist",
                        path.display()
                    )));
                }
                figment = figment.merge(Toml::file(path));
            }
            None => {
                let local = project_root.join(CONFIG_FILE_NAME);
                if local.is_file() {
                    figment = figment.merge(Toml::file(local));
                }
            }
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__").lowercase(true));

        let config: Self = figment
            .extract()
            .map_err(|e| GenerateError::config(e.to_string()))?;
        config.marker()?;
        Ok(config)
    }

    /// Compiled marker pattern
    ///
    /// # Errors
    ///
    /// Returns an error if `marker_pattern` is not a valid regex.
    pub fn marker(&self) -> Result<Marker> {
        Marker::new(&self.marker_pattern)
    }

    /// Template override directory: the configured one (relative to the
    /// project root), else `$XDG_CONFIG_HOME/crudgen/templates`
    #[must_use]
    pub fn resolve_templates_dir(&self, project_root: &Path) -> Option<PathBuf> {
        match &self.templates_dir {
            Some(dir) => Some(resolve(project_root, dir)),
            None => dirs::config_dir().map(|dir| dir.join("crudgen").join("templates")),
        }
    }

    /// Absolute route table path
    #[must_use]
    pub fn routes_path(&self, project_root: &Path) -> PathBuf {
        resolve(project_root, &self.routes_file)
    }

    /// Absolute policy table path
    #[must_use]
    pub fn policies_path(&self, project_root: &Path) -> PathBuf {
        resolve(project_root, &self.policies_file)
    }
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.routes_file, PathBuf::from("config/routes.js"));
        assert_eq!(config.api_prefix, "/api");
        assert_eq!(config.default_policy, "isAuthorized");
        assert_eq!(config.sync.program, "node");
        assert!(config.marker().is_ok());
    }

    #[test]
    fn test_project_file_and_env_precedence() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE_NAME,
                r#"
                    api_prefix = "/v1"
                    default_policy = "isAdmin"

                    [sync]
                    program = "npx"
                "#,
            )?;
            jail.set_env("CRUDGEN_DEFAULT_POLICY", "isOwner");

            let config = GeneratorConfig::load(jail.directory(), None)
                .map_err(|e| e.to_string())?;
            assert_eq!(config.api_prefix, "/v1");
            assert_eq!(config.default_policy, "isOwner");
            assert_eq!(config.sync.program, "npx");
            assert_eq!(config.routes_file, PathBuf::from("config/routes.js"));
            Ok(())
        });
    }

    #[test]
    fn test_explicit_file_must_exist() {
        Jail::expect_with(|jail| {
            let missing = jail.directory().join("other.toml");
            let err = GeneratorConfig::load(jail.directory(), Some(&missing)).unwrap_err();
            assert!(matches!(err, GenerateError::Config(_)));
            Ok(())
        });
    }

    #[test]
    fn test_bad_marker_is_rejected_at_load() {
        Jail::expect_with(|jail| {
            jail.create_file(CONFIG_FILE_NAME, r#"marker_pattern = "(""#)?;
            let err = GeneratorConfig::load(jail.directory(), None).unwrap_err();
            assert!(matches!(err, GenerateError::Config(_)));
            Ok(())
        });
    }

    #[test]
    fn test_path_resolution() {
        let config = GeneratorConfig {
            templates_dir: Some(PathBuf::from("tpl")),
            ..GeneratorConfig::default()
        };
        let root = Path::new("/srv/app");
        assert_eq!(config.routes_path(root), PathBuf::from("/srv/app/config/routes.js"));
        assert_eq!(config.resolve_templates_dir(root), Some(PathBuf::from("/srv/app/tpl")));
    }
}
