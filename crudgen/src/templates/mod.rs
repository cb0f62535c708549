//! Template registry
//!
//! Built-in templates are compiled into the binary. A user template
//! directory may shadow any of them with `<dir>/<template-id>.js.j2`,
//! e.g. `controller/sql.js.j2`.

mod sources;

use minijinja::{AutoEscape, Environment};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{GenerateError, Result};
use crate::target::TemplateId;

pub use sources::*;

/// File extension of user template overrides
pub const OVERRIDE_EXTENSION: &str = "js.j2";

/// Built-in source for a template id
#[must_use]
pub const fn builtin_source(id: TemplateId) -> &'static str {
    use crate::scope::{SchemaType, StorageType};

    match id {
        TemplateId::Controller(StorageType::Json) => CONTROLLER_JSON,
        TemplateId::Controller(StorageType::Sql) => CONTROLLER_SQL,
        TemplateId::Controller(StorageType::Mongo) => CONTROLLER_MONGO,
        TemplateId::ControllerTest => CONTROLLER_TEST,
        TemplateId::Schema(SchemaType::Json) => SCHEMA_JSON,
        TemplateId::Schema(SchemaType::Sql) => SCHEMA_SQL,
    }
}

/// MiniJinja environment holding every renderable template
pub struct TemplateRegistry {
    env: Environment<'static>,
    overridden: BTreeSet<String>,
}

impl TemplateRegistry {
    /// Registry with only the built-in templates
    ///
    /// # Errors
    ///
    /// Returns an error if a built-in template fails to compile.
    pub fn builtin() -> Result<Self> {
        Self::with_overrides(None)
    }

    /// Registry with built-ins shadowed by files found in `dir`
    ///
    /// A missing directory is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if an override file cannot be read or any template
    /// fails to compile.
    pub fn with_overrides(dir: Option<&Path>) -> Result<Self> {
        let mut env = Environment::new();
        // Generated code is not HTML
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_keep_trailing_newline(true);

        let mut overridden = BTreeSet::new();

        for id in TemplateId::ALL {
            let name = id.name();
            let source = match dir.map(|d| d.join(format!("{name}.{OVERRIDE_EXTENSION}"))) {
                Some(path) if path.is_file() => {
                    debug!(template = %name, path = %path.display(), "using template override");
                    overridden.insert(name.clone());
                    fs::read_to_string(&path).map_err(|e| GenerateError::io(&path, e))?
                }
                _ => builtin_source(id).to_string(),
            };

            env.add_template_owned(name.clone(), source)
                .map_err(|source| GenerateError::Template { id: name, source })?;
        }

        Ok(Self { env, overridden })
    }

    /// Render a template with the given context
    ///
    /// # Errors
    ///
    /// Returns an error if the template is unknown or rendering fails.
    pub fn render(&self, id: TemplateId, context: &serde_json::Value) -> Result<String> {
        let name = id.name();
        let template = self
            .env
            .get_template(&name)
            .map_err(|_| GenerateError::UnknownTemplate(name.clone()))?;

        template
            .render(context)
            .map_err(|source| GenerateError::Template { id: name, source })
    }

    /// Whether a user file replaced the built-in template
    #[must_use]
    pub fn is_overridden(&self, id: TemplateId) -> bool {
        self.overridden.contains(&id.name())
    }
}
