//! Target selection
//!
//! Targets are computed by pure functions of the [`Scope`]; nothing is
//! registered on shared state. A target path may contain `:placeholder`
//! segments that are filled from the scope by [`Target::resolve`].

use regex::Regex;
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::OnceLock;

use crate::error::{GenerateError, Result};
use crate::scope::{SchemaType, Scope, StorageType};

/// Identifier of a built-in (or user-overridden) template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateId {
    /// CRUD controller for a storage backend
    Controller(StorageType),
    /// API test suite for a controller
    ControllerTest,
    /// Schema in one representation
    Schema(SchemaType),
}

impl TemplateId {
    /// Every template the generators can render
    pub const ALL: [Self; 6] = [
        Self::Controller(StorageType::Json),
        Self::Controller(StorageType::Sql),
        Self::Controller(StorageType::Mongo),
        Self::ControllerTest,
        Self::Schema(SchemaType::Json),
        Self::Schema(SchemaType::Sql),
    ];

    /// Stable name, also used as the override file stem
    #[must_use]
    pub fn name(self) -> String {
        match self {
            Self::Controller(storage) => format!("controller/{storage}"),
            Self::ControllerTest => "controller/test".to_string(),
            Self::Schema(schema) => format!("schema/{schema}"),
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// What to do at a target path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// Create the directory
    Folder,
    /// Render the template to the file
    Template(TemplateId),
}

/// Output path pattern plus directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Path relative to the project root, e.g. `./api/controllers/:filename`
    pub pattern: String,
    /// Directive for the path
    pub directive: Directive,
}

impl Target {
    fn template(pattern: impl Into<String>, id: TemplateId) -> Self {
        Self {
            pattern: pattern.into(),
            directive: Directive::Template(id),
        }
    }

    fn folder(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            directive: Directive::Folder,
        }
    }

    /// Substitute placeholders and return the relative path
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::UnresolvedPlaceholder`] if the scope has no
    /// value for a placeholder.
    pub fn resolve(&self, scope: &Scope) -> Result<PathBuf> {
        let mut resolved = String::with_capacity(self.pattern.len());
        let mut last = 0;

        for captures in placeholder_regex().captures_iter(&self.pattern) {
            let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            let value = scope.placeholder(name.as_str()).ok_or_else(|| {
                GenerateError::UnresolvedPlaceholder {
                    pattern: self.pattern.clone(),
                    placeholder: name.as_str().to_string(),
                }
            })?;
            resolved.push_str(&self.pattern[last..whole.start()]);
            resolved.push_str(value);
            last = whole.end();
        }
        resolved.push_str(&self.pattern[last..]);

        Ok(PathBuf::from(resolved.trim_start_matches("./")))
    }
}

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r":([A-Za-z][A-Za-z0-9_]*)").expect("valid placeholder regex"))
}

/// Targets of the controller generator: one controller matching the
/// storage type plus the test folder and test file
///
/// # Errors
///
/// Returns [`GenerateError::MissingStorageType`] if the scope carries no
/// storage type.
pub fn controller_targets(scope: &Scope) -> Result<Vec<Target>> {
    let storage = scope
        .storage_type()
        .ok_or(GenerateError::MissingStorageType {
            subject: "controller",
        })?;

    Ok(vec![
        Target::template(
            "./api/controllers/:filename",
            TemplateId::Controller(storage),
        ),
        Target::folder("./test/api/:entityName"),
        Target::template(
            "./test/api/:entityName/api.test.js",
            TemplateId::ControllerTest,
        ),
    ])
}

/// Targets of the schema generator: one per requested representation
///
/// # Errors
///
/// Returns [`GenerateError::MissingTypeList`] if the scope has no types.
pub fn schema_targets(scope: &Scope) -> Result<Vec<Target>> {
    if scope.types().is_empty() {
        return Err(GenerateError::MissingTypeList);
    }

    Ok(scope
        .types()
        .iter()
        .map(|&schema| {
            Target::template(
                format!("./api/models/{}/:filename", schema.folder()),
                TemplateId::Schema(schema),
            )
        })
        .collect())
}

/// Schema representations generated for an entity of the given storage
/// type: SQL entities also get a JSON-shape schema
#[must_use]
pub fn schema_types_for(storage: StorageType) -> BTreeSet<SchemaType> {
    match storage {
        StorageType::Sql => BTreeSet::from([SchemaType::Json, SchemaType::Sql]),
        StorageType::Json | StorageType::Mongo => BTreeSet::from([SchemaType::Json]),
    }
}

/// `--types` value for the schema step
#[must_use]
pub fn schema_types_arg(storage: StorageType) -> String {
    schema_types_for(storage)
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(",")
}
