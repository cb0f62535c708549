//! Error types for planning and applying generators

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while validating, planning, or applying a generator
#[derive(Debug, Error)]
pub enum GenerateError {
    /// No entity name was given
    #[error("Please provide a name for this {subject}.")]
    MissingEntityName {
        /// What the name is for ("controller", "schema", ...)
        subject: &'static str,
    },

    /// The entity name was present but not a string
    #[error("Expected a string for the entity name, but instead got: {found}")]
    EntityNameNotString {
        /// Debug rendering of the offending value
        found: String,
    },

    /// No `--type` was given
    #[error("Please provide a type for this {subject}.")]
    MissingStorageType {
        /// What the type is for
        subject: &'static str,
    },

    /// `--type` is not one of the accepted storage types
    #[error("Unsupported storage type '{found}'. Please provide --type {expected}.")]
    UnsupportedStorageType {
        /// The rejected value
        found: String,
        /// Human readable list of accepted values
        expected: &'static str,
    },

    /// No `--types` was given to the schema generator
    #[error("Please provide at least one type for this schema (using --types)")]
    MissingTypeList,

    /// An entry of `--types` is not `json` or `sql`
    #[error("The schema type '{found}' is not supported. Please provide --types json or sql")]
    UnsupportedSchemaType {
        /// The rejected entry
        found: String,
    },

    /// No `--fields` was given, or it held no names
    #[error("Please provide at least one field for this schema (using --fields)")]
    MissingFieldList,

    /// A field name is not a valid JavaScript identifier
    #[error("Field '{0}' is not a valid identifier (letters, digits, '_' or '$', not starting with a digit)")]
    InvalidField(String),

    /// A field uses a name the generated model defines itself
    #[error("Field '{0}' is reserved and is generated automatically")]
    ReservedField(String),

    /// A field name appears more than once
    #[error("Field '{0}' is listed more than once")]
    DuplicateField(String),

    /// A target path still holds a placeholder the scope cannot fill
    #[error("Target path '{pattern}' uses unknown placeholder ':{placeholder}'")]
    UnresolvedPlaceholder {
        /// The path pattern
        pattern: String,
        /// The placeholder name without the leading colon
        placeholder: String,
    },

    /// The target file exists and `--force` was not given
    #[error("{} already exists (use --force to overwrite)", .0.display())]
    FileExists(PathBuf),

    /// The sentinel marker line is missing from a config file
    #[error("No marker line matching `{pattern}` found in {}", path.display())]
    MarkerNotFound {
        /// File that was searched
        path: PathBuf,
        /// The marker pattern
        pattern: String,
    },

    /// The sentinel marker line appears more than once
    #[error("Found {count} marker lines in {}, expected exactly one", path.display())]
    DuplicateMarker {
        /// File that was searched
        path: PathBuf,
        /// Number of matching lines
        count: usize,
    },

    /// A template id has no built-in or user-supplied template
    #[error("Unknown template '{0}'")]
    UnknownTemplate(String),

    /// Template rendering failed
    #[error("failed to render template '{id}': {source}")]
    Template {
        /// Template id
        id: String,
        /// Underlying engine error
        #[source]
        source: minijinja::Error,
    },

    /// File system access failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The database sync command failed or could not be started
    #[error("database sync failed: {0}")]
    DatabaseSync(String),

    /// The generator configuration is invalid
    #[error("configuration error: {0}")]
    Config(String),

    /// A step of the aggregate pipeline failed
    #[error("step '{step}' failed: {source}")]
    Step {
        /// Name of the failing generator
        step: &'static str,
        /// Error returned by that generator
        #[source]
        source: Box<GenerateError>,
    },
}

impl GenerateError {
    /// Wrap an I/O error with the path it occurred on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error from a message
    #[must_use]
    pub fn config<T: Into<String>>(msg: T) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the error stems from bad command-line input rather than
    /// the environment
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        match self {
            Self::MissingEntityName { .. }
            | Self::EntityNameNotString { .. }
            | Self::MissingStorageType { .. }
            | Self::UnsupportedStorageType { .. }
            | Self::MissingTypeList
            | Self::UnsupportedSchemaType { .. }
            | Self::MissingFieldList
            | Self::InvalidField(_)
            | Self::ReservedField(_)
            | Self::DuplicateField(_)
            | Self::FileExists(_) => true,
            Self::Step { source, .. } => source.is_user_error(),
            _ => false,
        }
    }
}

/// Result alias used across the crate
pub type Result<T, E = GenerateError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_error_classification() {
        assert!(GenerateError::MissingTypeList.is_user_error());
        assert!(GenerateError::MissingEntityName { subject: "schema" }.is_user_error());
        assert!(GenerateError::InvalidField("unit price".into()).is_user_error());
        assert!(!GenerateError::DatabaseSync("boom".into()).is_user_error());

        let wrapped = GenerateError::Step {
            step: "schema",
            source: Box::new(GenerateError::MissingFieldList),
        };
        assert!(wrapped.is_user_error());
    }

    #[test]
    fn test_messages() {
        let err = GenerateError::MissingEntityName { subject: "controller" };
        assert_eq!(err.to_string(), "Please provide a name for this controller.");

        let err = GenerateError::MarkerNotFound {
            path: PathBuf::from("config/routes.js"),
            pattern: "// ////.+".into(),
        };
        assert!(err.to_string().contains("config/routes.js"));
    }
}
