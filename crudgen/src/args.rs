//! Raw generator input
//!
//! Arguments arrive untyped: the CLI always produces strings, but callers
//! driving the generators programmatically (or from a JSON manifest) can
//! hand over any value, which is why the entity name is kept as a
//! [`serde_json::Value`] until validation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Positional arguments and named options for one generator invocation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratorArgs {
    /// Positional arguments; the first one is the entity name
    #[serde(default)]
    pub args: Vec<Value>,
    /// `--type`
    #[serde(default, rename = "type")]
    pub storage_type: Option<String>,
    /// `--types`, a comma separated list
    #[serde(default)]
    pub types: Option<String>,
    /// `--fields`, a comma separated list
    #[serde(default)]
    pub fields: Option<String>,
}

impl GeneratorArgs {
    /// Arguments with the given entity name as the only positional argument
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            args: vec![Value::String(name.into())],
            ..Self::default()
        }
    }

    /// Set `--type`
    #[must_use]
    pub fn with_type(mut self, storage_type: impl Into<String>) -> Self {
        self.storage_type = Some(storage_type.into());
        self
    }

    /// Set `--types`
    #[must_use]
    pub fn with_types(mut self, types: impl Into<String>) -> Self {
        self.types = Some(types.into());
        self
    }

    /// Set `--fields`
    #[must_use]
    pub fn with_fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    /// The raw first positional argument
    #[must_use]
    pub fn entity_arg(&self) -> Option<&Value> {
        self.args.first().filter(|value| !value.is_null())
    }
}

/// Split a comma separated option into trimmed, non-empty entries
pub(crate) fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_named_builder() {
        let args = GeneratorArgs::named("post").with_type("sql").with_fields("title");
        assert_eq!(args.entity_arg(), Some(&json!("post")));
        assert_eq!(args.storage_type.as_deref(), Some("sql"));
        assert_eq!(args.fields.as_deref(), Some("title"));
        assert!(args.types.is_none());
    }

    #[test]
    fn test_null_entity_counts_as_missing() {
        let args = GeneratorArgs {
            args: vec![Value::Null],
            ..GeneratorArgs::default()
        };
        assert!(args.entity_arg().is_none());
    }

    #[test]
    fn test_deserialize_manifest_entry() {
        let args: GeneratorArgs =
            serde_json::from_value(json!({ "args": [42], "type": "mongo" })).unwrap();
        assert_eq!(args.entity_arg(), Some(&json!(42)));
        assert_eq!(args.storage_type.as_deref(), Some("mongo"));
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(" json , sql "), vec!["json", "sql"]);
        assert_eq!(split_list("a,,b,"), vec!["a", "b"]);
        assert!(split_list(" , ").is_empty());
    }
}
