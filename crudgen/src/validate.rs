//! Input validation
//!
//! Each generator has a fixed check order and stops at the first failure,
//! so a run with neither a name nor a valid type reports the missing name.
//! Nothing here touches the file system.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::debug;

use crate::args::{split_list, GeneratorArgs};
use crate::error::{GenerateError, Result};
use crate::helpers::NamingHelpers;
use crate::scope::{SchemaType, StorageType};

/// Field names the generated models define on their own
const RESERVED_FIELDS: &[&str] = &["id"];

const STORAGE_TYPES_HINT: &str = "json, sql or mongo";

/// Validated input of the controller generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerInput {
    /// Entity name as given
    pub name: String,
    /// Storage backend
    pub storage_type: StorageType,
}

/// Validated input of the schema generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaInput {
    /// Entity name as given
    pub name: String,
    /// Requested representations, deduplicated, in the order given
    pub types: Vec<SchemaType>,
    /// Field names, in the order given
    pub fields: Vec<String>,
}

/// Validated input of the aggregate api generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiInput {
    /// Entity name as given
    pub name: String,
    /// Storage backend
    pub storage_type: StorageType,
    /// Raw `--fields` value, forwarded to the schema step
    pub fields: String,
}

/// Validate controller arguments
///
/// Order: name missing, type missing, type unsupported, name not a string.
///
/// # Errors
///
/// Returns the first failing check as a [`GenerateError`].
pub fn controller(args: &GeneratorArgs) -> Result<ControllerInput> {
    let raw = require_present(args, "controller")?;
    let storage_type = require_storage_type(args, "controller")?;
    let name = require_string(raw)?;

    debug!(%name, %storage_type, "controller arguments accepted");
    Ok(ControllerInput { name, storage_type })
}

/// Validate schema arguments
///
/// Order: name missing, name not a string, types missing, unsupported type,
/// fields missing, reserved or duplicate field.
///
/// # Errors
///
/// Returns the first failing check as a [`GenerateError`].
pub fn schema(args: &GeneratorArgs) -> Result<SchemaInput> {
    let raw = require_present(args, "schema")?;
    let name = require_string(raw)?;

    let types = require_schema_types(args)?;
    let fields = require_fields(args.fields.as_deref())?;

    debug!(%name, ?types, ?fields, "schema arguments accepted");
    Ok(SchemaInput {
        name,
        types,
        fields,
    })
}

/// Validate route arguments
///
/// # Errors
///
/// Returns [`GenerateError::MissingEntityName`] or
/// [`GenerateError::EntityNameNotString`].
pub fn route(args: &GeneratorArgs) -> Result<String> {
    let raw = require_present(args, "route")?;
    let name = require_string(raw)?;

    debug!(%name, "route arguments accepted");
    Ok(name)
}

/// Validate api arguments
///
/// Order: name missing, type missing, type unsupported, name not a string,
/// fields missing. The field list itself is checked by the schema step.
///
/// # Errors
///
/// Returns the first failing check as a [`GenerateError`].
pub fn api(args: &GeneratorArgs) -> Result<ApiInput> {
    let raw = require_present(args, "api")?;
    let storage_type = require_storage_type(args, "api")?;
    let name = require_string(raw)?;

    let fields = match args.fields.as_deref() {
        Some(raw) if !split_list(raw).is_empty() => raw.to_string(),
        _ => return Err(GenerateError::MissingFieldList),
    };

    debug!(%name, %storage_type, "api arguments accepted");
    Ok(ApiInput {
        name,
        storage_type,
        fields,
    })
}

fn require_present<'a>(args: &'a GeneratorArgs, subject: &'static str) -> Result<&'a Value> {
    match args.entity_arg() {
        None => Err(GenerateError::MissingEntityName { subject }),
        // Blank or punctuation-only names normalize to nothing usable
        Some(Value::String(s)) if NamingHelpers::to_entity_name(s).is_empty() => {
            Err(GenerateError::MissingEntityName { subject })
        }
        Some(value) => Ok(value),
    }
}

fn require_string(value: &Value) -> Result<String> {
    let Value::String(name) = value else {
        return Err(GenerateError::EntityNameNotString {
            found: value.to_string(),
        });
    };

    Ok(name.trim().to_string())
}

fn require_storage_type(args: &GeneratorArgs, subject: &'static str) -> Result<StorageType> {
    let raw = args
        .storage_type
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or(GenerateError::MissingStorageType { subject })?;

    raw.parse::<StorageType>()
        .map_err(|found| GenerateError::UnsupportedStorageType {
            found,
            expected: STORAGE_TYPES_HINT,
        })
}

fn require_schema_types(args: &GeneratorArgs) -> Result<Vec<SchemaType>> {
    let entries = args
        .types
        .as_deref()
        .map(split_list)
        .filter(|entries| !entries.is_empty())
        .ok_or(GenerateError::MissingTypeList)?;

    let mut types = Vec::with_capacity(entries.len());
    for entry in entries {
        let schema_type = entry
            .parse::<SchemaType>()
            .map_err(|found| GenerateError::UnsupportedSchemaType { found })?;
        if !types.contains(&schema_type) {
            types.push(schema_type);
        }
    }
    Ok(types)
}

/// Field names become bare object keys and quoted strings in the
/// generated JavaScript
fn identifier_regex() -> &'static Regex {
    static IDENTIFIER: OnceLock<Regex> = OnceLock::new();
    IDENTIFIER.get_or_init(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("valid identifier regex"))
}

fn require_fields(raw: Option<&str>) -> Result<Vec<String>> {
    let fields = raw
        .map(split_list)
        .filter(|fields| !fields.is_empty())
        .ok_or(GenerateError::MissingFieldList)?;

    let mut seen = Vec::with_capacity(fields.len());
    for field in &fields {
        if !identifier_regex().is_match(field) {
            return Err(GenerateError::InvalidField(field.clone()));
        }
        if RESERVED_FIELDS.contains(&field.to_lowercase().as_str()) {
            return Err(GenerateError::ReservedField(field.clone()));
        }
        let column = NamingHelpers::to_route_segment(field);
        if seen.contains(&column) {
            return Err(GenerateError::DuplicateField(field.clone()));
        }
        seen.push(column);
    }

    Ok(fields)
}
