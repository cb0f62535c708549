//! Per-invocation scope
//!
//! A [`Scope`] is built once per generator run from validated input. The
//! derived names are computed in [`Scope::new`] and only exposed through
//! getters, so they cannot drift from the raw name afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::helpers::NamingHelpers;

/// Backing persistence technology of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    /// Plain JSON files
    Json,
    /// Relational database through Sequelize
    Sql,
    /// `MongoDB` through Waterline
    Mongo,
}

impl StorageType {
    /// All accepted storage types
    pub const ALL: [Self; 3] = [Self::Json, Self::Sql, Self::Mongo];

    /// Lowercase name as used on the command line
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Sql => "sql",
            Self::Mongo => "mongo",
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "json" => Ok(Self::Json),
            "sql" => Ok(Self::Sql),
            "mongo" => Ok(Self::Mongo),
            other => Err(other.to_string()),
        }
    }
}

/// Representation a schema is generated in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    /// JSON-shape schema under `api/models/schema`
    Json,
    /// Sequelize model under `api/models/sql`
    Sql,
}

impl SchemaType {
    /// Lowercase name as used in `--types`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Sql => "sql",
        }
    }

    /// Folder below `api/models` the schema is written to
    #[must_use]
    pub const fn folder(self) -> &'static str {
        match self {
            Self::Json => "schema",
            Self::Sql => "sql",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "json" => Ok(Self::Json),
            "sql" => Ok(Self::Sql),
            other => Err(other.to_string()),
        }
    }
}

/// File name suffix appended to the entity name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSuffix {
    /// `<Entity>Controller.js`
    Controller,
    /// `<Entity>.js`
    Model,
}

impl FileSuffix {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Controller => "Controller.js",
            Self::Model => ".js",
        }
    }
}

/// Configuration record for a single generator invocation
#[derive(Debug, Clone)]
pub struct Scope {
    raw_name: String,
    storage_type: Option<StorageType>,
    types: BTreeSet<SchemaType>,
    fields: Vec<String>,
    entity_name: String,
    route_segment: String,
    filename: String,
    created_at: DateTime<Utc>,
}

impl Scope {
    /// Build a scope and derive all naming forms from `raw_name`
    ///
    /// `created_at` defaults to the current time.
    #[must_use]
    pub fn new(raw_name: &str, suffix: FileSuffix, created_at: Option<DateTime<Utc>>) -> Self {
        let entity_name = NamingHelpers::to_entity_name(raw_name);
        let route_segment = NamingHelpers::to_route_segment(raw_name);
        let filename = format!("{entity_name}{}", suffix.as_str());

        Self {
            raw_name: raw_name.to_string(),
            storage_type: None,
            types: BTreeSet::new(),
            fields: Vec::new(),
            entity_name,
            route_segment,
            filename,
            created_at: created_at.unwrap_or_else(Utc::now),
        }
    }

    /// Attach the storage type
    #[must_use]
    pub fn with_storage_type(mut self, storage_type: StorageType) -> Self {
        self.storage_type = Some(storage_type);
        self
    }

    /// Attach the schema types
    #[must_use]
    pub fn with_types(mut self, types: impl IntoIterator<Item = SchemaType>) -> Self {
        self.types = types.into_iter().collect();
        self
    }

    /// Attach the field list
    #[must_use]
    pub fn with_fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }

    /// Entity name as typed by the user
    #[must_use]
    pub fn raw_name(&self) -> &str {
        &self.raw_name
    }

    /// `PascalCase` entity name
    #[must_use]
    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    /// `snake_case` URL segment
    #[must_use]
    pub fn route_segment(&self) -> &str {
        &self.route_segment
    }

    /// Output file name
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Storage type, if the generator takes one
    #[must_use]
    pub const fn storage_type(&self) -> Option<StorageType> {
        self.storage_type
    }

    /// Schema types in canonical order
    #[must_use]
    pub const fn types(&self) -> &BTreeSet<SchemaType> {
        &self.types
    }

    /// Schema fields in the order given
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Whether a SQL representation is part of this run
    #[must_use]
    pub fn is_sql(&self) -> bool {
        self.types.contains(&SchemaType::Sql) || self.storage_type == Some(StorageType::Sql)
    }

    /// Creation timestamp stamped into generated files
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Value of a path placeholder (`:filename`, `:entityName`, ...)
    #[must_use]
    pub fn placeholder(&self, name: &str) -> Option<&str> {
        match name {
            "filename" => Some(&self.filename),
            "entityName" => Some(&self.entity_name),
            "entity" | "routeSegment" => Some(&self.route_segment),
            _ => None,
        }
    }

    /// Template context for rendering
    #[must_use]
    pub fn context(&self, api_prefix: &str) -> serde_json::Value {
        let fields: Vec<_> = self
            .fields
            .iter()
            .map(|name| {
                serde_json::json!({
                    "name": name,
                    "column_name": NamingHelpers::to_route_segment(name),
                    "title": NamingHelpers::to_title(name),
                })
            })
            .collect();

        serde_json::json!({
            "raw_name": self.raw_name,
            "entity_name": self.entity_name,
            "entity": self.route_segment,
            "route_segment": self.route_segment,
            "controller_name": NamingHelpers::to_controller_name(&self.entity_name),
            "variable_name": NamingHelpers::to_camel_case(&self.entity_name),
            "title": NamingHelpers::to_title(&self.raw_name),
            "table_name": NamingHelpers::to_table_name(&self.raw_name),
            "filename": self.filename,
            "type": self.storage_type.map(StorageType::as_str),
            "types": self.types.iter().map(|t| t.as_str()).collect::<Vec<_>>(),
            "is_sql": self.is_sql(),
            "fields": fields,
            "api_prefix": api_prefix,
            "route_base": format!("{api_prefix}/{}", self.route_segment),
            "created_at": self.created_at.to_rfc3339(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    }

    #[test]
    fn test_derived_names() {
        let scope = Scope::new("order item", FileSuffix::Controller, Some(fixed_time()));
        assert_eq!(scope.entity_name(), "OrderItem");
        assert_eq!(scope.route_segment(), "order_item");
        assert_eq!(scope.filename(), "OrderItemController.js");
        assert_eq!(scope.created_at(), fixed_time());
    }

    #[test]
    fn test_model_suffix() {
        let scope = Scope::new("order item", FileSuffix::Model, None);
        assert_eq!(scope.filename(), "OrderItem.js");
    }

    #[test]
    fn test_created_at_defaults_to_now() {
        let before = Utc::now();
        let scope = Scope::new("post", FileSuffix::Model, None);
        assert!(scope.created_at() >= before);
    }

    #[test]
    fn test_storage_type_parse() {
        assert_eq!("sql".parse::<StorageType>(), Ok(StorageType::Sql));
        assert_eq!(" mongo ".parse::<StorageType>(), Ok(StorageType::Mongo));
        assert_eq!("redis".parse::<StorageType>(), Err("redis".to_string()));
    }

    #[test]
    fn test_schema_type_folder() {
        assert_eq!(SchemaType::Json.folder(), "schema");
        assert_eq!(SchemaType::Sql.folder(), "sql");
        assert_eq!("mongo".parse::<SchemaType>(), Err("mongo".to_string()));
    }

    #[test]
    fn test_types_are_a_set() {
        let scope = Scope::new("post", FileSuffix::Model, None).with_types([
            SchemaType::Sql,
            SchemaType::Json,
            SchemaType::Sql,
        ]);
        let types: Vec<_> = scope.types().iter().copied().collect();
        assert_eq!(types, vec![SchemaType::Json, SchemaType::Sql]);
        assert!(scope.is_sql());
    }

    #[test]
    fn test_placeholders() {
        let scope = Scope::new("order item", FileSuffix::Model, None);
        assert_eq!(scope.placeholder("filename"), Some("OrderItem.js"));
        assert_eq!(scope.placeholder("entityName"), Some("OrderItem"));
        assert_eq!(scope.placeholder("bogus"), None);
    }

    #[test]
    fn test_context() {
        let scope = Scope::new("order item", FileSuffix::Controller, Some(fixed_time()))
            .with_storage_type(StorageType::Sql)
            .with_fields(vec!["unitPrice".to_string()]);
        let ctx = scope.context("/api");
        assert_eq!(ctx["controller_name"], "OrderItemController");
        assert_eq!(ctx["route_base"], "/api/order_item");
        assert_eq!(ctx["table_name"], "order_items");
        assert_eq!(ctx["type"], "sql");
        assert_eq!(ctx["fields"][0]["column_name"], "unit_price");
        assert_eq!(ctx["is_sql"], true);
    }
}
