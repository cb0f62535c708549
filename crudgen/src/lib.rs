//! crudgen: code generators for Sails-style REST projects
//!
//! Generates CRUD controllers, model schemas, and route/policy table entries
//! for a project laid out as
//!
//! ```text
//! api/controllers/     <Entity>Controller.js
//! api/models/schema/   JSON-shape schemas
//! api/models/sql/      Sequelize models
//! config/routes.js     route table with a `// ////` marker line
//! config/policies.js   policy table with a `// ////` marker line
//! test/api/<Entity>/   API test suites
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use crudgen::prelude::*;
//!
//! # fn main() -> crudgen::Result<()> {
//! let root = std::path::Path::new(".");
//! let config = GeneratorConfig::load(root, None)?;
//! let workspace = Workspace::open(root, config, WriteOptions::default())?;
//!
//! let args = GeneratorArgs::named("order item")
//!     .with_type("sql")
//!     .with_fields("quantity,unitPrice");
//! let report = generators::api::run(&workspace, &args, false)?;
//! assert!(report.is_success());
//! # Ok(())
//! # }
//! ```

pub mod args;
pub mod config;
pub mod error;
pub mod generators;
pub mod helpers;
pub mod patch;
pub mod scope;
pub mod target;
pub mod templates;
pub mod validate;
pub mod workspace;

pub use error::{GenerateError, Result};

/// Commonly used types
pub mod prelude {
    pub use crate::args::GeneratorArgs;
    pub use crate::config::GeneratorConfig;
    pub use crate::error::{GenerateError, Result};
    pub use crate::generators;
    pub use crate::scope::{SchemaType, Scope, StorageType};
    pub use crate::workspace::{Action, Report, Workspace, WriteOptions};
}
