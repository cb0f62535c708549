//! Schema generator
//!
//! ```bash
//! crudgen generate schema "order item" --types json,sql --fields quantity,unitPrice
//! ```

use crate::args::GeneratorArgs;
use crate::error::Result;
use crate::scope::{FileSuffix, Scope};
use crate::target::schema_targets;
use crate::validate;
use crate::workspace::{Plan, Report, Workspace};

use super::render_targets;

/// Generator name
pub const NAME: &str = "schema";

/// Validate and render without writing
///
/// # Errors
///
/// Returns the first validation failure, a present target without
/// `--force`, or a template error.
pub fn plan(workspace: &Workspace, args: &GeneratorArgs) -> Result<Plan> {
    let input = validate::schema(args)?;
    let scope = Scope::new(&input.name, FileSuffix::Model, None)
        .with_types(input.types)
        .with_fields(input.fields);

    render_targets(workspace, &scope, &schema_targets(&scope)?)
}

/// Generate one schema file per requested type
///
/// # Errors
///
/// See [`plan`]; also fails if a write fails.
pub fn run(workspace: &Workspace, args: &GeneratorArgs) -> Result<Report> {
    workspace.apply(plan(workspace, args)?)
}
