//! CRUD controller generator
//!
//! ```bash
//! crudgen generate controller "order item" --type sql
//! ```

use crate::args::GeneratorArgs;
use crate::error::Result;
use crate::scope::{FileSuffix, Scope};
use crate::target::controller_targets;
use crate::validate;
use crate::workspace::{Plan, Report, Workspace};

use super::render_targets;

/// Generator name
pub const NAME: &str = "controller";

/// Validate and render without writing
///
/// # Errors
///
/// Returns the first validation failure, [`FileExists`] for a present
/// target without `--force`, or a template error.
///
/// [`FileExists`]: crate::error::GenerateError::FileExists
pub fn plan(workspace: &Workspace, args: &GeneratorArgs) -> Result<Plan> {
    let input = validate::controller(args)?;
    let scope = Scope::new(&input.name, FileSuffix::Controller, None)
        .with_storage_type(input.storage_type);

    render_targets(workspace, &scope, &controller_targets(&scope)?)
}

/// Generate the controller and its test suite
///
/// # Errors
///
/// See [`plan`]; also fails if a write fails.
pub fn run(workspace: &Workspace, args: &GeneratorArgs) -> Result<Report> {
    workspace.apply(plan(workspace, args)?)
}
