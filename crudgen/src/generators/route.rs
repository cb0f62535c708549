//! Route generator
//!
//! Inserts the nine CRUD routes into the route table and an authorization
//! policy for the controller into the policy table.

use tracing::debug;

use crate::args::GeneratorArgs;
use crate::error::Result;
use crate::patch::{policy_block, route_block, PendingPatch};
use crate::scope::{FileSuffix, Scope};
use crate::validate;
use crate::workspace::{Plan, Report, Workspace};

/// Generator name
pub const NAME: &str = "route";

/// Validate and compute both patches
///
/// Both tables are read and checked before the plan is returned, so a bad
/// policy table never leaves the route table patched.
///
/// # Errors
///
/// Returns a validation failure, an I/O error, or a marker error.
pub fn plan(workspace: &Workspace, args: &GeneratorArgs) -> Result<Plan> {
    let name = validate::route(args)?;
    let scope = Scope::new(&name, FileSuffix::Controller, None);
    let config = workspace.config();
    let marker = config.marker()?;

    let routes = PendingPatch::prepare(
        &config.routes_path(workspace.root()),
        &route_block(&scope, &config.api_prefix),
        &marker,
    )?;
    let policies = PendingPatch::prepare(
        &config.policies_path(workspace.root()),
        &policy_block(&scope, &config.default_policy),
        &marker,
    )?;
    debug!(entity = %scope.entity_name(), "route patches prepared");

    Ok(Plan {
        patches: vec![routes, policies],
        ..Plan::default()
    })
}

/// Patch the route and policy tables
///
/// # Errors
///
/// See [`plan`]; also fails if a write fails.
pub fn run(workspace: &Workspace, args: &GeneratorArgs) -> Result<Report> {
    workspace.apply(plan(workspace, args)?)
}
