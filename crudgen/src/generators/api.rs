//! Aggregate API generator
//!
//! Runs schema, controller, and route for one entity. Every step gets a
//! freshly built [`GeneratorArgs`]; no scope is shared between steps.
//!
//! By default all three steps are planned before anything is written and
//! the first failure aborts the run. With `keep_going` each step is planned
//! and applied on its own and failures are collected in the report.

use tracing::{info, warn};

use crate::args::GeneratorArgs;
use crate::error::{GenerateError, Result};
use crate::target::schema_types_arg;
use crate::validate::{self, ApiInput};
use crate::workspace::{Plan, Report, StepFailure, Workspace};

use super::{controller, route, schema};

/// Generator name
pub const NAME: &str = "api";

/// Planning function of one step
pub type PlanFn = fn(&Workspace, &GeneratorArgs) -> Result<Plan>;

/// One pipeline step
pub struct Step {
    /// Generator name
    pub name: &'static str,
    /// Generator planning function
    pub plan: PlanFn,
    /// Arguments built for this step
    pub args: GeneratorArgs,
}

/// Steps in execution order with the arguments each one receives
#[must_use]
pub fn steps(input: &ApiInput) -> [Step; 3] {
    [
        Step {
            name: schema::NAME,
            plan: schema::plan,
            args: GeneratorArgs::named(input.name.clone())
                .with_types(schema_types_arg(input.storage_type))
                .with_fields(input.fields.clone()),
        },
        Step {
            name: controller::NAME,
            plan: controller::plan,
            args: GeneratorArgs::named(input.name.clone()).with_type(input.storage_type.as_str()),
        },
        Step {
            name: route::NAME,
            plan: route::plan,
            args: GeneratorArgs::named(input.name.clone()),
        },
    ]
}

fn step_error(step: &'static str, source: GenerateError) -> GenerateError {
    GenerateError::Step {
        step,
        source: Box::new(source),
    }
}

/// Generate schema, controller, and routes
///
/// # Errors
///
/// Returns a validation failure of the api arguments. Without
/// `keep_going`, also returns the first failing step wrapped in
/// [`GenerateError::Step`].
pub fn run(workspace: &Workspace, args: &GeneratorArgs, keep_going: bool) -> Result<Report> {
    let input = validate::api(args)?;
    info!(entity = %input.name, storage = %input.storage_type, "generating api");

    if keep_going {
        return Ok(run_each(workspace, &input));
    }

    let plans = steps(&input)
        .into_iter()
        .map(|step| {
            (step.plan)(workspace, &step.args)
                .map(|plan| (step.name, plan))
                .map_err(|e| step_error(step.name, e))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut report = Report::default();
    for (step, plan) in plans {
        report.merge(workspace.apply(plan).map_err(|e| step_error(step, e))?);
    }
    Ok(report)
}

fn run_each(workspace: &Workspace, input: &ApiInput) -> Report {
    let mut report = Report::default();

    for step in steps(input) {
        match (step.plan)(workspace, &step.args).and_then(|plan| workspace.apply(plan)) {
            Ok(step_report) => report.merge(step_report),
            Err(e) => {
                warn!(step = step.name, error = %e, "step failed, continuing");
                report.failures.push(StepFailure {
                    step: step.name,
                    message: e.to_string(),
                });
            }
        }
    }

    report
}
