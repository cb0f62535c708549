//! The generators
//!
//! Each generator validates its [`GeneratorArgs`], builds a [`Scope`], and
//! turns it into a [`Plan`]. `run` applies the plan to the workspace.
//!
//! | Generator    | Writes                                                   |
//! |--------------|----------------------------------------------------------|
//! | `controller` | `api/controllers/<Entity>Controller.js`, API test suite  |
//! | `schema`     | `api/models/schema/<Entity>.js`, `api/models/sql/<Entity>.js` |
//! | `route`      | route and policy table entries                           |
//! | `api`        | schema, controller and route in one go                   |
//! | `sync`       | nothing; runs the database sync command                  |
//!
//! [`GeneratorArgs`]: crate::args::GeneratorArgs

pub mod api;
pub mod controller;
pub mod route;
pub mod schema;
pub mod sync;

use tracing::debug;

use crate::error::Result;
use crate::scope::Scope;
use crate::target::{Directive, Target, TemplateId};
use crate::workspace::{GeneratedFile, Plan, Workspace};

/// Resolve every target, then render the templates
///
/// All paths are resolved before anything is rendered, so an unknown
/// placeholder fails the whole plan.
pub(crate) fn render_targets(workspace: &Workspace, scope: &Scope, targets: &[Target]) -> Result<Plan> {
    let resolved = targets
        .iter()
        .map(|target| Ok((target.resolve(scope)?, target.directive)))
        .collect::<Result<Vec<_>>>()?;

    let context = scope.context(&workspace.config().api_prefix);
    let mut plan = Plan::default();

    for (path, directive) in resolved {
        match directive {
            Directive::Folder => plan.folders.push(path),
            Directive::Template(id) => {
                workspace.check_writable(&path)?;
                let content = workspace.templates().render(id, &context)?;
                debug!(template = %id, path = %path.display(), "rendered target");
                plan.files.push(GeneratedFile {
                    path,
                    content,
                    description: describe(id),
                });
            }
        }
    }

    Ok(plan)
}

fn describe(id: TemplateId) -> String {
    match id {
        TemplateId::Controller(storage) => format!("{storage} controller"),
        TemplateId::ControllerTest => "API tests".to_string(),
        TemplateId::Schema(schema) => format!("{schema} schema"),
    }
}
