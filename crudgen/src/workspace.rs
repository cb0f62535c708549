//! Project tree the generators write into
//!
//! Generators only compute a [`Plan`]. The [`Workspace`] applies it: all
//! template output and config patches are already held in memory, so a
//! failing check never leaves the tree half written.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::GeneratorConfig;
use crate::error::{GenerateError, Result};
use crate::patch::{PatchOutcome, PendingPatch};
use crate::templates::TemplateRegistry;

/// How plans are written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Compute and report changes without touching the disk
    pub dry_run: bool,
    /// Overwrite files that already exist
    pub force: bool,
}

/// A rendered file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Relative path from project root
    pub path: PathBuf,
    /// File content
    pub content: String,
    /// File description for user feedback
    pub description: String,
}

/// Everything one generator invocation changes
#[derive(Debug, Clone, Default)]
pub struct Plan {
    /// Directories to create, relative to the project root
    pub folders: Vec<PathBuf>,
    /// Files to write
    pub files: Vec<GeneratedFile>,
    /// Config files to rewrite
    pub patches: Vec<PendingPatch>,
}

/// What happened at one path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// New file written
    Created,
    /// Existing file replaced (`--force`)
    Overwritten,
    /// Directory created
    FolderCreated,
    /// Block inserted under the marker
    Patched,
    /// Nothing to do
    Unchanged,
}

impl Action {
    /// Short label for terminal output
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Created => "create",
            Self::Overwritten => "overwrite",
            Self::FolderCreated => "mkdir",
            Self::Patched => "patch",
            Self::Unchanged => "identical",
        }
    }
}

/// One reported change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    /// Path relative to the project root when possible
    pub path: PathBuf,
    /// What was (or would be) done
    pub action: Action,
}

/// Failure of one pipeline step that did not stop the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFailure {
    /// Generator name
    pub step: &'static str,
    /// Rendered error message
    pub message: String,
}

/// Outcome of applying one or more plans
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// Changes in the order they were applied
    pub changes: Vec<Change>,
    /// Steps that failed under `--keep-going`
    pub failures: Vec<StepFailure>,
    /// Whether the disk was left untouched
    pub dry_run: bool,
}

impl Report {
    /// Append another report
    pub fn merge(&mut self, other: Self) {
        self.changes.extend(other.changes);
        self.failures.extend(other.failures);
        self.dry_run |= other.dry_run;
    }

    /// Paths with the given action
    pub fn paths(&self, action: Action) -> impl Iterator<Item = &Path> {
        self.changes
            .iter()
            .filter(move |c| c.action == action)
            .map(|c| c.path.as_path())
    }

    /// Whether every step succeeded
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A project root plus the settings generators need
pub struct Workspace {
    root: PathBuf,
    config: GeneratorConfig,
    templates: TemplateRegistry,
    options: WriteOptions,
}

impl Workspace {
    /// Open a project
    ///
    /// # Errors
    ///
    /// Returns an error if the template overrides cannot be loaded.
    pub fn open(root: impl Into<PathBuf>, config: GeneratorConfig, options: WriteOptions) -> Result<Self> {
        let root = root.into();
        let templates_dir = config.resolve_templates_dir(&root);
        let templates = TemplateRegistry::with_overrides(templates_dir.as_deref())?;

        Ok(Self {
            root,
            config,
            templates,
            options,
        })
    }

    /// Project root
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Template registry
    #[must_use]
    pub const fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    /// Write options
    #[must_use]
    pub const fn options(&self) -> WriteOptions {
        self.options
    }

    /// Fail with [`GenerateError::FileExists`] if `relative` exists and
    /// overwriting is not allowed
    ///
    /// # Errors
    ///
    /// See above.
    pub fn check_writable(&self, relative: &Path) -> Result<()> {
        let full = self.root.join(relative);
        if full.exists() && !self.options.force {
            return Err(GenerateError::FileExists(relative.to_path_buf()));
        }
        Ok(())
    }

    /// Apply a plan
    ///
    /// Folders first, then files, then patches. With `dry_run` nothing is
    /// written and the report lists what would change.
    ///
    /// # Errors
    ///
    /// Returns an error if a target exists without `force`, or a write fails.
    pub fn apply(&self, plan: Plan) -> Result<Report> {
        for file in &plan.files {
            self.check_writable(&file.path)?;
        }

        let mut report = Report {
            dry_run: self.options.dry_run,
            ..Report::default()
        };

        for folder in &plan.folders {
            let full = self.root.join(folder);
            if full.is_dir() {
                report.changes.push(Change {
                    path: folder.clone(),
                    action: Action::Unchanged,
                });
                continue;
            }
            if !self.options.dry_run {
                fs::create_dir_all(&full).map_err(|e| GenerateError::io(&full, e))?;
                info!(path = %folder.display(), "created folder");
            }
            report.changes.push(Change {
                path: folder.clone(),
                action: Action::FolderCreated,
            });
        }

        for file in &plan.files {
            let full = self.root.join(&file.path);
            let action = match fs::read_to_string(&full) {
                Ok(existing) if existing == file.content => Action::Unchanged,
                Ok(_) => Action::Overwritten,
                Err(_) => Action::Created,
            };

            if action != Action::Unchanged && !self.options.dry_run {
                write_atomic(&full, &file.content)?;
                info!(path = %file.path.display(), description = %file.description, "wrote file");
            }
            report.changes.push(Change {
                path: file.path.clone(),
                action,
            });
        }

        for patch in &plan.patches {
            let action = match patch.outcome {
                PatchOutcome::Inserted => Action::Patched,
                PatchOutcome::AlreadyPresent => Action::Unchanged,
            };
            let shown = self.relative(&patch.path);

            if action == Action::Patched && !self.options.dry_run {
                write_atomic(&patch.path, &patch.content)?;
                info!(path = %shown.display(), "inserted block under marker");
            } else if action == Action::Unchanged {
                debug!(path = %shown.display(), "block already present");
            }
            report.changes.push(Change {
                path: shown,
                action,
            });
        }

        Ok(report)
    }

    fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf)
    }
}

/// Write through a sibling temp file and rename into place
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| GenerateError::io(parent, e))?;
    }

    let tmp = tmp_path(path);
    fs::write(&tmp, content).map_err(|e| GenerateError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| GenerateError::io(path, e))?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => path.with_extension(format!("{ext}.tmp")),
        None => path.with_extension("tmp"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::Marker;
    use tempfile::tempdir;

    fn workspace(root: &Path, options: WriteOptions) -> Workspace {
        let config = GeneratorConfig {
            templates_dir: Some(root.join("no-overrides")),
            ..GeneratorConfig::default()
        };
        Workspace::open(root, config, options).unwrap()
    }

    fn plan() -> Plan {
        Plan {
            folders: vec![PathBuf::from("test/api/Post")],
            files: vec![GeneratedFile {
                path: PathBuf::from("api/controllers/PostController.js"),
                content: "module.exports = {};\n".to_string(),
                description: "controller".to_string(),
            }],
            patches: Vec::new(),
        }
    }

    #[test]
    fn test_apply_writes_folders_and_files() {
        let dir = tempdir().unwrap();
        let ws = workspace(dir.path(), WriteOptions::default());

        let report = ws.apply(plan()).unwrap();

        assert!(dir.path().join("test/api/Post").is_dir());
        assert_eq!(
            fs::read_to_string(dir.path().join("api/controllers/PostController.js")).unwrap(),
            "module.exports = {};\n"
        );
        assert_eq!(report.paths(Action::Created).count(), 1);
        assert_eq!(report.paths(Action::FolderCreated).count(), 1);
        assert!(!dir.path().join("api/controllers/PostController.js.tmp").exists());
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let dir = tempdir().unwrap();
        let ws = workspace(dir.path(), WriteOptions { dry_run: true, force: false });

        let report = ws.apply(plan()).unwrap();

        assert!(report.dry_run);
        assert_eq!(report.paths(Action::Created).count(), 1);
        assert!(!dir.path().join("api").exists());
        assert!(!dir.path().join("test").exists());
    }

    #[test]
    fn test_existing_file_needs_force() {
        let dir = tempdir().unwrap();
        workspace(dir.path(), WriteOptions::default()).apply(plan()).unwrap();

        let err = workspace(dir.path(), WriteOptions::default())
            .apply(plan())
            .unwrap_err();
        assert!(matches!(err, GenerateError::FileExists(_)));

        let mut changed = plan();
        changed.files[0].content = "module.exports = { v: 2 };\n".to_string();
        let report = workspace(dir.path(), WriteOptions { dry_run: false, force: true })
            .apply(changed)
            .unwrap();
        assert_eq!(report.paths(Action::Overwritten).count(), 1);
        assert_eq!(report.paths(Action::Unchanged).count(), 1);
    }

    #[test]
    fn test_patches_are_written_and_reported_relative() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("config")).unwrap();
        let routes = dir.path().join("config/routes.js");
        fs::write(&routes, "module.exports = {\n  // //// DO NOT TOUCH THIS LINE\n};\n").unwrap();
        let ws = workspace(dir.path(), WriteOptions::default());

        let patch = PendingPatch::prepare(&routes, "  'GET /x': 'X.get',", &Marker::default()).unwrap();
        let report = ws
            .apply(Plan {
                patches: vec![patch.clone()],
                ..Plan::default()
            })
            .unwrap();

        assert_eq!(
            report.changes,
            vec![Change {
                path: PathBuf::from("config/routes.js"),
                action: Action::Patched,
            }]
        );
        assert!(fs::read_to_string(&routes).unwrap().contains("'GET /x': 'X.get',"));

        let again = PendingPatch::prepare(&routes, "  'GET /x': 'X.get',", &Marker::default()).unwrap();
        let report = ws
            .apply(Plan {
                patches: vec![again],
                ..Plan::default()
            })
            .unwrap();
        assert_eq!(report.paths(Action::Unchanged).count(), 1);
    }

    #[test]
    fn test_tmp_path() {
        assert_eq!(tmp_path(Path::new("a/b.js")), PathBuf::from("a/b.js.tmp"));
        assert_eq!(tmp_path(Path::new("a/b")), PathBuf::from("a/b.tmp"));
    }

    #[test]
    fn test_report_merge() {
        let mut a = Report::default();
        let b = Report {
            changes: vec![Change {
                path: PathBuf::from("x"),
                action: Action::Patched,
            }],
            failures: vec![StepFailure {
                step: "route",
                message: "boom".to_string(),
            }],
            dry_run: false,
        };
        a.merge(b);
        assert_eq!(a.changes.len(), 1);
        assert!(!a.is_success());
    }
}
