//! Marker-anchored insertion into the route and policy tables
//!
//! Both tables carry one sentinel comment line. A patch keeps that line and
//! puts the new block directly below it, so the newest block is always the
//! first one under the marker and older blocks follow in reverse order of
//! insertion.

use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{GenerateError, Result};
use crate::helpers::NamingHelpers;
use crate::scope::Scope;

/// Pattern of the sentinel line shipped in `config/routes.js` and
/// `config/policies.js`
pub const DEFAULT_MARKER_PATTERN: &str = r"// ////.+";

/// Verb, path suffix, and controller action of every generated route
pub const ROUTE_ACTIONS: [(&str, &str, &str); 9] = [
    ("GET", "/stats", "stats"),
    ("GET", "", "list"),
    ("GET", "/:id", "get"),
    ("POST", "", "post"),
    ("PUT", "/:id", "put"),
    ("PATCH", "/:id", "patch"),
    ("PATCH", "/:id/export", "export"),
    ("PATCH", "/:id/import", "import"),
    ("DELETE", "/:id", "delete"),
];

/// Compiled sentinel pattern
#[derive(Debug, Clone)]
pub struct Marker {
    regex: Regex,
}

impl Marker {
    /// Compile a marker pattern
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Config`] if the pattern is not a valid regex.
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| GenerateError::config(format!("invalid marker pattern `{pattern}`: {e}")))?;
        Ok(Self { regex })
    }

    /// The source pattern
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

impl Default for Marker {
    fn default() -> Self {
        Self {
            regex: Regex::new(DEFAULT_MARKER_PATTERN).expect("valid default marker"),
        }
    }
}

/// Result of patching one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The block was inserted under the marker
    Inserted,
    /// The file already held the block and was left unchanged
    AlreadyPresent,
}

/// Insert `block` directly below the single marker line of `text`
///
/// `path` is only used for error messages.
///
/// # Errors
///
/// Returns [`GenerateError::MarkerNotFound`] when no line matches and
/// [`GenerateError::DuplicateMarker`] when more than one does.
pub fn insert_at_marker(
    text: &str,
    block: &str,
    marker: &Marker,
    path: &Path,
) -> Result<(String, PatchOutcome)> {
    let matches: Vec<_> = marker.regex.find_iter(text).collect();

    let found = match matches.as_slice() {
        [] => {
            return Err(GenerateError::MarkerNotFound {
                path: path.to_path_buf(),
                pattern: marker.pattern().to_string(),
            })
        }
        [single] => *single,
        many => {
            return Err(GenerateError::DuplicateMarker {
                path: path.to_path_buf(),
                count: many.len(),
            })
        }
    };

    let newline = if text.contains("\r\n") { "\r\n" } else { "\n" };
    let block = block.replace('\n', newline);

    // Leading indentation stays part of the search so `PostController`
    // does not match inside `BlogPostController`
    if text.contains(block.trim_matches(|c| c == '\n' || c == '\r')) {
        return Ok((text.to_string(), PatchOutcome::AlreadyPresent));
    }

    let marker_line = found.as_str().trim_end_matches('\r');

    let mut patched = String::with_capacity(text.len() + block.len() + newline.len());
    patched.push_str(&text[..found.start()]);
    patched.push_str(marker_line);
    patched.push_str(newline);
    patched.push_str(&block);
    patched.push_str(&text[found.start() + marker_line.len()..]);

    Ok((patched, PatchOutcome::Inserted))
}

/// Route table entries for an entity
///
/// ```
/// # use crudgen::scope::{Scope, FileSuffix};
/// # use crudgen::patch::route_block;
/// let scope = Scope::new("order item", FileSuffix::Controller, None);
/// let block = route_block(&scope, "/api");
/// assert!(block.contains("'GET /api/order_item/:id': 'OrderItemController.get',"));
/// ```
#[must_use]
pub fn route_block(scope: &Scope, api_prefix: &str) -> String {
    let controller = NamingHelpers::to_controller_name(scope.entity_name());
    let base = format!("{}/{}", api_prefix.trim_end_matches('/'), scope.route_segment());

    let mut block = format!("\n  // Endpoints for {}", NamingHelpers::to_title(scope.raw_name()));
    for (verb, suffix, action) in ROUTE_ACTIONS {
        block.push_str(&format!("\n  '{verb} {base}{suffix}': '{controller}.{action}',"));
    }
    block
}

/// Policy table entry applying `policy` to every action of the entity's
/// controller
#[must_use]
pub fn policy_block(scope: &Scope, policy: &str) -> String {
    let controller = NamingHelpers::to_controller_name(scope.entity_name());
    format!("  {controller}: {{\n    '*': ['{policy}'],\n  }},")
}

/// A patch computed in memory, not yet written
#[derive(Debug, Clone)]
pub struct PendingPatch {
    /// File to rewrite
    pub path: PathBuf,
    /// New file content
    pub content: String,
    /// Whether anything changes
    pub outcome: PatchOutcome,
}

impl PendingPatch {
    /// Read `path` and compute the patched content
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the marker check fails.
    pub fn prepare(path: &Path, block: &str, marker: &Marker) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| GenerateError::io(path, e))?;
        let (content, outcome) = insert_at_marker(&text, block, marker, path)?;
        debug!(path = %path.display(), ?outcome, "prepared config patch");

        Ok(Self {
            path: path.to_path_buf(),
            content,
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::FileSuffix;

    const ROUTES: &str = "module.exports.routes = {\n  // //// DO NOT TOUCH THIS LINE\n\n  'GET /health': 'HealthController.check',\n};\n";

    fn scope(name: &str) -> Scope {
        Scope::new(name, FileSuffix::Controller, None)
    }

    fn marker_count(text: &str) -> usize {
        Marker::default().regex.find_iter(text).count()
    }

    #[test]
    fn test_route_block_shape() {
        let block = route_block(&scope("order item"), "/api");
        let lines: Vec<_> = block.lines().collect();

        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "  // Endpoints for Order Item");
        assert_eq!(lines.len(), 2 + ROUTE_ACTIONS.len());
        assert!(block.contains("'GET /api/order_item/stats': 'OrderItemController.stats',"));
        assert!(block.contains("'GET /api/order_item': 'OrderItemController.list',"));
        assert!(block.contains("'POST /api/order_item': 'OrderItemController.post',"));
        assert!(block.contains("'PATCH /api/order_item/:id/import': 'OrderItemController.import',"));
        assert!(block.contains("'DELETE /api/order_item/:id': 'OrderItemController.delete',"));
    }

    #[test]
    fn test_route_block_prefix_trailing_slash() {
        let block = route_block(&scope("post"), "/v2/");
        assert!(block.contains("'GET /v2/post': 'PostController.list',"));
    }

    #[test]
    fn test_policy_block_shape() {
        let block = policy_block(&scope("order item"), "isAuthorized");
        assert_eq!(block, "  OrderItemController: {\n    '*': ['isAuthorized'],\n  },");
    }

    #[test]
    fn test_insert_keeps_marker_first() {
        let (patched, outcome) =
            insert_at_marker(ROUTES, "  'A': 'a',", &Marker::default(), Path::new("routes.js")).unwrap();

        assert_eq!(outcome, PatchOutcome::Inserted);
        assert_eq!(
            patched,
            "module.exports.routes = {\n  // //// DO NOT TOUCH THIS LINE\n  'A': 'a',\n\n  'GET /health': 'HealthController.check',\n};\n"
        );
    }

    #[test]
    fn test_two_insertions_stack_newest_first() {
        let marker = Marker::default();
        let path = Path::new("routes.js");
        let first = route_block(&scope("post"), "/api");
        let second = route_block(&scope("comment"), "/api");

        let (once, _) = insert_at_marker(ROUTES, &first, &marker, path).unwrap();
        let (twice, _) = insert_at_marker(&once, &second, &marker, path).unwrap();

        assert_eq!(marker_count(&twice), 1);
        let marker_at = twice.find("// ////").unwrap();
        let comment_at = twice.find("Endpoints for Comment").unwrap();
        let post_at = twice.find("Endpoints for Post").unwrap();
        assert!(marker_at < comment_at);
        assert!(comment_at < post_at);
        assert!(twice.contains("'GET /health'"));
    }

    #[test]
    fn test_reinsert_same_block_is_noop() {
        let marker = Marker::default();
        let path = Path::new("policies.js");
        let block = policy_block(&scope("post"), "isAuthorized");

        let (once, first) = insert_at_marker(ROUTES, &block, &marker, path).unwrap();
        let (twice, second) = insert_at_marker(&once, &block, &marker, path).unwrap();

        assert_eq!(first, PatchOutcome::Inserted);
        assert_eq!(second, PatchOutcome::AlreadyPresent);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_similar_controller_names_do_not_collide() {
        let marker = Marker::default();
        let path = Path::new("policies.js");
        let blog_post = policy_block(&scope("blog post"), "isAuthorized");
        let post = policy_block(&scope("post"), "isAuthorized");

        let (once, _) = insert_at_marker(ROUTES, &blog_post, &marker, path).unwrap();
        let (twice, outcome) = insert_at_marker(&once, &post, &marker, path).unwrap();

        assert_eq!(outcome, PatchOutcome::Inserted);
        assert!(twice.contains("\n  PostController: {"));
    }

    #[test]
    fn test_missing_marker_is_reported() {
        let err = insert_at_marker("module.exports = {};\n", "x", &Marker::default(), Path::new("r.js"))
            .unwrap_err();
        assert!(matches!(err, GenerateError::MarkerNotFound { .. }));
    }

    #[test]
    fn test_duplicate_marker_is_reported() {
        let text = "// //// one\n// //// two\n";
        let err = insert_at_marker(text, "x", &Marker::default(), Path::new("r.js")).unwrap_err();
        assert!(matches!(err, GenerateError::DuplicateMarker { count: 2, .. }));
    }

    #[test]
    fn test_crlf_files_keep_their_line_endings() {
        let text = "a\r\n// //// DO NOT TOUCH THIS LINE\r\nb\r\n";
        let (patched, _) =
            insert_at_marker(text, "  x: 1,\n  y: 2,", &Marker::default(), Path::new("r.js")).unwrap();
        assert_eq!(patched, "a\r\n// //// DO NOT TOUCH THIS LINE\r\n  x: 1,\r\n  y: 2,\r\nb\r\n");
    }

    #[test]
    fn test_invalid_marker_pattern() {
        assert!(matches!(Marker::new("(unclosed"), Err(GenerateError::Config(_))));
        assert_eq!(Marker::new("#-- here").unwrap().pattern(), "#-- here");
    }
}
