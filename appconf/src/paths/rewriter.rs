use std::path::{Path, PathBuf};

use log::trace;

use crate::error::{Error, Result};
use crate::paths::normalize::{absolutize, is_absolute, join, lexical_normalize, relative_to, to_slash};
use crate::paths::rules::classify;
use crate::provenance::ProvenanceIndex;
use crate::source::DocumentId;
use crate::tree::{ConfigTree, KeyPath};

/// Re-anchors path-valued fields of a resolved tree.
///
/// A relative path written in an included document is relative to that
/// document. After splicing, the rewriter uses the provenance index to find
/// the defining document and rewrites the value to be absolute (the default)
/// or relative to the root document's directory.
///
/// # Examples
///
/// ```
/// use std::path::Path;
///
/// use appconf::include::IncludeResolver;
/// use appconf::paths::PathRewriter;
/// use appconf::source::{DocumentId, MemorySource};
///
/// let source = MemorySource::new()
///     .with("/app/app.config.yaml", "extensions:\n  dx/excshell/1:\n    $include: src/dx/ext.config.yaml\n")
///     .with("/app/src/dx/ext.config.yaml", "actions: ./actions\n");
/// let root = DocumentId::new("/app/app.config.yaml");
///
/// let mut resolved = IncludeResolver::new(&source).resolve(&root).unwrap();
/// PathRewriter::new(&root, Path::new("/"))
///     .rewrite(&mut resolved.tree, &resolved.index)
///     .unwrap();
///
/// let ext = resolved.tree.get("extensions").unwrap().get("dx/excshell/1").unwrap();
/// assert_eq!(ext.get("actions").unwrap().as_str(), Some("/app/src/dx/actions"));
/// ```
#[derive(Debug, Clone)]
pub struct PathRewriter {
    root_dir: String,
    working_dir: PathBuf,
    absolute: bool,
}

impl PathRewriter {
    /// Creates a rewriter producing absolute paths.
    #[must_use]
    pub fn new(root: &DocumentId, working_dir: &Path) -> Self {
        Self {
            root_dir: root.dir().to_string(),
            working_dir: working_dir.to_path_buf(),
            absolute: true,
        }
    }

    /// Chooses absolute output (`true`) or output relative to the root
    /// document's directory (`false`).
    #[must_use]
    pub fn absolute(mut self, absolute: bool) -> Self {
        self.absolute = absolute;
        self
    }

    /// Rewrites every path-valued string leaf in `tree` and returns how many
    /// were rewritten.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] if a matched key has no provenance entry.
    pub fn rewrite(&self, tree: &mut ConfigTree, index: &ProvenanceIndex) -> Result<usize> {
        let targets: Vec<KeyPath> = tree
            .descendants()
            .into_iter()
            .filter(|(path, node)| node.as_str().is_some() && classify(path).is_some())
            .map(|(path, _)| path)
            .collect();

        for path in &targets {
            let entry = index.get(path).ok_or_else(|| Error::Internal {
                details: format!("no provenance entry for path field '{path}'"),
            })?;
            let node = tree.get_path_mut(path).ok_or_else(|| Error::Internal {
                details: format!("path field '{path}' vanished during rewrite"),
            })?;
            if let Some(value) = node.as_str() {
                let rewritten = self.rewrite_value(value, &entry.document);
                trace!("Rewrote {path}: '{value}' -> '{rewritten}'");
                *node = ConfigTree::string(rewritten);
            }
        }

        Ok(targets.len())
    }

    /// Rewrites a single value defined in `document`.
    ///
    /// An absolute value is only normalized, so rewriting is idempotent in
    /// absolute mode.
    #[must_use]
    pub fn rewrite_value(&self, value: &str, document: &DocumentId) -> String {
        if is_absolute(&to_slash(value)) {
            return lexical_normalize(value);
        }
        let joined = join(document.dir(), value);
        if self.absolute {
            absolutize(&joined, &self.working_dir)
        } else {
            relative_to(&joined, &self.root_dir)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::include::{IncludeResolver, Resolved};
    use crate::provenance::ProvenanceEntry;
    use crate::source::MemorySource;

    fn str_at<'t>(tree: &'t ConfigTree, dotted: &str) -> Option<&'t str> {
        tree.get_path(&KeyPath::from_dotted(dotted)).and_then(ConfigTree::as_str)
    }

    fn app_not_in_root() -> (MemorySource, DocumentId) {
        let source = MemorySource::new()
            .with(
                "app/app.config.yaml",
                "application:\n  actions: myactions\n  runtimeManifest:\n    packages:\n      pkg:\n        actions:\n          action:\n            $include: myactions/action.config.yaml\n",
            )
            .with(
                "app/myactions/action.config.yaml",
                "function: action.js\nruntime: nodejs:14\ninclude:\n  - - somefile.txt\n    - file.txt\n",
            );
        (source, DocumentId::new("app/app.config.yaml"))
    }

    fn resolve(source: &MemorySource, root: &DocumentId) -> Resolved {
        IncludeResolver::new(source).resolve(root).unwrap()
    }

    const ACTION: &str = "application.runtimeManifest.packages.pkg.actions.action";

    #[test]
    fn test_relative_mode_is_relative_to_root_directory() {
        let (source, root) = app_not_in_root();
        let mut resolved = resolve(&source, &root);

        let count = PathRewriter::new(&root, Path::new("/work"))
            .absolute(false)
            .rewrite(&mut resolved.tree, &resolved.index)
            .unwrap();

        assert_eq!(count, 3);
        assert_eq!(str_at(&resolved.tree, "application.actions"), Some("myactions"));
        assert_eq!(
            str_at(&resolved.tree, &format!("{ACTION}.function")),
            Some("myactions/action.js")
        );
        assert_eq!(
            str_at(&resolved.tree, &format!("{ACTION}.include.0.0")),
            Some("myactions/somefile.txt")
        );
        assert_eq!(str_at(&resolved.tree, &format!("{ACTION}.include.0.1")), Some("file.txt"));
        assert_eq!(str_at(&resolved.tree, &format!("{ACTION}.runtime")), Some("nodejs:14"));
    }

    #[test]
    fn test_absolute_mode_uses_working_directory() {
        let (source, root) = app_not_in_root();
        let mut resolved = resolve(&source, &root);

        PathRewriter::new(&root, Path::new("/work"))
            .rewrite(&mut resolved.tree, &resolved.index)
            .unwrap();

        assert_eq!(str_at(&resolved.tree, "application.actions"), Some("/work/app/myactions"));
        assert_eq!(
            str_at(&resolved.tree, &format!("{ACTION}.function")),
            Some("/work/app/myactions/action.js")
        );
    }

    #[test]
    fn test_absolute_rewrite_is_idempotent() {
        let (source, root) = app_not_in_root();
        let mut resolved = resolve(&source, &root);
        let rewriter = PathRewriter::new(&root, Path::new("/work"));

        rewriter.rewrite(&mut resolved.tree, &resolved.index).unwrap();
        let once = resolved.tree.clone();
        rewriter.rewrite(&mut resolved.tree, &resolved.index).unwrap();
        assert_eq!(resolved.tree, once);
    }

    #[test]
    fn test_included_extension_actions() {
        let source = MemorySource::new()
            .with("/app/app.config.yaml", "extensions:\n  dx:\n    $include: src/dx/ext.config.yaml\n")
            .with("/app/src/dx/ext.config.yaml", "actions: ./actions\nweb:\n  src: web-src\n");
        let root = DocumentId::new("/app/app.config.yaml");
        let mut resolved = resolve(&source, &root);

        PathRewriter::new(&root, Path::new("/elsewhere"))
            .rewrite(&mut resolved.tree, &resolved.index)
            .unwrap();

        assert_eq!(str_at(&resolved.tree, "extensions.dx.actions"), Some("/app/src/dx/actions"));
        assert_eq!(str_at(&resolved.tree, "extensions.dx.web.src"), Some("/app/src/dx/web-src"));
    }

    #[test]
    fn test_absolute_value_is_kept_in_relative_mode() {
        let root = DocumentId::new("app.config.yaml");
        let rewriter = PathRewriter::new(&root, Path::new("/work")).absolute(false);
        assert_eq!(
            rewriter.rewrite_value("/opt/./actions", &DocumentId::new("src/ext.yaml")),
            "/opt/actions"
        );
        assert_eq!(
            rewriter.rewrite_value("../shared", &DocumentId::new("src/dx/ext.yaml")),
            "src/shared"
        );
    }

    #[test]
    fn test_non_string_values_are_left_alone() {
        let mut tree = ConfigTree::from_yaml_str("application:\n  dist: 3\n").unwrap();
        let mut index = ProvenanceIndex::new();
        index.record(
            KeyPath::from_dotted("application.dist"),
            ProvenanceEntry::new(DocumentId::new("app.config.yaml"), KeyPath::from_dotted("application.dist")),
        );
        let count = PathRewriter::new(&DocumentId::new("app.config.yaml"), Path::new("/w"))
            .rewrite(&mut tree, &index)
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_missing_provenance_is_internal_error() {
        let mut tree = ConfigTree::from_yaml_str("application:\n  actions: actions\n").unwrap();
        let result = PathRewriter::new(&DocumentId::new("app.config.yaml"), Path::new("/w"))
            .rewrite(&mut tree, &ProvenanceIndex::new());
        assert!(matches!(result, Err(Error::Internal { .. })));
    }
}
