use std::collections::HashMap;
use std::iter;
use std::rc::Rc;

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::include::{Resolved, INCLUDE_DIRECTIVE};
use crate::provenance::{ProvenanceEntry, ProvenanceIndex};
use crate::source::{DocumentId, DocumentSource};
use crate::tree::{ConfigTree, KeyPath};

/// Resolves `$include` directives starting from a root document.
///
/// Each call to [`resolve`](Self::resolve) owns its tree, index and document
/// cache; nothing is shared between calls. Every document is read from the
/// source at most once per call, and every splice receives its own copy of
/// the cached document.
pub struct IncludeResolver<'a, S: DocumentSource + ?Sized> {
    source: &'a S,
}

/// One pending key visit.
struct WorkItem {
    /// Merged path of the mapping or sequence holding `key`.
    container: KeyPath,
    key: String,
    /// Path of the key inside `document`.
    source_path: KeyPath,
    /// The document whose content this key came from.
    document: DocumentId,
    /// Inclusion chain from the root down to `document`, inclusive.
    ancestry: Rc<[DocumentId]>,
}

impl<'a, S: DocumentSource + ?Sized> IncludeResolver<'a, S> {
    /// Creates a resolver reading documents from `source`.
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Resolves every `$include` reachable from `root`.
    ///
    /// # Errors
    ///
    /// - [`Error::IncludeCycle`] when a document includes one of its ancestors
    /// - [`Error::MissingInclude`] when an included document does not exist
    /// - [`Error::InvalidIncludeTarget`] when the root or an included document
    ///   is not a mapping, or a directive value is not a string
    /// - any error from the source while loading a document
    pub fn resolve(&self, root: &DocumentId) -> Result<Resolved> {
        debug!("Resolving includes from {root}");
        let mut tree = self.source.load(root)?;
        if !tree.is_mapping() {
            return Err(Error::InvalidIncludeTarget {
                document: root.clone(),
            });
        }

        let mut index = ProvenanceIndex::new();
        let mut cache: HashMap<DocumentId, ConfigTree> = HashMap::new();
        let mut stack: Vec<WorkItem> = Vec::new();

        let ancestry: Rc<[DocumentId]> = Rc::from(vec![root.clone()]);
        push_children(&mut stack, &tree, &KeyPath::root(), &KeyPath::root(), root, &ancestry);

        while let Some(item) = stack.pop() {
            let merged_path = item.container.child(item.key.clone());
            let node = tree.get_path(&merged_path).ok_or_else(|| Error::Internal {
                details: format!("work item '{merged_path}' is not in the merged tree"),
            })?;

            if item.key == INCLUDE_DIRECTIVE {
                let target = directive_target(node, &item.document)?;
                self.splice(&mut tree, &mut cache, &mut stack, &item, target)?;
                continue;
            }

            index.record(
                merged_path.clone(),
                ProvenanceEntry::new(item.document.clone(), item.source_path.clone()),
            );

            if node.is_container() {
                push_children(
                    &mut stack,
                    node,
                    &merged_path,
                    &item.source_path,
                    &item.document,
                    &item.ancestry,
                );
            }
        }

        debug!("Resolved {root}: {} keys indexed, {} documents included", index.len(), cache.len());
        Ok(Resolved { tree, index })
    }

    /// Replaces the directive in `item.container` with the keys of `target`.
    fn splice(
        &self,
        tree: &mut ConfigTree,
        cache: &mut HashMap<DocumentId, ConfigTree>,
        stack: &mut Vec<WorkItem>,
        item: &WorkItem,
        target: DocumentId,
    ) -> Result<()> {
        if item.ancestry.contains(&target) {
            let chain = item.ancestry.iter().cloned().chain(iter::once(target)).collect();
            return Err(Error::IncludeCycle { chain });
        }

        let included = match cache.get(&target) {
            Some(cached) => {
                debug!("Reusing cached {target}");
                cached.clone()
            }
            None => {
                if !self.source.exists(&target) {
                    return Err(Error::MissingInclude { document: target });
                }
                debug!("Loading {target} included from {}", item.document);
                let loaded = self.source.load(&target)?;
                cache.insert(target.clone(), loaded.clone());
                loaded
            }
        };

        let ConfigTree::Mapping(included) = included else {
            return Err(Error::InvalidIncludeTarget { document: target });
        };

        let container = tree
            .get_path_mut(&item.container)
            .and_then(ConfigTree::as_mapping_mut)
            .ok_or_else(|| Error::Internal {
                details: format!("'{}' holds '{INCLUDE_DIRECTIVE}' but is not a mapping", item.container),
            })?;
        container.shift_remove(INCLUDE_DIRECTIVE);

        let mut copied = Vec::new();
        let mut kept = 0usize;
        for (key, value) in included {
            if container.contains_key(&key) {
                kept += 1;
                continue;
            }
            container.insert(key.clone(), value);
            copied.push(key);
        }
        trace!(
            "Spliced {target} into '{}': {} keys copied, {kept} kept local",
            item.container,
            copied.len()
        );

        let ancestry: Rc<[DocumentId]> = item
            .ancestry
            .iter()
            .cloned()
            .chain(iter::once(target.clone()))
            .collect();
        for key in copied {
            stack.push(WorkItem {
                container: item.container.clone(),
                source_path: KeyPath::root().child(key.clone()),
                key,
                document: target.clone(),
                ancestry: Rc::clone(&ancestry),
            });
        }
        Ok(())
    }
}

fn push_children(
    stack: &mut Vec<WorkItem>,
    node: &ConfigTree,
    container: &KeyPath,
    source_path: &KeyPath,
    document: &DocumentId,
    ancestry: &Rc<[DocumentId]>,
) {
    for key in node.child_keys() {
        stack.push(WorkItem {
            container: container.clone(),
            source_path: source_path.child(key.clone()),
            key,
            document: document.clone(),
            ancestry: Rc::clone(ancestry),
        });
    }
}

/// The document a directive value names, resolved against the including document.
fn directive_target(value: &ConfigTree, including: &DocumentId) -> Result<DocumentId> {
    match value.as_str() {
        Some(relative) => Ok(including.resolve_include(relative)),
        None => {
            let shown = value
                .scalar_string()
                .or_else(|| serde_json::to_string(value).ok())
                .unwrap_or_default();
            Err(Error::InvalidIncludeTarget {
                document: DocumentId::new(shown),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{MemorySource, MockDocumentSource};

    fn resolve(source: &MemorySource, root: &str) -> Result<Resolved> {
        IncludeResolver::new(source).resolve(&DocumentId::new(root))
    }

    fn str_at<'t>(tree: &'t ConfigTree, dotted: &str) -> Option<&'t str> {
        tree.get_path(&KeyPath::from_dotted(dotted)).and_then(ConfigTree::as_str)
    }

    #[test]
    fn test_no_includes_indexes_every_key() {
        let source = MemorySource::new().with("app.config.yaml", "application:\n  actions: actions\n  web: web-src\n");
        let resolved = resolve(&source, "app.config.yaml").unwrap();

        assert_eq!(resolved.index.len(), 3);
        let entry = resolved.index.get_dotted("application.web").unwrap();
        assert_eq!(entry.document.as_str(), "app.config.yaml");
        assert_eq!(entry.key.to_string(), "application.web");
    }

    #[test]
    fn test_cycle_reports_full_chain() {
        let source = MemorySource::new()
            .with("a.yaml", "x:\n  $include: b.yaml\n")
            .with("b.yaml", "y:\n  $include: dir/c.yaml\n")
            .with("dir/c.yaml", "z:\n  $include: ../a.yaml\n");

        let err = resolve(&source, "a.yaml").unwrap_err();
        match &err {
            Error::IncludeCycle { chain } => {
                let names: Vec<&str> = chain.iter().map(DocumentId::as_str).collect();
                assert_eq!(names, vec!["a.yaml", "b.yaml", "dir/c.yaml", "a.yaml"]);
            }
            other => panic!("expected cycle error, got {other:?}"),
        }
        assert!(err.to_string().contains("'a.yaml,b.yaml,dir/c.yaml,a.yaml'"));
    }

    #[test]
    fn test_self_include_is_a_cycle() {
        let source = MemorySource::new().with("a.yaml", "$include: ./a.yaml\n");
        assert!(matches!(resolve(&source, "a.yaml"), Err(Error::IncludeCycle { .. })));
    }

    #[test]
    fn test_local_keys_win_over_included() {
        let source = MemorySource::new()
            .with("root.yaml", "actions: x\n$include: other.yaml\n")
            .with("other.yaml", "actions: y\nweb: w\n");

        let resolved = resolve(&source, "root.yaml").unwrap();
        assert_eq!(str_at(&resolved.tree, "actions"), Some("x"));
        assert_eq!(str_at(&resolved.tree, "web"), Some("w"));

        let actions = resolved.index.get_dotted("actions").unwrap();
        assert_eq!(actions.document.as_str(), "root.yaml");
        let web = resolved.index.get_dotted("web").unwrap();
        assert_eq!(web.document.as_str(), "other.yaml");
        assert_eq!(web.key.to_string(), "web");
    }

    #[test]
    fn test_precedence_is_not_deep() {
        let source = MemorySource::new()
            .with("root.yaml", "app:\n  $include: other.yaml\n  web:\n    src: local\n")
            .with("other.yaml", "web:\n  src: included\n  response-headers: {}\n");

        let resolved = resolve(&source, "root.yaml").unwrap();
        let web = resolved.tree.get_path(&KeyPath::from(["app", "web"])).unwrap();
        assert_eq!(web.child_keys(), vec!["src"]);
    }

    #[test]
    fn test_shared_document_is_copied_per_site() {
        let source = MemorySource::new()
            .with(
                "root.yaml",
                "first:\n  actions: overridden\n  $include: other.yaml\nsecond:\n  $include: other.yaml\n",
            )
            .with("other.yaml", "actions: original\nnested:\n  deep: value\n");

        let resolved = resolve(&source, "root.yaml").unwrap();
        assert_eq!(str_at(&resolved.tree, "first.actions"), Some("overridden"));
        assert_eq!(str_at(&resolved.tree, "second.actions"), Some("original"));
        assert_eq!(str_at(&resolved.tree, "first.nested.deep"), Some("value"));
        assert_eq!(str_at(&resolved.tree, "second.nested.deep"), Some("value"));

        assert_eq!(
            resolved.index.get_dotted("first.actions").unwrap().document.as_str(),
            "root.yaml"
        );
        assert_eq!(
            resolved.index.get_dotted("second.nested.deep").unwrap().key.to_string(),
            "nested.deep"
        );
    }

    #[test]
    fn test_each_document_is_read_once() {
        let mut source = MockDocumentSource::new();
        source
            .expect_load()
            .withf(|id| id.as_str() == "root.yaml")
            .times(1)
            .returning(|_| {
                Ok(ConfigTree::from_yaml_str("a:\n  $include: shared.yaml\nb:\n  $include: shared.yaml\n").unwrap())
            });
        source
            .expect_exists()
            .withf(|id| id.as_str() == "shared.yaml")
            .times(1)
            .returning(|_| true);
        source
            .expect_load()
            .withf(|id| id.as_str() == "shared.yaml")
            .times(1)
            .returning(|_| Ok(ConfigTree::from_yaml_str("key: value\n").unwrap()));

        let resolved = IncludeResolver::new(&source)
            .resolve(&DocumentId::new("root.yaml"))
            .unwrap();
        assert_eq!(str_at(&resolved.tree, "a.key"), Some("value"));
        assert_eq!(str_at(&resolved.tree, "b.key"), Some("value"));
    }

    #[test]
    fn test_missing_include_names_document() {
        let source = MemorySource::new().with("app.config.yaml", "application:\n  $include: b.yaml\n");
        let err = resolve(&source, "app.config.yaml").unwrap_err();
        assert!(matches!(&err, Error::MissingInclude { document } if document.as_str() == "b.yaml"));
        assert!(err.to_string().contains("b.yaml"));
    }

    #[test]
    fn test_missing_include_is_resolved_against_including_directory() {
        let source = MemorySource::new()
            .with("app.config.yaml", "application:\n  $include: src/app.yaml\n")
            .with("src/app.yaml", "$include: b.yaml\n");
        let err = resolve(&source, "app.config.yaml").unwrap_err();
        assert!(matches!(&err, Error::MissingInclude { document } if document.as_str() == "src/b.yaml"));
    }

    #[test]
    fn test_include_of_string_document_is_rejected() {
        let source = MemorySource::new()
            .with("app.config.yaml", "application:\n  $include: b.yaml\n")
            .with("b.yaml", "just a string\n");
        let err = resolve(&source, "app.config.yaml").unwrap_err();
        assert!(matches!(&err, Error::InvalidIncludeTarget { document } if document.as_str() == "b.yaml"));
    }

    #[test]
    fn test_include_of_sequence_document_is_rejected() {
        let source = MemorySource::new()
            .with("app.config.yaml", "application:\n  $include: b.yaml\n")
            .with("b.yaml", "- a\n- b\n");
        assert!(matches!(
            resolve(&source, "app.config.yaml"),
            Err(Error::InvalidIncludeTarget { .. })
        ));
    }

    #[test]
    fn test_non_string_directive_is_rejected() {
        let source = MemorySource::new().with("app.config.yaml", "application:\n  $include:\n    - b.yaml\n");
        assert!(matches!(
            resolve(&source, "app.config.yaml"),
            Err(Error::InvalidIncludeTarget { .. })
        ));
    }

    #[test]
    fn test_root_must_be_a_mapping() {
        let source = MemorySource::new().with("app.config.yaml", "- application\n");
        let err = resolve(&source, "app.config.yaml").unwrap_err();
        assert!(matches!(&err, Error::InvalidIncludeTarget { document } if document.as_str() == "app.config.yaml"));
    }

    #[test]
    fn test_directive_is_removed_from_tree_and_index() {
        let source = MemorySource::new()
            .with("app.config.yaml", "application:\n  $include: app.yaml\n")
            .with("app.yaml", "actions: actions\n");
        let resolved = resolve(&source, "app.config.yaml").unwrap();

        assert_eq!(resolved.tree.get("application").unwrap().child_keys(), vec!["actions"]);
        assert!(resolved.index.iter().all(|(path, _)| !path.to_string().contains(INCLUDE_DIRECTIVE)));
    }

    #[test]
    fn test_nested_includes_inside_sequences() {
        let source = MemorySource::new()
            .with("app.config.yaml", "items:\n  - $include: item.yaml\n    local: yes\n")
            .with("item.yaml", "name: first\n");
        let resolved = resolve(&source, "app.config.yaml").unwrap();

        assert_eq!(str_at(&resolved.tree, "items.0.name"), Some("first"));
        let entry = resolved.index.get_dotted("items.0.name").unwrap();
        assert_eq!(entry.document.as_str(), "item.yaml");
        assert_eq!(entry.key.to_string(), "name");
    }

    #[test]
    fn test_every_merged_path_is_indexed() {
        let source = MemorySource::new()
            .with("app.config.yaml", "extensions:\n  $include: exts.yaml\n")
            .with("exts.yaml", "dx/excshell/1:\n  $include: src/ext.yaml\n")
            .with("src/ext.yaml", "operations:\n  view:\n    - type: web\n      impl: index.html\n");
        let resolved = resolve(&source, "app.config.yaml").unwrap();

        for (path, _) in resolved.tree.descendants() {
            assert!(resolved.index.get(&path).is_some(), "no provenance for {path}");
        }
        let ext = resolved.index.get(&KeyPath::from(["extensions", "dx/excshell/1"])).unwrap();
        assert_eq!(ext.document.as_str(), "exts.yaml");
        assert_eq!(ext.key, KeyPath::from(["dx/excshell/1"]));
    }
}
