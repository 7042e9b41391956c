use log::warn;

use crate::include::Resolved;
use crate::legacy::{LegacySources, AIO_FILE, HOOK_NAMES, LEGACY_MANIFEST_FILE, PACKAGE_FILE};
use crate::provenance::{ProvenanceEntry, ProvenanceIndex};
use crate::source::DocumentId;
use crate::tree::{ConfigTree, KeyPath, Mapping, Scalar};

/// Builds `{ application: ... }` from the legacy sources, with provenance.
///
/// The result is an empty mapping when no legacy source contributes anything.
///
/// # Examples
///
/// ```
/// use appconf::legacy::{build_legacy_tree, LegacySources};
/// use appconf::tree::ConfigTree;
///
/// let sources = LegacySources {
///     scripts: Some(ConfigTree::from_yaml_str("pre-app-build: echo hi\ntest: jest\n").unwrap()),
///     ..Default::default()
/// };
/// let legacy = build_legacy_tree(&sources);
///
/// let hooks = legacy.tree.get("application").unwrap().get("hooks").unwrap();
/// assert_eq!(hooks.child_keys(), vec!["pre-app-build"]);
/// assert_eq!(legacy.index.get_dotted("application.hooks").unwrap().key.to_string(), "scripts");
/// ```
#[must_use]
pub fn build_legacy_tree(sources: &LegacySources) -> Resolved {
    let application = KeyPath::root().child("application");
    let mut app = Mapping::new();
    let mut index = ProvenanceIndex::new();

    if let Some(settings) = &sources.app_settings {
        warn!("App config in '.aio' file is deprecated. Please move your '.aio.app' or '.aio.cna' to 'app.config.yaml'.");
        if let Some(fields) = settings.as_mapping() {
            for (key, value) in fields {
                app.insert(key.clone(), value.clone());
                index.record(
                    application.child(key.clone()),
                    ProvenanceEntry::new(DocumentId::new(AIO_FILE), ["app", key.as_str()]),
                );
            }
        }
    }

    if let Some(manifest) = &sources.manifest {
        let base = application.child("runtimeManifest");
        let document = DocumentId::new(LEGACY_MANIFEST_FILE);
        index.record(base.clone(), ProvenanceEntry::new(document.clone(), KeyPath::root()));
        for (path, _) in manifest.descendants() {
            index.record(base.join(&path), ProvenanceEntry::new(document.clone(), path));
        }
        app.insert("runtimeManifest".to_string(), manifest.clone());
    }

    if let Some(scripts) = &sources.scripts {
        let hooks: Mapping = HOOK_NAMES
            .iter()
            .filter_map(|name| {
                scripts
                    .get(name)
                    .filter(|script| is_set(script))
                    .map(|script| ((*name).to_string(), script.clone()))
            })
            .collect();

        if !hooks.is_empty() {
            warn!("hooks in 'package.json' are deprecated. Please move your hooks to 'app.config.yaml' under the 'hooks' key");
            let base = application.child("hooks");
            let document = DocumentId::new(PACKAGE_FILE);
            index.record(base.clone(), ProvenanceEntry::new(document.clone(), ["scripts"]));
            for name in hooks.keys() {
                index.record(
                    base.child(name.clone()),
                    ProvenanceEntry::new(document.clone(), ["scripts", name.as_str()]),
                );
            }
            app.insert("hooks".to_string(), ConfigTree::Mapping(hooks));
        }
    }

    if index.is_empty() && app.is_empty() {
        return Resolved::empty();
    }
    index.record(application.clone(), ProvenanceEntry::new(DocumentId::new(AIO_FILE), ["app"]));

    let mut tree = Mapping::new();
    tree.insert("application".to_string(), ConfigTree::Mapping(app));
    Resolved {
        tree: ConfigTree::Mapping(tree),
        index,
    }
}

/// Whether a script entry counts as defined.
fn is_set(script: &ConfigTree) -> bool {
    match script {
        ConfigTree::Scalar(Scalar::Null) => false,
        ConfigTree::Scalar(Scalar::Bool(b)) => *b,
        ConfigTree::Scalar(Scalar::String(s)) => !s.is_empty(),
        _ => true,
    }
}
