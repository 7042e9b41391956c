use std::mem;

use log::warn;

use crate::include::Resolved;
use crate::tree::{ConfigTree, KeyPath};

const APPLICATION: &str = "application";
const RUNTIME_MANIFEST: &str = "runtimeManifest";
const HOOKS: &str = "hooks";

/// Merges the legacy `application` under the current one.
///
/// Fields of the current `application` win key by key. A legacy runtime
/// manifest is dropped entirely when the current configuration has one.
/// Hooks defined on both sides are merged per hook, current winning. The
/// provenance indexes are merged the same way. Nothing outside
/// `application` is touched.
///
/// # Examples
///
/// ```
/// use appconf::include::Resolved;
/// use appconf::legacy::{build_legacy_tree, merge_legacy, LegacySources};
/// use appconf::tree::ConfigTree;
///
/// let legacy = build_legacy_tree(&LegacySources {
///     app_settings: Some(ConfigTree::from_yaml_str("hostname: legacy.net\nactions: old\n").unwrap()),
///     ..Default::default()
/// });
/// let current = Resolved {
///     tree: ConfigTree::from_yaml_str("application:\n  actions: new\n").unwrap(),
///     ..Default::default()
/// };
///
/// let merged = merge_legacy(current, legacy);
/// let app = merged.tree.get("application").unwrap();
/// assert_eq!(app.get("actions").unwrap().as_str(), Some("new"));
/// assert_eq!(app.get("hostname").unwrap().as_str(), Some("legacy.net"));
/// ```
#[must_use]
pub fn merge_legacy(current: Resolved, legacy: Resolved) -> Resolved {
    let Resolved {
        mut tree,
        index: current_index,
    } = current;
    let Resolved {
        tree: legacy_tree,
        mut index,
    } = legacy;

    let application = KeyPath::root().child(APPLICATION);
    let legacy_app = legacy_tree.get(APPLICATION).and_then(ConfigTree::as_mapping);

    match (legacy_app, tree.as_mapping_mut()) {
        (Some(legacy_app), Some(root)) => match root.get_mut(APPLICATION) {
            Some(ConfigTree::Mapping(current_app)) => {
                let mut merged = legacy_app.clone();
                for (key, value) in mem::take(current_app) {
                    let legacy_value = merged.get(&key);
                    if key == HOOKS {
                        if let (Some(ConfigTree::Mapping(legacy_hooks)), ConfigTree::Mapping(hooks)) =
                            (legacy_value, &value)
                        {
                            let mut union = legacy_hooks.clone();
                            for (name, script) in hooks {
                                if union.contains_key(name) {
                                    index.remove_subtree(&application.child(HOOKS).child(name.clone()));
                                }
                                union.insert(name.clone(), script.clone());
                            }
                            merged.insert(key, ConfigTree::Mapping(union));
                            continue;
                        }
                    }
                    if legacy_value.is_some() {
                        if key == RUNTIME_MANIFEST {
                            warn!("'manifest.yml' is ignored in favor of key 'runtimeManifest' in 'app.config.yaml'.");
                        }
                        index.remove_subtree(&application.child(key.clone()));
                    }
                    merged.insert(key, value);
                }
                *current_app = merged;
            }
            Some(_) => {
                // A non-mapping application is kept as authored.
                index.remove_subtree(&application);
            }
            None => {
                root.insert(APPLICATION.to_string(), ConfigTree::Mapping(legacy_app.clone()));
            }
        },
        (None, _) | (_, None) => {}
    }

    index.overlay(&current_index);
    Resolved { tree, index }
}
