//! Adapter for the legacy configuration layout.
//!
//! Older projects keep their application settings in three places: the
//! `app`/`cna` sections of the `.aio` file, a standalone `manifest.yml`
//! runtime manifest, and build hooks in the `package.json` scripts. This
//! module folds them into the `application` shape of `app.config.yaml`,
//! with provenance, and merges the result under the current configuration.

mod build;
mod merge;

pub use build::build_legacy_tree;
pub use merge::merge_legacy;

use crate::tree::{ConfigTree, Mapping};

/// Script names treated as application hooks.
pub const HOOK_NAMES: [&str; 15] = [
    "pre-app-build",
    "post-app-build",
    "build-actions",
    "build-static",
    "pre-app-deploy",
    "post-app-deploy",
    "deploy-actions",
    "deploy-static",
    "pre-app-undeploy",
    "post-app-undeploy",
    "undeploy-actions",
    "undeploy-static",
    "pre-app-run",
    "post-app-run",
    "serve-static",
];

/// Document name used in provenance for `.aio` settings.
pub const AIO_FILE: &str = ".aio";
/// The legacy runtime manifest file.
pub const LEGACY_MANIFEST_FILE: &str = "manifest.yml";
/// The package metadata file holding legacy hooks.
pub const PACKAGE_FILE: &str = "package.json";

/// Parsed legacy inputs. Any of them may be absent.
#[derive(Debug, Clone, Default)]
pub struct LegacySources {
    /// Flat application settings from `.aio`.
    pub app_settings: Option<ConfigTree>,
    /// The parsed `manifest.yml`.
    pub manifest: Option<ConfigTree>,
    /// The `scripts` object of `package.json`.
    pub scripts: Option<ConfigTree>,
}

impl LegacySources {
    /// Whether no legacy input is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.app_settings.is_none() && self.manifest.is_none() && self.scripts.is_none()
    }
}

/// Extracts the flat application settings from a parsed `.aio` document.
///
/// The `app` and `cna` sections are combined, `cna` winning. Returns `None`
/// when neither section exists.
///
/// # Examples
///
/// ```
/// use appconf::legacy::app_settings_from_aio;
/// use appconf::tree::ConfigTree;
///
/// let aio = ConfigTree::from_yaml_str("app:\n  hostname: a\n  actions: x\ncna:\n  hostname: b\n").unwrap();
/// let settings = app_settings_from_aio(&aio).unwrap();
/// assert_eq!(settings.get("hostname").unwrap().as_str(), Some("b"));
/// assert_eq!(settings.get("actions").unwrap().as_str(), Some("x"));
/// ```
#[must_use]
pub fn app_settings_from_aio(aio: &ConfigTree) -> Option<ConfigTree> {
    let app = aio.get("app");
    let cna = aio.get("cna");
    if app.is_none() && cna.is_none() {
        return None;
    }

    let mut settings = Mapping::new();
    for section in [app, cna].into_iter().flatten() {
        if let Some(fields) = section.as_mapping() {
            for (key, value) in fields {
                settings.insert(key.clone(), value.clone());
            }
        }
    }
    Some(ConfigTree::Mapping(settings))
}
