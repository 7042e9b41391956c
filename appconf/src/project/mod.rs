//! Projection of the merged tree into per-component records.
//!
//! After inclusion and legacy merging, the configuration is one tree with an
//! optional `application` and any number of `extensions`. Each of them becomes
//! a [`ComponentConfig`] with every default filled in, so downstream tools never
//! have to know where a value came from.

mod component;

pub use component::{
    ActionsSection, AppSection, ComponentConfig, ManifestSection, OwSection, S3Credentials, S3Params, S3Section,
    TestsSection, WebSection, MANIFEST_SRC, PACKAGE_PLACEHOLDER,
};

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::Result;
use crate::options::CliEnvironment;
use crate::paths::normalize::to_slash;
use crate::provenance::ProvenanceIndex;
use crate::tree::{ConfigTree, KeyPath, Mapping};

/// Component name of the standalone application.
pub const APPLICATION: &str = "application";
/// Key holding the extensions.
pub const EXTENSIONS: &str = "extensions";

const DEFAULT_PACKAGE_NAME: &str = "unnamed-app";
const DEFAULT_PACKAGE_VERSION: &str = "0.1.0";

/// Name and version from `package.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageInfo {
    /// Package name with any `@scope/` prefix removed.
    pub name: String,
    /// Package version.
    pub version: String,
}

impl PackageInfo {
    /// Reads name and version from a parsed `package.json`.
    ///
    /// # Examples
    ///
    /// ```
    /// use appconf::project::PackageInfo;
    /// use appconf::tree::ConfigTree;
    ///
    /// let json = serde_json::json!({ "name": "@org/my-app" });
    /// let info = PackageInfo::from_package_json(&ConfigTree::from(json));
    /// assert_eq!(info.name, "my-app");
    /// assert_eq!(info.version, "0.1.0");
    /// ```
    #[must_use]
    pub fn from_package_json(package: &ConfigTree) -> Self {
        let name = package
            .get("name")
            .and_then(ConfigTree::as_str)
            .filter(|name| !name.is_empty())
            .map_or(DEFAULT_PACKAGE_NAME, |name| name.rsplit('/').next().unwrap_or(name));
        let version = package
            .get("version")
            .and_then(ConfigTree::scalar_string)
            .unwrap_or_else(|| DEFAULT_PACKAGE_VERSION.to_string());
        Self {
            name: name.to_string(),
            version,
        }
    }
}

impl Default for PackageInfo {
    fn default() -> Self {
        Self {
            name: DEFAULT_PACKAGE_NAME.to_string(),
            version: DEFAULT_PACKAGE_VERSION.to_string(),
        }
    }
}

/// Project-wide facts needed to fill in component defaults.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    /// Absolute project root.
    pub root: PathBuf,
    /// Package name and version.
    pub package: PackageInfo,
    /// Environment used for hostname defaults.
    pub environment: CliEnvironment,
    /// Runtime settings copied into every component.
    pub ow: OwSection,
}

impl ProjectContext {
    /// The project root in `/`-separated form.
    #[must_use]
    pub fn root_str(&self) -> String {
        to_slash(&self.root.to_string_lossy())
    }
}

/// Builds the records for `application` and every extension.
///
/// The application is only considered when the index knows about it, and only
/// emitted when it has a backend or a frontend.
///
/// # Errors
///
/// Returns [`Error::MissingComponentField`](crate::Error::MissingComponentField)
/// if an extension has no `operations`.
pub fn project_components(
    tree: &ConfigTree,
    index: &ProvenanceIndex,
    ctx: &ProjectContext,
) -> Result<BTreeMap<String, ComponentConfig>> {
    let mut all = BTreeMap::new();

    let application = KeyPath::root().child(APPLICATION);
    if index.get(&application).is_some() {
        if let Some(fields) = tree.get(APPLICATION).and_then(ConfigTree::as_mapping) {
            let config = component::build_component(APPLICATION, &application, fields, index, ctx);
            if config.app.has_backend || config.app.has_frontend {
                all.insert(APPLICATION.to_string(), config);
            }
        }
    }

    let no_fields = Mapping::new();
    let extensions = tree.get(EXTENSIONS).and_then(ConfigTree::as_mapping);
    for (name, fields) in extensions.into_iter().flatten() {
        let prefix = KeyPath::root().child(EXTENSIONS).child(name.clone());
        let fields = fields.as_mapping().unwrap_or(&no_fields);
        let config = component::build_extension(name, &prefix, fields, index, ctx)?;
        all.insert(name.clone(), config);
    }

    Ok(all)
}
