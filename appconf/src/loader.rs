//! Loading a project's configuration from disk.
//!
//! [`coalesce`] resolves `$include` directives and rewrites path fields for a
//! single root document. [`load`] runs the whole pipeline for a project
//! directory: package metadata, legacy settings, coalescing, merging,
//! validation and projection into components.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::include::{IncludeResolver, Resolved};
use crate::legacy::{
    app_settings_from_aio, build_legacy_tree, merge_legacy, LegacySources, AIO_FILE, LEGACY_MANIFEST_FILE,
    PACKAGE_FILE,
};
use crate::options::LoadOptions;
use crate::paths::PathRewriter;
use crate::project::{project_components, ComponentConfig, OwSection, PackageInfo, ProjectContext};
use crate::provenance::ProvenanceIndex;
use crate::schema::{validate_tree, BuiltinSchema};
use crate::source::{DocumentId, DocumentSource, FsSource};
use crate::tree::ConfigTree;

/// The root configuration file of a project.
pub const APP_CONFIG_FILE: &str = "app.config.yaml";

/// The `.aio` section holding runtime settings.
const AIO_RUNTIME_KEY: &str = "runtime";

/// Everything known about a project after [`load`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedConfig {
    /// Component records keyed by component name.
    pub all: BTreeMap<String, ComponentConfig>,
    /// Component names in sorted order.
    pub implements: Vec<String>,
    /// Provenance of every merged key.
    pub include_index: ProvenanceIndex,
    /// Name and version from `package.json`.
    pub package: PackageInfo,
    /// The top-level `configSchema`, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_schema: Option<ConfigTree>,
    /// The top-level `productDependencies`, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_dependencies: Option<ConfigTree>,
    /// The absolute project directory.
    pub root: PathBuf,
}

/// Resolves includes in `root` and rewrites its path fields.
///
/// A missing root document is not an error: legacy-only projects have no
/// `app.config.yaml`, so an empty [`Resolved`] is returned instead. Relative
/// path values become absolute against `working_dir` when
/// [`LoadOptions::absolute_paths`] is set, and relative to the root document's
/// directory otherwise.
///
/// # Errors
///
/// Returns any include error (cycle, missing or invalid target), or a read or
/// parse error for one of the documents.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use appconf::loader::coalesce;
/// use appconf::options::LoadOptions;
/// use appconf::source::{DocumentId, MemorySource};
///
/// let source = MemorySource::new()
///     .with("app.config.yaml", "application:\n  $include: src/app.yaml\n")
///     .with("src/app.yaml", "actions: ./actions\n");
///
/// let resolved = coalesce(
///     &source,
///     &DocumentId::new("app.config.yaml"),
///     Path::new("/work"),
///     &LoadOptions::default(),
/// )
/// .unwrap();
///
/// let actions = resolved.tree.get("application").and_then(|app| app.get("actions"));
/// assert_eq!(actions.and_then(|a| a.as_str()), Some("/work/src/actions"));
/// ```
pub fn coalesce<S: DocumentSource + ?Sized>(
    source: &S,
    root: &DocumentId,
    working_dir: &Path,
    options: &LoadOptions,
) -> Result<Resolved> {
    if !source.exists(root) {
        debug!("No '{root}' found, continuing with legacy configuration only");
        return Ok(Resolved::empty());
    }

    let mut resolved = IncludeResolver::new(source).resolve(root)?;
    let rewritten = PathRewriter::new(root, working_dir)
        .absolute(options.absolute_paths)
        .rewrite(&mut resolved.tree, &resolved.index)?;
    debug!("Rewrote {rewritten} path field(s) in '{root}'");

    Ok(resolved)
}

/// Loads the configuration of the project in `project_dir`.
///
/// # Errors
///
/// Returns [`Error::Io`] if `package.json` is missing, any error from
/// [`coalesce`], [`Error::SchemaValidation`] when validation is enabled and
/// fails, [`Error::MissingComponentField`] for incomplete extensions, and
/// [`Error::NoImplementation`] when nothing is configured and
/// [`LoadOptions::allow_no_impl`] is not set.
pub fn load(project_dir: &Path, options: &LoadOptions) -> Result<LoadedConfig> {
    let root = if project_dir.is_absolute() {
        project_dir.to_path_buf()
    } else {
        std::env::current_dir()?.join(project_dir)
    };
    let source = FsSource::new(&root);

    let package_json = source.load_json(&DocumentId::new(PACKAGE_FILE))?.ok_or_else(|| {
        Error::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("'{PACKAGE_FILE}' not found in '{}'", root.display()),
        ))
    })?;
    let package = PackageInfo::from_package_json(&package_json);
    let aio = read_aio(&source, options)?;

    let legacy = LegacySources {
        app_settings: aio.as_ref().and_then(app_settings_from_aio),
        manifest: read_legacy_manifest(&source)?,
        scripts: package_json.get("scripts").cloned(),
    };

    let current = coalesce(&source, &DocumentId::new(APP_CONFIG_FILE), &root, options)?;
    let merged = merge_legacy(current, build_legacy_tree(&legacy));

    if options.validate {
        validate_tree(&BuiltinSchema, &merged.tree)?;
    }

    let ctx = ProjectContext {
        root: root.clone(),
        ow: OwSection::from_runtime(aio.as_ref().and_then(|aio| aio.get(AIO_RUNTIME_KEY)), &package),
        package: package.clone(),
        environment: options.environment,
    };
    let all = project_components(&merged.tree, &merged.index, &ctx)?;

    if all.is_empty() && !options.allow_no_impl {
        return Err(Error::NoImplementation { dir: root });
    }

    let implements: Vec<String> = all.keys().cloned().collect();
    info!("Loaded {} component(s) from '{}'", implements.len(), root.display());

    Ok(LoadedConfig {
        all,
        implements,
        config_schema: merged.tree.get("configSchema").cloned(),
        product_dependencies: merged.tree.get("productDependencies").cloned(),
        include_index: merged.index,
        package,
        root,
    })
}

fn read_aio(source: &FsSource, options: &LoadOptions) -> Result<Option<ConfigTree>> {
    if options.ignore_aio_config {
        return Ok(None);
    }
    source.load_json(&DocumentId::new(AIO_FILE))
}

fn read_legacy_manifest(source: &FsSource) -> Result<Option<ConfigTree>> {
    let manifest = DocumentId::new(LEGACY_MANIFEST_FILE);
    if source.exists(&manifest) {
        source.load(&manifest).map(Some)
    } else {
        Ok(None)
    }
}
