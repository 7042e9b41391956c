//! Per-component configuration records.

use std::path::Path;

use log::debug;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::paths::normalize::{absolutize, join};
use crate::project::{PackageInfo, ProjectContext};
use crate::provenance::ProvenanceIndex;
use crate::tree::{ConfigTree, KeyPath, Mapping};

const DEFAULT_ACTIONS_DIR: &str = "actions/";
const DEFAULT_WEB_DIR: &str = "web-src/";
const DEFAULT_UNIT_TEST_DIR: &str = "test/";
const DEFAULT_E2E_TEST_DIR: &str = "e2e/";
const DEFAULT_DIST_DIR: &str = "dist/";

const DEFAULT_HTML_CACHE_DURATION: &str = "60";
const ABOUT_A_WEEK_IN_SECONDS: &str = "604800";

const DEFAULT_OW_APIHOST: &str = "https://adobeioruntime.net";
const DEFAULT_OW_APIVERSION: &str = "v1";
/// Left out of [`S3Section::tvm_url`] so downstream tools apply their own default.
const DEFAULT_TVM_URL: &str = "https://firefly-tvm.adobe.io";
const S3_CREDS_CACHE_FILE: &str = ".aws.tmp.creds.json";

/// Placeholder package name in runtime manifests.
pub const PACKAGE_PLACEHOLDER: &str = "__APP_PACKAGE__";
/// Name under which the runtime manifest is synced.
pub const MANIFEST_SRC: &str = "manifest.yml";

/// The resolved configuration of the application or one extension.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentConfig {
    /// `application` or the extension name.
    pub name: String,
    /// The project root.
    pub root: String,
    /// Application-level settings.
    pub app: AppSection,
    /// Action sources and build output.
    pub actions: ActionsSection,
    /// Static web assets.
    pub web: WebSection,
    /// The runtime manifest, when the component has a backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<ManifestSection>,
    /// Test directories.
    pub tests: TestsSection,
    /// Runtime settings, shared by every component.
    pub ow: OwSection,
    /// Static hosting settings. Empty unless the component has a frontend.
    pub s3: S3Section,
    /// Hook scripts by hook name.
    pub hooks: ConfigTree,
    /// Event registrations, copied as authored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<ConfigTree>,
    /// Extension operations. Always present for extensions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operations: Option<ConfigTree>,
}

/// Application-level settings of a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSection {
    /// Package name without its scope.
    pub name: String,
    /// Package version.
    pub version: String,
    /// Whether a runtime manifest is configured.
    pub has_backend: bool,
    /// Whether the web source directory exists.
    pub has_frontend: bool,
    /// Build output directory.
    pub dist: String,
    /// Hostname for the selected environment.
    pub default_hostname: String,
    /// Configured hostname, or the default.
    pub hostname: String,
    /// Cache duration for HTML files, in seconds.
    pub html_cache_duration: String,
    /// Cache duration for JavaScript files, in seconds.
    pub js_cache_duration: String,
    /// Cache duration for CSS files, in seconds.
    pub css_cache_duration: String,
    /// Cache duration for images, in seconds.
    pub image_cache_duration: String,
}

/// Action locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionsSection {
    /// Action source directory.
    pub src: String,
    /// Build output for actions, when there is a backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dist: Option<String>,
}

/// Web asset locations.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebSection {
    /// Web source directory.
    pub src: String,
    /// Generated runtime config consumed by the web assets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub injected_config: Option<String>,
    /// Development build output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dist_dev: Option<String>,
    /// Production build output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dist_prod: Option<String>,
    /// Custom response headers, copied as authored.
    #[serde(rename = "response-headers", skip_serializing_if = "Option::is_none")]
    pub response_headers: Option<ConfigTree>,
}

/// The runtime manifest of a component with a backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestSection {
    /// File name the manifest is synced as.
    pub src: String,
    /// The complete manifest.
    pub full: ConfigTree,
    /// Package name replaced by the deployed package name.
    pub package_placeholder: String,
    /// The placeholder package, when the manifest defines one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<ConfigTree>,
}

/// Test directories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestsSection {
    /// Unit tests.
    pub unit: String,
    /// End-to-end tests.
    pub e2e: String,
}

/// Runtime namespace and endpoint, from the `runtime` section of `.aio`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwSection {
    /// API host actions are deployed to.
    pub apihost: String,
    /// The host used when `.aio` names none.
    pub default_apihost: String,
    /// Runtime API version.
    pub apiversion: String,
    /// Deployed package name, `<name>-<version>`. Replaces
    /// [`PACKAGE_PLACEHOLDER`] in manifests.
    pub package: String,
    /// Runtime namespace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Runtime credentials.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<String>,
}

impl OwSection {
    /// Fills the runtime settings from `.aio`'s `runtime` mapping, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use appconf::project::{OwSection, PackageInfo};
    /// use appconf::tree::ConfigTree;
    ///
    /// let package = PackageInfo { name: "my-app".into(), version: "1.0.0".into() };
    /// let runtime = ConfigTree::from_yaml_str("namespace: ns\napiversion: v2\n").unwrap();
    ///
    /// let ow = OwSection::from_runtime(Some(&runtime), &package);
    /// assert_eq!(ow.apihost, "https://adobeioruntime.net");
    /// assert_eq!(ow.apiversion, "v2");
    /// assert_eq!(ow.package, "my-app-1.0.0");
    /// assert_eq!(ow.namespace.as_deref(), Some("ns"));
    /// ```
    #[must_use]
    pub fn from_runtime(runtime: Option<&ConfigTree>, package: &PackageInfo) -> Self {
        let field = |key: &str| non_empty(runtime.and_then(|runtime| runtime.get(key)));
        Self {
            apihost: field("apihost").unwrap_or_else(|| DEFAULT_OW_APIHOST.to_string()),
            default_apihost: DEFAULT_OW_APIHOST.to_string(),
            apiversion: field("apiversion").unwrap_or_else(|| DEFAULT_OW_APIVERSION.to_string()),
            package: format!("{}-{}", package.name, package.version),
            namespace: field("namespace"),
            auth: field("auth"),
        }
    }
}

/// Static hosting of a component's web assets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Section {
    /// Where temporary storage credentials are cached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creds_cache_file: Option<String>,
    /// Storage folder, the runtime namespace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    /// Own storage credentials, when all three of `awsaccesskeyid`,
    /// `awssecretaccesskey` and `s3bucket` are configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creds: Option<S3Credentials>,
    /// A custom token vending machine URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tvm_url: Option<String>,
}

/// Storage credentials configured on a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Credentials {
    /// Access key id.
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
    /// Request parameters.
    pub params: S3Params,
}

/// Request parameters for [`S3Credentials`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct S3Params {
    /// Target bucket.
    #[serde(rename = "Bucket")]
    pub bucket: String,
}

/// A scalar as a string, with empty strings treated as unset.
fn non_empty(value: Option<&ConfigTree>) -> Option<String> {
    value.and_then(ConfigTree::scalar_string).filter(|value| !value.is_empty())
}

/// Builds the record for one component.
///
/// `prefix` is the component's key path in the merged tree (`application` or
/// `extensions.<name>`) and `fields` its configuration mapping.
pub(crate) fn build_component(
    name: &str,
    prefix: &KeyPath,
    fields: &Mapping,
    index: &ProvenanceIndex,
    ctx: &ProjectContext,
) -> ComponentConfig {
    let root = ctx.root_str();
    let resolve = |path: &str| absolutize(path, &ctx.root);

    // Default directories sit next to the file defining the component.
    let config_dir = fields
        .keys()
        .next()
        .and_then(|first| index.get(&prefix.child(first.clone())))
        .or_else(|| index.get(prefix))
        .map(|entry| entry.document.dir().to_string())
        .unwrap_or_default();
    let default_in_config_dir = |dir: &str| join(&config_dir, dir);

    let string_field = |key: &str| fields.get(key).and_then(ConfigTree::scalar_string);

    let actions = string_field("actions").unwrap_or_else(|| default_in_config_dir(DEFAULT_ACTIONS_DIR));
    let unit_test = string_field("unitTest").unwrap_or_else(|| default_in_config_dir(DEFAULT_UNIT_TEST_DIR));
    let e2e_test = string_field("e2eTest").unwrap_or_else(|| default_in_config_dir(DEFAULT_E2E_TEST_DIR));

    let web_field = fields.get("web");
    let web = match web_field {
        Some(ConfigTree::Scalar(_)) => web_field.and_then(ConfigTree::scalar_string),
        Some(web @ ConfigTree::Mapping(_)) => web.get("src").and_then(ConfigTree::scalar_string),
        _ => None,
    }
    .unwrap_or_else(|| default_in_config_dir(DEFAULT_WEB_DIR));
    let web = resolve(&web);

    let dist = match string_field("dist") {
        Some(dist) => resolve(&dist),
        None => resolve(&format!("{DEFAULT_DIST_DIR}{}", name.replace('/', "-"))),
    };

    let runtime_manifest = fields.get("runtimeManifest");
    let has_backend = runtime_manifest.is_some();
    let has_frontend = Path::new(&web).exists();

    let manifest = runtime_manifest.map(|full| {
        let package = full
            .get("packages")
            .and_then(|packages| packages.get(PACKAGE_PLACEHOLDER))
            .cloned();
        if package.is_some() {
            debug!("Use of {PACKAGE_PLACEHOLDER} in {MANIFEST_SRC} for {name}");
        }
        ManifestSection {
            src: MANIFEST_SRC.to_string(),
            full: full.clone(),
            package_placeholder: PACKAGE_PLACEHOLDER.to_string(),
            package,
        }
    });

    let web_section = WebSection {
        injected_config: has_frontend.then(|| join(&web, "src/config.json")),
        dist_dev: has_frontend.then(|| join(&dist, "web-dev")),
        dist_prod: has_frontend.then(|| join(&dist, "web-prod")),
        response_headers: web_field.and_then(|web| web.get("response-headers")).cloned(),
        src: web,
    };

    let s3 = if has_frontend {
        let field = |key: &str| non_empty(fields.get(key));
        let creds = match (field("awsaccesskeyid"), field("awssecretaccesskey"), field("s3bucket")) {
            (Some(access_key_id), Some(secret_access_key), Some(bucket)) => Some(S3Credentials {
                access_key_id,
                secret_access_key,
                params: S3Params { bucket },
            }),
            _ => None,
        };
        S3Section {
            creds_cache_file: Some(resolve(S3_CREDS_CACHE_FILE)),
            folder: ctx.ow.namespace.clone(),
            creds,
            tvm_url: field("tvmurl").filter(|url| url != DEFAULT_TVM_URL),
        }
    } else {
        S3Section::default()
    };

    let default_hostname = ctx.environment.default_hostname().to_string();
    let app = AppSection {
        name: ctx.package.name.clone(),
        version: ctx.package.version.clone(),
        has_backend,
        has_frontend,
        hostname: string_field("hostname").unwrap_or_else(|| default_hostname.clone()),
        default_hostname,
        html_cache_duration: string_field("htmlcacheduration")
            .unwrap_or_else(|| DEFAULT_HTML_CACHE_DURATION.to_string()),
        js_cache_duration: string_field("jscacheduration").unwrap_or_else(|| ABOUT_A_WEEK_IN_SECONDS.to_string()),
        css_cache_duration: string_field("csscacheduration")
            .unwrap_or_else(|| ABOUT_A_WEEK_IN_SECONDS.to_string()),
        image_cache_duration: string_field("imagecacheduration")
            .unwrap_or_else(|| ABOUT_A_WEEK_IN_SECONDS.to_string()),
        dist: dist.clone(),
    };

    ComponentConfig {
        name: name.to_string(),
        root,
        actions: ActionsSection {
            src: resolve(&actions),
            dist: has_backend.then(|| join(&dist, "actions")),
        },
        web: web_section,
        manifest,
        tests: TestsSection {
            unit: resolve(&unit_test),
            e2e: resolve(&e2e_test),
        },
        ow: ctx.ow.clone(),
        s3,
        hooks: fields.get("hooks").cloned().unwrap_or_else(ConfigTree::empty_mapping),
        events: fields.get("events").cloned(),
        operations: None,
        app,
    }
}

/// Builds an extension record; extensions must declare non-null `operations`.
pub(crate) fn build_extension(
    name: &str,
    prefix: &KeyPath,
    fields: &Mapping,
    index: &ProvenanceIndex,
    ctx: &ProjectContext,
) -> Result<ComponentConfig> {
    let operations = fields
        .get("operations")
        .filter(|operations| !operations.is_null())
        .cloned()
        .ok_or_else(|| Error::MissingComponentField {
            component: name.to_string(),
            field: "operations".to_string(),
        })?;
    let mut config = build_component(name, prefix, fields, index, ctx);
    config.operations = Some(operations);
    Ok(config)
}
