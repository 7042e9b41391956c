use crate::schema::{SchemaValidator, SchemaViolation};
use crate::tree::{ConfigTree, KeyPath, Mapping, Scalar};

const ROOT_KEYS: &[&str] = &["application", "extensions", "configSchema", "productDependencies"];

const COMPONENT_KEYS: &[&str] = &[
    "runtimeManifest",
    "actions",
    "web",
    "unitTest",
    "e2eTest",
    "dist",
    "htmlcacheduration",
    "jscacheduration",
    "csscacheduration",
    "imagecacheduration",
    "tvmurl",
    "awsaccesskeyid",
    "awssecretaccesskey",
    "s3bucket",
    "hostname",
    "hooks",
    "events",
];

const STRING_KEYS: &[&str] = &[
    "actions",
    "unitTest",
    "e2eTest",
    "dist",
    "tvmurl",
    "awsaccesskeyid",
    "awssecretaccesskey",
    "s3bucket",
    "hostname",
];

const CACHE_DURATION_KEYS: &[&str] = &[
    "htmlcacheduration",
    "jscacheduration",
    "csscacheduration",
    "imagecacheduration",
];

const CONFIG_SCHEMA_KEYS: &[&str] = &["title", "description", "properties"];
const CONFIG_PROPERTY_KEYS: &[&str] = &["envKey", "type", "title", "description", "default", "secret", "enum"];
const CONFIG_PROPERTY_TYPES: &[&str] = &["string", "secret", "boolean", "number"];
const PRODUCT_DEPENDENCY_KEYS: &[&str] = &["code", "minVersion", "maxVersion"];

/// The structural rules of `app.config.yaml`.
///
/// Covers the top-level layout, the fields of the application and of each
/// extension, `configSchema` and `productDependencies`. Messages follow the
/// wording of JSON schema validators.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinSchema;

impl SchemaValidator for BuiltinSchema {
    fn validate(&self, tree: &ConfigTree) -> Vec<SchemaViolation> {
        let mut checker = Checker::default();
        checker.root(tree);
        checker.violations
    }
}

#[derive(Default)]
struct Checker {
    violations: Vec<SchemaViolation>,
}

impl Checker {
    fn fail(&mut self, path: &KeyPath, message: impl Into<String>) {
        self.violations.push(SchemaViolation::new(path.clone(), message));
    }

    fn mapping<'t>(&mut self, path: &KeyPath, node: &'t ConfigTree) -> Option<&'t Mapping> {
        let map = node.as_mapping();
        if map.is_none() {
            self.fail(path, "must be object");
        }
        map
    }

    fn sequence<'t>(&mut self, path: &KeyPath, node: &'t ConfigTree) -> Option<&'t [ConfigTree]> {
        let items = node.as_sequence();
        if items.is_none() {
            self.fail(path, "must be array");
        }
        items
    }

    fn string(&mut self, path: &KeyPath, node: &ConfigTree) {
        if node.as_str().is_none() {
            self.fail(path, "must be string");
        }
    }

    fn allowed(&mut self, path: &KeyPath, map: &Mapping, allowed: &[&str]) {
        for key in map.keys() {
            if !allowed.contains(&key.as_str()) {
                self.fail(path, format!("must NOT have additional properties ('{key}')"));
            }
        }
    }

    fn required(&mut self, path: &KeyPath, map: &Mapping, required: &[&str]) {
        for key in required {
            if !map.contains_key(*key) {
                self.fail(path, format!("must have required property '{key}'"));
            }
        }
    }

    fn root(&mut self, tree: &ConfigTree) {
        let path = KeyPath::root();
        let Some(root) = self.mapping(&path, tree) else {
            return;
        };
        self.allowed(&path, root, ROOT_KEYS);

        if let Some(app) = root.get("application") {
            self.component(&path.child("application"), app, false);
        }
        if let Some(extensions) = root.get("extensions") {
            let ext_path = path.child("extensions");
            if let Some(extensions) = self.mapping(&ext_path, extensions) {
                for (name, ext) in extensions {
                    self.component(&ext_path.child(name.clone()), ext, true);
                }
            }
        }
        if let Some(schema) = root.get("configSchema") {
            self.config_schema(&path.child("configSchema"), schema);
        }
        if let Some(deps) = root.get("productDependencies") {
            self.product_dependencies(&path.child("productDependencies"), deps);
        }
    }

    fn component(&mut self, path: &KeyPath, node: &ConfigTree, extension: bool) {
        let Some(map) = self.mapping(path, node) else {
            return;
        };

        for key in map.keys() {
            let known = COMPONENT_KEYS.contains(&key.as_str()) || (extension && key == "operations");
            if !known {
                self.fail(path, format!("must NOT have additional properties ('{key}')"));
            }
        }

        for (key, value) in map {
            let field = path.child(key.clone());
            match key.as_str() {
                k if STRING_KEYS.contains(&k) => self.string(&field, value),
                k if CACHE_DURATION_KEYS.contains(&k) => {
                    if !matches!(value, ConfigTree::Scalar(Scalar::String(_) | Scalar::Number(_))) {
                        self.fail(&field, "must be string or number");
                    }
                }
                "web" => self.web(&field, value),
                "runtimeManifest" => self.runtime_manifest(&field, value),
                "hooks" => self.hooks(&field, value),
                "events" => {
                    self.mapping(&field, value);
                }
                "operations" if extension => self.operations(&field, value),
                _ => {}
            }
        }

        if extension {
            self.required(path, map, &["operations"]);
        }
    }

    fn web(&mut self, path: &KeyPath, node: &ConfigTree) {
        match node {
            ConfigTree::Scalar(Scalar::String(_)) => {}
            ConfigTree::Mapping(map) => {
                self.allowed(path, map, &["src", "response-headers"]);
                if let Some(src) = map.get("src") {
                    self.string(&path.child("src"), src);
                }
                if let Some(headers) = map.get("response-headers") {
                    self.mapping(&path.child("response-headers"), headers);
                }
            }
            _ => self.fail(path, "must be string or object"),
        }
    }

    fn runtime_manifest(&mut self, path: &KeyPath, node: &ConfigTree) {
        let Some(map) = self.mapping(path, node) else {
            return;
        };
        self.required(path, map, &["packages"]);
        if let Some(packages) = map.get("packages") {
            self.mapping(&path.child("packages"), packages);
        }
    }

    fn hooks(&mut self, path: &KeyPath, node: &ConfigTree) {
        let Some(map) = self.mapping(path, node) else {
            return;
        };
        for (name, script) in map {
            if !matches!(script, ConfigTree::Scalar(Scalar::String(_) | Scalar::Null)) {
                self.fail(&path.child(name.clone()), "must be string");
            }
        }
    }

    fn operations(&mut self, path: &KeyPath, node: &ConfigTree) {
        let Some(map) = self.mapping(path, node) else {
            return;
        };
        if map.is_empty() {
            self.fail(path, "must NOT have fewer than 1 properties");
        }
        for (name, entries) in map {
            let op_path = path.child(name.clone());
            let Some(items) = self.sequence(&op_path, entries) else {
                continue;
            };
            if items.is_empty() {
                self.fail(&op_path, "must NOT have fewer than 1 items");
            }
            for (i, item) in items.iter().enumerate() {
                self.mapping(&op_path.child(i.to_string()), item);
            }
        }
    }

    fn config_schema(&mut self, path: &KeyPath, node: &ConfigTree) {
        let Some(map) = self.mapping(path, node) else {
            return;
        };
        self.allowed(path, map, CONFIG_SCHEMA_KEYS);
        self.required(path, map, &["properties"]);

        let Some(properties) = map.get("properties") else {
            return;
        };
        let props_path = path.child("properties");
        let Some(items) = self.sequence(&props_path, properties) else {
            return;
        };
        for (i, item) in items.iter().enumerate() {
            let item_path = props_path.child(i.to_string());
            let Some(property) = self.mapping(&item_path, item) else {
                continue;
            };
            self.allowed(&item_path, property, CONFIG_PROPERTY_KEYS);
            self.required(&item_path, property, &["envKey", "type"]);
            if let Some(env_key) = property.get("envKey") {
                self.string(&item_path.child("envKey"), env_key);
            }
            if let Some(kind) = property.get("type") {
                let allowed = kind.as_str().is_some_and(|k| CONFIG_PROPERTY_TYPES.contains(&k));
                if !allowed {
                    self.fail(&item_path.child("type"), "must be equal to one of the allowed values");
                }
            }
        }
    }

    fn product_dependencies(&mut self, path: &KeyPath, node: &ConfigTree) {
        let Some(items) = self.sequence(path, node) else {
            return;
        };
        for (i, item) in items.iter().enumerate() {
            let item_path = path.child(i.to_string());
            let Some(dependency) = self.mapping(&item_path, item) else {
                continue;
            };
            self.allowed(&item_path, dependency, PRODUCT_DEPENDENCY_KEYS);
            self.required(&item_path, dependency, PRODUCT_DEPENDENCY_KEYS);
            for key in PRODUCT_DEPENDENCY_KEYS {
                if let Some(value) = dependency.get(*key) {
                    self.string(&item_path.child(*key), value);
                }
            }
        }
    }
}
