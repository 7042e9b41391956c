//! Untyped configuration trees.
//!
//! Every parsed document and every merged composite is a [`ConfigTree`]: a
//! tagged union of mappings, sequences and scalars. Traversal code dispatches
//! on the tag explicitly rather than inspecting values at runtime.
//!
//! Mappings preserve document order, which keeps resolution output stable and
//! lets the projection stage find "the first key" of a component.
//!
//! # Examples
//!
//! ```
//! use appconf::tree::{ConfigTree, KeyPath};
//!
//! let tree = ConfigTree::from_yaml_str("application:\n  actions: ./actions\n").unwrap();
//! let actions = tree.get_path(&KeyPath::from(["application", "actions"])).unwrap();
//! assert_eq!(actions.as_str(), Some("./actions"));
//! ```

mod key_path;

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

pub use key_path::KeyPath;

/// Order-preserving mapping from string keys to subtrees.
pub type Mapping = IndexMap<String, ConfigTree>;

/// A recursively nested configuration value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigTree {
    /// A mapping from string keys to subtrees.
    Mapping(Mapping),
    /// An ordered sequence of subtrees.
    Sequence(Vec<ConfigTree>),
    /// A leaf value.
    Scalar(Scalar),
}

/// A leaf value in a [`ConfigTree`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    /// An explicit null (`~` or `null` in YAML).
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer or floating point number.
    Number(serde_yaml::Number),
    /// A string.
    String(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl ConfigTree {
    /// An empty mapping.
    #[must_use]
    pub fn empty_mapping() -> Self {
        Self::Mapping(Mapping::new())
    }

    /// A string leaf.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::Scalar(Scalar::String(value.into()))
    }

    /// Parse a YAML document. An empty document parses to a null scalar.
    ///
    /// # Errors
    ///
    /// Returns the parser error if `text` is not valid YAML.
    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str::<serde_yaml::Value>(text).map(Self::from)
    }

    /// Whether this node is a mapping.
    #[must_use]
    pub fn is_mapping(&self) -> bool {
        matches!(self, Self::Mapping(_))
    }

    /// Whether this node has children (mapping or sequence).
    #[must_use]
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Mapping(_) | Self::Sequence(_))
    }

    /// Whether this node is an explicit null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Scalar(Scalar::Null))
    }

    /// The mapping, if this node is one.
    #[must_use]
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// The mapping, mutably, if this node is one.
    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// The sequence, if this node is one.
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[ConfigTree]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// The string value, if this node is a string leaf.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    /// The string form of a leaf: strings as is, other scalars via `Display`.
    #[must_use]
    pub fn scalar_string(&self) -> Option<String> {
        match self {
            Self::Scalar(Scalar::Null) | Self::Mapping(_) | Self::Sequence(_) => None,
            Self::Scalar(scalar) => Some(scalar.to_string()),
        }
    }

    /// Direct child by key (mappings) or decimal index (sequences).
    #[must_use]
    pub fn child(&self, segment: &str) -> Option<&ConfigTree> {
        match self {
            Self::Mapping(map) => map.get(segment),
            Self::Sequence(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            Self::Scalar(_) => None,
        }
    }

    /// Direct child, mutably.
    pub fn child_mut(&mut self, segment: &str) -> Option<&mut ConfigTree> {
        match self {
            Self::Mapping(map) => map.get_mut(segment),
            Self::Sequence(items) => segment
                .parse::<usize>()
                .ok()
                .and_then(move |i| items.get_mut(i)),
            Self::Scalar(_) => None,
        }
    }

    /// Shorthand for [`child`](Self::child) on mappings.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ConfigTree> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// The node at `path`, if it exists.
    #[must_use]
    pub fn get_path(&self, path: &KeyPath) -> Option<&ConfigTree> {
        path.segments()
            .iter()
            .try_fold(self, |node, segment| node.child(segment))
    }

    /// The node at `path`, mutably.
    pub fn get_path_mut(&mut self, path: &KeyPath) -> Option<&mut ConfigTree> {
        let mut node = self;
        for segment in path.segments() {
            node = node.child_mut(segment)?;
        }
        Some(node)
    }

    /// Keys of the direct children: mapping keys in order, or sequence indices.
    #[must_use]
    pub fn child_keys(&self) -> Vec<String> {
        match self {
            Self::Mapping(map) => map.keys().cloned().collect(),
            Self::Sequence(items) => (0..items.len()).map(|i| i.to_string()).collect(),
            Self::Scalar(_) => Vec::new(),
        }
    }

    /// Every node below this one (excluding itself) with its relative path,
    /// in pre-order.
    #[must_use]
    pub fn descendants(&self) -> Vec<(KeyPath, &ConfigTree)> {
        let mut out = Vec::new();
        let mut stack: Vec<(KeyPath, &ConfigTree)> = vec![(KeyPath::root(), self)];
        while let Some((path, node)) = stack.pop() {
            if !path.is_root() {
                out.push((path.clone(), node));
            }
            let keys = node.child_keys();
            for key in keys.into_iter().rev() {
                if let Some(child) = node.child(&key) {
                    stack.push((path.child(key), child));
                }
            }
        }
        out
    }
}

impl Default for ConfigTree {
    fn default() -> Self {
        Self::empty_mapping()
    }
}

impl From<serde_yaml::Value> for ConfigTree {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value;

        match value {
            Value::Null => Self::Scalar(Scalar::Null),
            Value::Bool(b) => Self::Scalar(Scalar::Bool(b)),
            Value::Number(n) => Self::Scalar(Scalar::Number(n)),
            Value::String(s) => Self::Scalar(Scalar::String(s)),
            Value::Sequence(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Value::Mapping(map) => Self::Mapping(
                map.into_iter()
                    .map(|(k, v)| (yaml_key_to_string(k), Self::from(v)))
                    .collect(),
            ),
            Value::Tagged(tagged) => Self::from(tagged.value),
        }
    }
}

impl From<serde_json::Value> for ConfigTree {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Self::Scalar(Scalar::Null),
            Value::Bool(b) => Self::Scalar(Scalar::Bool(b)),
            Value::Number(n) => Self::Scalar(Scalar::Number(json_number(&n))),
            Value::String(s) => Self::Scalar(Scalar::String(s)),
            Value::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Mapping(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

fn yaml_key_to_string(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => "null".to_string(),
        serde_yaml::Value::Tagged(tagged) => yaml_key_to_string(tagged.value),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

fn json_number(n: &serde_json::Number) -> serde_yaml::Number {
    if let Some(i) = n.as_i64() {
        serde_yaml::Number::from(i)
    } else if let Some(u) = n.as_u64() {
        serde_yaml::Number::from(u)
    } else {
        serde_yaml::Number::from(n.as_f64().unwrap_or(f64::NAN))
    }
}
