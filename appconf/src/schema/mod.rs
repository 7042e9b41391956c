//! Structural validation of the merged configuration.
//!
//! Validation runs after includes are resolved and legacy settings merged, so
//! violations refer to merged key paths. All violations are collected before
//! failing; a user fixing their configuration sees every problem at once.

mod builtin;

pub use builtin::BuiltinSchema;

use std::fmt;

use log::debug;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::tree::{ConfigTree, KeyPath};

/// One way in which a tree fails the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaViolation {
    /// Where the violation is, in the merged tree.
    pub path: KeyPath,
    /// What is wrong.
    pub message: String,
}

impl SchemaViolation {
    /// Creates a violation.
    pub fn new(path: KeyPath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "(root) {}", self.message)
        } else {
            write!(f, "'{}' {}", self.path, self.message)
        }
    }
}

/// Checks a configuration tree against a schema.
pub trait SchemaValidator {
    /// Every violation found in `tree`; empty when the tree is valid.
    fn validate(&self, tree: &ConfigTree) -> Vec<SchemaViolation>;
}

/// Validates `tree`, failing with all violations.
///
/// # Errors
///
/// Returns [`Error::SchemaValidation`] listing every violation.
///
/// # Examples
///
/// ```
/// use appconf::schema::{validate_tree, BuiltinSchema};
/// use appconf::tree::ConfigTree;
///
/// let good = ConfigTree::from_yaml_str("application:\n  actions: actions\n").unwrap();
/// assert!(validate_tree(&BuiltinSchema, &good).is_ok());
///
/// let bad = ConfigTree::from_yaml_str("applications: {}\n").unwrap();
/// let err = validate_tree(&BuiltinSchema, &bad).unwrap_err();
/// assert!(err.to_string().starts_with("Missing or invalid keys in app.config.yaml"));
/// ```
pub fn validate_tree(validator: &dyn SchemaValidator, tree: &ConfigTree) -> Result<()> {
    let violations = validator.validate(tree);
    if violations.is_empty() {
        debug!("Configuration passed schema validation");
        Ok(())
    } else {
        debug!("Configuration failed schema validation with {} violations", violations.len());
        Err(Error::SchemaValidation { violations })
    }
}
