//! Error types for the appconf library.
//!
//! This module provides the error hierarchy for every stage of configuration
//! resolution, using `thiserror` for ergonomic error handling. All errors are
//! fatal: a failing stage aborts the whole load and no partial tree is returned.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::schema::SchemaViolation;
use crate::source::DocumentId;

/// Result type alias for operations that may fail with an appconf error.
///
/// # Examples
///
/// ```
/// use appconf::{Error, Result};
///
/// fn example_operation() -> Result<usize> {
///     Ok(3)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the appconf library.
#[derive(Debug, Error)]
pub enum Error {
    /// An `$include` target already appears in its own ancestry chain.
    #[error(
        "detected '$include' cycle: '{}', please make sure that your configuration has no cycles",
        IncludeChain(chain)
    )]
    IncludeCycle {
        /// The full inclusion chain, ending with the repeated document.
        chain: Vec<DocumentId>,
    },

    /// An `$include` target does not exist.
    #[error("'$include: {document}' cannot be resolved, please make sure the file exists")]
    MissingInclude {
        /// The resolved document that could not be found.
        document: DocumentId,
    },

    /// An `$include` target parsed to a scalar or a sequence.
    #[error(
        "'$include: {document}' does not resolve to an object. Including an array or primitive type config is not supported"
    )]
    InvalidIncludeTarget {
        /// The document that is not mapping-rooted.
        document: DocumentId,
    },

    /// The merged configuration does not satisfy the schema.
    #[error("Missing or invalid keys in app.config.yaml: {}", Violations(violations))]
    SchemaValidation {
        /// Every violation found, not just the first.
        violations: Vec<SchemaViolation>,
    },

    /// A component lacks a field required for projection.
    #[error("missing '{field}' config field for extension point {component}")]
    MissingComponentField {
        /// The component name (e.g. `dx/excshell/1`).
        component: String,
        /// The missing field.
        field: String,
    },

    /// Neither an application nor any extension was configured.
    #[error(
        "couldn't find configuration in '{}', make sure to add at least one extension or a standalone app",
        dir.display()
    )]
    NoImplementation {
        /// The project directory that was searched.
        dir: PathBuf,
    },

    /// A document could not be read.
    #[error("failed to read '{document}': {source}")]
    DocumentRead {
        /// The document being read.
        document: DocumentId,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A document is not valid YAML.
    #[error("invalid YAML in '{document}': {source}")]
    DocumentParse {
        /// The document being parsed.
        document: DocumentId,
        /// The underlying parse error.
        #[source]
        source: serde_yaml::Error,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON document (`package.json`, `.aio`) could not be parsed.
    #[error("invalid JSON in '{document}': {source}")]
    JsonParse {
        /// The document being parsed.
        document: DocumentId,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// An option or environment value failed validation.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// An internal invariant was violated. This indicates a bug, not bad input.
    #[error("internal error: {details}")]
    Internal {
        /// What went wrong.
        details: String,
    },
}

impl Error {
    /// Check if the error comes from `$include` resolution.
    ///
    /// # Examples
    ///
    /// ```
    /// use appconf::Error;
    /// use appconf::source::DocumentId;
    ///
    /// let err = Error::MissingInclude { document: DocumentId::new("b.yaml") };
    /// assert!(err.is_include_error());
    /// ```
    #[must_use]
    pub fn is_include_error(&self) -> bool {
        matches!(
            self,
            Self::IncludeCycle { .. } | Self::MissingInclude { .. } | Self::InvalidIncludeTarget { .. }
        )
    }

    /// Check if the error is a schema or component validation failure.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::SchemaValidation { .. } | Self::MissingComponentField { .. }
        )
    }
}

struct IncludeChain<'a>(&'a [DocumentId]);

impl fmt::Display for IncludeChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, doc) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{doc}")?;
        }
        Ok(())
    }
}

struct Violations<'a>(&'a [SchemaViolation]);

impl fmt::Display for Violations<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}
