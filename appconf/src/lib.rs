#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # appconf
//!
//! A library for resolving multi-component application configuration.
//!
//! A project describes its standalone application and its extensions in
//! `app.config.yaml`. Any mapping in that file may delegate to another file
//! with an `$include` directive. This library resolves those directives into
//! one merged tree, remembers which file every key came from, rewrites path
//! fields so they stay valid after the move, folds in legacy settings and
//! projects the result into per-component records.
//!
//! ## Core Types
//!
//! - [`IncludeResolver`] and [`Resolved`]: `$include` resolution
//! - [`ProvenanceIndex`]: where every merged key was defined
//! - [`PathRewriter`]: relative path fields after splicing
//! - [`LoadOptions`] and [`LoadedConfig`]: the full load pipeline
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use appconf::{DocumentId, IncludeResolver, MemorySource};
//!
//! let source = MemorySource::new()
//!     .with("app.config.yaml", "extensions:\n  $include: ext.yaml\n")
//!     .with("ext.yaml", "dx/excshell/1:\n  actions: actions\n");
//!
//! let resolved = IncludeResolver::new(&source)
//!     .resolve(&DocumentId::new("app.config.yaml"))
//!     .unwrap();
//!
//! let entry = resolved.index.get_dotted("extensions.dx/excshell/1").unwrap();
//! assert_eq!(entry.document.as_str(), "ext.yaml");
//! ```

pub mod error;
pub mod include;
pub mod legacy;
pub mod loader;
pub mod logging;
pub mod options;
pub mod paths;
pub mod project;
pub mod provenance;
pub mod schema;
pub mod source;
pub mod tree;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};
pub use include::{IncludeResolver, Resolved, INCLUDE_DIRECTIVE};
pub use loader::{coalesce, load, LoadedConfig, APP_CONFIG_FILE};
pub use logging::{init_logger, LogLevel, Logger};
pub use options::{CliEnvironment, LoadOptions, LoadOptionsBuilder};
pub use paths::PathRewriter;
pub use project::{ComponentConfig, PackageInfo};
pub use provenance::{ProvenanceEntry, ProvenanceIndex};
pub use schema::{BuiltinSchema, SchemaValidator, SchemaViolation};
pub use source::{DocumentId, DocumentSource, FsSource, MemorySource};
pub use tree::{ConfigTree, KeyPath};
