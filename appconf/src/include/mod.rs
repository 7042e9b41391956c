//! `$include` resolution.
//!
//! A configuration document may delegate any mapping to another document by
//! writing `$include: <relative path>` inside it. The resolver walks the root
//! document with an explicit work list, splices every included document into
//! the mapping that referenced it and records the provenance of every key it
//! visits.
//!
//! Keys authored next to the directive win over keys of the included
//! document. Only the top level of the included document is subject to this
//! check; nested mappings are not deep-merged.
//!
//! # Examples
//!
//! ```
//! use appconf::include::IncludeResolver;
//! use appconf::source::{DocumentId, MemorySource};
//!
//! let source = MemorySource::new()
//!     .with("app.config.yaml", "application:\n  $include: src/app.yaml\n  actions: local\n")
//!     .with("src/app.yaml", "actions: included\nweb: web-src\n");
//!
//! let resolved = IncludeResolver::new(&source)
//!     .resolve(&DocumentId::new("app.config.yaml"))
//!     .unwrap();
//!
//! let app = resolved.tree.get("application").unwrap();
//! assert_eq!(app.get("actions").and_then(|v| v.as_str()), Some("local"));
//! assert_eq!(app.get("web").and_then(|v| v.as_str()), Some("web-src"));
//!
//! let web = resolved.index.get_dotted("application.web").unwrap();
//! assert_eq!(web.document.as_str(), "src/app.yaml");
//! ```

mod resolver;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

pub use resolver::IncludeResolver;

use crate::provenance::ProvenanceIndex;
use crate::tree::ConfigTree;

/// The reserved key that marks an inclusion directive.
pub const INCLUDE_DIRECTIVE: &str = "$include";

/// A merged tree together with its provenance index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolved {
    /// The merged configuration.
    pub tree: ConfigTree,
    /// Provenance of every key path in `tree`.
    pub index: ProvenanceIndex,
}

impl Resolved {
    /// An empty mapping with an empty index.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}
