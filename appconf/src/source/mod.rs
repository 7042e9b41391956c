//! Where configuration documents come from.
//!
//! The resolver never touches the filesystem directly. It asks a
//! [`DocumentSource`] whether a document exists and for its parsed tree, which
//! keeps the traversal testable against in-memory documents and mocks.
//!
//! # Examples
//!
//! ```
//! use appconf::source::{DocumentId, DocumentSource, MemorySource};
//!
//! let source = MemorySource::new().with("app.config.yaml", "application:\n  actions: actions\n");
//! let id = DocumentId::new("app.config.yaml");
//! assert!(source.exists(&id));
//! assert!(source.load(&id).unwrap().is_mapping());
//! ```

mod document;
mod fs;
mod memory;

pub use document::DocumentId;
pub use fs::FsSource;
pub use memory::MemorySource;

use crate::error::Result;
use crate::tree::ConfigTree;

/// Loads parsed configuration documents by id.
#[cfg_attr(test, mockall::automock)]
pub trait DocumentSource {
    /// Whether the document exists.
    fn exists(&self, document: &DocumentId) -> bool;

    /// Reads and parses the document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read or is not valid YAML.
    fn load(&self, document: &DocumentId) -> Result<ConfigTree>;
}
