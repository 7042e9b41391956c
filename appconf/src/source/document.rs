//! Document identity.

use std::fmt;
use std::path::Path;

use serde::{Serialize, Serializer};

use crate::paths::normalize::{join, lexical_normalize, parent_dir};

/// Identifies one physical configuration document by its normalized,
/// forward-slash path.
///
/// Ids keep the form in which the document was reached: relative to the
/// working directory unless the root was given as an absolute path. Two ids
/// are the same document exactly when their normalized paths are equal.
///
/// # Examples
///
/// ```
/// use appconf::source::DocumentId;
///
/// let root = DocumentId::new("app.config.yaml");
/// let ext = root.resolve_include("src/dx-excshell-1/./ext.config.yaml");
/// assert_eq!(ext.as_str(), "src/dx-excshell-1/ext.config.yaml");
/// assert_eq!(ext.dir(), "src/dx-excshell-1");
///
/// let back = ext.resolve_include("../../app.config.yaml");
/// assert_eq!(back, root);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(String);

impl DocumentId {
    /// Creates an id from a path, normalizing separators and dot segments.
    #[must_use]
    pub fn new(path: impl AsRef<str>) -> Self {
        Self(lexical_normalize(path.as_ref()))
    }

    /// Creates an id from a filesystem path.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        Self::new(path.to_string_lossy())
    }

    /// The normalized path string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The directory containing this document (`""` for the working directory).
    #[must_use]
    pub fn dir(&self) -> &str {
        parent_dir(&self.0)
    }

    /// Resolves an `$include` value against this document's directory.
    #[must_use]
    pub fn resolve_include(&self, relative: &str) -> Self {
        Self(join(self.dir(), relative))
    }

    /// The id as a filesystem path.
    #[must_use]
    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for DocumentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}
