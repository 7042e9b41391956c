//! Key paths into a [`ConfigTree`](super::ConfigTree).

use std::fmt;

use serde::{Serialize, Serializer};

/// An ordered sequence of segments locating a node in a configuration tree.
///
/// Sequence elements are addressed by their decimal index (`"0"`, `"1"`, ...).
/// Paths are kept as segment vectors internally; the dotted form produced by
/// [`Display`](fmt::Display) is only used at the external boundary and is lossy
/// for segments that themselves contain a `.`.
///
/// # Examples
///
/// ```
/// use appconf::tree::KeyPath;
///
/// let path = KeyPath::from(["extensions", "dx/excshell/1", "actions"]);
/// assert_eq!(path.to_string(), "extensions.dx/excshell/1.actions");
/// assert_eq!(path.len(), 3);
/// assert_eq!(path.last(), Some("actions"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    /// The empty path, addressing the root of a tree.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Parse a dotted path. The empty string is the root path.
    ///
    /// # Examples
    ///
    /// ```
    /// use appconf::tree::KeyPath;
    ///
    /// assert!(KeyPath::from_dotted("").is_root());
    /// assert_eq!(KeyPath::from_dotted("a.b").segments(), ["a", "b"]);
    /// ```
    #[must_use]
    pub fn from_dotted(dotted: &str) -> Self {
        if dotted.is_empty() {
            return Self::root();
        }
        Self(dotted.split('.').map(str::to_string).collect())
    }

    /// Returns a new path with `segment` appended.
    #[must_use]
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    /// Returns a new path with `other`'s segments appended.
    #[must_use]
    pub fn join(&self, other: &KeyPath) -> Self {
        let mut segments = self.0.clone();
        segments.extend(other.0.iter().cloned());
        Self(segments)
    }

    /// Returns the parent path, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.0
            .split_last()
            .map(|(_, rest)| Self(rest.to_vec()))
    }

    /// Appends a segment in place.
    pub fn push(&mut self, segment: impl Into<String>) {
        self.0.push(segment.into());
    }

    /// The path's segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// The final segment.
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether this is the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `prefix` is a (non-strict) prefix of this path.
    #[must_use]
    pub fn starts_with(&self, prefix: &KeyPath) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

impl Serialize for KeyPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for KeyPath {
    fn from(segments: [S; N]) -> Self {
        Self(segments.into_iter().map(Into::into).collect())
    }
}

impl From<Vec<String>> for KeyPath {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}
