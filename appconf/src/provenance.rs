//! Provenance tracking for merged configuration trees.
//!
//! After resolution every key path in the merged tree, containers included,
//! maps to the document that defined it and the key path inside that
//! document. Downstream stages use it to resolve relative paths against the
//! right directory and to report where a value came from.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::source::DocumentId;
use crate::tree::KeyPath;

/// Where a merged value was defined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvenanceEntry {
    /// The defining document.
    #[serde(rename = "file")]
    pub document: DocumentId,
    /// The key path inside the defining document.
    pub key: KeyPath,
}

impl ProvenanceEntry {
    /// Creates an entry.
    pub fn new(document: DocumentId, key: impl Into<KeyPath>) -> Self {
        Self {
            document,
            key: key.into(),
        }
    }
}

/// Mapping from merged key paths to their [`ProvenanceEntry`].
///
/// # Examples
///
/// ```
/// use appconf::provenance::{ProvenanceEntry, ProvenanceIndex};
/// use appconf::source::DocumentId;
/// use appconf::tree::KeyPath;
///
/// let mut index = ProvenanceIndex::new();
/// index.record(
///     KeyPath::from(["extensions", "dx/excshell/1", "actions"]),
///     ProvenanceEntry::new(DocumentId::new("src/ext.config.yaml"), ["actions"]),
/// );
///
/// let entry = index.get_dotted("extensions.dx/excshell/1.actions").unwrap();
/// assert_eq!(entry.document.as_str(), "src/ext.config.yaml");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvenanceIndex {
    entries: BTreeMap<KeyPath, ProvenanceEntry>,
}

impl ProvenanceIndex {
    /// An empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records (or replaces) the entry for `path`.
    pub fn record(&mut self, path: KeyPath, entry: ProvenanceEntry) {
        self.entries.insert(path, entry);
    }

    /// Drops the entry for `path`.
    pub fn remove(&mut self, path: &KeyPath) -> Option<ProvenanceEntry> {
        self.entries.remove(path)
    }

    /// Drops `prefix` and every entry below it.
    pub fn remove_subtree(&mut self, prefix: &KeyPath) {
        self.entries.retain(|path, _| !path.starts_with(prefix));
    }

    /// The entry for `path`.
    #[must_use]
    pub fn get(&self, path: &KeyPath) -> Option<&ProvenanceEntry> {
        self.entries.get(path)
    }

    /// The entry whose path displays as `dotted`.
    ///
    /// Matches on the dotted form, so a key containing `.` is found by its
    /// joined spelling.
    #[must_use]
    pub fn get_dotted(&self, dotted: &str) -> Option<&ProvenanceEntry> {
        self.entries.get(&KeyPath::from_dotted(dotted)).or_else(|| {
            self.entries
                .iter()
                .find(|(path, _)| path.to_string() == dotted)
                .map(|(_, entry)| entry)
        })
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key path order.
    pub fn iter(&self) -> impl Iterator<Item = (&KeyPath, &ProvenanceEntry)> {
        self.entries.iter()
    }

    /// Copies every entry of `other` into this index; `other` wins on collision.
    pub fn overlay(&mut self, other: &ProvenanceIndex) {
        for (path, entry) in &other.entries {
            self.entries.insert(path.clone(), entry.clone());
        }
    }

    /// The external form: dotted key path to `{ file, key }`.
    ///
    /// Segment names containing `.` make this form lossy, and two paths may
    /// collapse onto one dotted key. The later path in key order wins.
    #[must_use]
    pub fn to_dotted(&self) -> BTreeMap<String, DottedEntry> {
        self.entries
            .iter()
            .map(|(path, entry)| {
                (
                    path.to_string(),
                    DottedEntry {
                        file: entry.document.to_string(),
                        key: entry.key.to_string(),
                    },
                )
            })
            .collect()
    }
}

/// One entry of [`ProvenanceIndex::to_dotted`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DottedEntry {
    /// The defining document.
    pub file: String,
    /// The dotted key path inside it.
    pub key: String,
}

impl Serialize for ProvenanceIndex {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_dotted().serialize(serializer)
    }
}
