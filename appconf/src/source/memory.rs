use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::source::{DocumentId, DocumentSource};
use crate::tree::ConfigTree;

/// In-memory documents keyed by id, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: HashMap<DocumentId, String>,
}

impl MemorySource {
    /// An empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document.
    #[must_use]
    pub fn with(mut self, id: impl AsRef<str>, text: impl Into<String>) -> Self {
        self.insert(id, text);
        self
    }

    /// Adds or replaces a document.
    pub fn insert(&mut self, id: impl AsRef<str>, text: impl Into<String>) {
        self.documents.insert(DocumentId::new(id), text.into());
    }
}

impl DocumentSource for MemorySource {
    fn exists(&self, document: &DocumentId) -> bool {
        self.documents.contains_key(document)
    }

    fn load(&self, document: &DocumentId) -> Result<ConfigTree> {
        let text = self
            .documents
            .get(document)
            .ok_or_else(|| Error::MissingInclude {
                document: document.clone(),
            })?;
        ConfigTree::from_yaml_str(text).map_err(|source| Error::DocumentParse {
            document: document.clone(),
            source,
        })
    }
}
