use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::source::{DocumentId, DocumentSource};
use crate::tree::ConfigTree;

/// Reads YAML documents from disk.
///
/// Relative document ids are resolved against `base_dir` (normally the
/// project directory the command runs in), so ids in the include index stay
/// relative while reads work from any working directory.
///
/// # Examples
///
/// ```no_run
/// use appconf::source::{DocumentId, DocumentSource, FsSource};
///
/// let source = FsSource::new("/path/to/project");
/// let tree = source.load(&DocumentId::new("app.config.yaml")).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct FsSource {
    base_dir: PathBuf,
}

impl FsSource {
    /// Creates a source rooted at `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// The directory relative ids are resolved against.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// The on-disk location of `document`.
    #[must_use]
    pub fn locate(&self, document: &DocumentId) -> PathBuf {
        self.base_dir.join(document.as_path())
    }

    /// Reads the document as text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DocumentRead`] if the file cannot be read.
    pub fn read_text(&self, document: &DocumentId) -> Result<String> {
        fs::read_to_string(self.locate(document)).map_err(|source| Error::DocumentRead {
            document: document.clone(),
            source,
        })
    }

    /// Reads and parses a JSON document (`package.json`, `.aio`). Returns
    /// `Ok(None)` when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DocumentRead`] if the file exists but cannot be read,
    /// and [`Error::JsonParse`] if it is not valid JSON.
    pub fn load_json(&self, document: &DocumentId) -> Result<Option<ConfigTree>> {
        let text = match fs::read_to_string(self.locate(document)) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(Error::DocumentRead {
                    document: document.clone(),
                    source,
                })
            }
        };
        let value: serde_json::Value = serde_json::from_str(&text).map_err(|source| Error::JsonParse {
            document: document.clone(),
            source,
        })?;
        Ok(Some(ConfigTree::from(value)))
    }
}

impl DocumentSource for FsSource {
    fn exists(&self, document: &DocumentId) -> bool {
        self.locate(document).is_file()
    }

    fn load(&self, document: &DocumentId) -> Result<ConfigTree> {
        let text = self.read_text(document)?;
        log::debug!("read {} ({} bytes)", document, text.len());
        ConfigTree::from_yaml_str(&text).map_err(|source| Error::DocumentParse {
            document: document.clone(),
            source,
        })
    }
}
