//! Filesystem hand-off between pipeline stages.
//!
//! One directory holds every intermediate file. Stages write into it, later
//! stages read from it, and the run summary lands in its `runs/` folder.
//! Concurrent runs against the same root are not isolated.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub const PRODUCT_RECORD_FILE: &str = "product.json";
pub const PRODUCT_IMAGE_FILE: &str = "generated_image.png";
pub const MOCKUP_RECORD_FILE: &str = "mockup.json";
pub const MOCKUP_IMAGE_FILE: &str = "mockup.png";
pub const TEMPLATE_IMAGE_FILE: &str = "template.png";
pub const RUNS_DIR: &str = "runs";

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("expected artifact is missing: {path}")]
    Missing { path: String },

    #[error("I/O error on artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("artifact {path} is not valid JSON for its record type: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Directory-backed store for stage artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    #[must_use]
    pub fn product_record_path(&self) -> PathBuf {
        self.path(PRODUCT_RECORD_FILE)
    }

    #[must_use]
    pub fn product_image_path(&self) -> PathBuf {
        self.path(PRODUCT_IMAGE_FILE)
    }

    #[must_use]
    pub fn mockup_record_path(&self) -> PathBuf {
        self.path(MOCKUP_RECORD_FILE)
    }

    #[must_use]
    pub fn mockup_image_path(&self) -> PathBuf {
        self.path(MOCKUP_IMAGE_FILE)
    }

    #[must_use]
    pub fn template_path(&self) -> PathBuf {
        self.path(TEMPLATE_IMAGE_FILE)
    }

    #[must_use]
    pub fn runs_dir(&self) -> PathBuf {
        self.path(RUNS_DIR)
    }

    /// Creates the root directory if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::Io`] if the directory cannot be created.
    pub fn ensure_root(&self) -> Result<(), ArtifactError> {
        std::fs::create_dir_all(&self.root).map_err(|e| ArtifactError::Io {
            path: self.root.display().to_string(),
            source: e,
        })
    }

    #[must_use]
    pub fn exists(path: &Path) -> bool {
        path.is_file()
    }

    /// Reads and deserializes a JSON artifact.
    ///
    /// # Errors
    ///
    /// - [`ArtifactError::Missing`] if the file does not exist.
    /// - [`ArtifactError::Io`] if it exists but cannot be read.
    /// - [`ArtifactError::Malformed`] if the contents do not parse as `T`.
    pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ArtifactError::Missing {
                    path: path.display().to_string(),
                }
            } else {
                ArtifactError::Io {
                    path: path.display().to_string(),
                    source: e,
                }
            }
        })?;

        serde_json::from_str(&content).map_err(|e| ArtifactError::Malformed {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Writes `value` as pretty-printed JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::Io`] on any filesystem failure.
    pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ArtifactError> {
        let body = serde_json::to_vec_pretty(value).map_err(|e| ArtifactError::Malformed {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::write_bytes(path, &body)
    }

    /// Writes raw bytes, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::Io`] on any filesystem failure.
    pub fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), ArtifactError> {
        let io_err = |e: std::io::Error| ArtifactError::Io {
            path: path.display().to_string(),
            source: e,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, bytes).map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Note {
        text: String,
    }

    #[test]
    fn conventional_paths_live_under_root() {
        let store = ArtifactStore::new("/srv/merch");
        assert_eq!(
            store.product_record_path(),
            PathBuf::from("/srv/merch/product.json")
        );
        assert_eq!(
            store.mockup_image_path(),
            PathBuf::from("/srv/merch/mockup.png")
        );
        assert_eq!(store.runs_dir(), PathBuf::from("/srv/merch/runs"));
    }

    #[test]
    fn write_then_read_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("note.json");
        let note = Note {
            text: "hello".to_string(),
        };

        ArtifactStore::write_json(&path, &note).unwrap();
        assert!(ArtifactStore::exists(&path));
        let back: Note = ArtifactStore::read_json(&path).unwrap();
        assert_eq!(back, note);
    }

    #[test]
    fn read_json_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ArtifactStore::read_json::<Note>(&dir.path().join("absent.json")).unwrap_err();
        assert!(
            matches!(err, ArtifactError::Missing { .. }),
            "expected Missing, got: {err:?}"
        );
    }

    #[test]
    fn read_json_reports_malformed_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "not json at all").unwrap();
        let err = ArtifactStore::read_json::<Note>(&path).unwrap_err();
        assert!(
            matches!(err, ArtifactError::Malformed { .. }),
            "expected Malformed, got: {err:?}"
        );
    }

    #[test]
    fn exists_is_false_for_directories() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!ArtifactStore::exists(dir.path()));
    }
}
