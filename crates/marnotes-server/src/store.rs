//! Directory-backed document store.
//!
//! Every regular file ending in `.json` directly inside the documents
//! directory is a document. Documents are addressed by file name with or
//! without the `.json` suffix.

use std::io;
use std::path::{Path, PathBuf};

/// File suffix of stored documents.
pub const JSON_SUFFIX: &str = ".json";

/// Errors from reading documents.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no filename specified")]
    EmptyName,

    #[error("invalid filename")]
    InvalidName,

    #[error("document not found")]
    NotFound,

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("failed to read documents: {0}")]
    Io(#[from] io::Error),
}

/// Read-only view of a documents directory.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    dir: PathBuf,
}

impl DocumentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the documents directory if it does not exist yet.
    ///
    /// Returns `true` when the directory was created.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the directory cannot be created.
    pub async fn ensure_dir(&self) -> io::Result<bool> {
        if tokio::fs::try_exists(&self.dir).await? {
            return Ok(false);
        }
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(true)
    }

    /// List document file names, sorted.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directory cannot be read.
    pub async fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                continue;
            }
            // Non-UTF-8 names cannot be requested over HTTP anyway.
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name.ends_with(JSON_SUFFIX) {
                names.push(name);
            }
        }

        names.sort();
        Ok(names)
    }

    /// Read one document's raw bytes after checking they parse as JSON.
    ///
    /// # Errors
    ///
    /// - `EmptyName` / `InvalidName` for names that cannot address a document
    /// - `NotFound` if no such document exists
    /// - `InvalidJson` if the file is not valid JSON
    /// - `Io` for any other read failure
    pub async fn read(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.path_for(name)?;

        let data = match tokio::fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(StoreError::NotFound),
            Err(e) => return Err(StoreError::Io(e)),
        };

        serde_json::from_slice::<serde::de::IgnoredAny>(&data)?;
        Ok(data)
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StoreError> {
        let stem = validate_name(name)?;
        Ok(self.dir.join(format!("{stem}{JSON_SUFFIX}")))
    }
}

/// Strip one `.json` suffix and reject names that could leave the directory.
fn validate_name(name: &str) -> Result<&str, StoreError> {
    let stem = name.strip_suffix(JSON_SUFFIX).unwrap_or(name);

    if stem.is_empty() {
        return Err(StoreError::EmptyName);
    }
    if stem.contains("..") || stem.contains('/') || stem.contains('\\') || stem.contains('\0') {
        return Err(StoreError::InvalidName);
    }
    Ok(stem)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn store_with(files: &[(&str, &str)]) -> (tempfile::TempDir, DocumentStore) {
        let dir = tempfile::tempdir().unwrap();
        for (name, body) in files {
            std::fs::write(dir.path().join(name), body).unwrap();
        }
        let store = DocumentStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn name_validation() {
        assert_eq!(validate_name("a.json").unwrap(), "a");
        assert_eq!(validate_name("a").unwrap(), "a");
        assert!(matches!(validate_name(""), Err(StoreError::EmptyName)));
        assert!(matches!(validate_name(".json"), Err(StoreError::EmptyName)));
        assert!(matches!(validate_name("../etc"), Err(StoreError::InvalidName)));
        assert!(matches!(validate_name("a/b"), Err(StoreError::InvalidName)));
        assert!(matches!(validate_name("a\\b"), Err(StoreError::InvalidName)));
    }

    #[tokio::test]
    async fn lists_only_json_files_sorted() {
        let (dir, store) = store_with(&[
            ("b.json", "{}"),
            ("a.json", "[]"),
            ("notes.txt", "hi"),
        ]);
        std::fs::create_dir(dir.path().join("nested.json")).unwrap();

        let names = store.list().await.unwrap();
        assert_eq!(names, vec!["a.json".to_owned(), "b.json".to_owned()]);
    }

    #[tokio::test]
    async fn empty_directory_lists_nothing() {
        let (_dir, store) = store_with(&[]);
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path().join("missing"));
        assert!(matches!(store.list().await, Err(StoreError::Io(_))));
    }

    #[tokio::test]
    async fn reads_with_or_without_suffix() {
        let (_dir, store) = store_with(&[("a.json", r#"{"k": 1}"#)]);
        assert_eq!(store.read("a").await.unwrap(), br#"{"k": 1}"#.to_vec());
        assert_eq!(store.read("a.json").await.unwrap(), br#"{"k": 1}"#.to_vec());
    }

    #[tokio::test]
    async fn read_errors() {
        let (_dir, store) = store_with(&[("broken.json", "{nope")]);
        assert!(matches!(store.read("missing").await, Err(StoreError::NotFound)));
        assert!(matches!(
            store.read("broken").await,
            Err(StoreError::InvalidJson(_))
        ));
        assert!(matches!(store.read("..").await, Err(StoreError::InvalidName)));
    }

    #[tokio::test]
    async fn ensure_dir_creates_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path().join("docs"));
        assert!(store.ensure_dir().await.unwrap());
        assert!(!store.ensure_dir().await.unwrap());
    }
}
