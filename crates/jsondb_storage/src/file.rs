//! File-based document store for persistent storage.

use crate::backend::{validate_document_name, DocumentStore};
use crate::error::{StorageError, StorageResult};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File extension used for documents unless configured otherwise.
pub const DEFAULT_EXTENSION: &str = "json";

/// Stripped from the start of a document when reading.
const BYTE_ORDER_MARK: char = '\u{feff}';

/// A directory-backed document store.
///
/// Each document lives in its own file:
///
/// ```text
/// <location>/
/// ├─ <name>.json        # one document per collection
/// └─ .<name>.json.tmp   # transient, only during an atomic write
/// ```
///
/// # Durability
///
/// - With `sync` enabled, each written file is fsynced before `write` returns
/// - With `atomic` enabled, documents are written to a temp file and renamed
///   over the target, so a crash never leaves a half-written document
///
/// Documents are read as UTF-8; a leading byte-order mark is dropped.
///
/// # Example
///
/// ```no_run
/// use jsondb_storage::{DocumentStore, FileStore};
/// use std::path::Path;
///
/// let store = FileStore::open(Path::new("data")).unwrap();
/// store.write("users", "[]").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    extension: String,
    sync: bool,
    atomic: bool,
}

impl FileStore {
    /// Opens a store over an existing directory.
    ///
    /// The directory is never created implicitly.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidLocation`] if the path does not exist
    /// or is not a directory.
    pub fn open(root: &Path) -> StorageResult<Self> {
        if !root.exists() {
            return Err(StorageError::invalid_location(
                root,
                "directory does not exist",
            ));
        }
        if !root.is_dir() {
            return Err(StorageError::invalid_location(root, "not a directory"));
        }

        Ok(Self {
            root: root.to_path_buf(),
            extension: DEFAULT_EXTENSION.to_string(),
            sync: true,
            atomic: true,
        })
    }

    /// Sets the file extension used for documents (without the dot).
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Sets whether written documents are fsynced.
    #[must_use]
    pub fn with_sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }

    /// Sets whether documents are written through a temp file and rename.
    #[must_use]
    pub fn with_atomic_writes(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }

    /// Returns the store directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the file extension used for documents.
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Returns the path of the file holding a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not a valid document name.
    pub fn document_path(&self, name: &str) -> StorageResult<PathBuf> {
        validate_document_name(name)?;
        Ok(self.root.join(format!("{name}.{}", self.extension)))
    }

    fn temp_path(&self, name: &str) -> PathBuf {
        self.root.join(format!(".{name}.{}.tmp", self.extension))
    }

    fn write_file(&self, path: &Path, contents: &str) -> StorageResult<()> {
        let mut file = File::create(path)?;
        file.write_all(contents.as_bytes())?;
        if self.sync {
            file.sync_all()?;
        }
        Ok(())
    }

    #[cfg(unix)]
    fn sync_directory(&self) -> StorageResult<()> {
        let dir = File::open(&self.root)?;
        dir.sync_all()?;
        Ok(())
    }

    #[cfg(not(unix))]
    fn sync_directory(&self) -> StorageResult<()> {
        // NTFS journals metadata; directory handles cannot be fsynced
        Ok(())
    }
}

impl DocumentStore for FileStore {
    fn exists(&self, name: &str) -> StorageResult<bool> {
        Ok(self.document_path(name)?.is_file())
    }

    fn read(&self, name: &str) -> StorageResult<Option<String>> {
        let path = self.document_path(name)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut text = String::from_utf8(bytes).map_err(|_| StorageError::NotUtf8 {
            name: name.to_string(),
        })?;
        if text.starts_with(BYTE_ORDER_MARK) {
            text.replace_range(..BYTE_ORDER_MARK.len_utf8(), "");
        }
        debug!(document = name, bytes = text.len(), "read document");
        Ok(Some(text))
    }

    fn write(&self, name: &str, contents: &str) -> StorageResult<()> {
        let path = self.document_path(name)?;

        if self.atomic {
            let temp_path = self.temp_path(name);
            let renamed = self
                .write_file(&temp_path, contents)
                .and_then(|()| fs::rename(&temp_path, &path).map_err(StorageError::from));
            if let Err(e) = renamed {
                let _ = fs::remove_file(&temp_path);
                return Err(e);
            }
            if self.sync {
                self.sync_directory()?;
            }
        } else {
            self.write_file(&path, contents)?;
        }

        debug!(document = name, bytes = contents.len(), "wrote document");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn open_existing_directory() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.root(), dir.path());
        assert_eq!(store.extension(), "json");
    }

    #[test]
    fn open_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing");

        let result = FileStore::open(&missing);
        assert!(matches!(result, Err(StorageError::InvalidLocation { .. })));
        assert!(!missing.exists());
    }

    #[test]
    fn open_file_path_fails() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("plain.txt");
        fs::write(&file_path, "x").unwrap();

        let result = FileStore::open(&file_path);
        assert!(matches!(result, Err(StorageError::InvalidLocation { .. })));
    }

    #[test]
    fn read_missing_document_is_none() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        assert!(store.read("users").unwrap().is_none());
        assert!(!store.exists("users").unwrap());
    }

    #[test]
    fn write_and_read() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        store.write("users", "[\n  1\n]").unwrap();

        assert!(store.exists("users").unwrap());
        assert_eq!(store.read("users").unwrap().as_deref(), Some("[\n  1\n]"));
        assert!(dir.path().join("users.json").is_file());
    }

    #[test]
    fn write_overwrites_whole_document() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        store.write("users", "a much longer first document").unwrap();
        store.write("users", "short").unwrap();

        assert_eq!(store.read("users").unwrap().as_deref(), Some("short"));
    }

    #[test]
    fn atomic_write_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        store.write("users", "[]").unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["users.json".to_string()]);
    }

    #[test]
    fn direct_write_without_sync() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path())
            .unwrap()
            .with_atomic_writes(false)
            .with_sync(false);

        store.write("users", "[]").unwrap();
        assert_eq!(store.read("users").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn custom_extension() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap().with_extension("db");

        store.write("users", "[]").unwrap();
        assert!(dir.path().join("users.db").is_file());
        assert_eq!(
            store.document_path("users").unwrap(),
            dir.path().join("users.db")
        );
    }

    #[test]
    fn invalid_name_is_rejected() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        let result = store.write("../escape", "[]");
        assert!(matches!(result, Err(StorageError::InvalidName { .. })));
    }

    #[test]
    fn non_utf8_document_fails() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        fs::write(dir.path().join("users.json"), [0xff, 0xfe, 0x00]).unwrap();

        let result = store.read("users");
        assert!(matches!(result, Err(StorageError::NotUtf8 { .. })));
    }

    #[test]
    fn leading_byte_order_mark_is_stripped() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        fs::write(dir.path().join("users.json"), "\u{feff}[1]").unwrap();

        assert_eq!(store.read("users").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn inner_byte_order_mark_is_kept() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        fs::write(dir.path().join("users.json"), "[\"\u{feff}\"]").unwrap();

        assert_eq!(
            store.read("users").unwrap().as_deref(),
            Some("[\"\u{feff}\"]")
        );
    }

    #[test]
    fn failed_rename_removes_temp_file() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        let blocker = dir.path().join("users.json");
        fs::create_dir(&blocker).unwrap();
        fs::write(blocker.join("inside"), "x").unwrap();

        assert!(store.write("users", "[]").is_err());

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["users.json".to_string()]);
        assert!(blocker.is_dir());
    }

    #[test]
    fn persistence_across_instances() {
        let dir = tempdir().unwrap();

        {
            let store = FileStore::open(dir.path()).unwrap();
            store.write("users", "persistent").unwrap();
        }

        {
            let store = FileStore::open(dir.path()).unwrap();
            assert_eq!(store.read("users").unwrap().as_deref(), Some("persistent"));
        }
    }
}
