//! Storage media for the quiz store.
//!
//! The store persists its whole collection as one named blob. A backend only
//! knows how to read and replace that blob; parsing and validation live in
//! `store`.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use fs4::fs_std::FileExt;
use tempfile::NamedTempFile;

use crate::error::PersistenceError;

/// A medium holding a single named text blob.
pub trait BlobBackend: Send + Sync {
    /// Where the blob lives, for logs and error messages.
    fn location(&self) -> PathBuf;

    /// Read the blob. `Ok(None)` means it has never been written.
    fn read(&self) -> Result<Option<String>, PersistenceError>;

    /// Replace the blob with `contents` if it still holds `expected`.
    ///
    /// The check and the replacement happen as one step with respect to
    /// other writers of the same blob. A mismatch fails with
    /// `PersistenceError::Conflict` and leaves the blob untouched.
    fn compare_and_write(&self, expected: Option<&str>, contents: &str)
        -> Result<(), PersistenceError>;
}

/// Blob stored as a file on disk.
///
/// Writers serialize on an exclusive lock of a sidecar `<file>.lock`. Writes
/// go to a temporary file in the same directory which is then renamed over
/// the target, so readers see either the old or the new contents.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sidecar file used for the writer lock.
    pub fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    fn dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn write_err(&self, source: std::io::Error) -> PersistenceError {
        PersistenceError::Write {
            location: self.path.clone(),
            source,
        }
    }

    /// Open the sidecar and block until this process holds it exclusively.
    /// The lock is released when the returned file is dropped.
    fn lock_writers(&self) -> Result<File, PersistenceError> {
        let lock = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())
            .map_err(|e| self.write_err(e))?;
        FileExt::lock_exclusive(&lock).map_err(|e| self.write_err(e))?;
        Ok(lock)
    }

    fn replace(&self, dir: &Path, contents: &str) -> Result<(), PersistenceError> {
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| self.write_err(e))?;
        tmp.write_all(contents.as_bytes())
            .map_err(|e| self.write_err(e))?;
        tmp.as_file().sync_all().map_err(|e| self.write_err(e))?;
        tmp.persist(&self.path).map_err(|e| self.write_err(e.error))?;
        Ok(())
    }
}

impl BlobBackend for FileBackend {
    fn location(&self) -> PathBuf {
        self.path.clone()
    }

    fn read(&self) -> Result<Option<String>, PersistenceError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PersistenceError::Read {
                location: self.path.clone(),
                source,
            }),
        }
    }

    fn compare_and_write(
        &self,
        expected: Option<&str>,
        contents: &str,
    ) -> Result<(), PersistenceError> {
        let dir = self.dir();
        std::fs::create_dir_all(&dir).map_err(|e| self.write_err(e))?;

        let _lock = self.lock_writers()?;
        let current = self.read()?;
        if current.as_deref() != expected {
            return Err(PersistenceError::Conflict);
        }
        self.replace(&dir, contents)
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    contents: Option<String>,
    unavailable: bool,
    writes: u32,
}

/// In-process blob, shared between clones.
///
/// Clones see the same blob, which makes it easy to model two writers. Writes
/// can be switched off to model a full or missing medium.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing blob.
    pub fn with_contents(contents: &str) -> Self {
        let backend = Self::default();
        backend.lock().contents = Some(contents.to_string());
        backend
    }

    /// Make subsequent writes fail with `PersistenceError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    /// Current blob contents.
    pub fn contents(&self) -> Option<String> {
        self.lock().contents.clone()
    }

    /// Replace the blob directly, bypassing any store.
    pub fn overwrite(&self, contents: &str) {
        self.lock().contents = Some(contents.to_string());
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> u32 {
        self.lock().writes
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl BlobBackend for MemoryBackend {
    fn location(&self) -> PathBuf {
        PathBuf::from("<memory>")
    }

    fn read(&self) -> Result<Option<String>, PersistenceError> {
        Ok(self.lock().contents.clone())
    }

    fn compare_and_write(
        &self,
        expected: Option<&str>,
        contents: &str,
    ) -> Result<(), PersistenceError> {
        let mut state = self.lock();
        if state.unavailable {
            return Err(PersistenceError::Unavailable(
                "in-memory store is not accepting writes".into(),
            ));
        }
        if state.contents.as_deref() != expected {
            return Err(PersistenceError::Conflict);
        }
        state.contents = Some(contents.to_string());
        state.writes += 1;
        Ok(())
    }
}
