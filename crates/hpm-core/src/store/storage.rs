//! Durable backends for the state record.

use crate::error::StorageError;
use std::fs;
use std::path::{Path, PathBuf};

/// Key under which the state record is stored. The suffix tracks the
/// schema generation.
pub const STORAGE_KEY: &str = "hpm-tracker-v5";

/// A single-slot blob store.
pub trait Storage {
    /// `Ok(None)` when nothing has been stored yet.
    fn read(&self) -> Result<Option<String>, StorageError>;

    /// Replace the stored value wholesale.
    fn write(&mut self, contents: &str) -> Result<(), StorageError>;
}

/// JSON file `<data_dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(data_dir: &Path) -> Self {
        Self::with_key(data_dir, STORAGE_KEY)
    }

    pub fn with_key(data_dir: &Path, key: &str) -> Self {
        Self {
            path: data_dir.join(format!("{}.json", key)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl Storage for FileStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    /// Write-to-temp-then-rename so an interrupted write never leaves a
    /// truncated record behind.
    fn write(&mut self, contents: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let temp_file = self.path.with_extension("json.tmp");
        fs::write(&temp_file, contents).map_err(|e| self.io_error(e))?;
        fs::rename(&temp_file, &self.path).map_err(|e| self.io_error(e))?;
        Ok(())
    }
}

/// Process-local storage. Also what a session falls back to once the durable
/// backend has failed.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    contents: Option<String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Some(contents.into()),
        }
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl Storage for MemoryStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        Ok(self.contents.clone())
    }

    fn write(&mut self, contents: &str) -> Result<(), StorageError> {
        self.contents = Some(contents.to_string());
        Ok(())
    }
}
