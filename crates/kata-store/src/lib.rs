//! # kata-store
//!
//! The local record store: a single pretty-printed JSON array of
//! [`ChallengeRecord`]s at `{repo_dir}/completed_kata.json`.
//!
//! The store is read once at the start of a sync and rewritten wholesale at
//! the end. Writes go to a temp file in the same directory and are renamed
//! over the target, so a reader never sees a half-written document.

mod error;

pub use error::StoreError;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use kata_core::ChallengeRecord;

/// File name of the store inside the working copy.
pub const STORE_FILE_NAME: &str = "completed_kata.json";

#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    /// Store backed by `{repo_dir}/completed_kata.json`.
    #[must_use]
    pub fn in_dir(repo_dir: &Path) -> Self {
        Self {
            path: repo_dir.join(STORE_FILE_NAME),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every stored record.
    ///
    /// A missing file is an empty store, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] if the file exists but is not a JSON
    /// array of records, or [`StoreError::Io`] if it cannot be read.
    pub fn load(&self) -> Result<Vec<ChallengeRecord>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no store file yet");
                return Ok(Vec::new());
            }
            Err(error) => return Err(StoreError::io(&self.path, error)),
        };

        let records: Vec<ChallengeRecord> =
            serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        tracing::debug!(path = %self.path.display(), count = records.len(), "loaded store");
        Ok(records)
    }

    /// Replace the store with `records`.
    ///
    /// Two-space indentation and no trailing newline, so rewriting an
    /// unchanged store reproduces it byte for byte.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory, temp file, or rename
    /// fails. The previous file is left untouched on error.
    pub fn save(&self, records: &[ChallengeRecord]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(records).map_err(StoreError::Serialize)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;
        tmp.write_all(json.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| StoreError::io(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| StoreError::io(&self.path, e.error))?;

        tracing::info!(path = %self.path.display(), count = records.len(), "saved store");
        Ok(())
    }
}
