//! # File-backed [`Store`].
//!
//! Each key maps to `<dir>/<escaped key>.json`. Bytes outside
//! `[A-Za-z0-9_-]` are written as `%XX`, so any channel id yields a single,
//! collision-free file name.
//!
//! ## Crash consistency
//! ```text
//! save(key, doc):
//!   tempfile_in(dir) ─► write_all(doc) ─► sync_all ─► rename over <key>.json
//! ```
//! The rename is atomic on the same filesystem, so a reader sees either the
//! previous document or the new one.

use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::Builder;

use super::Store;
use crate::error::StorageError;

/// Directory of JSON documents, one per key.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens (creating if needed) a store rooted at `dir`.
    ///
    /// # Errors
    /// Returns the I/O error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Directory holding the documents.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", escape_key(key)))
    }

    fn write_atomic(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut temp_file = Builder::new().prefix(".pending").tempfile_in(&self.dir)?;
        temp_file.write_all(contents)?;
        temp_file.as_file_mut().sync_all()?;
        temp_file.persist(path).map_err(|error| error.error)?;
        Ok(())
    }
}

impl Store for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.file_path(key)) {
            Ok(doc) => Ok(Some(doc)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn save(&self, key: &str, contents: &str) -> Result<(), StorageError> {
        self.write_atomic(&self.file_path(key), contents.as_bytes())
            .map_err(|source| StorageError::Io {
                key: key.to_string(),
                source,
            })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.file_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

fn escape_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for b in key.bytes() {
        if b.is_ascii_alphanumeric() || b == b'_' || b == b'-' {
            out.push(char::from(b));
        } else {
            let _ = write!(out, "%{b:02X}");
        }
    }
    out
}
