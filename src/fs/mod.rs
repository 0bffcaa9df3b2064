//! Filesystem abstraction
//!
//! A `FileSystem` is a path-keyed store that hands out open handles for
//! virtual paths. The file server only ever talks to this trait, so stores
//! can be decorated without touching the serving code:
//! - [`Dir`] serves a directory on local disk
//! - [`UnindexedDir`] hides directories that have no `index.html`

mod dir;
mod unindexed;

pub use dir::{clean_path, Dir};
pub use unindexed::UnindexedDir;

use std::fs::Metadata;
use std::future::Future;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tokio::fs::File;

/// Failure kinds reported by a [`FileSystem`]
#[derive(Debug, Error)]
pub enum FsError {
    #[error("file does not exist")]
    NotFound,
    #[error("permission denied")]
    PermissionDenied,
    #[error("invalid path: {0}")]
    InvalidPath(String),
    #[error("i/o error: {0}")]
    Io(io::Error),
}

impl From<io::Error> for FsError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            _ => Self::Io(err),
        }
    }
}

/// An entry opened from a [`FileSystem`]
///
/// Owns the underlying handle; dropping it releases the file.
#[derive(Debug)]
pub struct OpenFile {
    name: String,
    path: PathBuf,
    file: File,
}

/// One child of an opened directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

impl OpenFile {
    pub const fn new(name: String, path: PathBuf, file: File) -> Self {
        Self { name, path, file }
    }

    /// Virtual name the entry was opened under
    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn metadata(&self) -> io::Result<Metadata> {
        self.file.metadata().await
    }

    /// List the children of a directory entry, sorted by name
    pub async fn read_dir(&self) -> io::Result<Vec<DirEntry>> {
        let mut reader = tokio::fs::read_dir(&self.path).await?;
        let mut entries = Vec::new();
        while let Some(entry) = reader.next_entry().await? {
            // Follow symlinks so a linked directory is listed as one
            let is_dir = tokio::fs::metadata(entry.path())
                .await
                .is_ok_and(|meta| meta.is_dir());
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    pub fn into_inner(self) -> File {
        self.file
    }
}

/// Path-keyed store of openable entries
pub trait FileSystem {
    /// Open the entry at virtual path `name`
    fn open(&self, name: &str) -> impl Future<Output = Result<OpenFile, FsError>> + Send;
}
