//! Disk-backed filesystem rooted at a directory

use super::{FileSystem, FsError, OpenFile};
use std::path::PathBuf;
use tokio::fs::File;

/// Serves entries below `root`
///
/// Virtual paths are cleaned lexically before they touch the disk, so `..`
/// can never climb above the root.
#[derive(Debug, Clone)]
pub struct Dir {
    root: PathBuf,
}

impl Dir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a virtual path to its location on disk
    pub fn resolve(&self, name: &str) -> Result<PathBuf, FsError> {
        if name.contains('\0') {
            return Err(FsError::InvalidPath(format!("{name:?} contains a NUL byte")));
        }
        if name.contains('\\') {
            return Err(FsError::InvalidPath(format!("{name:?} contains a backslash")));
        }
        let cleaned = clean_path(name);
        Ok(self.root.join(cleaned.trim_start_matches('/')))
    }
}

impl FileSystem for Dir {
    async fn open(&self, name: &str) -> Result<OpenFile, FsError> {
        let path = self.resolve(name)?;
        let file = File::open(&path).await?;
        Ok(OpenFile::new(name.to_string(), path, file))
    }
}

/// Lexically clean a slash-separated path, rooted at `/`
///
/// Repeated slashes collapse, `.` segments drop out and `..` removes the
/// previous segment but never goes above the root. The result always starts
/// with `/` and never ends with one, except for the root itself.
///
/// # Examples
/// ```
/// use staticy::fs::clean_path;
/// assert_eq!(clean_path("a//b/./c/"), "/a/b/c");
/// assert_eq!(clean_path("/../../etc/passwd"), "/etc/passwd");
/// assert_eq!(clean_path(""), "/");
/// ```
pub fn clean_path(name: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in name.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    if segments.is_empty() {
        return "/".to_string();
    }

    let mut cleaned = String::with_capacity(name.len() + 1);
    for segment in segments {
        cleaned.push('/');
        cleaned.push_str(segment);
    }
    cleaned
}
