//! Directory-listing suppression
//!
//! Wraps another [`FileSystem`] and refuses to open directories that have no
//! `index.html`. Directories that do have one are handed back as-is; the file
//! server finds and serves the index on its own.

use super::{FileSystem, FsError, OpenFile};

const INDEX_DOCUMENT: &str = "index.html";

/// A [`FileSystem`] that never exposes a bare directory listing
#[derive(Debug, Clone)]
pub struct UnindexedDir<F> {
    inner: F,
}

impl<F: FileSystem> UnindexedDir<F> {
    pub const fn new(inner: F) -> Self {
        Self { inner }
    }
}

impl<F: FileSystem + Sync> FileSystem for UnindexedDir<F> {
    async fn open(&self, name: &str) -> Result<OpenFile, FsError> {
        let file = self.inner.open(name).await?;

        // The entry can vanish between open and stat; report it as gone
        let metadata = file.metadata().await.map_err(|_| FsError::NotFound)?;
        if !metadata.is_dir() {
            return Ok(file);
        }

        let index = index_candidate(name);
        match self.inner.open(&index).await {
            Ok(_) => Ok(file),
            // Never tell "no index" apart from any other failure
            Err(_) => Err(FsError::PermissionDenied),
        }
    }
}

/// Path of the index document inside directory `name`
fn index_candidate(name: &str) -> String {
    let dir = name.strip_suffix('/').unwrap_or(name);
    format!("{dir}/{INDEX_DOCUMENT}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::Dir;
    use tokio::io::AsyncReadExt;

    /// a/ has an index, b/ only has notes
    fn fixture() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("a")).unwrap();
        std::fs::create_dir_all(tmp.path().join("b")).unwrap();
        std::fs::write(tmp.path().join("a/index.html"), b"<h1>a</h1>").unwrap();
        std::fs::write(tmp.path().join("b/notes.txt"), b"plain notes\n").unwrap();
        tmp
    }

    async fn read_all(file: OpenFile) -> Vec<u8> {
        let mut buf = Vec::new();
        file.into_inner().read_to_end(&mut buf).await.unwrap();
        buf
    }

    #[test]
    fn test_index_candidate() {
        assert_eq!(index_candidate("/a/"), "/a/index.html");
        assert_eq!(index_candidate("/a"), "/a/index.html");
        assert_eq!(index_candidate("/"), "/index.html");
        assert_eq!(index_candidate(""), "/index.html");
    }

    #[tokio::test]
    async fn test_file_passes_through() {
        let tmp = fixture();
        let plain = Dir::new(tmp.path());
        let unindexed = UnindexedDir::new(Dir::new(tmp.path()));

        let direct = read_all(plain.open("/b/notes.txt").await.unwrap()).await;
        let wrapped = read_all(unindexed.open("/b/notes.txt").await.unwrap()).await;
        assert_eq!(direct, wrapped);
        assert_eq!(wrapped, b"plain notes\n");
    }

    #[tokio::test]
    async fn test_directory_with_index_returns_directory() {
        let tmp = fixture();
        let fs = UnindexedDir::new(Dir::new(tmp.path()));

        for name in ["/a/", "/a"] {
            let opened = fs.open(name).await.unwrap();
            assert!(opened.metadata().await.unwrap().is_dir());
            assert_eq!(opened.name(), name);
        }
    }

    #[tokio::test]
    async fn test_directory_without_index_is_forbidden() {
        let tmp = fixture();
        let fs = UnindexedDir::new(Dir::new(tmp.path()));

        assert!(matches!(fs.open("/b/").await, Err(FsError::PermissionDenied)));
        assert!(matches!(fs.open("/b").await, Err(FsError::PermissionDenied)));
        // root has no index either
        assert!(matches!(fs.open("/").await, Err(FsError::PermissionDenied)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_broken_index_is_forbidden() {
        let tmp = fixture();
        std::fs::create_dir_all(tmp.path().join("c")).unwrap();
        std::os::unix::fs::symlink(
            tmp.path().join("c/missing-target"),
            tmp.path().join("c/index.html"),
        )
        .unwrap();
        let fs = UnindexedDir::new(Dir::new(tmp.path()));

        assert!(matches!(fs.open("/c/").await, Err(FsError::PermissionDenied)));
    }

    #[tokio::test]
    async fn test_missing_entry_propagates() {
        let tmp = fixture();
        let fs = UnindexedDir::new(Dir::new(tmp.path()));

        assert!(matches!(fs.open("/zzz").await, Err(FsError::NotFound)));
        assert!(matches!(
            fs.open("/a\0").await,
            Err(FsError::InvalidPath(_))
        ));
    }

    #[tokio::test]
    async fn test_plain_dir_opens_any_directory() {
        let tmp = fixture();
        let fs = Dir::new(tmp.path());

        assert!(fs.open("/b/").await.is_ok());
        assert!(fs.open("/").await.is_ok());
    }

    #[tokio::test]
    async fn test_repeated_opens_are_stable() {
        let tmp = fixture();
        let fs = UnindexedDir::new(Dir::new(tmp.path()));

        for _ in 0..3 {
            assert!(fs.open("/a/").await.is_ok());
            assert!(matches!(fs.open("/b/").await, Err(FsError::PermissionDenied)));
            assert!(fs.open("/b/notes.txt").await.is_ok());
            assert!(matches!(fs.open("/nope").await, Err(FsError::NotFound)));
        }
    }
}
