//! File access collaborator
//!
//! The orchestrator never touches the filesystem directly; it goes
//! through [`FileAccess`]. Production code uses [`TokioFileAccess`];
//! tests and dry runs use [`MemoryFileAccess`], which can also be told
//! to start failing writes after N successes to exercise the rollback
//! failure path.

use crate::error::FileError;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Async read/write boundary for file content
#[async_trait]
pub trait FileAccess: Send + Sync {
    /// Read the full content of `path`
    ///
    /// # Errors
    /// [`FileError::NotFound`] when the path does not exist,
    /// [`FileError::Io`] for any other failure.
    async fn read(&self, path: &Path) -> Result<String, FileError>;

    /// Replace the content of `path`
    ///
    /// # Errors
    /// [`FileError::Io`] when the write fails.
    async fn write(&self, path: &Path, content: &str) -> Result<(), FileError>;
}

/// Real filesystem access via `tokio::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFileAccess;

#[async_trait]
impl FileAccess for TokioFileAccess {
    async fn read(&self, path: &Path) -> Result<String, FileError> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(FileError::NotFound {
                path: path.to_path_buf(),
            }),
            Err(e) => Err(FileError::io(path, e)),
        }
    }

    async fn write(&self, path: &Path, content: &str) -> Result<(), FileError> {
        tokio::fs::write(path, content)
            .await
            .map_err(|e| FileError::io(path, e))
    }
}

/// In-memory file map for tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryFileAccess {
    files: RwLock<HashMap<PathBuf, String>>,
    writes_done: AtomicUsize,
    fail_writes_after: Option<usize>,
}

impl MemoryFileAccess {
    /// Empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with `(path, content)` pairs
    #[must_use]
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let map = files
            .iter()
            .map(|(p, c)| (PathBuf::from(p), (*c).to_string()))
            .collect();
        Self {
            files: RwLock::new(map),
            ..Self::default()
        }
    }

    /// Allow `n` writes, then fail every subsequent one
    #[must_use]
    pub fn failing_writes_after(mut self, n: usize) -> Self {
        self.fail_writes_after = Some(n);
        self
    }

    /// Current content of `path`, if present
    #[must_use]
    pub fn content(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.read().get(path.as_ref()).cloned()
    }

    /// Total successful writes so far
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes_done.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FileAccess for MemoryFileAccess {
    async fn read(&self, path: &Path) -> Result<String, FileError> {
        self.files
            .read()
            .get(path)
            .cloned()
            .ok_or_else(|| FileError::NotFound {
                path: path.to_path_buf(),
            })
    }

    async fn write(&self, path: &Path, content: &str) -> Result<(), FileError> {
        if let Some(limit) = self.fail_writes_after {
            if self.writes_done.load(Ordering::SeqCst) >= limit {
                return Err(FileError::io(
                    path,
                    std::io::Error::other("simulated write failure"),
                ));
            }
        }
        self.files
            .write()
            .insert(path.to_path_buf(), content.to_string());
        self.writes_done.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
