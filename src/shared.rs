//! Shared async access
//!
//! [`SharedFs`] hands one [`MemoryFs`] to many tasks. Every primitive takes
//! the lock, runs to completion and releases it before the next await
//! point, so a single mutation is never observed half-applied. Composite
//! operations are not atomic: [`AsyncFileSystem::rename`] copies, yields
//! and then deletes, and other tasks may run in between.

use crate::error::FsResult;
use crate::fs::MemoryFs;
use crate::snapshot::{DiffEntry, SnapshotInfo};
use crate::tree::walker::GlobOptions;
use crate::types::Stats;
use async_trait::async_trait;
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

/// Async view of the filesystem operations
#[async_trait]
pub trait AsyncFileSystem: Send + Sync {
    async fn read_file(&self, path: &str) -> FsResult<Vec<u8>>;
    async fn write_file(&self, path: &str, content: Vec<u8>) -> FsResult<()>;
    async fn append_file(&self, path: &str, content: Vec<u8>) -> FsResult<()>;
    async fn delete_file(&self, path: &str) -> FsResult<()>;
    async fn create_directory(&self, path: &str, recursive: bool) -> FsResult<()>;
    async fn read_directory(&self, path: &str) -> FsResult<Vec<String>>;
    async fn delete_directory(&self, path: &str, recursive: bool) -> FsResult<()>;
    async fn create_symlink(&self, target: &str, link: &str) -> FsResult<()>;
    async fn rename(&self, src: &str, dst: &str) -> FsResult<()>;
    async fn stat(&self, path: &str) -> FsResult<Stats>;
    async fn exists(&self, path: &str) -> bool;
    async fn glob(&self, pattern: &str, options: GlobOptions) -> FsResult<Vec<String>>;
    async fn create_snapshot(&self) -> SnapshotInfo;
    async fn restore_snapshot(&self, id: &str) -> FsResult<()>;
    async fn diff(&self, from: Option<&str>, to: Option<&str>) -> FsResult<Vec<DiffEntry>>;
}

/// Cloneable handle to a shared [`MemoryFs`]
#[derive(Clone, Default)]
pub struct SharedFs {
    inner: Arc<Mutex<MemoryFs>>,
}

impl SharedFs {
    pub fn new(fs: MemoryFs) -> Self {
        Self {
            inner: Arc::new(Mutex::new(fs)),
        }
    }

    /// Synchronous access for operations without an async counterpart
    ///
    /// Do not hold the guard across an await point.
    pub fn lock(&self) -> MutexGuard<'_, MemoryFs> {
        self.inner.lock()
    }
}

#[async_trait]
impl AsyncFileSystem for SharedFs {
    async fn read_file(&self, path: &str) -> FsResult<Vec<u8>> {
        self.inner.lock().read_file(path)
    }

    async fn write_file(&self, path: &str, content: Vec<u8>) -> FsResult<()> {
        self.inner.lock().write_file(path, content)
    }

    async fn append_file(&self, path: &str, content: Vec<u8>) -> FsResult<()> {
        self.inner.lock().append_file(path, content)
    }

    async fn delete_file(&self, path: &str) -> FsResult<()> {
        self.inner.lock().delete_file(path)
    }

    async fn create_directory(&self, path: &str, recursive: bool) -> FsResult<()> {
        self.inner.lock().create_directory(path, recursive)
    }

    async fn read_directory(&self, path: &str) -> FsResult<Vec<String>> {
        self.inner.lock().read_directory(path)
    }

    async fn delete_directory(&self, path: &str, recursive: bool) -> FsResult<()> {
        self.inner.lock().delete_directory(path, recursive)
    }

    async fn create_symlink(&self, target: &str, link: &str) -> FsResult<()> {
        self.inner.lock().create_symlink(target, link)
    }

    async fn rename(&self, src: &str, dst: &str) -> FsResult<()> {
        let copied = self.inner.lock().rename_copy(src, dst)?;
        tokio::task::yield_now().await;
        if copied {
            self.inner.lock().rename_remove(src)?;
        }
        Ok(())
    }

    async fn stat(&self, path: &str) -> FsResult<Stats> {
        self.inner.lock().stat(path)
    }

    async fn exists(&self, path: &str) -> bool {
        self.inner.lock().exists(path)
    }

    async fn glob(&self, pattern: &str, options: GlobOptions) -> FsResult<Vec<String>> {
        self.inner.lock().glob(pattern, &options)
    }

    async fn create_snapshot(&self) -> SnapshotInfo {
        self.inner.lock().create_snapshot()
    }

    async fn restore_snapshot(&self, id: &str) -> FsResult<()> {
        self.inner.lock().restore_snapshot(id)
    }

    async fn diff(&self, from: Option<&str>, to: Option<&str>) -> FsResult<Vec<DiffEntry>> {
        self.inner.lock().diff(from, to)
    }
}
