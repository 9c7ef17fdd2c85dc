//! Metadata queries and updates

use super::MemoryFs;
use crate::error::{ErrorKind, FsResult};
use crate::tree::node::Metadata;
use crate::types::Stats;
use chrono::{DateTime, Utc};
use tracing::debug;

impl MemoryFs {
    /// Stats of the node at `path`, following a final symlink
    pub fn stat(&self, path: &str) -> FsResult<Stats> {
        self.stats_at(path, true)
    }

    /// Stats of the node at `path` itself, even when it is a symlink
    pub fn lstat(&self, path: &str) -> FsResult<Stats> {
        self.stats_at(path, false)
    }

    /// Store new permission bits; they are never enforced
    pub fn chmod(&mut self, path: &str, mode: u32) -> FsResult<()> {
        self.update_metadata(path, |meta| meta.mode = mode)
    }

    pub fn chown(&mut self, path: &str, uid: u32, gid: u32) -> FsResult<()> {
        self.update_metadata(path, |meta| {
            meta.uid = uid;
            meta.gid = gid;
        })
    }

    /// Set access and modification times
    pub fn utimes(
        &mut self,
        path: &str,
        accessed: DateTime<Utc>,
        modified: DateTime<Utc>,
    ) -> FsResult<()> {
        self.update_metadata(path, |meta| {
            meta.accessed = accessed;
            meta.modified = modified;
        })
    }

    fn stats_at(&self, path: &str, follow: bool) -> FsResult<Stats> {
        let abs = self.checked(path)?;
        let segments = self.lookup(&abs, follow, ErrorKind::FileNotFound)?;
        Ok(self.node(&segments)?.stats())
    }

    fn update_metadata(&mut self, path: &str, apply: impl FnOnce(&mut Metadata)) -> FsResult<()> {
        let abs = self.checked(path)?;
        let segments = self.lookup(&abs, true, ErrorKind::FileNotFound)?;
        apply(self.node_mut(&segments)?.metadata_mut());
        debug!(path = %abs, "Metadata updated");
        self.notify_file_changed(&segments);
        Ok(())
    }
}
