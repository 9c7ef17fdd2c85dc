//! Snapshot, restore and diff

use super::MemoryFs;
use crate::error::FsResult;
use crate::path;
use crate::snapshot::{diff_trees, DiffEntry, SnapshotInfo};
use crate::tree::node::{DirectoryNode, Node};
use crate::types::NodeKind;
use std::time::Instant;
use tracing::{info, instrument};

impl MemoryFs {
    /// Capture an independent deep copy of the whole tree
    #[instrument(skip(self))]
    pub fn create_snapshot(&mut self) -> SnapshotInfo {
        let start = Instant::now();
        let info = self.snapshots.capture(&self.root);
        info!(
            id = %info.id,
            files = info.counts.file_count,
            directories = info.counts.directory_count,
            bytes = info.counts.total_size,
            duration_ms = start.elapsed().as_millis(),
            "Snapshot created"
        );
        info
    }

    /// Replace every top-level entry with a fresh copy of snapshot `id`
    ///
    /// The stored snapshot is untouched and can be restored again. If the
    /// working directory no longer exists afterwards it resets to `/`.
    #[instrument(skip(self))]
    pub fn restore_snapshot(&mut self, id: &str) -> FsResult<()> {
        let start = Instant::now();
        let restored = self.snapshots.get(id)?.clone_children();

        let discarded = self.dir_mut(&[])?.take_children();
        for node in &discarded {
            self.notify_removed(&path::from_segments(&[node.name()]), node.is_directory());
        }

        let restored_count = restored.len();
        for node in restored {
            let name = node.name().to_string();
            self.dir_mut(&[])?.insert(node);
            self.notify_added(&[name]);
        }

        if self.kind_at(&self.cwd, true).ok().flatten() != Some(NodeKind::Directory) {
            self.cwd = path::ROOT.to_string();
        }

        info!(
            id,
            discarded = discarded.len(),
            restored = restored_count,
            duration_ms = start.elapsed().as_millis(),
            "Snapshot restored"
        );
        Ok(())
    }

    pub fn delete_snapshot(&mut self, id: &str) -> FsResult<()> {
        self.snapshots.remove(id)?;
        info!(id, "Snapshot deleted");
        Ok(())
    }

    /// Stored snapshots, oldest first
    pub fn list_snapshots(&self) -> Vec<SnapshotInfo> {
        self.snapshots.list()
    }

    pub fn snapshot_info(&self, id: &str) -> FsResult<SnapshotInfo> {
        Ok(self.snapshots.get(id)?.info().clone())
    }

    /// File-level changes between two trees
    ///
    /// `from` defaults to an empty tree and `to` to the live tree.
    #[instrument(skip(self))]
    pub fn diff(&self, from: Option<&str>, to: Option<&str>) -> FsResult<Vec<DiffEntry>> {
        let start = Instant::now();
        let empty;
        let from_root = match from {
            Some(id) => self.snapshots.get(id)?.root(),
            None => {
                empty = Node::Directory(DirectoryNode::new(
                    "",
                    self.new_metadata(NodeKind::Directory),
                ));
                &empty
            }
        };
        let to_root = match to {
            Some(id) => self.snapshots.get(id)?.root(),
            None => &self.root,
        };

        let entries = diff_trees(from_root, to_root);
        info!(
            changes = entries.len(),
            duration_ms = start.elapsed().as_millis(),
            "Diff computed"
        );
        Ok(entries)
    }
}
