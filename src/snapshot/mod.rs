//! Snapshots and diffs
//!
//! A snapshot is an independent deep copy of the tree. Nothing in a stored
//! snapshot is shared with the live tree, and restoring hands out a fresh
//! copy, so the same snapshot can be restored any number of times.

pub mod diff;

use crate::error::{FsError, FsResult};
use crate::tree::hasher;
use crate::tree::node::Node;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use diff::{diff_trees, ChangeKind, DiffEntry};

/// Aggregate counters over a tree (the root directory itself is not counted)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeCounts {
    pub file_count: usize,
    pub directory_count: usize,
    pub symlink_count: usize,
    /// Sum of file content lengths
    pub total_size: u64,
}

impl TreeCounts {
    pub fn of(root: &Node) -> Self {
        let mut counts = Self::default();
        if let Some(dir) = root.as_directory() {
            for child in dir.children() {
                counts.add(child);
            }
        }
        counts
    }

    fn add(&mut self, node: &Node) {
        match node {
            Node::File(f) => {
                self.file_count += 1;
                self.total_size += f.content().len() as u64;
            }
            Node::Symlink(_) => self.symlink_count += 1,
            Node::Directory(d) => {
                self.directory_count += 1;
                for child in d.children() {
                    self.add(child);
                }
            }
        }
    }
}

/// Public description of a stored snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotInfo {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub counts: TreeCounts,
    /// Hex BLAKE3 fingerprint of the captured tree
    pub fingerprint: String,
}

#[derive(Debug, Clone)]
pub struct Snapshot {
    info: SnapshotInfo,
    root: Node,
}

impl Snapshot {
    pub fn info(&self) -> &SnapshotInfo {
        &self.info
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Fresh copies of the captured top-level entries
    pub fn clone_children(&self) -> Vec<Node> {
        self.root
            .as_directory()
            .map(|d| d.children().cloned().collect())
            .unwrap_or_default()
    }
}

/// Snapshot registry keyed by id
#[derive(Debug, Default)]
pub struct SnapshotStore {
    snapshots: HashMap<String, Snapshot>,
    next_seq: u64,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deep-copy `root` and register it under a new id
    pub fn capture(&mut self, root: &Node) -> SnapshotInfo {
        self.next_seq += 1;
        let id = format!("snapshot-{}", self.next_seq);
        let copy = root.clone();
        let info = SnapshotInfo {
            id: id.clone(),
            created_at: Utc::now(),
            counts: TreeCounts::of(&copy),
            fingerprint: hasher::fingerprint(&copy),
        };
        self.snapshots.insert(
            id,
            Snapshot {
                info: info.clone(),
                root: copy,
            },
        );
        info
    }

    pub fn get(&self, id: &str) -> FsResult<&Snapshot> {
        self.snapshots
            .get(id)
            .ok_or_else(|| FsError::snapshot_not_found(id))
    }

    pub fn remove(&mut self, id: &str) -> FsResult<SnapshotInfo> {
        self.snapshots
            .remove(id)
            .map(|s| s.info)
            .ok_or_else(|| FsError::snapshot_not_found(id))
    }

    /// Snapshot descriptions, oldest first
    pub fn list(&self) -> Vec<SnapshotInfo> {
        let mut infos: Vec<SnapshotInfo> =
            self.snapshots.values().map(|s| s.info.clone()).collect();
        infos.sort_by_key(|info| seq_of(&info.id));
        infos
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

fn seq_of(id: &str) -> u64 {
    id.rsplit('-')
        .next()
        .and_then(|n| n.parse().ok())
        .unwrap_or(u64::MAX)
}
