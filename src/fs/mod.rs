//! In-memory filesystem
//!
//! [`MemoryFs`] owns the node tree and exposes every public operation. Each
//! operation validates its path arguments before touching the tree, resolves
//! them through the [`Resolver`], applies its mutation and then notifies the
//! registered [`FsObserver`]s synchronously.
//!
//! Relative paths resolve against the working directory ([`MemoryFs::cwd`]).

mod dir;
mod file;
mod link;
mod meta;
mod snapshots;

use crate::config::FsConfig;
use crate::error::{ErrorKind, FsError, FsResult};
use crate::events::FsObserver;
use crate::path::{self, PathLimits};
use crate::snapshot::{SnapshotStore, TreeCounts};
use crate::tree::hasher;
use crate::tree::node::{node_at, node_at_mut, DirectoryNode, Metadata, Node};
use crate::tree::resolve::Resolver;
use crate::tree::walker::{GlobOptions, Walker};
use crate::types::NodeKind;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Hierarchical filesystem held entirely in memory
pub struct MemoryFs {
    config: FsConfig,
    resolver: Resolver,
    limits: PathLimits,
    root: Node,
    cwd: String,
    snapshots: SnapshotStore,
    observers: Vec<Arc<dyn FsObserver>>,
}

impl Default for MemoryFs {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemoryFs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryFs")
            .field("cwd", &self.cwd)
            .field("counts", &TreeCounts::of(&self.root))
            .field("snapshots", &self.snapshots.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl MemoryFs {
    /// Empty filesystem with default configuration
    pub fn new() -> Self {
        Self::with_config(FsConfig::default())
    }

    /// Empty filesystem using `config` for limits and node defaults
    pub fn with_config(config: FsConfig) -> Self {
        let defaults = &config.defaults;
        let root_meta = Metadata::new(defaults.directory_mode, defaults.uid, defaults.gid);
        Self {
            resolver: Resolver::new(config.resolver.max_symlink_depth),
            limits: config.path_limits(),
            root: Node::Directory(DirectoryNode::new("", root_meta)),
            cwd: path::ROOT.to_string(),
            snapshots: SnapshotStore::new(),
            observers: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &FsConfig {
        &self.config
    }

    /// Register an observer for commit events
    pub fn subscribe(&mut self, observer: Arc<dyn FsObserver>) {
        self.observers.push(observer);
    }

    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    /// Change the working directory; the target must be a directory
    pub fn set_cwd(&mut self, path: &str) -> FsResult<()> {
        let abs = self.checked(path)?;
        let segments = self.lookup(&abs, true, ErrorKind::DirectoryNotFound)?;
        if !self.node(&segments)?.is_directory() {
            return Err(FsError::not_a_directory(abs));
        }
        self.cwd = abs;
        Ok(())
    }

    pub fn exists(&self, path: &str) -> bool {
        self.probe(path, true).is_some()
    }

    pub fn is_file(&self, path: &str) -> bool {
        self.probe(path, true) == Some(NodeKind::File)
    }

    pub fn is_directory(&self, path: &str) -> bool {
        self.probe(path, true) == Some(NodeKind::Directory)
    }

    pub fn is_symlink(&self, path: &str) -> bool {
        self.probe(path, false) == Some(NodeKind::Symlink)
    }

    /// Find paths matching a glob pattern
    ///
    /// `options.cwd` is itself resolved against the working directory.
    pub fn glob(&self, pattern: &str, options: &GlobOptions) -> FsResult<Vec<String>> {
        let mut options = options.clone();
        options.cwd = path::resolve(&self.cwd, &options.cwd);
        Walker::new(&self.root, self.resolver, pattern, &options)?.walk()
    }

    /// Total content bytes of every file at or below `path`
    pub fn disk_usage(&self, path: &str) -> FsResult<u64> {
        let abs = self.checked(path)?;
        let segments = self.lookup(&abs, true, ErrorKind::FileNotFound)?;
        let node = self.node(&segments)?;
        Ok(match node {
            Node::Directory(_) => TreeCounts::of(node).total_size,
            other => other.size(),
        })
    }

    /// Hex BLAKE3 digest of the live tree (timestamps excluded)
    pub fn fingerprint(&self) -> String {
        hasher::fingerprint(&self.root)
    }

    /// Remove everything below the root and reset the working directory
    ///
    /// Snapshots are kept.
    pub fn clear(&mut self) -> FsResult<()> {
        let removed = self.dir_mut(&[])?.take_children();
        self.cwd = path::ROOT.to_string();
        debug!(entries = removed.len(), "Filesystem cleared");
        for node in &removed {
            self.notify_removed(&path::from_segments(&[node.name()]), node.is_directory());
        }
        Ok(())
    }

    // Helpers shared by the operation modules

    /// Validate a caller-supplied path and make it absolute
    fn checked(&self, path: &str) -> FsResult<String> {
        path::validate(path, &self.limits)?;
        let abs = path::resolve(&self.cwd, path);
        if abs.chars().count() > self.limits.max_path_length {
            return Err(FsError::invalid_path(
                abs,
                format!("resolved path exceeds {} characters", self.limits.max_path_length),
            ));
        }
        Ok(abs)
    }

    /// Physical segments of `abs`, or the error explaining why it is missing
    fn lookup(&self, abs: &str, follow: bool, missing: ErrorKind) -> FsResult<Vec<String>> {
        match self.resolver.resolve(&self.root, abs, follow)? {
            Some(segments) => Ok(segments),
            None => Err(self.resolver.missing_error(&self.root, abs, missing)),
        }
    }

    fn kind_at(&self, abs: &str, follow: bool) -> FsResult<Option<NodeKind>> {
        match self.resolver.resolve(&self.root, abs, follow)? {
            Some(segments) => Ok(Some(self.node(&segments)?.kind())),
            None => Ok(None),
        }
    }

    /// Kind of the node at `path`; any failure reads as absent
    fn probe(&self, path: &str, follow: bool) -> Option<NodeKind> {
        let abs = self.checked(path).ok()?;
        self.kind_at(&abs, follow).ok().flatten()
    }

    /// Fail if anything, even a dangling symlink, occupies `abs`
    fn ensure_absent(&self, abs: &str) -> FsResult<()> {
        match self.kind_at(abs, false)? {
            Some(NodeKind::Directory) => Err(FsError::directory_exists(abs)),
            Some(_) => Err(FsError::file_exists(abs)),
            None => Ok(()),
        }
    }

    fn node(&self, segments: &[String]) -> FsResult<&Node> {
        node_at(&self.root, segments)
            .ok_or_else(|| FsError::file_not_found(path::from_segments(segments)))
    }

    fn node_mut(&mut self, segments: &[String]) -> FsResult<&mut Node> {
        node_at_mut(&mut self.root, segments)
            .ok_or_else(|| FsError::file_not_found(path::from_segments(segments)))
    }

    fn dir_mut(&mut self, segments: &[String]) -> FsResult<&mut DirectoryNode> {
        self.node_mut(segments)?
            .as_directory_mut()
            .ok_or_else(|| FsError::not_a_directory(path::from_segments(segments)))
    }

    /// Unlink the node at `segments` from its parent
    fn detach(&mut self, segments: &[String]) -> FsResult<Node> {
        let Some((name, parent)) = segments.split_last() else {
            return Err(FsError::invalid_path(path::ROOT, "the root cannot be removed"));
        };
        let removed = self
            .dir_mut(parent)?
            .remove(name)
            .ok_or_else(|| FsError::file_not_found(path::from_segments(segments)))?;
        let removed_path = path::from_segments(segments);
        debug!(path = %removed_path, kind = removed.kind().as_str(), "Node detached");
        self.notify_removed(&removed_path, removed.is_directory());
        Ok(removed)
    }

    fn new_metadata(&self, kind: NodeKind) -> Metadata {
        let defaults = &self.config.defaults;
        let mode = match kind {
            NodeKind::File => defaults.file_mode,
            NodeKind::Directory => defaults.directory_mode,
            NodeKind::Symlink => defaults.symlink_mode,
        };
        Metadata::new(mode, defaults.uid, defaults.gid)
    }

    fn notify_file_changed(&self, segments: &[String]) {
        if self.observers.is_empty() {
            return;
        }
        if let Some(node) = node_at(&self.root, segments) {
            let path = path::from_segments(segments);
            let stats = node.stats();
            for observer in &self.observers {
                observer.file_changed(&path, &stats);
            }
        }
    }

    /// `directory_added` for directories, `file_changed` for anything else
    fn notify_added(&self, segments: &[String]) {
        if self.observers.is_empty() {
            return;
        }
        if let Some(node) = node_at(&self.root, segments) {
            let path = path::from_segments(segments);
            let stats = node.stats();
            for observer in &self.observers {
                if node.is_directory() {
                    observer.directory_added(&path, &stats);
                } else {
                    observer.file_changed(&path, &stats);
                }
            }
        }
    }

    fn notify_removed(&self, path: &str, is_directory: bool) {
        for observer in &self.observers {
            observer.removed(path, is_directory);
        }
    }
}
