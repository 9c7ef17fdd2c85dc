//! Filesystem node types
//!
//! A directory owns its children by name; no node points back at its
//! parent. Ancestry is whatever path the caller walked to reach a node.

use crate::types::{NodeKind, Stats};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, TryReserveError};

/// Reported size of every directory, independent of its children
pub const DIRECTORY_SIZE: u64 = 4096;

/// Timestamps and ownership shared by all node kinds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub accessed: DateTime<Utc>,
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
}

impl Metadata {
    pub fn new(mode: u32, uid: u32, gid: u32) -> Self {
        let now = Utc::now();
        Self {
            created: now,
            modified: now,
            accessed: now,
            mode,
            uid,
            gid,
        }
    }

    /// Mark the node as modified now
    pub fn touch(&mut self) {
        let now = Utc::now();
        self.modified = now;
        self.accessed = now;
    }
}

/// File node: owns its byte content
#[derive(Debug, Clone)]
pub struct FileNode {
    name: String,
    meta: Metadata,
    content: Vec<u8>,
}

impl FileNode {
    pub fn new(name: impl Into<String>, content: Vec<u8>, meta: Metadata) -> Self {
        Self {
            name: name.into(),
            meta,
            content,
        }
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Replace the content wholesale
    pub fn set_content(&mut self, content: Vec<u8>) {
        self.content = content;
        self.meta.touch();
    }

    pub fn append(&mut self, data: &[u8]) {
        self.content.extend_from_slice(data);
        self.meta.touch();
    }

    /// Shrink or zero-extend the content to `len` bytes
    ///
    /// Growth is reserved up front, so an unallocatable length fails
    /// without touching the content.
    pub fn truncate(&mut self, len: usize) -> Result<(), TryReserveError> {
        if let Some(extra) = len.checked_sub(self.content.len()) {
            self.content.try_reserve_exact(extra)?;
        }
        self.content.resize(len, 0);
        self.meta.touch();
        Ok(())
    }
}

/// Directory node: owns a name-keyed map of children
#[derive(Debug, Clone)]
pub struct DirectoryNode {
    name: String,
    meta: Metadata,
    children: HashMap<String, Node>,
}

impl DirectoryNode {
    pub fn new(name: impl Into<String>, meta: Metadata) -> Self {
        Self {
            name: name.into(),
            meta,
            children: HashMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.children.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.children.get_mut(name)
    }

    /// Insert a child under its own name, returning any node it replaced
    pub fn insert(&mut self, node: Node) -> Option<Node> {
        let replaced = self.children.insert(node.name().to_string(), node);
        self.meta.touch();
        replaced
    }

    pub fn remove(&mut self, name: &str) -> Option<Node> {
        let removed = self.children.remove(name);
        if removed.is_some() {
            self.meta.touch();
        }
        removed
    }

    /// Detach every child
    pub fn take_children(&mut self) -> Vec<Node> {
        let taken: Vec<Node> = self.children.drain().map(|(_, node)| node).collect();
        self.meta.touch();
        taken
    }

    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.children.values()
    }

    /// Child names in lexicographic order
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.children.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// Symlink node: a target path resolved only at traversal time
#[derive(Debug, Clone)]
pub struct SymlinkNode {
    name: String,
    meta: Metadata,
    target: String,
}

impl SymlinkNode {
    pub fn new(name: impl Into<String>, target: impl Into<String>, meta: Metadata) -> Self {
        Self {
            name: name.into(),
            meta,
            target: target.into(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

/// Tree node. The variant is fixed for the node's lifetime.
#[derive(Debug, Clone)]
pub enum Node {
    File(FileNode),
    Directory(DirectoryNode),
    Symlink(SymlinkNode),
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::File(f) => &f.name,
            Node::Directory(d) => &d.name,
            Node::Symlink(s) => &s.name,
        }
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        match self {
            Node::File(f) => f.name = name,
            Node::Directory(d) => d.name = name,
            Node::Symlink(s) => s.name = name,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::File(_) => NodeKind::File,
            Node::Directory(_) => NodeKind::Directory,
            Node::Symlink(_) => NodeKind::Symlink,
        }
    }

    pub fn metadata(&self) -> &Metadata {
        match self {
            Node::File(f) => &f.meta,
            Node::Directory(d) => &d.meta,
            Node::Symlink(s) => &s.meta,
        }
    }

    pub(crate) fn metadata_mut(&mut self) -> &mut Metadata {
        match self {
            Node::File(f) => &mut f.meta,
            Node::Directory(d) => &mut d.meta,
            Node::Symlink(s) => &mut s.meta,
        }
    }

    pub fn size(&self) -> u64 {
        match self {
            Node::File(f) => f.content.len() as u64,
            Node::Directory(_) => DIRECTORY_SIZE,
            Node::Symlink(s) => s.target.len() as u64,
        }
    }

    pub fn stats(&self) -> Stats {
        let meta = self.metadata();
        Stats {
            is_file: matches!(self, Node::File(_)),
            is_directory: matches!(self, Node::Directory(_)),
            is_symlink: matches!(self, Node::Symlink(_)),
            size: self.size(),
            created_time: meta.created,
            modified_time: meta.modified,
            accessed_time: meta.accessed,
            mode: meta.mode,
            uid: meta.uid,
            gid: meta.gid,
        }
    }

    pub fn as_file(&self) -> Option<&FileNode> {
        match self {
            Node::File(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_file_mut(&mut self) -> Option<&mut FileNode> {
        match self {
            Node::File(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_directory(&self) -> Option<&DirectoryNode> {
        match self {
            Node::Directory(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_directory_mut(&mut self) -> Option<&mut DirectoryNode> {
        match self {
            Node::Directory(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_symlink(&self) -> Option<&SymlinkNode> {
        match self {
            Node::Symlink(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Node::File(_))
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Node::Directory(_))
    }

    pub fn is_symlink(&self) -> bool {
        matches!(self, Node::Symlink(_))
    }
}

/// Look up the node at a physical path without following symlinks
pub fn node_at<'a, S: AsRef<str>>(root: &'a Node, segments: &[S]) -> Option<&'a Node> {
    let mut current = root;
    for segment in segments {
        current = current.as_directory()?.get(segment.as_ref())?;
    }
    Some(current)
}

/// Mutable variant of [`node_at`]
pub fn node_at_mut<'a, S: AsRef<str>>(root: &'a mut Node, segments: &[S]) -> Option<&'a mut Node> {
    let mut current = root;
    for segment in segments {
        current = current.as_directory_mut()?.get_mut(segment.as_ref())?;
    }
    Some(current)
}
