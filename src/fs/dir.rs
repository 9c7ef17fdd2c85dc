//! Directory operations

use super::MemoryFs;
use crate::error::{ErrorKind, FsError, FsResult};
use crate::path;
use crate::tree::node::{DirectoryNode, Node};
use crate::types::{DirEntry, NodeKind};
use tracing::debug;

impl MemoryFs {
    /// Create a directory
    ///
    /// With `recursive`, missing ancestors are created and an existing
    /// directory is accepted. Without it, a missing ancestor is
    /// `DirectoryNotFound` and an existing directory is
    /// `DirectoryAlreadyExists`. An ancestor that exists as anything other
    /// than a directory is `NotADirectory` either way.
    pub fn create_directory(&mut self, path: &str, recursive: bool) -> FsResult<()> {
        let abs = self.checked(path)?;
        match self.kind_at(&abs, true)? {
            Some(NodeKind::Directory) if recursive => return Ok(()),
            Some(NodeKind::Directory) => return Err(FsError::directory_exists(abs)),
            Some(_) => return Err(FsError::file_exists(abs)),
            None => {}
        }
        // A dangling symlink still occupies the name
        if self.kind_at(&abs, false)?.is_some() {
            return Err(FsError::file_exists(abs));
        }
        self.make_dirs(&abs, recursive)?;
        Ok(())
    }

    /// Sorted child names of a directory
    pub fn read_directory(&self, path: &str) -> FsResult<Vec<String>> {
        let abs = self.checked(path)?;
        let dir = self.directory_at(&abs)?;
        Ok(dir.sorted_names().into_iter().map(str::to_string).collect())
    }

    /// Sorted children with their kinds; symlinks are reported as symlinks
    pub fn read_directory_entries(&self, path: &str) -> FsResult<Vec<DirEntry>> {
        let abs = self.checked(path)?;
        let dir = self.directory_at(&abs)?;
        Ok(dir
            .sorted_names()
            .into_iter()
            .filter_map(|name| {
                dir.get(name).map(|child| DirEntry {
                    name: name.to_string(),
                    kind: child.kind(),
                })
            })
            .collect())
    }

    /// Remove a directory; non-empty directories need `recursive`
    ///
    /// The root cannot be removed. A symlink to a directory is
    /// `NotADirectory`: use `delete_file` to remove links.
    pub fn delete_directory(&mut self, path: &str, recursive: bool) -> FsResult<()> {
        let abs = self.checked(path)?;
        if abs == path::ROOT {
            return Err(FsError::invalid_path(abs, "the root cannot be removed"));
        }
        let segments = self.lookup(&abs, false, ErrorKind::DirectoryNotFound)?;
        if segments.is_empty() {
            return Err(FsError::invalid_path(abs, "the root cannot be removed"));
        }
        let dir = self
            .node(&segments)?
            .as_directory()
            .ok_or_else(|| FsError::not_a_directory(&abs))?;
        if !recursive && !dir.is_empty() {
            return Err(FsError::directory_not_empty(abs));
        }
        self.detach(&segments)?;
        debug!(path = %abs, recursive, "Directory deleted");
        Ok(())
    }

    fn directory_at(&self, abs: &str) -> FsResult<&DirectoryNode> {
        let segments = self.lookup(abs, true, ErrorKind::DirectoryNotFound)?;
        self.node(&segments)?
            .as_directory()
            .ok_or_else(|| FsError::not_a_directory(abs))
    }

    /// Walk `abs` from the root, creating missing directories
    ///
    /// Symlinks along the way are followed. Returns the physical segments
    /// of the final directory.
    pub(super) fn make_dirs(&mut self, abs: &str, recursive: bool) -> FsResult<Vec<String>> {
        let segments = path::split(abs);
        let mut physical: Vec<String> = Vec::with_capacity(segments.len());

        for (i, segment) in segments.iter().enumerate() {
            let logical = path::from_segments(&segments[..=i]);
            let existing = self
                .node(&physical)?
                .as_directory()
                .and_then(|dir| dir.get(segment))
                .map(Node::kind);

            match existing {
                Some(NodeKind::Directory) => physical.push(segment.clone()),
                Some(NodeKind::File) => return Err(FsError::not_a_directory(logical)),
                Some(NodeKind::Symlink) => {
                    let mut link = physical.clone();
                    link.push(segment.clone());
                    let resolved =
                        self.resolver
                            .resolve(&self.root, &path::from_segments(&link), true)?;
                    match resolved {
                        Some(target)
                            if self.node(&target).is_ok_and(|node| node.is_directory()) =>
                        {
                            physical = target
                        }
                        _ => return Err(FsError::not_a_directory(logical)),
                    }
                }
                None => {
                    let is_last = i + 1 == segments.len();
                    if !is_last && !recursive {
                        return Err(FsError::directory_not_found(logical));
                    }
                    let meta = self.new_metadata(NodeKind::Directory);
                    self.dir_mut(&physical)?
                        .insert(Node::Directory(DirectoryNode::new(segment.clone(), meta)));
                    physical.push(segment.clone());
                    debug!(path = %logical, "Directory created");
                    self.notify_added(&physical);
                }
            }
        }

        Ok(physical)
    }
}
