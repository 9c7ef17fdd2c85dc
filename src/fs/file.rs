//! File content operations, copy and rename

use super::MemoryFs;
use crate::error::{ErrorKind, FsError, FsResult};
use crate::path;
use crate::tree::node::{FileNode, Node};
use crate::tree::resolve::link_target_path;
use crate::types::{Encoding, NodeKind};
use tracing::debug;

impl MemoryFs {
    /// Raw content of the file at `path`, following symlinks
    pub fn read_file(&self, path: &str) -> FsResult<Vec<u8>> {
        let abs = self.checked(path)?;
        let segments = self.lookup(&abs, true, ErrorKind::FileNotFound)?;
        let file = self
            .node(&segments)?
            .as_file()
            .ok_or_else(|| FsError::not_a_file(&abs))?;
        Ok(file.content().to_vec())
    }

    /// Content of the file at `path` decoded with `encoding`
    pub fn read_to_string(&self, path: &str, encoding: Encoding) -> FsResult<String> {
        Ok(encoding.decode(&self.read_file(path)?))
    }

    /// Replace the content of a file, creating it and any missing parent
    /// directories
    ///
    /// Writing through a dangling symlink creates the file it points at.
    pub fn write_file(&mut self, path: &str, content: impl AsRef<[u8]>) -> FsResult<()> {
        let abs = self.checked(path)?;
        self.write_at(&abs, content.as_ref().to_vec(), 0)
    }

    /// Encode `text` with `encoding` and write it
    pub fn write_string(&mut self, path: &str, text: &str, encoding: Encoding) -> FsResult<()> {
        let abs = self.checked(path)?;
        let content = encoding.encode(text).ok_or_else(|| {
            FsError::new(ErrorKind::IoError, &abs)
                .with_reason(format!("content is not valid {:?}", encoding))
        })?;
        self.write_at(&abs, content, 0)
    }

    /// Append to a file, creating it when missing
    pub fn append_file(&mut self, path: &str, data: impl AsRef<[u8]>) -> FsResult<()> {
        let abs = self.checked(path)?;
        let Some(segments) = self.resolver.resolve(&self.root, &abs, true)? else {
            return self.write_at(&abs, data.as_ref().to_vec(), 0);
        };
        let file = self
            .node_mut(&segments)?
            .as_file_mut()
            .ok_or_else(|| FsError::not_a_file(&abs))?;
        file.append(data.as_ref());
        debug!(path = %abs, bytes = data.as_ref().len(), "File appended");
        self.notify_file_changed(&segments);
        Ok(())
    }

    /// Shrink or zero-extend a file to `len` bytes
    pub fn truncate(&mut self, path: &str, len: usize) -> FsResult<()> {
        let abs = self.checked(path)?;
        let segments = self.lookup(&abs, true, ErrorKind::FileNotFound)?;
        let file = self
            .node_mut(&segments)?
            .as_file_mut()
            .ok_or_else(|| FsError::not_a_file(&abs))?;
        file.truncate(len).map_err(|e| {
            FsError::new(ErrorKind::IoError, &abs)
                .with_reason(format!("cannot resize to {} bytes", len))
                .with_source(e)
        })?;
        debug!(path = %abs, len, "File truncated");
        self.notify_file_changed(&segments);
        Ok(())
    }

    /// Remove a file or symlink; a symlink is removed itself, never its target
    pub fn delete_file(&mut self, path: &str) -> FsResult<()> {
        let abs = self.checked(path)?;
        let segments = self.lookup(&abs, false, ErrorKind::FileNotFound)?;
        if self.node(&segments)?.is_directory() {
            return Err(FsError::not_a_file(abs));
        }
        self.detach(&segments)?;
        debug!(path = %abs, "File deleted");
        Ok(())
    }

    /// Copy a file, or a directory tree when `recursive` is set
    ///
    /// A file copy overwrites an existing destination file. A directory copy
    /// requires the destination to be free and outside the source.
    pub fn copy(&mut self, src: &str, dst: &str, recursive: bool) -> FsResult<()> {
        let src_abs = self.checked(src)?;
        let dst_abs = self.checked(dst)?;
        let src_segments = self.lookup(&src_abs, true, ErrorKind::FileNotFound)?;

        let source = self.node(&src_segments)?;
        if let Some(file) = source.as_file() {
            let content = file.content().to_vec();
            return self.write_at(&dst_abs, content, 0);
        }
        if !recursive {
            return Err(FsError::new(ErrorKind::NotAFile, src_abs)
                .with_reason("copying a directory requires recursive"));
        }
        let subtree = source.clone();
        self.graft(subtree, &src_segments, &dst_abs)?;
        debug!(src = %src_abs, dst = %dst_abs, "Directory copied");
        Ok(())
    }

    /// Move a node: copy it to `dst`, then delete `src`
    ///
    /// Symlinks are moved as links. Not atomic across the two steps.
    pub fn rename(&mut self, src: &str, dst: &str) -> FsResult<()> {
        if self.rename_copy(src, dst)? {
            self.rename_remove(src)?;
        }
        Ok(())
    }

    /// First half of a rename. Returns false when there is nothing to move.
    pub(crate) fn rename_copy(&mut self, src: &str, dst: &str) -> FsResult<bool> {
        let src_abs = self.checked(src)?;
        let dst_abs = self.checked(dst)?;
        if src_abs == path::ROOT {
            return Err(FsError::invalid_path(src_abs, "the root cannot be moved"));
        }
        let src_segments = self.lookup(&src_abs, false, ErrorKind::FileNotFound)?;
        if src_abs == dst_abs {
            return Ok(false);
        }
        let node = self.node(&src_segments)?.clone();
        self.graft(node, &src_segments, &dst_abs)?;
        Ok(true)
    }

    /// Second half of a rename: unlink the source
    pub(crate) fn rename_remove(&mut self, src: &str) -> FsResult<()> {
        let src_abs = self.checked(src)?;
        let segments = self.lookup(&src_abs, false, ErrorKind::FileNotFound)?;
        self.detach(&segments)?;
        debug!(path = %src_abs, "Rename source removed");
        Ok(())
    }

    fn write_at(&mut self, abs: &str, content: Vec<u8>, depth: usize) -> FsResult<()> {
        let max_depth = self.resolver.max_depth();
        if depth > max_depth {
            return Err(FsError::symlink_loop(abs, max_depth));
        }

        if let Some(segments) = self.resolver.resolve(&self.root, abs, true)? {
            let bytes = content.len();
            let file = self
                .node_mut(&segments)?
                .as_file_mut()
                .ok_or_else(|| FsError::not_a_file(abs))?;
            file.set_content(content);
            debug!(path = %abs, bytes, "File written");
            self.notify_file_changed(&segments);
            return Ok(());
        }

        // Dangling link in the final position
        let dangling = match self.resolver.resolve(&self.root, abs, false)? {
            Some(segments) => self.node(&segments)?.as_symlink().map(|link| {
                link_target_path(&segments[..segments.len() - 1], link.target())
            }),
            None => None,
        };
        if let Some(target) = dangling {
            return self.write_at(&target, content, depth + 1);
        }

        let mut segments = self.make_dirs(&path::dirname(abs), true)?;
        let name = path::basename(abs, None);
        let bytes = content.len();
        let meta = self.new_metadata(NodeKind::File);
        self.dir_mut(&segments)?
            .insert(Node::File(FileNode::new(name.clone(), content, meta)));
        segments.push(name);
        debug!(path = %abs, bytes, "File created");
        self.notify_file_changed(&segments);
        Ok(())
    }

    /// Insert `node` at `dst_abs`, renamed to the destination's final segment
    ///
    /// `src_segments` is where the node came from; a directory may not land
    /// inside it.
    fn graft(&mut self, mut node: Node, src_segments: &[String], dst_abs: &str) -> FsResult<()> {
        self.ensure_absent(dst_abs)?;
        if dst_abs == path::ROOT {
            return Err(FsError::directory_exists(dst_abs));
        }

        if node.is_directory() {
            // Deepest existing ancestor of the destination, physically
            let mut probe = path::dirname(dst_abs);
            let anchor = loop {
                if let Some(segments) = self.resolver.resolve(&self.root, &probe, true)? {
                    break segments;
                }
                probe = path::dirname(&probe);
            };
            if anchor.starts_with(src_segments) {
                return Err(FsError::invalid_path(
                    dst_abs,
                    "cannot place a directory inside itself",
                ));
            }
        }

        let mut segments = self.make_dirs(&path::dirname(dst_abs), true)?;
        let name = path::basename(dst_abs, None);
        node.set_name(name.clone());
        self.dir_mut(&segments)?.insert(node);
        segments.push(name);
        self.notify_added(&segments);
        Ok(())
    }
}
