//! Symlink operations

use super::MemoryFs;
use crate::error::{ErrorKind, FsError, FsResult};
use crate::path;
use crate::tree::node::{Node, SymlinkNode};
use crate::types::NodeKind;
use tracing::debug;

impl MemoryFs {
    /// Create a symlink at `link` pointing at `target`
    ///
    /// The target is stored as given and only resolved on traversal;
    /// relative targets are taken relative to the directory holding the
    /// link. The link's parent directory must exist.
    pub fn create_symlink(&mut self, target: &str, link: &str) -> FsResult<()> {
        if target.is_empty() {
            return Err(FsError::invalid_path(target, "symlink target is empty"));
        }
        if target.chars().any(char::is_control) {
            return Err(FsError::invalid_path(target, "symlink target contains control characters"));
        }
        let abs = self.checked(link)?;
        self.ensure_absent(&abs)?;

        let parent_abs = path::dirname(&abs);
        let mut segments = self.lookup(&parent_abs, true, ErrorKind::DirectoryNotFound)?;
        if !self.node(&segments)?.is_directory() {
            return Err(FsError::not_a_directory(parent_abs));
        }

        let name = path::basename(&abs, None);
        let meta = self.new_metadata(NodeKind::Symlink);
        self.dir_mut(&segments)?
            .insert(Node::Symlink(SymlinkNode::new(name.clone(), target, meta)));
        segments.push(name);
        debug!(link = %abs, to = %target, "Symlink created");
        self.notify_file_changed(&segments);
        Ok(())
    }

    /// Target string stored in a symlink
    pub fn read_link(&self, path: &str) -> FsResult<String> {
        let abs = self.checked(path)?;
        let segments = self.lookup(&abs, false, ErrorKind::FileNotFound)?;
        self.node(&segments)?
            .as_symlink()
            .map(|link| link.target().to_string())
            .ok_or_else(|| FsError::not_a_symlink(abs))
    }

    /// Physical absolute path of `path` with every symlink resolved
    pub fn real_path(&self, path: &str) -> FsResult<String> {
        let abs = self.checked(path)?;
        let segments = self.lookup(&abs, true, ErrorKind::FileNotFound)?;
        Ok(path::from_segments(&segments))
    }
}
