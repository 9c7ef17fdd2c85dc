//! Path traversal with symlink resolution
//!
//! Resolution walks from the root one segment at a time and produces the
//! physical segment list of the node a path names. Symlinks in the middle
//! of a path are always followed; a symlink in the final position is
//! followed only on request. Loop detection is depth-bounded: a chain of
//! links longer than the bound is reported as a loop even if it would
//! eventually terminate.

use crate::error::{ErrorKind, FsError, FsResult};
use crate::path;
use crate::tree::node::{node_at, Node};

/// Default bound on nested symlink resolutions
pub const DEFAULT_MAX_SYMLINK_DEPTH: usize = 40;

#[derive(Debug, Clone, Copy)]
pub struct Resolver {
    max_depth: usize,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SYMLINK_DEPTH)
    }
}

impl Resolver {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Resolve an absolute path to the physical segments of its node
    ///
    /// Returns `Ok(None)` when some segment is missing or a non-directory is
    /// traversed. Only a symlink chain deeper than the bound is an error.
    pub fn resolve(&self, root: &Node, path: &str, follow: bool) -> FsResult<Option<Vec<String>>> {
        self.resolve_at(root, path, follow, 0)
    }

    /// Resolve and return the node itself
    pub fn resolve_node<'a>(
        &self,
        root: &'a Node,
        path: &str,
        follow: bool,
    ) -> FsResult<Option<&'a Node>> {
        Ok(self
            .resolve(root, path, follow)?
            .and_then(|segments| node_at(root, &segments)))
    }

    fn resolve_at(
        &self,
        root: &Node,
        path: &str,
        follow: bool,
        depth: usize,
    ) -> FsResult<Option<Vec<String>>> {
        if depth > self.max_depth {
            return Err(FsError::symlink_loop(path, self.max_depth));
        }

        let segments = path::split(path);
        let mut physical: Vec<String> = Vec::with_capacity(segments.len());
        let mut current = root;

        for (i, segment) in segments.iter().enumerate() {
            let Some(dir) = current.as_directory() else {
                return Ok(None);
            };
            let Some(child) = dir.get(segment) else {
                return Ok(None);
            };
            let is_last = i + 1 == segments.len();

            match child {
                Node::Symlink(link) if !is_last || follow => {
                    let target = link_target_path(&physical, link.target());
                    let Some(resolved) = self.resolve_at(root, &target, true, depth + 1)? else {
                        return Ok(None);
                    };
                    let Some(node) = node_at(root, &resolved) else {
                        return Ok(None);
                    };
                    current = node;
                    physical = resolved;
                }
                _ => {
                    current = child;
                    physical.push(segment.clone());
                }
            }
        }

        Ok(Some(physical))
    }

    /// Explain why `path` did not resolve
    ///
    /// Walks the ancestors of `path`: the first one that exists but is not a
    /// directory yields `NotADirectory`; otherwise the error has `kind`.
    pub fn missing_error(&self, root: &Node, path: &str, kind: ErrorKind) -> FsError {
        let segments = path::split(path);
        for i in 1..segments.len() {
            let prefix = path::from_segments(&segments[..i]);
            match self.resolve_node(root, &prefix, true) {
                Ok(Some(node)) if !node.is_directory() => return FsError::not_a_directory(prefix),
                Ok(Some(_)) => {}
                Ok(None) => break,
                Err(e) => return e,
            }
        }
        FsError::new(kind, path)
    }
}

/// Absolute path a symlink points at
///
/// Relative targets resolve against the directory holding the link, given
/// as physical segments.
pub fn link_target_path<S: AsRef<str>>(link_dir: &[S], target: &str) -> String {
    if path::is_absolute(target) {
        path::normalize(target)
    } else {
        path::resolve(&path::from_segments(link_dir), target)
    }
}
