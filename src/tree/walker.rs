//! Glob traversal over the node tree

use crate::error::{FsError, FsResult};
use crate::glob::{IgnoreSet, Pattern};
use crate::path;
use crate::tree::node::{node_at, DirectoryNode, Node};
use crate::tree::resolve::{link_target_path, Resolver};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Glob traversal configuration
#[derive(Debug, Clone)]
pub struct GlobOptions {
    /// Directory the walk starts from; results are relative to it
    pub cwd: String,
    /// Include names starting with `.`
    pub dot: bool,
    /// Patterns to skip, tested against the relative path and the bare name
    pub ignore: Vec<String>,
    /// Treat symlinks as the node they point at (broken links are skipped)
    pub follow_symlinks: bool,
    pub only_files: bool,
    pub only_directories: bool,
    /// Directory levels below `cwd` to descend into (None = unlimited)
    pub max_depth: Option<usize>,
    /// Return absolute paths instead of paths relative to `cwd`
    pub absolute: bool,
}

impl Default for GlobOptions {
    fn default() -> Self {
        Self {
            cwd: path::ROOT.to_string(),
            dot: false,
            ignore: Vec::new(),
            follow_symlinks: true,
            only_files: false,
            only_directories: false,
            max_depth: None,
            absolute: true,
        }
    }
}

/// Depth-first pre-order glob walker
pub struct Walker<'a> {
    root: &'a Node,
    resolver: Resolver,
    pattern: Pattern,
    ignore: IgnoreSet,
    options: &'a GlobOptions,
    cwd: String,
}

impl<'a> Walker<'a> {
    pub fn new(
        root: &'a Node,
        resolver: Resolver,
        pattern: &str,
        options: &'a GlobOptions,
    ) -> FsResult<Self> {
        Ok(Self {
            root,
            resolver,
            pattern: Pattern::new(pattern)?,
            ignore: IgnoreSet::new(&options.ignore)?,
            options,
            cwd: path::resolve(path::ROOT, &options.cwd),
        })
    }

    /// Walk the tree and collect matching paths
    ///
    /// Returns paths sorted lexicographically for determinism.
    #[instrument(skip(self), fields(pattern = %self.pattern.as_str(), cwd = %self.cwd))]
    pub fn walk(&self) -> FsResult<Vec<String>> {
        let start = Instant::now();

        let start_segments = self
            .resolver
            .resolve(self.root, &self.cwd, true)?
            .ok_or_else(|| {
                self.resolver.missing_error(
                    self.root,
                    &self.cwd,
                    crate::error::ErrorKind::DirectoryNotFound,
                )
            })?;
        let start_dir = node_at(self.root, &start_segments)
            .and_then(Node::as_directory)
            .ok_or_else(|| FsError::not_a_directory(self.cwd.clone()))?;

        let mut matches = Vec::new();
        let mut ancestors = vec![start_segments.clone()];
        self.visit(start_dir, &start_segments, "", 0, &mut ancestors, &mut matches);

        let mut results: Vec<String> = if self.options.absolute {
            matches
                .into_iter()
                .map(|rel| path::join(&[self.cwd.as_str(), rel.as_str()]))
                .collect()
        } else {
            matches
        };
        results.sort();

        info!(
            match_count = results.len(),
            duration_ms = start.elapsed().as_millis(),
            "Glob completed"
        );
        Ok(results)
    }

    fn visit(
        &self,
        dir: &DirectoryNode,
        physical: &[String],
        relative: &str,
        depth: usize,
        ancestors: &mut Vec<Vec<String>>,
        out: &mut Vec<String>,
    ) {
        for name in dir.sorted_names() {
            if !self.options.dot && name.starts_with('.') {
                continue;
            }
            let rel = if relative.is_empty() {
                name.to_string()
            } else {
                format!("{}/{}", relative, name)
            };
            if self.ignore.is_ignored(&rel, name) {
                continue;
            }
            let Some(child) = dir.get(name) else {
                continue;
            };

            let (node, child_physical) = match child {
                Node::Symlink(link) if self.options.follow_symlinks => {
                    let target = link_target_path(physical, link.target());
                    match self.resolver.resolve(self.root, &target, true) {
                        Ok(Some(segments)) => match node_at(self.root, &segments) {
                            Some(node) => (node, segments),
                            None => continue,
                        },
                        Ok(None) => {
                            debug!(path = %rel, to = %target, "Skipping broken symlink");
                            continue;
                        }
                        Err(e) => {
                            warn!(path = %rel, error = %e, "Skipping unresolvable symlink");
                            continue;
                        }
                    }
                }
                _ => {
                    let mut segments = physical.to_vec();
                    segments.push(name.to_string());
                    (child, segments)
                }
            };

            if self.is_match(&rel) && self.passes_filter(node) {
                out.push(rel.clone());
            }

            if let Node::Directory(sub) = node {
                let next_depth = depth + 1;
                if self.options.max_depth.is_some_and(|max| next_depth > max) {
                    continue;
                }
                // A followed link back into the current walk would never end
                if ancestors.contains(&child_physical) {
                    debug!(path = %rel, "Not descending into symlinked ancestor");
                    continue;
                }
                let sub_physical = child_physical.clone();
                ancestors.push(child_physical);
                self.visit(sub, &sub_physical, &rel, next_depth, ancestors, out);
                ancestors.pop();
            }
        }
    }

    fn is_match(&self, rel: &str) -> bool {
        if path::is_absolute(self.pattern.as_str()) {
            self.pattern
                .matches(&path::join(&[self.cwd.as_str(), rel]))
        } else {
            self.pattern.matches(rel)
        }
    }

    fn passes_filter(&self, node: &Node) -> bool {
        if self.options.only_files && !node.is_file() {
            return false;
        }
        if self.options.only_directories && !node.is_directory() {
            return false;
        }
        true
    }
}
