//! Structural diff between two node trees
//!
//! Child maps of corresponding directories are merged by name. Only files
//! produce records; directories are recursed into whether they exist on one
//! side or both, so a renamed directory shows up as every contained file
//! deleted at the old path and added at the new one. Symlinks are not
//! compared.

use crate::path;
use crate::tree::node::{DirectoryNode, Node};
use crate::types::Stats;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
}

/// One changed file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffEntry {
    pub kind: ChangeKind,
    pub path: String,
    pub old_content: Option<Vec<u8>>,
    pub new_content: Option<Vec<u8>>,
    pub old_stats: Option<Stats>,
    pub new_stats: Option<Stats>,
}

impl DiffEntry {
    fn added(path: String, node: &Node, content: &[u8]) -> Self {
        Self {
            kind: ChangeKind::Added,
            path,
            old_content: None,
            new_content: Some(content.to_vec()),
            old_stats: None,
            new_stats: Some(node.stats()),
        }
    }

    fn deleted(path: String, node: &Node, content: &[u8]) -> Self {
        Self {
            kind: ChangeKind::Deleted,
            path,
            old_content: Some(content.to_vec()),
            new_content: None,
            old_stats: Some(node.stats()),
            new_stats: None,
        }
    }
}

/// Diff two trees rooted at directories
///
/// Records come out in depth-first order with siblings sorted by name.
pub fn diff_trees(from: &Node, to: &Node) -> Vec<DiffEntry> {
    let mut out = Vec::new();
    let mut segments = Vec::new();
    diff_directories(from.as_directory(), to.as_directory(), &mut segments, &mut out);
    out
}

fn diff_directories(
    from: Option<&DirectoryNode>,
    to: Option<&DirectoryNode>,
    segments: &mut Vec<String>,
    out: &mut Vec<DiffEntry>,
) {
    let names: BTreeSet<&str> = from
        .into_iter()
        .chain(to)
        .flat_map(|dir| dir.sorted_names())
        .collect();

    for name in names {
        let old = from.and_then(|d| d.get(name));
        let new = to.and_then(|d| d.get(name));

        segments.push(name.to_string());
        let path = path::from_segments(segments.as_slice());

        match (old, new) {
            (Some(old_node @ Node::File(old_file)), Some(new_node @ Node::File(new_file))) => {
                if old_file.content() != new_file.content() {
                    out.push(DiffEntry {
                        kind: ChangeKind::Modified,
                        path,
                        old_content: Some(old_file.content().to_vec()),
                        new_content: Some(new_file.content().to_vec()),
                        old_stats: Some(old_node.stats()),
                        new_stats: Some(new_node.stats()),
                    });
                }
            }
            (old, new) => {
                if let Some(node @ Node::File(file)) = old {
                    out.push(DiffEntry::deleted(path.clone(), node, file.content()));
                }
                if let Some(node @ Node::File(file)) = new {
                    out.push(DiffEntry::added(path, node, file.content()));
                }
            }
        }

        let old_dir = old.and_then(Node::as_directory);
        let new_dir = new.and_then(Node::as_directory);
        if old_dir.is_some() || new_dir.is_some() {
            diff_directories(old_dir, new_dir, segments, out);
        }

        segments.pop();
    }
}
