//! Structural fingerprints for node trees using BLAKE3
//!
//! Timestamps are excluded, so two trees with the same shape, content and
//! ownership hash identically no matter when they were built.

use crate::tree::node::Node;
use blake3::Hasher;

/// 256-bit digest
pub type Hash = [u8; 32];

/// Compute content hash for file bytes
pub fn compute_content_hash(content: &[u8]) -> Hash {
    *blake3::hash(content).as_bytes()
}

/// Compute the hash of a node and everything below it
///
/// - file: hash("file" || name || content_hash || metadata)
/// - symlink: hash("symlink" || name || target || metadata)
/// - directory: hash("directory" || name || child_count || (name, hash)* || metadata)
///
/// Children are visited in name order.
pub fn compute_node_hash(node: &Node) -> Hash {
    let mut hasher = Hasher::new();

    match node {
        Node::File(file) => {
            hasher.update(b"file");
            update_name(&mut hasher, node.name());
            hasher.update(&compute_content_hash(file.content()));
        }
        Node::Symlink(link) => {
            hasher.update(b"symlink");
            update_name(&mut hasher, node.name());
            hasher.update(&(link.target().len() as u64).to_be_bytes());
            hasher.update(link.target().as_bytes());
        }
        Node::Directory(dir) => {
            hasher.update(b"directory");
            update_name(&mut hasher, node.name());
            hasher.update(&(dir.len() as u64).to_be_bytes());
            for name in dir.sorted_names() {
                if let Some(child) = dir.get(name) {
                    hasher.update(name.as_bytes());
                    hasher.update(b":");
                    hasher.update(&compute_node_hash(child));
                }
            }
        }
    }

    let meta = node.metadata();
    hasher.update(&meta.mode.to_be_bytes());
    hasher.update(&meta.uid.to_be_bytes());
    hasher.update(&meta.gid.to_be_bytes());

    *hasher.finalize().as_bytes()
}

/// Hex-encoded [`compute_node_hash`]
pub fn fingerprint(node: &Node) -> String {
    hex::encode(compute_node_hash(node))
}

fn update_name(hasher: &mut Hasher, name: &str) {
    // Length prefix keeps ("ab", "c") distinct from ("a", "bc")
    hasher.update(&(name.len() as u64).to_be_bytes());
    hasher.update(name.as_bytes());
}
