//! In-memory node tree
//!
//! The tree is a single owned [`node::Node`] rooted at a directory. Lookups
//! go through [`resolve::Resolver`], which threads the physical path through
//! traversal instead of storing parent pointers.

pub mod hasher;
pub mod node;
pub mod resolve;
pub mod walker;

pub use node::{DirectoryNode, FileNode, Metadata, Node, SymlinkNode, DIRECTORY_SIZE};
pub use resolve::Resolver;
pub use walker::{GlobOptions, Walker};
