//! Memfs: an in-memory hierarchical filesystem
//!
//! Files, directories and symlinks live in a single owned node tree.
//! Paths are normalized and validated before use, symlinks resolve at
//! traversal time with depth-bounded loop detection, glob patterns search
//! the tree depth-first, and whole-tree snapshots can be restored or
//! diffed against each other and the live tree.

pub mod config;
pub mod error;
pub mod events;
pub mod fs;
pub mod glob;
pub mod interchange;
pub mod logging;
pub mod path;
pub mod shared;
pub mod snapshot;
pub mod tree;
pub mod types;

pub use config::{ConfigLoader, FsConfig};
pub use error::{ConfigError, ErrorKind, FsError, FsResult};
pub use events::{ChannelObserver, Coalescer, FsEvent, FsObserver};
pub use fs::MemoryFs;
pub use interchange::Layout;
pub use shared::{AsyncFileSystem, SharedFs};
pub use snapshot::{ChangeKind, DiffEntry, SnapshotInfo};
pub use tree::GlobOptions;
pub use types::{DirEntry, Encoding, NodeKind, Stats};
