//! Integration tests for the in-memory filesystem

mod events_flow;
mod glob_search;
mod shared_fs;
mod snapshot_diff;
mod symlinks;
mod test_utils;
