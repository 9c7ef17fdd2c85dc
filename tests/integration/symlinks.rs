//! Integration tests for symlink resolution through the public API

use memfs::config::FsConfig;
use memfs::{ErrorKind, MemoryFs};

/// Relative targets resolve from the link's own directory, not the cwd
#[test]
fn test_relative_target_ignores_working_directory() {
    let mut fs = MemoryFs::new();
    fs.write_file("/etc/app/config.toml", "a = 1").unwrap();
    fs.create_symlink("app/config.toml", "/etc/current").unwrap();
    fs.create_directory("/home", false).unwrap();
    fs.set_cwd("/home").unwrap();

    assert_eq!(fs.read_file("/etc/current").unwrap(), b"a = 1");
    assert_eq!(fs.read_file("../etc/current").unwrap(), b"a = 1");
}

#[test]
fn test_links_in_the_middle_of_paths() {
    let mut fs = MemoryFs::new();
    fs.write_file("/releases/v2/bin/tool", "#!").unwrap();
    fs.create_symlink("/releases/v2", "/current").unwrap();

    assert!(fs.is_file("/current/bin/tool"));
    assert_eq!(fs.real_path("/current/bin/tool").unwrap(), "/releases/v2/bin/tool");
    fs.write_file("/current/bin/other", "x").unwrap();
    assert!(fs.is_file("/releases/v2/bin/other"));
}

#[test]
fn test_dangling_links() {
    let mut fs = MemoryFs::new();
    fs.create_symlink("/not/yet", "/pending").unwrap();

    assert!(fs.is_symlink("/pending"));
    assert!(!fs.exists("/pending"));
    assert_eq!(fs.stat("/pending").unwrap_err().kind(), ErrorKind::FileNotFound);
    assert_eq!(fs.read_link("/pending").unwrap(), "/not/yet");
}

#[test]
fn test_longer_cycles_are_detected() {
    let mut fs = MemoryFs::new();
    fs.create_symlink("/c", "/a").unwrap();
    fs.create_symlink("/a", "/b").unwrap();
    fs.create_symlink("/b", "/c").unwrap();
    for link in ["/a", "/b", "/c"] {
        assert_eq!(fs.read_file(link).unwrap_err().kind(), ErrorKind::SymlinkLoop);
    }
    // Reaching through a looping directory link fails the same way
    assert_eq!(fs.read_file("/a/x").unwrap_err().kind(), ErrorKind::SymlinkLoop);
}

/// The bound is an approximation: a long enough acyclic chain is reported
/// as a loop too
#[test]
fn test_configured_depth_bound() {
    let mut config = FsConfig::default();
    config.resolver.max_symlink_depth = 3;
    let mut fs = MemoryFs::with_config(config);

    fs.write_file("/end", "done").unwrap();
    fs.create_symlink("/end", "/l1").unwrap();
    fs.create_symlink("/l1", "/l2").unwrap();
    fs.create_symlink("/l2", "/l3").unwrap();
    assert_eq!(fs.read_file("/l3").unwrap(), b"done");

    fs.create_symlink("/l3", "/l4").unwrap();
    fs.create_symlink("/l4", "/l5").unwrap();
    assert_eq!(fs.read_file("/l5").unwrap_err().kind(), ErrorKind::SymlinkLoop);
}
