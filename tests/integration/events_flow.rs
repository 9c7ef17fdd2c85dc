//! Integration tests for commit events

use memfs::{ChannelObserver, Coalescer, FsEvent, MemoryFs};
use std::sync::Arc;

fn describe(event: &FsEvent) -> String {
    match event {
        FsEvent::FileChanged { path, .. } => format!("changed {}", path),
        FsEvent::DirectoryAdded { path, .. } => format!("added {}", path),
        FsEvent::Removed { path, is_directory } => format!("removed {} dir={}", path, is_directory),
    }
}

#[test]
fn test_every_mutation_emits_one_event_per_node() {
    let mut fs = MemoryFs::new();
    let (observer, receiver) = ChannelObserver::new_pair();
    fs.subscribe(Arc::new(observer));

    fs.create_directory("/a/b", true).unwrap();
    fs.write_file("/a/b/f", "1").unwrap();
    fs.append_file("/a/b/f", "2").unwrap();
    fs.chmod("/a/b/f", 0o600).unwrap();
    fs.rename("/a/b/f", "/a/g").unwrap();
    fs.delete_directory("/a", true).unwrap();

    let events: Vec<String> = receiver.try_iter().map(|e| describe(&e)).collect();
    assert_eq!(
        events,
        vec![
            "added /a",
            "added /a/b",
            "changed /a/b/f",
            "changed /a/b/f",
            "changed /a/b/f",
            "changed /a/g",
            "removed /a/b/f dir=false",
            "removed /a dir=true",
        ]
    );
}

#[test]
fn test_failed_operations_emit_nothing() {
    let mut fs = MemoryFs::new();
    let (observer, receiver) = ChannelObserver::new_pair();
    fs.write_file("/d/x", "x").unwrap();
    fs.subscribe(Arc::new(observer));

    assert!(fs.delete_directory("/d", false).is_err());
    assert!(fs.write_file("/d/x/y", "y").is_err());
    assert!(receiver.try_iter().next().is_none());
}

/// The coalescer keeps only the latest event per path
#[test]
fn test_coalescer_as_debounce_buffer() {
    let mut fs = MemoryFs::new();
    let coalescer = Arc::new(Coalescer::new());
    fs.subscribe(coalescer.clone());

    for i in 0..10 {
        fs.write_file("/counter", i.to_string()).unwrap();
    }
    fs.write_file("/other", "x").unwrap();
    fs.delete_file("/other").unwrap();

    let drained = coalescer.drain();
    assert_eq!(drained.len(), 2);
    match &drained[0] {
        FsEvent::FileChanged { path, stats } => {
            assert_eq!(path, "/counter");
            assert_eq!(stats.size, 1);
        }
        other => panic!("unexpected event {:?}", other),
    }
    assert!(matches!(&drained[1], FsEvent::Removed { path, .. } if path == "/other"));
    assert!(coalescer.is_empty());
}

#[test]
fn test_multiple_observers_all_notified() {
    let mut fs = MemoryFs::new();
    let (first, first_rx) = ChannelObserver::new_pair();
    let (second, second_rx) = ChannelObserver::new_pair();
    fs.subscribe(Arc::new(first));
    fs.subscribe(Arc::new(second));

    fs.write_file("/f", "x").unwrap();
    assert_eq!(first_rx.try_iter().count(), 1);
    assert_eq!(second_rx.try_iter().count(), 1);
}
