//! Commit events
//!
//! After every committed mutation the filesystem calls its observers
//! synchronously, before the mutating call returns. Debouncing and
//! coalescing belong to the observer: [`Coalescer`] is a path-keyed,
//! last-write-wins queue that leaves the flush schedule to its owner.

use crate::types::Stats;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Receiver of commit events
pub trait FsObserver: Send + Sync {
    fn file_changed(&self, path: &str, stats: &Stats);
    fn directory_added(&self, path: &str, stats: &Stats);
    fn removed(&self, path: &str, is_directory: bool);
}

/// Owned form of a commit event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FsEvent {
    FileChanged { path: String, stats: Stats },
    DirectoryAdded { path: String, stats: Stats },
    Removed { path: String, is_directory: bool },
}

impl FsEvent {
    pub fn path(&self) -> &str {
        match self {
            FsEvent::FileChanged { path, .. }
            | FsEvent::DirectoryAdded { path, .. }
            | FsEvent::Removed { path, .. } => path,
        }
    }
}

/// Forwards events over an mpsc channel
pub struct ChannelObserver {
    sender: Mutex<Sender<FsEvent>>,
}

impl ChannelObserver {
    pub fn new_pair() -> (Self, Receiver<FsEvent>) {
        let (sender, receiver) = channel();
        (
            Self {
                sender: Mutex::new(sender),
            },
            receiver,
        )
    }

    fn send(&self, event: FsEvent) {
        // A dropped receiver just means nobody is listening any more
        let _ = self.sender.lock().send(event);
    }
}

impl FsObserver for ChannelObserver {
    fn file_changed(&self, path: &str, stats: &Stats) {
        self.send(FsEvent::FileChanged {
            path: path.to_string(),
            stats: stats.clone(),
        });
    }

    fn directory_added(&self, path: &str, stats: &Stats) {
        self.send(FsEvent::DirectoryAdded {
            path: path.to_string(),
            stats: stats.clone(),
        });
    }

    fn removed(&self, path: &str, is_directory: bool) {
        self.send(FsEvent::Removed {
            path: path.to_string(),
            is_directory,
        });
    }
}

/// Path-keyed last-write-wins event queue
#[derive(Default)]
pub struct Coalescer {
    pending: Mutex<BTreeMap<String, FsEvent>>,
}

impl Coalescer {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: FsEvent) {
        self.pending.lock().insert(event.path().to_string(), event);
    }

    /// Take every pending event, ordered by path
    pub fn drain(&self) -> Vec<FsEvent> {
        std::mem::take(&mut *self.pending.lock())
            .into_values()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}

impl FsObserver for Coalescer {
    fn file_changed(&self, path: &str, stats: &Stats) {
        self.push(FsEvent::FileChanged {
            path: path.to_string(),
            stats: stats.clone(),
        });
    }

    fn directory_added(&self, path: &str, stats: &Stats) {
        self.push(FsEvent::DirectoryAdded {
            path: path.to_string(),
            stats: stats.clone(),
        });
    }

    fn removed(&self, path: &str, is_directory: bool) {
        self.push(FsEvent::Removed {
            path: path.to_string(),
            is_directory,
        });
    }
}
