//! In-memory entry store.

use std::sync::Arc;

use futures::StreamExt;
use shared_types::{Entry, Payload, StorageKey};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::debug;

use crate::ports::{EntryStore, EntryStream};

/// Entry store backed by a `watch` channel holding the sorted snapshot.
///
/// Cloning yields another handle to the same entries.
#[derive(Clone)]
pub struct MemoryEntryStore {
    snapshot: Arc<watch::Sender<Vec<Entry>>>,
}

impl MemoryEntryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(Vec::new());
        Self {
            snapshot: Arc::new(snapshot),
        }
    }

    /// Insert or replace an entry and notify every live `entries()` stream.
    pub fn put(&self, key: StorageKey, payload: Payload) {
        self.snapshot.send_modify(|entries| {
            match entries.binary_search_by(|entry| entry.key.cmp(&key)) {
                Ok(index) => entries[index].payload = payload,
                Err(index) => entries.insert(index, Entry { key, payload }),
            }
        });
        debug!(entries = self.len(), "Entry store updated");
    }

    /// Current entries, sorted by key.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Entry> {
        self.snapshot.borrow().clone()
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshot.borrow().len()
    }

    /// Whether no entries are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshot.borrow().is_empty()
    }
}

impl Default for MemoryEntryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryStore for MemoryEntryStore {
    fn entries(&self) -> EntryStream {
        WatchStream::new(self.snapshot.subscribe()).boxed()
    }
}
