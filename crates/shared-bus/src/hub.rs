//! # Multicast Hub
//!
//! Publishing side of the bus: pulls from one [`EventSource`] and broadcasts
//! each event to every attached listener.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use shared_types::ReadOutcome;
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::source::EventSource;
use crate::subscriber::{ListenerRegistry, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;

/// Errors from hub operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HubError {
    /// `connect()` was already called; the upstream can be activated once.
    #[error("Hub already connected")]
    AlreadyConnected,
}

/// Multicast hub with deferred activation.
///
/// Uses `tokio::sync::broadcast` so that each listener sees every event
/// without the upstream being polled more than once.
pub struct MulticastHub<S: EventSource> {
    /// Broadcast sender for events.
    sender: broadcast::Sender<ReadOutcome>,

    /// Upstream, taken by `connect()`.
    source: Mutex<Option<S>>,

    /// Attached listener count by name.
    listeners: ListenerRegistry,

    /// Total events published.
    events_published: Arc<AtomicU64>,

    /// Channel capacity.
    capacity: usize,
}

impl<S: EventSource> MulticastHub<S> {
    /// Create a new hub with default capacity.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self::with_capacity(source, DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new hub with specified per-listener capacity.
    #[must_use]
    pub fn with_capacity(source: S, capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            source: Mutex::new(Some(source)),
            listeners: Arc::new(RwLock::new(HashMap::new())),
            events_published: Arc::new(AtomicU64::new(0)),
            capacity,
        }
    }

    /// Attach a listener.
    ///
    /// Before `connect()` the listener is guaranteed to see the first event.
    /// After `connect()` it sees only events published from now on.
    #[must_use]
    pub fn subscribe(&self, listener: &'static str) -> Subscription {
        let receiver = self.sender.subscribe();

        if let Ok(mut listeners) = self.listeners.write() {
            *listeners.entry(listener).or_insert(0) += 1;
        }

        debug!(listener, connected = self.is_connected(), "Listener attached");

        Subscription::new(receiver, listener, self.listeners.clone())
    }

    /// Activate the upstream and start fanning events out.
    ///
    /// Must be called from within a Tokio runtime. The returned
    /// [`Connection`] stops the upstream when disconnected or dropped.
    pub fn connect(&self) -> Result<Connection, HubError> {
        let source = self
            .source
            .lock()
            .ok()
            .and_then(|mut slot| slot.take())
            .ok_or(HubError::AlreadyConnected)?;

        info!(
            listeners = self.subscriber_count(),
            "[shared-bus] Hub connected, upstream activated"
        );

        let handle = tokio::spawn(pump(
            source,
            self.sender.clone(),
            Arc::clone(&self.events_published),
        ));

        Ok(Connection {
            handle: Some(handle),
        })
    }

    /// Whether `connect()` has been called.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.source
            .lock()
            .map(|slot| slot.is_none())
            .unwrap_or(true)
    }

    /// Get the number of attached listeners.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Get the number of listeners attached under `listener`.
    #[must_use]
    pub fn listener_count(&self, listener: &str) -> usize {
        self.listeners
            .read()
            .ok()
            .and_then(|listeners| listeners.get(listener).copied())
            .unwrap_or(0)
    }

    /// Get the total number of events published.
    #[must_use]
    pub fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }

    /// Get the channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Forward upstream events to every listener until the upstream ends.
async fn pump<S: EventSource>(
    mut source: S,
    sender: broadcast::Sender<ReadOutcome>,
    published: Arc<AtomicU64>,
) {
    while let Some(event) = source.next_event().await {
        published.fetch_add(1, Ordering::Relaxed);
        let operation = event.operation;
        let state = event.event.state();

        match sender.send(event) {
            Ok(receivers) => {
                debug!(%operation, %state, receivers, "Event published");
            }
            Err(_) => {
                debug!(%operation, %state, "Event dropped (no listeners)");
            }
        }
    }
    info!("[shared-bus] Upstream ended, hub pump stopped");
}

/// Handle to an activated hub.
///
/// Dropping the connection stops the upstream; `disconnect()` additionally
/// waits until the upstream has actually been dropped.
pub struct Connection {
    handle: Option<JoinHandle<()>>,
}

impl Connection {
    /// Stop the upstream and wait for it to be released.
    pub async fn disconnect(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            // Cancelled (or already finished); either way the upstream is gone.
            let _ = handle.await;
            debug!("[shared-bus] Hub disconnected");
        }
    }

    /// Stop pumping without waiting. No event is published once the pump
    /// task is next scheduled; `disconnect()` still reaps it.
    pub fn abort(&self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }

    /// Whether the upstream is still being pumped.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
