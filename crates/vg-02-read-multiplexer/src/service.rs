//! Read switch service.
//!
//! Submissions land in a single latest-key slot: a new key replaces any key
//! still waiting there, so a burst of submissions can never push out the
//! newest one. `ReadSwitch` runs inside the hub's pump task. Each poll checks
//! the slot first (biased), so a newer submission always cancels the active
//! read before another of its events is forwarded.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_bus::EventSource;
use shared_types::{AuthEvent, OperationId, ReadOutcome, StorageKey};
use tokio::sync::{watch, Notify};
use tracing::{debug, info};
use vg_01_secure_storage::SecureStore;

use crate::error::MultiplexerError;
use crate::metrics::{SwitchMetrics, SwitchMetricsSnapshot};
use crate::operation::{OperationSequence, ReadOperation};

/// Latest submitted key not yet picked up by the switch.
struct RequestSlot {
    latest: Mutex<Option<StorageKey>>,
    submitted: Notify,
    switch_alive: AtomicBool,
    requesters_alive: AtomicBool,
}

impl RequestSlot {
    /// Wait for the next submission. `None` once every requester is gone and
    /// nothing is left in the slot.
    async fn next_key(&self) -> Option<StorageKey> {
        loop {
            if let Some(key) = self.latest.lock().take() {
                return Some(key);
            }
            if !self.requesters_alive.load(Ordering::SeqCst) {
                return None;
            }
            self.submitted.notified().await;
        }
    }
}

/// Shared by every requester clone; dropped with the last one.
struct RequesterLease {
    slot: Arc<RequestSlot>,
}

impl Drop for RequesterLease {
    fn drop(&mut self) {
        self.slot.requesters_alive.store(false, Ordering::SeqCst);
        self.slot.submitted.notify_one();
    }
}

/// Builds a connected requester/switch pair.
pub struct ReadMultiplexer;

impl ReadMultiplexer {
    #[allow(clippy::new_ret_no_self)]
    pub fn new(store: Arc<dyn SecureStore>) -> (ReadRequester, ReadSwitch) {
        let slot = Arc::new(RequestSlot {
            latest: Mutex::new(None),
            submitted: Notify::new(),
            switch_alive: AtomicBool::new(true),
            requesters_alive: AtomicBool::new(true),
        });
        let (operations_tx, operations_rx) = watch::channel(None);
        let metrics = Arc::new(SwitchMetrics::new());

        let requester = ReadRequester {
            lease: Arc::new(RequesterLease {
                slot: Arc::clone(&slot),
            }),
            operations: operations_rx,
            metrics: Arc::clone(&metrics),
        };
        let switch = ReadSwitch {
            store,
            slot,
            accepting: true,
            active: None,
            sequence: OperationSequence::new(),
            operations: operations_tx,
            metrics,
        };
        (requester, switch)
    }
}

/// Submission handle. Submitting never blocks and never drops the newest key.
#[derive(Clone)]
pub struct ReadRequester {
    lease: Arc<RequesterLease>,
    operations: watch::Receiver<Option<OperationId>>,
    metrics: Arc<SwitchMetrics>,
}

impl ReadRequester {
    /// Read `key`, superseding any active read and any key still waiting.
    pub fn submit(&self, key: StorageKey) -> Result<(), MultiplexerError> {
        if !self.lease.slot.switch_alive.load(Ordering::SeqCst) {
            return Err(MultiplexerError::Closed);
        }

        debug!(%key, "[vg-02] Read submitted");
        if let Some(skipped) = self.lease.slot.latest.lock().replace(key) {
            self.metrics.record_superseded(1);
            debug!(%skipped, "[vg-02] Waiting submission superseded");
        }
        self.lease.slot.submitted.notify_one();
        Ok(())
    }

    /// Like [`submit`](Self::submit) for raw caller text.
    pub fn submit_text(&self, key: &str) -> Result<(), MultiplexerError> {
        let key = StorageKey::new(key).map_err(|_| MultiplexerError::EmptyKey)?;
        self.submit(key)
    }

    /// Watch of the operation most recently started by the switch.
    pub fn operations(&self) -> watch::Receiver<Option<OperationId>> {
        self.operations.clone()
    }

    pub fn metrics(&self) -> SwitchMetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn is_closed(&self) -> bool {
        !self.lease.slot.switch_alive.load(Ordering::SeqCst)
    }
}

/// Consuming side of the multiplexer.
///
/// Owns the only active read. Yields `None` once every requester is gone
/// and the last read has ended.
pub struct ReadSwitch {
    store: Arc<dyn SecureStore>,
    slot: Arc<RequestSlot>,
    accepting: bool,
    active: Option<ReadOperation>,
    sequence: OperationSequence,
    operations: watch::Sender<Option<OperationId>>,
    metrics: Arc<SwitchMetrics>,
}

enum Step {
    Submitted(Option<StorageKey>),
    Event(Option<AuthEvent>),
}

impl ReadSwitch {
    /// Wait for the next event of the active read, switching reads as
    /// submissions arrive.
    pub async fn next_outcome(&mut self) -> Option<ReadOutcome> {
        loop {
            let step = tokio::select! {
                biased;
                request = self.slot.next_key(), if self.accepting => Step::Submitted(request),
                event = next_active(&mut self.active), if self.active.is_some() => Step::Event(event),
                else => return None,
            };

            match step {
                Step::Submitted(Some(key)) => self.switch_to(key),
                Step::Submitted(None) => {
                    debug!("[vg-02] All requesters dropped");
                    self.accepting = false;
                }
                Step::Event(Some(event)) => {
                    if let Some(outcome) = self.forward(event) {
                        return Some(outcome);
                    }
                }
                Step::Event(None) => {
                    if let Some(done) = self.active.take() {
                        self.metrics.record_read_completed();
                        debug!(op = %done.id(), key = %done.key(), "[vg-02] Read completed");
                    }
                }
            }
        }
    }

    /// Operation currently being read, if any.
    pub fn active_operation(&self) -> Option<OperationId> {
        self.active.as_ref().map(ReadOperation::id)
    }

    pub fn metrics(&self) -> SwitchMetricsSnapshot {
        self.metrics.snapshot()
    }

    fn switch_to(&mut self, key: StorageKey) {
        if let Some(previous) = self.active.take() {
            self.metrics.record_read_cancelled();
            debug!(op = %previous.id(), key = %previous.key(), "[vg-02] Read cancelled");
            drop(previous);
        }

        let id = self.sequence.advance();
        self.operations.send_replace(Some(id));
        let events = self.store.read(&key);
        self.metrics.record_read_started();
        info!(op = %id, %key, "[vg-02] Read started");

        self.active = Some(ReadOperation::new(id, key, events));
    }

    fn forward(&self, event: AuthEvent) -> Option<ReadOutcome> {
        let active = self.active.as_ref()?;
        self.metrics.record_event_forwarded();
        debug!(op = %active.id(), state = %event.state(), "[vg-02] Forwarding event");
        Some(ReadOutcome {
            operation: active.id(),
            key: active.key().clone(),
            event,
        })
    }
}

impl Drop for ReadSwitch {
    fn drop(&mut self) {
        self.slot.switch_alive.store(false, Ordering::SeqCst);
    }
}

async fn next_active(active: &mut Option<ReadOperation>) -> Option<AuthEvent> {
    match active {
        Some(operation) => operation.next_event().await,
        None => std::future::pending().await,
    }
}

#[async_trait]
impl EventSource for ReadSwitch {
    async fn next_event(&mut self) -> Option<ReadOutcome> {
        self.next_outcome().await
    }
}
