//! In-memory secure store with a simulated authentication sensor.
//!
//! Every read of a known key emits `NEEDS_AUTH` and then waits for the
//! sensor. Each `touch()` is delivered to every read that is currently
//! listening and becomes exactly one event:
//!
//! ```text
//! Recognized      → READY(value)              (terminal)
//! NotRecognized   → AUTHORIZATION_ERROR
//! Retry           → RECOVERABLE_ERROR
//! Failed          → UNRECOVERABLE_ERROR       (terminal)
//! ```
//!
//! Reads of unknown keys complete immediately with `READY` and an empty
//! payload. Values are kept in plain memory.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures::{stream, StreamExt};
use parking_lot::RwLock;
use shared_types::{AuthEvent, Payload, StorageKey};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::memory_entries::MemoryEntryStore;
use crate::error::StoreError;
use crate::ports::{AuthEventStream, SecureStore};

const SENSOR_CAPACITY: usize = 16;

/// One reading of the simulated sensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SensorOutcome {
    Recognized,
    NotRecognized(Option<String>),
    Retry(Option<String>),
    Failed(Option<String>),
}

struct StoreState {
    capable: AtomicBool,
    fail_writes: AtomicBool,
    values: RwLock<HashMap<StorageKey, Payload>>,
    entries: MemoryEntryStore,
    sensor: broadcast::Sender<SensorOutcome>,
    capability_checks: AtomicU64,
    reads_issued: AtomicU64,
    writes_issued: AtomicU64,
    active_reads: AtomicUsize,
}

/// Map-backed `SecureStore`.
///
/// Cloning yields another handle to the same store.
#[derive(Clone)]
pub struct MemorySecureStore {
    state: Arc<StoreState>,
}

impl MemorySecureStore {
    /// Create a capable store that mirrors writes into `entries`.
    #[must_use]
    pub fn new(entries: MemoryEntryStore) -> Self {
        let (sensor, _) = broadcast::channel(SENSOR_CAPACITY);
        Self {
            state: Arc::new(StoreState {
                capable: AtomicBool::new(true),
                fail_writes: AtomicBool::new(false),
                values: RwLock::new(HashMap::new()),
                entries,
                sensor,
                capability_checks: AtomicU64::new(0),
                reads_issued: AtomicU64::new(0),
                writes_issued: AtomicU64::new(0),
                active_reads: AtomicUsize::new(0),
            }),
        }
    }

    /// Create a store whose capability check reports `false`.
    #[must_use]
    pub fn incapable(entries: MemoryEntryStore) -> Self {
        let store = Self::new(entries);
        store.set_capable(false);
        store
    }

    /// Store a value directly, bypassing write accounting.
    #[must_use]
    pub fn with_value(self, key: StorageKey, payload: Payload) -> Self {
        self.insert(key, payload);
        self
    }

    pub fn set_capable(&self, capable: bool) {
        self.state.capable.store(capable, Ordering::SeqCst);
    }

    /// Make every subsequent write fail with `StoreError::WriteFailed`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.state.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Present one sensor reading to every listening read.
    ///
    /// Returns how many reads received it.
    pub fn touch(&self, outcome: SensorOutcome) -> usize {
        match self.state.sensor.send(outcome) {
            Ok(reads) => reads,
            Err(_) => {
                debug!("Sensor touched with no read listening");
                0
            }
        }
    }

    /// Number of reads currently listening to the sensor.
    #[must_use]
    pub fn listening_reads(&self) -> usize {
        self.state.sensor.receiver_count()
    }

    /// Stored value for `key`, if any.
    #[must_use]
    pub fn value(&self, key: &StorageKey) -> Option<Payload> {
        self.state.values.read().get(key).cloned()
    }

    /// Handle to the entry store this store mirrors into.
    #[must_use]
    pub fn entries(&self) -> MemoryEntryStore {
        self.state.entries.clone()
    }

    #[must_use]
    pub fn capability_checks(&self) -> u64 {
        self.state.capability_checks.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn reads_issued(&self) -> u64 {
        self.state.reads_issued.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn writes_issued(&self) -> u64 {
        self.state.writes_issued.load(Ordering::Relaxed)
    }

    /// Reads whose stream has not been dropped yet.
    #[must_use]
    pub fn active_reads(&self) -> usize {
        self.state.active_reads.load(Ordering::SeqCst)
    }

    fn insert(&self, key: StorageKey, payload: Payload) {
        self.state.values.write().insert(key.clone(), payload.clone());
        self.state.entries.put(key, payload);
    }
}

#[async_trait]
impl SecureStore for MemorySecureStore {
    async fn can_store_securely(&self) -> bool {
        self.state.capability_checks.fetch_add(1, Ordering::Relaxed);
        self.state.capable.load(Ordering::SeqCst)
    }

    async fn write(&self, key: &StorageKey, payload: Payload) -> Result<(), StoreError> {
        self.state.writes_issued.fetch_add(1, Ordering::Relaxed);

        if !self.state.capable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable);
        }
        if self.state.fail_writes.load(Ordering::SeqCst) {
            warn!(%key, "Simulated write failure");
            return Err(StoreError::WriteFailed {
                key: key.to_string(),
                reason: "simulated failure".into(),
            });
        }

        debug!(%key, bytes = payload.len(), "Stored value");
        self.insert(key.clone(), payload);
        Ok(())
    }

    fn read(&self, key: &StorageKey) -> AuthEventStream {
        self.state.reads_issued.fetch_add(1, Ordering::Relaxed);
        let guard = ActiveRead::new(Arc::clone(&self.state));

        let Some(value) = self.value(key) else {
            debug!(%key, "Read of unknown key");
            return stream::once(async move {
                let _guard = guard;
                AuthEvent::ready(Payload::default())
            })
            .boxed();
        };

        // Subscribe now so touches made after read() returns are not missed.
        let script = ReadScript {
            _guard: guard,
            sensor: self.state.sensor.subscribe(),
            value,
            phase: Phase::Prompt,
        };
        stream::unfold(script, |mut script| async move {
            let event = script.step().await?;
            Some((event, script))
        })
        .boxed()
    }
}

/// Decrements the active read count when the read stream is dropped.
struct ActiveRead {
    state: Arc<StoreState>,
}

impl ActiveRead {
    fn new(state: Arc<StoreState>) -> Self {
        state.active_reads.fetch_add(1, Ordering::SeqCst);
        Self { state }
    }
}

impl Drop for ActiveRead {
    fn drop(&mut self) {
        self.state.active_reads.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Prompt,
    Listening,
    Done,
}

struct ReadScript {
    _guard: ActiveRead,
    sensor: broadcast::Receiver<SensorOutcome>,
    value: Payload,
    phase: Phase,
}

impl ReadScript {
    async fn step(&mut self) -> Option<AuthEvent> {
        match self.phase {
            Phase::Prompt => {
                self.phase = Phase::Listening;
                Some(AuthEvent::needs_auth())
            }
            Phase::Listening => loop {
                match self.sensor.recv().await {
                    Ok(outcome) => return Some(self.apply(outcome)),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Read lagged behind the sensor");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        self.phase = Phase::Done;
                        return None;
                    }
                }
            },
            Phase::Done => None,
        }
    }

    fn apply(&mut self, outcome: SensorOutcome) -> AuthEvent {
        match outcome {
            SensorOutcome::Recognized => {
                self.phase = Phase::Done;
                AuthEvent::ready(self.value.clone())
            }
            SensorOutcome::NotRecognized(message) => {
                attach(AuthEvent::authorization_error(), message)
            }
            SensorOutcome::Retry(message) => attach(AuthEvent::recoverable_error(), message),
            SensorOutcome::Failed(message) => {
                self.phase = Phase::Done;
                attach(AuthEvent::unrecoverable_error(), message)
            }
        }
    }
}

fn attach(event: AuthEvent, message: Option<String>) -> AuthEvent {
    match message {
        Some(message) => event.with_message(message),
        None => event,
    }
}
