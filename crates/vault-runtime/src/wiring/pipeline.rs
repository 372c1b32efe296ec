//! Session assembly.
//!
//! ```text
//!  ReadRequester ──→ ReadSwitch ──→ MulticastHub ──┬──→ StateProjector
//!                        ↑               (connect  ├──→ anomaly listener
//!                        │                last)    └──→ value listener
//!                   SecureStore
//!
//!  EntryStore ──→ forward_entries ──→ ViewSender
//!  WriteGate  ──→ SecureStore
//! ```
//!
//! Every listener subscribes before `connect()`, so none can miss the first
//! event of the session.

use std::sync::Arc;

use futures::StreamExt;
use shared_bus::MulticastHub;
use shared_types::{SessionId, ViewSender, ViewUpdate};
use tokio::task::JoinSet;
use tracing::{debug, info};
use vg_01_secure_storage::{EntryStore, EntryStream, SecureStore};
use vg_02_read_multiplexer::ReadMultiplexer;
use vg_03_presentation::{listeners, run_anomaly_listener, run_value_listener, StateProjector};
use vg_04_write_gate::WriteGate;

use crate::container::RuntimeConfig;
use crate::lifecycle::{ForegroundSession, SessionError};

/// Build and activate the full read/write pipeline for one session.
///
/// Must be called within a Tokio runtime.
pub fn build_session(
    config: &RuntimeConfig,
    store: Arc<dyn SecureStore>,
    entries: &dyn EntryStore,
    view: ViewSender,
) -> Result<ForegroundSession, SessionError> {
    let id = SessionId::new();

    let (requester, switch) = ReadMultiplexer::new(Arc::clone(&store));
    let hub = MulticastHub::with_capacity(switch, config.hub_capacity);

    let mut tasks = JoinSet::new();
    let projector = StateProjector::new(config.projector(), view.clone());
    tasks.spawn(projector.run(hub.subscribe(listeners::PROJECTOR), requester.operations()));
    tasks.spawn(run_anomaly_listener(
        hub.subscribe(listeners::ANOMALY),
        view.clone(),
    ));
    tasks.spawn(run_value_listener(
        hub.subscribe(listeners::VALUES),
        view.clone(),
    ));

    let connection = hub.connect()?;
    debug!(session = %id, listeners = hub.subscriber_count(), "[runtime] Hub connected");

    tasks.spawn(forward_entries(entries.entries(), view.clone()));
    let write_gate = WriteGate::new(store, view);

    info!(session = %id, tasks = tasks.len(), "[runtime] Pipeline active");
    Ok(ForegroundSession::new(
        id, requester, write_gate, connection, tasks,
    ))
}

/// Publish every entry snapshot until the store or the renderer goes away.
pub async fn forward_entries(mut entries: EntryStream, view: ViewSender) {
    while let Some(snapshot) = entries.next().await {
        debug!(entries = snapshot.len(), "[runtime] Entries updated");
        if !view.send(ViewUpdate::Entries(snapshot)) {
            break;
        }
    }
}
