//! Write gate service.

use std::sync::Arc;

use shared_types::{IndicatorState, ViewSender, ViewUpdate, WriteRequest};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use vg_01_secure_storage::SecureStore;

use crate::domain::WriteInputs;
use crate::error::WriteGateError;

/// Write side of a foreground session.
///
/// Input changes and submissions come from the presentation context; the
/// store write itself runs as a task owned by the gate, so dropping or
/// shutting down the gate cancels writes still in flight.
pub struct WriteGate {
    store: Arc<dyn SecureStore>,
    view: ViewSender,
    inputs: WriteInputs,
    writes: JoinSet<()>,
}

impl WriteGate {
    /// Create the gate and publish the initial (disabled) enablement.
    pub fn new(store: Arc<dyn SecureStore>, view: ViewSender) -> Self {
        let gate = Self {
            store,
            view,
            inputs: WriteInputs::new(),
            writes: JoinSet::new(),
        };
        gate.publish_enabled();
        gate
    }

    pub fn set_key(&mut self, key: impl Into<String>) -> bool {
        self.inputs.set_key(key);
        self.publish_enabled()
    }

    pub fn set_value(&mut self, value: impl Into<String>) -> bool {
        self.inputs.set_value(value);
        self.publish_enabled()
    }

    pub fn is_enabled(&self) -> bool {
        self.inputs.is_complete()
    }

    pub fn inputs(&self) -> &WriteInputs {
        &self.inputs
    }

    /// Capture the inputs, reset the view and start the write.
    ///
    /// Must be called within a Tokio runtime. The returned request is the
    /// one handed to the store.
    pub fn submit(&mut self) -> Result<WriteRequest, WriteGateError> {
        let request = self.inputs.take()?;

        self.view.indicator(IndicatorState::Off);
        self.view.message("");
        self.view.send(ViewUpdate::InputsCleared);
        self.publish_enabled();

        self.reap_finished();
        let store = Arc::clone(&self.store);
        let WriteRequest { key, payload } = request.clone();
        self.writes.spawn(async move {
            match store.write(&key, payload).await {
                Ok(()) => debug!(%key, "[vg-04] Write completed"),
                Err(e) => warn!(%key, error = %e, "[vg-04] Write failed"),
            }
        });

        info!(key = %request.key, bytes = request.payload.len(), "[vg-04] Write submitted");
        Ok(request)
    }

    /// Writes started but not yet finished.
    pub fn pending_writes(&self) -> usize {
        self.writes.len()
    }

    /// Wait for every started write to finish.
    pub async fn flush(&mut self) {
        while self.writes.join_next().await.is_some() {}
    }

    /// Request cancellation of every write in flight without waiting.
    pub fn abort_all(&mut self) {
        self.writes.abort_all();
    }

    /// Cancel writes still in flight.
    pub async fn shutdown(&mut self) {
        let pending = self.writes.len();
        self.writes.shutdown().await;
        if pending > 0 {
            debug!(pending, "[vg-04] Pending writes cancelled");
        }
    }

    fn publish_enabled(&self) -> bool {
        let enabled = self.inputs.is_complete();
        self.view.send(ViewUpdate::WriteEnabled(enabled));
        enabled
    }

    fn reap_finished(&mut self) {
        while let Some(result) = self.writes.try_join_next() {
            if let Err(e) = result {
                if e.is_panic() {
                    warn!(error = %e, "[vg-04] Write task panicked");
                }
            }
        }
    }
}
