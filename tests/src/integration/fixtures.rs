//! Shared harness for integration scenarios.

use std::sync::Arc;
use std::time::Duration;

use shared_types::{view_channel, Payload, StorageKey, ViewUpdate};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::timeout;
use vault_runtime::{RuntimeConfig, VaultController};
use vg_01_secure_storage::{MemoryEntryStore, MemorySecureStore};

/// Longest a scenario waits for something that should happen.
pub const PATIENCE: Duration = Duration::from_secs(5);

pub fn key(k: &str) -> StorageKey {
    StorageKey::new(k).expect("valid key")
}

/// Controller wired to an in-memory store, plus the renderer's end of the
/// view channel.
pub struct Harness {
    pub store: MemorySecureStore,
    pub controller: VaultController,
    pub updates: UnboundedReceiver<ViewUpdate>,
}

impl Harness {
    /// Capable store holding `a → alpha` and `b → beta`, seeding disabled.
    pub async fn capable() -> Self {
        let store = MemorySecureStore::new(MemoryEntryStore::new())
            .with_value(key("a"), Payload::from_text("alpha"))
            .with_value(key("b"), Payload::from_text("beta"));
        let config = RuntimeConfig {
            seed: None,
            ..RuntimeConfig::default()
        };
        Self::with(store, config).await
    }

    pub async fn with(store: MemorySecureStore, config: RuntimeConfig) -> Self {
        let (view, updates) = view_channel();
        let controller = VaultController::create(
            config,
            Arc::new(store.clone()),
            Arc::new(store.entries()),
            view,
        )
        .await;
        Self {
            store,
            controller,
            updates,
        }
    }

    /// Everything published so far, without waiting.
    pub fn drain(&mut self) -> Vec<ViewUpdate> {
        let mut seen = Vec::new();
        while let Ok(update) = self.updates.try_recv() {
            seen.push(update);
        }
        seen
    }

    /// Next update that is not an entry snapshot.
    pub async fn next(&mut self) -> ViewUpdate {
        loop {
            let update = timeout(PATIENCE, self.updates.recv())
                .await
                .expect("update within patience")
                .expect("view channel open");
            if !matches!(update, ViewUpdate::Entries(_)) {
                return update;
            }
        }
    }

    /// Updates (other than entry snapshots) published during `window`.
    pub async fn collect_for(&mut self, window: Duration) -> Vec<ViewUpdate> {
        let mut seen = Vec::new();
        let deadline = tokio::time::Instant::now() + window;
        while let Ok(Some(update)) = tokio::time::timeout_at(deadline, self.updates.recv()).await {
            if !matches!(update, ViewUpdate::Entries(_)) {
                seen.push(update);
            }
        }
        seen
    }

    /// Wait until a read is waiting on the sensor.
    pub async fn wait_for_sensor(&self) {
        timeout(PATIENCE, async {
            while self.store.listening_reads() == 0 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("read reached the sensor");
    }
}
