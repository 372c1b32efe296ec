//! Foreground/background controller.

use std::sync::Arc;

use shared_types::{Entry, Payload, SessionId, StorageKey, ViewSender, ViewUpdate, WriteRequest};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use vault_telemetry::log_event;
use vg_01_secure_storage::{EntryStore, SecureStore};
use vg_02_read_multiplexer::SwitchMetricsSnapshot;

use super::error::SessionError;
use super::session::ForegroundSession;
use crate::container::{RuntimeConfig, SeedEntry};
use crate::wiring::build_session;

/// Shown for the whole session when the device cannot store securely.
pub const UNAVAILABLE_MESSAGE: &str = "Cannot store securely. If you have a fingerprint reader, \
                                       make sure you have a fingerprint enrolled.";

/// Observable lifecycle position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    Background,
    /// Foreground with a running pipeline.
    Active,
    /// Foreground without storage; every affordance disabled.
    Disabled,
}

enum LifecycleState {
    Background,
    Active(ForegroundSession),
    Disabled,
}

/// Binds the read/write pipeline to the foreground/background cycle.
///
/// Methods are called from the presentation context, which owns the
/// controller exclusively.
pub struct VaultController {
    config: RuntimeConfig,
    store: Arc<dyn SecureStore>,
    entries: Arc<dyn EntryStore>,
    view: ViewSender,
    state: LifecycleState,
    seed: Option<JoinHandle<()>>,
}

impl VaultController {
    /// Create the controller in `Background`, seeding the sample entry when
    /// storage is usable.
    pub async fn create(
        config: RuntimeConfig,
        store: Arc<dyn SecureStore>,
        entries: Arc<dyn EntryStore>,
        view: ViewSender,
    ) -> Self {
        let seed = match config.seed.clone() {
            Some(seed) => {
                if store.can_store_securely().await {
                    Some(tokio::spawn(write_seed(Arc::clone(&store), seed)))
                } else {
                    debug!("[runtime] Storage unavailable, skipping seed");
                    None
                }
            }
            None => None,
        };

        Self {
            config,
            store,
            entries,
            view,
            state: LifecycleState::Background,
            seed,
        }
    }

    pub fn phase(&self) -> LifecyclePhase {
        match self.state {
            LifecycleState::Background => LifecyclePhase::Background,
            LifecycleState::Active(_) => LifecyclePhase::Active,
            LifecycleState::Disabled => LifecyclePhase::Disabled,
        }
    }

    pub fn session_id(&self) -> Option<SessionId> {
        match &self.state {
            LifecycleState::Active(session) => Some(session.id()),
            _ => None,
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Check capability once and either build the pipeline or disable the
    /// session.
    pub async fn enter_foreground(&mut self) -> Result<LifecyclePhase, SessionError> {
        if !matches!(self.state, LifecycleState::Background) {
            return Err(SessionError::AlreadyInForeground);
        }

        if !self.store.can_store_securely().await {
            self.view.message(UNAVAILABLE_MESSAGE);
            self.view.send(ViewUpdate::InputsEnabled(false));
            self.state = LifecycleState::Disabled;
            log_event!(warn, "runtime", "Foreground entered without secure storage");
            return Ok(LifecyclePhase::Disabled);
        }

        self.view.message("");
        self.view.send(ViewUpdate::InputsEnabled(true));
        let session = build_session(
            &self.config,
            Arc::clone(&self.store),
            self.entries.as_ref(),
            self.view.clone(),
        )?;

        log_event!(info, "runtime", "Foreground entered", session = %session.id());
        self.state = LifecycleState::Active(session);
        Ok(LifecyclePhase::Active)
    }

    /// Tear down everything the foreground session created.
    pub async fn enter_background(&mut self) -> Result<(), SessionError> {
        match std::mem::replace(&mut self.state, LifecycleState::Background) {
            LifecycleState::Background => Err(SessionError::NotInForeground),
            LifecycleState::Disabled => {
                log_event!(info, "runtime", "Background entered");
                Ok(())
            }
            LifecycleState::Active(session) => {
                let id = session.id();
                session.shutdown().await;
                log_event!(info, "runtime", "Background entered", session = %id);
                Ok(())
            }
        }
    }

    /// Read the value stored under `key`, superseding any read in progress.
    pub fn submit_read(&self, key: &str) -> Result<(), SessionError> {
        self.session()?.requester().submit_text(key)?;
        Ok(())
    }

    /// Read the value of a listed entry.
    pub fn select_entry(&self, entry: &Entry) -> Result<(), SessionError> {
        self.submit_key(entry.key.clone())
    }

    pub fn submit_key(&self, key: StorageKey) -> Result<(), SessionError> {
        self.session()?.requester().submit(key)?;
        Ok(())
    }

    /// Update the key input. Returns the new write enablement.
    pub fn set_key_text(&mut self, text: &str) -> Result<bool, SessionError> {
        Ok(self.session_mut()?.write_gate_mut().set_key(text))
    }

    /// Update the value input. Returns the new write enablement.
    pub fn set_value_text(&mut self, text: &str) -> Result<bool, SessionError> {
        Ok(self.session_mut()?.write_gate_mut().set_value(text))
    }

    pub fn submit_write(&mut self) -> Result<WriteRequest, SessionError> {
        Ok(self.session_mut()?.write_gate_mut().submit()?)
    }

    pub fn is_write_enabled(&self) -> bool {
        self.session()
            .map(|session| session.write_gate().is_enabled())
            .unwrap_or(false)
    }

    /// Wait for writes submitted in this session to finish.
    pub async fn flush_writes(&mut self) -> Result<(), SessionError> {
        self.session_mut()?.write_gate_mut().flush().await;
        Ok(())
    }

    /// Wait for the creation-time seed write, if one was started.
    pub async fn wait_for_seed(&mut self) {
        if let Some(seed) = self.seed.take() {
            if let Err(e) = seed.await {
                warn!(error = %e, "[runtime] Seed task failed");
            }
        }
    }

    pub fn switch_metrics(&self) -> Option<SwitchMetricsSnapshot> {
        self.session().ok().map(|session| session.requester().metrics())
    }

    /// Tasks of the active session that are still running.
    pub fn running_tasks(&self) -> usize {
        self.session().map(ForegroundSession::running_tasks).unwrap_or(0)
    }

    fn session(&self) -> Result<&ForegroundSession, SessionError> {
        match &self.state {
            LifecycleState::Active(session) => Ok(session),
            LifecycleState::Disabled => Err(SessionError::StorageUnavailable),
            LifecycleState::Background => Err(SessionError::NotInForeground),
        }
    }

    fn session_mut(&mut self) -> Result<&mut ForegroundSession, SessionError> {
        match &mut self.state {
            LifecycleState::Active(session) => Ok(session),
            LifecycleState::Disabled => Err(SessionError::StorageUnavailable),
            LifecycleState::Background => Err(SessionError::NotInForeground),
        }
    }
}

async fn write_seed(store: Arc<dyn SecureStore>, seed: SeedEntry) {
    let key = match StorageKey::new(seed.key) {
        Ok(key) => key,
        Err(e) => {
            warn!(error = %e, "[runtime] Invalid seed key");
            return;
        }
    };
    match store.write(&key, Payload::from_text(&seed.value)).await {
        Ok(()) => debug!(%key, "[runtime] Seeded sample entry"),
        Err(e) => warn!(%key, error = %e, "[runtime] Seeding failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::view_channel;
    use tokio::sync::mpsc::UnboundedReceiver;
    use vg_01_secure_storage::{MemoryEntryStore, MemorySecureStore};

    fn drain(updates: &mut UnboundedReceiver<ViewUpdate>) -> Vec<ViewUpdate> {
        let mut seen = Vec::new();
        while let Ok(update) = updates.try_recv() {
            seen.push(update);
        }
        seen
    }

    async fn controller(
        store: &MemorySecureStore,
    ) -> (VaultController, UnboundedReceiver<ViewUpdate>) {
        let (view, updates) = view_channel();
        let controller = VaultController::create(
            RuntimeConfig::default(),
            Arc::new(store.clone()),
            Arc::new(store.entries()),
            view,
        )
        .await;
        (controller, updates)
    }

    #[tokio::test]
    async fn test_seeds_when_capable() {
        let store = MemorySecureStore::new(MemoryEntryStore::new());
        let (mut controller, _updates) = controller(&store).await;
        controller.wait_for_seed().await;

        let key = StorageKey::new("sample").expect("key");
        assert_eq!(store.value(&key), Some(Payload::from_text("Hello world!")));
        assert_eq!(controller.phase(), LifecyclePhase::Background);
    }

    #[tokio::test]
    async fn test_no_seed_when_incapable() {
        let store = MemorySecureStore::incapable(MemoryEntryStore::new());
        let (mut controller, _updates) = controller(&store).await;
        controller.wait_for_seed().await;
        assert_eq!(store.writes_issued(), 0);
    }

    #[tokio::test]
    async fn test_foreground_resets_message_and_enables_inputs() {
        let store = MemorySecureStore::new(MemoryEntryStore::new());
        let (mut controller, mut updates) = controller(&store).await;

        assert_eq!(controller.enter_foreground().await, Ok(LifecyclePhase::Active));
        let seen = drain(&mut updates);
        assert_eq!(
            &seen[..3],
            &[
                ViewUpdate::Message(String::new()),
                ViewUpdate::InputsEnabled(true),
                ViewUpdate::WriteEnabled(false),
            ]
        );
        assert!(controller.session_id().is_some());
        controller.enter_background().await.expect("background");
    }

    #[tokio::test]
    async fn test_lifecycle_misuse() {
        let store = MemorySecureStore::new(MemoryEntryStore::new());
        let (mut controller, _updates) = controller(&store).await;

        assert_eq!(controller.submit_read("a"), Err(SessionError::NotInForeground));
        assert_eq!(
            controller.enter_background().await,
            Err(SessionError::NotInForeground)
        );

        controller.enter_foreground().await.expect("foreground");
        assert_eq!(
            controller.enter_foreground().await,
            Err(SessionError::AlreadyInForeground)
        );
        assert!(matches!(
            controller.submit_read(""),
            Err(SessionError::Read(_))
        ));
        controller.enter_background().await.expect("background");
    }

    #[tokio::test]
    async fn test_write_through_controller() {
        let store = MemorySecureStore::new(MemoryEntryStore::new());
        let (mut controller, _updates) = controller(&store).await;
        controller.wait_for_seed().await;
        controller.enter_foreground().await.expect("foreground");

        assert_eq!(controller.set_key_text("greeting"), Ok(false));
        assert_eq!(controller.set_value_text("hi"), Ok(true));
        assert!(controller.is_write_enabled());

        let request = controller.submit_write().expect("write");
        assert_eq!(request.key.as_str(), "greeting");
        assert!(!controller.is_write_enabled());

        controller.flush_writes().await.expect("flush");
        assert_eq!(store.value(&request.key), Some(Payload::from_text("hi")));
        controller.enter_background().await.expect("background");
    }
}
