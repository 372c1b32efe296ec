//! # Vaultgate Runtime
//!
//! Demo driver for the secure key/value client.
//!
//! ## Sequence
//!
//! 1. Load configuration (defaults, `VG_CONFIG` file, environment)
//! 2. Initialize telemetry
//! 3. Build in-memory collaborators and the controller (seeds `sample`)
//! 4. Enter foreground, write a value, read two values while simulating
//!    sensor touches
//! 5. Enter background and exit (or exit early on Ctrl+C)
//!
//! Every `ViewUpdate` is rendered as a log line.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use shared_types::{view_channel, IndicatorState, Notification, ViewUpdate};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;
use vault_runtime::{LifecyclePhase, RuntimeConfig, VaultController};
use vault_telemetry::init_telemetry;
use vg_01_secure_storage::{MemoryEntryStore, MemorySecureStore, SensorOutcome};

/// How long the simulated user takes between touches.
const TOUCH_PAUSE: Duration = Duration::from_millis(300);

#[tokio::main]
async fn main() -> Result<()> {
    let config = RuntimeConfig::from_env().context("Failed to load runtime configuration")?;
    let _telemetry =
        init_telemetry(config.telemetry.clone()).context("Failed to initialize telemetry")?;

    info!("===========================================");
    info!("  Vaultgate Runtime v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    let entries = MemoryEntryStore::new();
    let store = MemorySecureStore::new(entries.clone());
    let (view, updates) = view_channel();
    let renderer = tokio::spawn(render(updates));

    let mut controller =
        VaultController::create(config, Arc::new(store.clone()), Arc::new(entries), view).await;

    tokio::select! {
        result = run_demo(&mut controller, &store) => result?,
        _ = tokio::signal::ctrl_c() => info!("[runtime] Interrupted, shutting down"),
    }

    if controller.phase() != LifecyclePhase::Background {
        controller
            .enter_background()
            .await
            .context("Failed to leave foreground")?;
    }

    // Dropping the controller closes the view channel and ends the renderer.
    drop(controller);
    renderer.await.context("Renderer task failed")?;

    info!(
        reads = store.reads_issued(),
        writes = store.writes_issued(),
        "[runtime] Done"
    );
    Ok(())
}

async fn run_demo(controller: &mut VaultController, store: &MemorySecureStore) -> Result<()> {
    controller.wait_for_seed().await;

    if controller.enter_foreground().await? == LifecyclePhase::Disabled {
        info!("[runtime] Secure storage unavailable; nothing to demonstrate");
        return Ok(());
    }

    controller.set_key_text("greeting")?;
    controller.set_value_text("Hi from the demo")?;
    controller.submit_write()?;
    controller.flush_writes().await?;

    // First read: one rejected touch, wait for auto-recovery, then success.
    controller.submit_read("sample")?;
    wait_for_listening_read(store).await?;
    tokio::time::sleep(TOUCH_PAUSE).await;
    store.touch(SensorOutcome::NotRecognized(None));
    tokio::time::sleep(controller.config().recovery_delay() + TOUCH_PAUSE).await;
    store.touch(SensorOutcome::Recognized);
    tokio::time::sleep(TOUCH_PAUSE).await;

    // Second read, picked from the entry list.
    let greeting = store
        .entries()
        .snapshot()
        .into_iter()
        .find(|entry| entry.key.as_str() == "greeting")
        .context("Written entry missing from the list")?;
    controller.select_entry(&greeting)?;
    wait_for_listening_read(store).await?;
    store.touch(SensorOutcome::Recognized);
    tokio::time::sleep(TOUCH_PAUSE).await;

    if let Some(metrics) = controller.switch_metrics() {
        info!(?metrics, "[runtime] Read switch metrics");
    }
    controller.enter_background().await?;
    Ok(())
}

async fn wait_for_listening_read(store: &MemorySecureStore) -> Result<()> {
    tokio::time::timeout(Duration::from_secs(5), async {
        while store.listening_reads() == 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .context("Read never reached the sensor")
}

async fn render(mut updates: UnboundedReceiver<ViewUpdate>) {
    while let Some(update) = updates.recv().await {
        match update {
            ViewUpdate::Indicator(state) => {
                let icon = match state {
                    IndicatorState::Off => "○",
                    IndicatorState::On => "◉",
                    IndicatorState::Error => "✕",
                };
                info!("[view] indicator {icon} ({state:?})");
            }
            ViewUpdate::Message(text) => info!("[view] message \"{text}\""),
            ViewUpdate::Notify(Notification::Value(text)) => info!("[view] toast: {text}"),
            ViewUpdate::Notify(Notification::Anomaly(text)) => info!("[view] toast (!): {text}"),
            ViewUpdate::WriteEnabled(enabled) => info!("[view] write enabled = {enabled}"),
            ViewUpdate::InputsEnabled(enabled) => info!("[view] inputs enabled = {enabled}"),
            ViewUpdate::InputsCleared => info!("[view] inputs cleared"),
            ViewUpdate::Entries(entries) => {
                let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
                info!("[view] entries {keys:?}");
            }
        }
    }
}
