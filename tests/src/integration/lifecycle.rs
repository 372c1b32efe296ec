//! # Lifecycle Scenarios
//!
//! Foreground entry builds the whole pipeline; background entry tears it
//! down in one step; the next foreground entry starts from nothing.
//!
//! ## Flows Tested:
//!
//! 1. Teardown cancels the in-flight read and the pending recovery timer
//! 2. Rebuilt pipeline only reads after a fresh submission
//! 3. Missing capability disables the session without touching the store

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use shared_types::{IndicatorState, ViewUpdate};
    use vault_runtime::{LifecyclePhase, RuntimeConfig, SessionError, UNAVAILABLE_MESSAGE};
    use vg_01_secure_storage::{MemoryEntryStore, MemorySecureStore, SensorOutcome};

    use crate::integration::fixtures::{Harness, PATIENCE};

    // =========================================================================
    // TEARDOWN
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_background_cancels_read_and_timer() {
        let mut h = Harness::capable().await;
        h.controller.enter_foreground().await.expect("foreground");
        assert_eq!(h.controller.running_tasks(), 4);

        h.controller.submit_read("a").expect("submit");
        h.wait_for_sensor().await;
        h.store.touch(SensorOutcome::Retry(None));

        // Wait until the error is projected, which arms the timer.
        loop {
            if h.next().await == ViewUpdate::Indicator(IndicatorState::Error) {
                break;
            }
        }
        assert_eq!(h.store.active_reads(), 1);

        h.controller.enter_background().await.expect("background");
        assert_eq!(h.controller.phase(), LifecyclePhase::Background);
        assert_eq!(h.controller.running_tasks(), 0);
        assert_eq!(h.store.active_reads(), 0);
        assert_eq!(h.store.listening_reads(), 0);

        // The armed recovery would have fired 1300 ms after the error.
        let after = h.collect_for(PATIENCE).await;
        assert!(
            !after.contains(&ViewUpdate::Indicator(IndicatorState::On)),
            "recovery fired after teardown: {after:?}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovery_due_during_teardown_never_fires() {
        let mut h = Harness::capable().await;
        h.controller.enter_foreground().await.expect("foreground");
        h.controller.submit_read("a").expect("submit");
        h.wait_for_sensor().await;
        h.store.touch(SensorOutcome::NotRecognized(None));
        loop {
            if h.next().await == ViewUpdate::Indicator(IndicatorState::Error) {
                break;
            }
        }
        h.drain();

        // Teardown starts 1 ms before the recovery deadline.
        tokio::time::sleep(Duration::from_millis(1299)).await;
        assert!(h.drain().is_empty());
        h.controller.enter_background().await.expect("background");

        let after = h.collect_for(PATIENCE).await;
        assert!(after.is_empty(), "published during or after teardown: {after:?}");
        assert_eq!(h.controller.running_tasks(), 0);
        assert_eq!(h.store.active_reads(), 0);
    }

    #[tokio::test]
    async fn test_background_with_idle_pipeline() {
        let mut h = Harness::capable().await;
        h.controller.enter_foreground().await.expect("foreground");
        h.controller.enter_background().await.expect("background");

        assert_eq!(h.store.reads_issued(), 0);
        assert!(h.controller.session_id().is_none());
        assert_eq!(
            h.controller.submit_read("a"),
            Err(SessionError::NotInForeground)
        );
    }

    // =========================================================================
    // REBUILD
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_reentry_rebuilds_without_leftover_reads() {
        let mut h = Harness::capable().await;
        h.controller.enter_foreground().await.expect("foreground");
        let first_session = h.controller.session_id();
        h.controller.submit_read("a").expect("submit");
        h.wait_for_sensor().await;
        h.controller.enter_background().await.expect("background");
        h.drain();

        h.controller.enter_foreground().await.expect("foreground again");
        assert_ne!(h.controller.session_id(), first_session);

        let settled = h.collect_for(Duration::from_secs(2)).await;
        assert_eq!(
            settled,
            vec![
                ViewUpdate::Message(String::new()),
                ViewUpdate::InputsEnabled(true),
                ViewUpdate::WriteEnabled(false),
            ]
        );
        assert_eq!(h.store.reads_issued(), 1);
        assert_eq!(h.store.active_reads(), 0);

        let metrics = h.controller.switch_metrics().expect("active session");
        assert_eq!(metrics.reads_started, 0);

        h.controller.submit_read("b").expect("submit");
        assert_eq!(h.next().await, ViewUpdate::Indicator(IndicatorState::On));
        assert_eq!(h.store.reads_issued(), 2);
        h.controller.enter_background().await.expect("background");
    }

    // =========================================================================
    // CAPABILITY UNAVAILABLE
    // =========================================================================

    #[tokio::test]
    async fn test_incapable_device_disables_session() {
        let store = MemorySecureStore::incapable(MemoryEntryStore::new());
        let mut h = Harness::with(store, RuntimeConfig::default()).await;
        h.controller.wait_for_seed().await;

        assert_eq!(
            h.controller.enter_foreground().await,
            Ok(LifecyclePhase::Disabled)
        );
        assert_eq!(
            h.drain(),
            vec![
                ViewUpdate::Message(UNAVAILABLE_MESSAGE.to_string()),
                ViewUpdate::InputsEnabled(false),
            ]
        );
        assert_eq!(
            UNAVAILABLE_MESSAGE,
            "Cannot store securely. If you have a fingerprint reader, make sure you have a \
             fingerprint enrolled."
        );

        assert_eq!(
            h.controller.submit_read("a"),
            Err(SessionError::StorageUnavailable)
        );
        assert_eq!(
            h.controller.set_key_text("k"),
            Err(SessionError::StorageUnavailable)
        );
        assert!(h.controller.submit_write().is_err());
        assert!(!h.controller.is_write_enabled());
        assert_eq!(h.controller.running_tasks(), 0);

        h.controller.enter_background().await.expect("background");
        assert_eq!(h.store.reads_issued(), 0);
        assert_eq!(h.store.writes_issued(), 0);
        // One check at creation (seeding), one at foreground entry.
        assert_eq!(h.store.capability_checks(), 2);
    }
}
