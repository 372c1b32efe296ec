//! # End-to-End Flows
//!
//! Read and write flows through the full pipeline:
//!
//! ```text
//! controller.submit_read ──→ ReadSwitch ──→ hub ──→ projector / listeners ──→ view
//! controller.submit_write ──→ WriteGate ──→ store ──→ entries ──→ view
//! ```
//!
//! ## Flows Tested:
//!
//! 1. Prompt, retryable error, auto-recovery at 1300 ms, resubmission
//! 2. Latest submission wins across keys
//! 3. First-event READY anomaly, then normal value notifications
//! 4. Write reset sequence, entry list update, read by entry selection

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use shared_types::{IndicatorState, Notification, Payload, ViewUpdate};
    use tokio::time::Instant;
    use vg_01_secure_storage::SensorOutcome;

    use crate::integration::fixtures::{key, Harness, PATIENCE};

    async fn foreground() -> Harness {
        let mut h = Harness::capable().await;
        h.controller.enter_foreground().await.expect("foreground");
        assert_eq!(h.next().await, ViewUpdate::Message(String::new()));
        assert_eq!(h.next().await, ViewUpdate::InputsEnabled(true));
        assert_eq!(h.next().await, ViewUpdate::WriteEnabled(false));
        h
    }

    async fn expect_prompt(h: &mut Harness) {
        assert_eq!(h.next().await, ViewUpdate::Indicator(IndicatorState::On));
        assert_eq!(
            h.next().await,
            ViewUpdate::Message("Please verify your fingerprint".into())
        );
    }

    // =========================================================================
    // READ + RECOVERY
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_prompt_error_recovery_and_resubmit() {
        let mut h = foreground().await;

        h.controller.submit_read("a").expect("submit");
        expect_prompt(&mut h).await;

        h.wait_for_sensor().await;
        h.store.touch(SensorOutcome::Retry(None));
        assert_eq!(h.next().await, ViewUpdate::Indicator(IndicatorState::Error));
        assert_eq!(h.next().await, ViewUpdate::Message("Please try again".into()));
        let errored_at = Instant::now();

        assert_eq!(h.next().await, ViewUpdate::Indicator(IndicatorState::On));
        assert_eq!(errored_at.elapsed(), Duration::from_millis(1300));

        // A second error, then a resubmission before its timer elapses.
        h.store.touch(SensorOutcome::NotRecognized(None));
        assert_eq!(h.next().await, ViewUpdate::Indicator(IndicatorState::Error));
        assert_eq!(h.next().await, ViewUpdate::Message("Not recognized".into()));

        tokio::time::sleep(Duration::from_millis(400)).await;
        h.controller.submit_read("a").expect("resubmit");

        // Only the new read's prompt; the pending recovery never fires.
        let after = h.collect_for(PATIENCE).await;
        assert_eq!(
            after,
            vec![
                ViewUpdate::Indicator(IndicatorState::On),
                ViewUpdate::Message("Please verify your fingerprint".into()),
            ]
        );

        let metrics = h.controller.switch_metrics().expect("metrics");
        assert_eq!(metrics.reads_started, 2);
        assert_eq!(metrics.reads_cancelled, 1);
        assert_eq!(h.store.active_reads(), 1);

        h.controller.enter_background().await.expect("background");
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_message_overrides_default() {
        let mut h = foreground().await;
        h.controller.submit_read("a").expect("submit");
        expect_prompt(&mut h).await;

        h.wait_for_sensor().await;
        h.store
            .touch(SensorOutcome::Failed(Some("Too many attempts".into())));
        assert_eq!(h.next().await, ViewUpdate::Indicator(IndicatorState::Error));
        assert_eq!(h.next().await, ViewUpdate::Message("Too many attempts".into()));

        // Unrecoverable errors do not auto-recover, but reads stay available.
        assert!(h.collect_for(PATIENCE).await.is_empty());
        h.controller.submit_read("a").expect("submit after failure");
        expect_prompt(&mut h).await;

        h.controller.enter_background().await.expect("background");
    }

    // =========================================================================
    // LATEST SUBMISSION WINS
    // =========================================================================

    #[tokio::test]
    async fn test_latest_key_wins() {
        let mut h = foreground().await;

        h.controller.submit_read("a").expect("submit a");
        expect_prompt(&mut h).await;
        h.wait_for_sensor().await;

        h.controller.submit_read("b").expect("submit b");
        expect_prompt(&mut h).await;
        assert!(h.store.active_reads() <= 1);

        h.wait_for_sensor().await;
        assert_eq!(h.store.listening_reads(), 1);
        h.store.touch(SensorOutcome::Recognized);

        assert_eq!(h.next().await, ViewUpdate::Indicator(IndicatorState::Off));
        assert_eq!(h.next().await, ViewUpdate::Message(String::new()));
        assert_eq!(
            h.next().await,
            ViewUpdate::Notify(Notification::Value("beta".into()))
        );

        h.controller.enter_background().await.expect("background");
    }

    // =========================================================================
    // FIRST-EVENT ROUTING
    // =========================================================================

    #[tokio::test]
    async fn test_first_ready_is_anomalous_then_values_flow() {
        let mut h = foreground().await;

        // Unknown key: the store answers READY immediately.
        h.controller.submit_read("missing").expect("submit");
        let first = h.collect_for(Duration::from_millis(200)).await;
        assert!(first.contains(&ViewUpdate::Notify(Notification::Anomaly(
            "How did you do that!?".into()
        ))));
        assert!(!first
            .iter()
            .any(|u| matches!(u, ViewUpdate::Notify(Notification::Value(_)))));

        h.controller.submit_read("a").expect("submit");
        expect_prompt(&mut h).await;
        h.wait_for_sensor().await;
        h.store.touch(SensorOutcome::Recognized);

        let second = h.collect_for(Duration::from_millis(200)).await;
        assert_eq!(
            second,
            vec![
                ViewUpdate::Indicator(IndicatorState::Off),
                ViewUpdate::Message(String::new()),
                ViewUpdate::Notify(Notification::Value("alpha".into())),
            ]
        );

        h.controller.enter_background().await.expect("background");
    }

    // =========================================================================
    // WRITE
    // =========================================================================

    #[tokio::test]
    async fn test_write_resets_inputs_and_lists_entry() {
        let mut h = foreground().await;

        assert_eq!(h.controller.set_key_text("greeting"), Ok(false));
        assert_eq!(h.controller.set_value_text("hi"), Ok(true));
        assert_eq!(h.next().await, ViewUpdate::WriteEnabled(false));
        assert_eq!(h.next().await, ViewUpdate::WriteEnabled(true));

        h.controller.submit_write().expect("write");
        assert_eq!(h.next().await, ViewUpdate::Indicator(IndicatorState::Off));
        assert_eq!(h.next().await, ViewUpdate::Message(String::new()));
        assert_eq!(h.next().await, ViewUpdate::InputsCleared);
        assert_eq!(h.next().await, ViewUpdate::WriteEnabled(false));
        h.controller.flush_writes().await.expect("flush");

        assert_eq!(
            h.store.value(&key("greeting")),
            Some(Payload::from_text("hi"))
        );

        // The entry list now carries the new key; selecting it reads it.
        let listed = h
            .store
            .entries()
            .snapshot()
            .into_iter()
            .find(|entry| entry.key.as_str() == "greeting")
            .expect("listed");
        h.controller.select_entry(&listed).expect("select");
        expect_prompt(&mut h).await;
        h.wait_for_sensor().await;
        h.store.touch(SensorOutcome::Recognized);

        assert_eq!(h.next().await, ViewUpdate::Indicator(IndicatorState::Off));
        assert_eq!(h.next().await, ViewUpdate::Message(String::new()));
        assert_eq!(
            h.next().await,
            ViewUpdate::Notify(Notification::Value("hi".into()))
        );

        h.controller.enter_background().await.expect("background");
    }

    #[tokio::test]
    async fn test_entries_reach_the_view() {
        let mut h = Harness::capable().await;
        h.controller.enter_foreground().await.expect("foreground");

        let snapshot = loop {
            match tokio::time::timeout(PATIENCE, h.updates.recv())
                .await
                .expect("update")
                .expect("open")
            {
                ViewUpdate::Entries(entries) => break entries,
                _ => continue,
            }
        };
        let keys: Vec<&str> = snapshot.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);

        h.controller.enter_background().await.expect("background");
    }
}
