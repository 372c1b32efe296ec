//! Indicator and message projection with auto-recovery.
//!
//! ```text
//! event ──→ cancel timer ──→ Indicator(indicator_for(state))
//!                        ──→ Message(message_for(event))
//!                        ──→ retryable? arm timer(op)
//!
//! timer expired                  ──→ Indicator(On)
//! new operation started (watch)  ──→ cancel timer armed by an older op
//! ```

use shared_bus::Subscription;
use shared_types::{IndicatorState, OperationId, ReadOutcome, ViewSender};
use tokio::sync::watch;
use tracing::{debug, info};

use super::timer::RecoveryTimer;
use crate::domain::{indicator_for, message_for, ProjectorConfig};

pub struct StateProjector {
    config: ProjectorConfig,
    view: ViewSender,
}

impl StateProjector {
    pub fn new(config: ProjectorConfig, view: ViewSender) -> Self {
        Self { config, view }
    }

    /// Project events until the subscription ends.
    ///
    /// `operations` announces each newly started read so that a recovery
    /// deadline armed by an older read is dropped as soon as the switch
    /// happens, before the new read's first event arrives.
    pub async fn run(
        self,
        mut subscription: Subscription,
        mut operations: watch::Receiver<Option<OperationId>>,
    ) {
        let mut timer = RecoveryTimer::new(self.config.recovery_delay);
        let mut watching = true;

        info!(
            delay_ms = self.config.recovery_delay.as_millis() as u64,
            "[vg-03] Projector started"
        );

        loop {
            tokio::select! {
                biased;
                outcome = subscription.recv() => match outcome {
                    Some(outcome) => self.project(&outcome, &mut timer),
                    None => break,
                },
                changed = operations.changed(), if watching => match changed {
                    Ok(()) => {
                        let started = *operations.borrow_and_update();
                        if let Some(started) = started {
                            if timer.cancel_before(started) {
                                debug!(op = %started, "[vg-03] Recovery cancelled by new read");
                            }
                        }
                    }
                    Err(_) => watching = false,
                },
                operation = timer.expired() => {
                    debug!(op = %operation, "[vg-03] Recovery elapsed");
                    self.view.indicator(IndicatorState::On);
                }
            }
        }

        debug!("[vg-03] Projector stopped");
    }

    fn project(&self, outcome: &ReadOutcome, timer: &mut RecoveryTimer) {
        timer.cancel();

        let state = outcome.event.state();
        self.view.indicator(indicator_for(state));
        self.view.message(message_for(&outcome.event));

        if state.is_retryable() {
            timer.arm(outcome.operation);
        }
        debug!(op = %outcome.operation, %state, armed = timer.is_armed(), "[vg-03] Projected");
    }
}
