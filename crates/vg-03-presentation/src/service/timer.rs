//! Cancellable auto-recovery timer.
//!
//! At most one deadline is pending. Arming replaces any pending deadline, so
//! only the most recent error can ever fire.

use std::pin::Pin;
use std::time::Duration;

use shared_types::OperationId;
use tokio::time::{sleep, Instant, Sleep};

#[derive(Debug)]
pub struct RecoveryTimer {
    delay: Duration,
    pending: Option<(OperationId, Pin<Box<Sleep>>)>,
}

impl RecoveryTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Start the delay for an error of `operation`, replacing any pending one.
    pub fn arm(&mut self, operation: OperationId) {
        self.pending = Some((operation, Box::pin(sleep(self.delay))));
    }

    /// Drop the pending deadline, if any. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Cancel a deadline armed by an operation older than `operation`.
    pub fn cancel_before(&mut self, operation: OperationId) -> bool {
        match &self.pending {
            Some((armed, _)) if *armed < operation => self.cancel(),
            _ => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// Operation whose error armed the pending deadline.
    pub fn armed_for(&self) -> Option<OperationId> {
        self.pending.as_ref().map(|(operation, _)| *operation)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, sleep)| sleep.deadline())
    }

    /// Resolve when the pending deadline passes, disarming the timer.
    ///
    /// Never resolves while unarmed. Cancel safe: dropping the future leaves
    /// the deadline pending.
    pub async fn expired(&mut self) -> OperationId {
        match self.pending.as_mut() {
            Some((operation, sleep)) => {
                let operation = *operation;
                sleep.as_mut().await;
                self.pending = None;
                operation
            }
            None => std::future::pending().await,
        }
    }
}
