//! Projector configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::PresentationError;

/// Delay before a retryable error flips the indicator back to `On`.
pub const DEFAULT_RECOVERY_DELAY: Duration = Duration::from_millis(1300);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectorConfig {
    /// Auto-recovery delay after `AUTHORIZATION_ERROR` / `RECOVERABLE_ERROR`
    pub recovery_delay: Duration,
}

impl Default for ProjectorConfig {
    fn default() -> Self {
        Self {
            recovery_delay: DEFAULT_RECOVERY_DELAY,
        }
    }
}

impl ProjectorConfig {
    pub fn with_recovery_delay(mut self, delay: Duration) -> Self {
        self.recovery_delay = delay;
        self
    }

    pub fn validate(&self) -> Result<(), PresentationError> {
        if self.recovery_delay.is_zero() {
            return Err(PresentationError::ZeroRecoveryDelay);
        }
        Ok(())
    }
}
