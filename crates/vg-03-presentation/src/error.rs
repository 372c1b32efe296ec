//! Error types for the presentation projector

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresentationError {
    #[error("Recovery delay must be greater than zero")]
    ZeroRecoveryDelay,
}
