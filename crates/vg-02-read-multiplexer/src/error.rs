//! Error types for the read multiplexer

use thiserror::Error;

/// Errors returned when submitting a read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MultiplexerError {
    /// The switch has been dropped; the session is gone.
    #[error("Read switch closed")]
    Closed,

    #[error("Read key must not be empty")]
    EmptyKey,
}
