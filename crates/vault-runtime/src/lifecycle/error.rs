//! Lifecycle errors

use shared_bus::HubError;
use thiserror::Error;
use vg_02_read_multiplexer::MultiplexerError;
use vg_04_write_gate::WriteGateError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Not in foreground")]
    NotInForeground,

    #[error("Already in foreground")]
    AlreadyInForeground,

    /// The foreground session was entered without secure storage.
    #[error("Secure storage unavailable for this session")]
    StorageUnavailable,

    #[error("Read rejected: {0}")]
    Read(#[from] MultiplexerError),

    #[error("Write rejected: {0}")]
    Write(#[from] WriteGateError),

    #[error("Pipeline activation failed: {0}")]
    Hub(#[from] HubError),
}
