//! Error types for the secure storage boundary

use thiserror::Error;

/// Errors returned by secure store writes.
///
/// Reads never fail with an error; their failures are `AuthEvent` states.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Secure storage is not available on this device")]
    Unavailable,

    #[error("Write failed for key {key}: {reason}")]
    WriteFailed { key: String, reason: String },
}
