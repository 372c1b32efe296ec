//! # Error Types
//!
//! Defines error types raised while constructing shared values.

use thiserror::Error;

/// Errors raised when a shared value would violate its invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    /// Storage keys must contain at least one character.
    #[error("Storage key must not be empty")]
    EmptyKey,

    /// Write values must contain at least one character.
    #[error("Value must not be empty")]
    EmptyValue,

    /// A `READY` event was built without a decrypted value.
    #[error("READY event requires a value")]
    MissingValue,

    /// A non-`READY` event was built with a value attached.
    #[error("Only READY events may carry a value")]
    UnexpectedValue,

    /// A read state code outside the closed set was received.
    ///
    /// The set of read states is closed; an unknown code means the two sides
    /// of a boundary disagree about the protocol, which is a programming error
    /// rather than a runtime condition to recover from.
    #[error("Unknown read state: {0}")]
    UnknownReadState(String),
}
