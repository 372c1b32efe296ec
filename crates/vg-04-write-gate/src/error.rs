//! Error types for the write gate

use shared_types::TypesError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriteGateError {
    /// Submit was attempted while the gate was disabled.
    #[error("Both key and value are required (key empty: {key_empty}, value empty: {value_empty})")]
    Incomplete { key_empty: bool, value_empty: bool },

    #[error(transparent)]
    Invalid(#[from] TypesError),
}
