//! State → indicator and event → message mappings.

use shared_types::{AuthEvent, IndicatorState, ReadState};

/// Default message per read state, used when an event carries none.
pub mod texts {
    pub const NEEDS_AUTH: &str = "Please verify your fingerprint";
    pub const AUTHORIZATION_ERROR: &str = "Not recognized";
    pub const RECOVERABLE_ERROR: &str = "Please try again";
    pub const UNRECOVERABLE_ERROR: &str = "Something went wrong";
    pub const READY: &str = "";
}

/// Text of the diagnostic raised when the first event after activation is `READY`.
pub const ANOMALY_TEXT: &str = "How did you do that!?";

pub fn indicator_for(state: ReadState) -> IndicatorState {
    match state {
        ReadState::NeedsAuth => IndicatorState::On,
        ReadState::AuthorizationError
        | ReadState::RecoverableError
        | ReadState::UnrecoverableError => IndicatorState::Error,
        ReadState::Ready => IndicatorState::Off,
    }
}

pub fn default_message(state: ReadState) -> &'static str {
    match state {
        ReadState::NeedsAuth => texts::NEEDS_AUTH,
        ReadState::AuthorizationError => texts::AUTHORIZATION_ERROR,
        ReadState::RecoverableError => texts::RECOVERABLE_ERROR,
        ReadState::UnrecoverableError => texts::UNRECOVERABLE_ERROR,
        ReadState::Ready => texts::READY,
    }
}

/// The event's own message verbatim, else the state default.
pub fn message_for(event: &AuthEvent) -> String {
    event
        .message()
        .unwrap_or_else(|| default_message(event.state()))
        .to_string()
}
