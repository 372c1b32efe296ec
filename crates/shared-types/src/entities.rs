//! # Core Domain Entities
//!
//! Defines the values exchanged between the read multiplexer, the multicast
//! hub, the presentation projector and the write gate.
//!
//! ## Clusters
//!
//! - **Keys & Payloads**: `StorageKey`, `Payload`
//! - **Reads**: `ReadState`, `AuthEvent`, `OperationId`
//! - **Writes & Listing**: `WriteRequest`, `Entry`
//! - **Sessions**: `SessionId`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::TypesError;

// =============================================================================
// CLUSTER A: KEYS & PAYLOADS
// =============================================================================

/// A non-empty key addressing one entry of the secure store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StorageKey(String);

impl StorageKey {
    /// Create a key, rejecting the empty string.
    pub fn new(key: impl Into<String>) -> Result<Self, TypesError> {
        let key = key.into();
        if key.is_empty() {
            return Err(TypesError::EmptyKey);
        }
        Ok(Self(key))
    }

    /// Borrow the key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StorageKey {
    type Error = TypesError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for StorageKey {
    type Error = TypesError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StorageKey> for String {
    fn from(key: StorageKey) -> Self {
        key.0
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An opaque byte sequence handed to, or returned from, the secure store.
///
/// Text is encoded as UTF-8 before handoff.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Payload(Vec<u8>);

impl Payload {
    /// Wrap raw bytes.
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Encode text as UTF-8.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self(text.as_bytes().to_vec())
    }

    /// Borrow the raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume into raw bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Decode as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn to_text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }

    /// Number of bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the payload holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

// Payloads are decrypted secrets; never print their contents.
impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Payload({} bytes)", self.0.len())
    }
}

// =============================================================================
// CLUSTER B: READS
// =============================================================================

/// Progress of one authentication-gated read. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReadState {
    /// The value was decrypted and is attached to the event.
    Ready,
    /// The store is waiting for the user to authenticate.
    NeedsAuth,
    /// The presented credential was not recognized.
    AuthorizationError,
    /// A transient failure; the user may simply try again.
    RecoverableError,
    /// The read cannot complete.
    UnrecoverableError,
}

impl ReadState {
    /// Every member of the closed set, in declaration order.
    pub const ALL: [ReadState; 5] = [
        ReadState::Ready,
        ReadState::NeedsAuth,
        ReadState::AuthorizationError,
        ReadState::RecoverableError,
        ReadState::UnrecoverableError,
    ];

    /// Wire name of the state.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadState::Ready => "READY",
            ReadState::NeedsAuth => "NEEDS_AUTH",
            ReadState::AuthorizationError => "AUTHORIZATION_ERROR",
            ReadState::RecoverableError => "RECOVERABLE_ERROR",
            ReadState::UnrecoverableError => "UNRECOVERABLE_ERROR",
        }
    }

    /// Errors after which the user is expected to retry on the same prompt.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ReadState::AuthorizationError | ReadState::RecoverableError
        )
    }

    /// States after which the store emits nothing further for the read.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReadState::Ready | ReadState::UnrecoverableError)
    }
}

impl fmt::Display for ReadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReadState {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReadState::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| TypesError::UnknownReadState(s.to_string()))
    }
}

/// One point-in-time snapshot of an authentication-gated read.
///
/// `value` is present if and only if `state == Ready`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AuthEventRecord")]
pub struct AuthEvent {
    state: ReadState,
    value: Option<Payload>,
    message: Option<String>,
}

impl AuthEvent {
    /// A decrypted value.
    #[must_use]
    pub fn ready(value: Payload) -> Self {
        Self {
            state: ReadState::Ready,
            value: Some(value),
            message: None,
        }
    }

    /// Any non-ready state. Passing `Ready` is rejected because it has no value.
    pub fn pending(state: ReadState) -> Result<Self, TypesError> {
        if state == ReadState::Ready {
            return Err(TypesError::MissingValue);
        }
        Ok(Self {
            state,
            value: None,
            message: None,
        })
    }

    /// The user must authenticate.
    #[must_use]
    pub fn needs_auth() -> Self {
        Self::without_value(ReadState::NeedsAuth)
    }

    /// The credential was not recognized.
    #[must_use]
    pub fn authorization_error() -> Self {
        Self::without_value(ReadState::AuthorizationError)
    }

    /// Transient failure, try again.
    #[must_use]
    pub fn recoverable_error() -> Self {
        Self::without_value(ReadState::RecoverableError)
    }

    /// The read cannot complete.
    #[must_use]
    pub fn unrecoverable_error() -> Self {
        Self::without_value(ReadState::UnrecoverableError)
    }

    fn without_value(state: ReadState) -> Self {
        Self {
            state,
            value: None,
            message: None,
        }
    }

    /// Attach a human-readable diagnostic supplied by the store.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// State of the read.
    #[must_use]
    pub fn state(&self) -> ReadState {
        self.state
    }

    /// Decrypted value; `Some` exactly when the state is `Ready`.
    #[must_use]
    pub fn value(&self) -> Option<&Payload> {
        self.value.as_ref()
    }

    /// Diagnostic supplied by the store, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// Unchecked wire form of [`AuthEvent`], validated on deserialization.
#[derive(Deserialize)]
struct AuthEventRecord {
    state: ReadState,
    value: Option<Payload>,
    message: Option<String>,
}

impl TryFrom<AuthEventRecord> for AuthEvent {
    type Error = TypesError;

    fn try_from(record: AuthEventRecord) -> Result<Self, Self::Error> {
        let event = match (record.state, record.value) {
            (ReadState::Ready, Some(value)) => AuthEvent::ready(value),
            (ReadState::Ready, None) => return Err(TypesError::MissingValue),
            (state, None) => AuthEvent::pending(state)?,
            (_, Some(_)) => return Err(TypesError::UnexpectedValue),
        };
        Ok(match record.message {
            Some(message) => event.with_message(message),
            None => event,
        })
    }
}

/// Identity of one read operation started by the multiplexer.
///
/// Strictly increasing within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OperationId(pub u64);

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op-{}", self.0)
    }
}

/// An `AuthEvent` tagged with the operation and key that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOutcome {
    /// Operation that emitted the event.
    pub operation: OperationId,
    /// Key being read.
    pub key: StorageKey,
    /// The event itself.
    pub event: AuthEvent,
}

// =============================================================================
// CLUSTER C: WRITES & LISTING
// =============================================================================

/// A write handed to the secure store. Both fields were non-empty at submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRequest {
    /// Destination key.
    pub key: StorageKey,
    /// Encoded value.
    pub payload: Payload,
}

impl WriteRequest {
    /// Build a write from raw input text, rejecting an empty key or value.
    pub fn from_text(key: &str, value: &str) -> Result<Self, TypesError> {
        if value.is_empty() {
            return Err(TypesError::EmptyValue);
        }
        Ok(Self {
            key: StorageKey::new(key)?,
            payload: Payload::from_text(value),
        })
    }
}

/// A `(key, payload)` pair observed from the entry store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Entry key.
    pub key: StorageKey,
    /// Stored (still encrypted) bytes.
    pub payload: Payload,
}

// =============================================================================
// CLUSTER D: SESSIONS
// =============================================================================

/// Identifier of one foreground session, used to correlate log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// A fresh random session id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
