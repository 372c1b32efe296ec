//! Outbound Ports (Driven Ports)
//!
//! These traits define what the pipeline needs from the platform: a secure
//! store that gates reads behind on-device authentication, and a plain
//! durable store listing what has been written.

use async_trait::async_trait;
use futures::stream::BoxStream;
use shared_types::{AuthEvent, Entry, Payload, StorageKey};

use crate::error::StoreError;

/// Sequence of authentication progress events for one read.
pub type AuthEventStream = BoxStream<'static, AuthEvent>;

/// Live sequence of complete entry snapshots.
pub type EntryStream = BoxStream<'static, Vec<Entry>>;

/// Secure Store Facade (Driven Port)
///
/// Implementations may block on sensor or cryptographic hardware; every
/// method is expected to be called from the worker context, never from the
/// presentation context.
#[async_trait]
pub trait SecureStore: Send + Sync {
    /// Whether the device can store values securely at all
    /// (e.g. hardware keystore present and a credential enrolled).
    async fn can_store_securely(&self) -> bool;

    /// Encrypt and persist `payload` under `key`.
    async fn write(&self, key: &StorageKey, payload: Payload) -> Result<(), StoreError>;

    /// Start an authentication-gated read of `key`.
    ///
    /// The stream may emit any number of retryable errors before it
    /// terminates on `READY` or `UNRECOVERABLE_ERROR`. Dropping the stream
    /// cancels the read.
    fn read(&self, key: &StorageKey) -> AuthEventStream;
}

/// Entry Store (Driven Port)
pub trait EntryStore: Send + Sync {
    /// Live snapshots of every stored entry, emitted whenever the set changes.
    /// The current snapshot is emitted first.
    fn entries(&self) -> EntryStream;
}
