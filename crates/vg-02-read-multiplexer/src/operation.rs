//! A single read operation and the sequence that names them.

use futures::StreamExt;
use shared_types::{AuthEvent, OperationId, StorageKey};
use vg_01_secure_storage::AuthEventStream;

/// Allocates strictly increasing operation ids, starting at `op-1`.
#[derive(Debug, Default)]
pub struct OperationSequence {
    last: u64,
}

impl OperationSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self) -> OperationId {
        self.last += 1;
        OperationId(self.last)
    }

    /// Most recently allocated id, if any.
    pub fn current(&self) -> Option<OperationId> {
        (self.last > 0).then_some(OperationId(self.last))
    }
}

/// An in-flight read: its identity plus the event stream that drives it.
///
/// Dropping the operation drops the stream, which cancels the read at the
/// secure store.
pub struct ReadOperation {
    id: OperationId,
    key: StorageKey,
    events: AuthEventStream,
}

impl ReadOperation {
    pub fn new(id: OperationId, key: StorageKey, events: AuthEventStream) -> Self {
        Self { id, key, events }
    }

    pub fn id(&self) -> OperationId {
        self.id
    }

    pub fn key(&self) -> &StorageKey {
        &self.key
    }

    /// Next event of this read. `None` once the store ends the sequence.
    pub async fn next_event(&mut self) -> Option<AuthEvent> {
        self.events.next().await
    }
}

impl std::fmt::Debug for ReadOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadOperation")
            .field("id", &self.id)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_is_strictly_increasing() {
        let mut sequence = OperationSequence::new();
        assert_eq!(sequence.current(), None);

        let first = sequence.advance();
        let second = sequence.advance();
        assert_eq!(first, OperationId(1));
        assert!(second > first);
        assert_eq!(sequence.current(), Some(second));
    }

    #[tokio::test]
    async fn test_operation_yields_stream_events() {
        let events = futures::stream::iter(vec![AuthEvent::needs_auth()]).boxed();
        let key = StorageKey::new("a").expect("key");
        let mut operation = ReadOperation::new(OperationId(7), key, events);

        assert_eq!(operation.id(), OperationId(7));
        assert_eq!(operation.key().as_str(), "a");
        assert!(operation.next_event().await.is_some());
        assert!(operation.next_event().await.is_none());
    }
}
