//! One foreground session: everything the pipeline owns.

use shared_bus::Connection;
use shared_types::SessionId;
use tokio::task::JoinSet;
use tracing::info;
use vg_02_read_multiplexer::ReadRequester;
use vg_04_write_gate::WriteGate;

/// Handles to a running pipeline.
///
/// The hub connection owns the read switch (and through it the active read).
/// `tasks` owns the projector, both notification listeners and the entries
/// forwarder. The write gate owns in-flight writes.
pub struct ForegroundSession {
    id: SessionId,
    requester: ReadRequester,
    write_gate: WriteGate,
    connection: Connection,
    tasks: JoinSet<()>,
}

impl ForegroundSession {
    pub(crate) fn new(
        id: SessionId,
        requester: ReadRequester,
        write_gate: WriteGate,
        connection: Connection,
        tasks: JoinSet<()>,
    ) -> Self {
        Self {
            id,
            requester,
            write_gate,
            connection,
            tasks,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn requester(&self) -> &ReadRequester {
        &self.requester
    }

    pub fn write_gate(&self) -> &WriteGate {
        &self.write_gate
    }

    pub fn write_gate_mut(&mut self) -> &mut WriteGate {
        &mut self.write_gate
    }

    /// Session tasks still running (projector, listeners, entries).
    pub fn running_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Cancel and await everything the session started.
    ///
    /// Every task is aborted before the first await, so none of them runs
    /// again once teardown has started. On return the active read stream,
    /// every pending recovery timer and every subscription of this session
    /// have been dropped.
    pub async fn shutdown(mut self) {
        let tasks = self.tasks.len();
        self.connection.abort();
        self.tasks.abort_all();
        self.write_gate.abort_all();

        self.connection.disconnect().await;
        self.tasks.shutdown().await;
        self.write_gate.shutdown().await;
        info!(session = %self.id, tasks, "[runtime] Session torn down");
    }
}
