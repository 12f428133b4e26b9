use dashmap::DashMap;
use std::collections::HashSet;
use std::time::Duration;
use tokio::sync::oneshot;

use txlink::protocol::RpcMessage;
use txlink::transport::SessionHandle;

use crate::RpcError;

/// Completion slot for one outstanding request.
///
/// Created by [`MessageFutureTable::register`] before the frame is sent, so
/// a racing response can never find the table empty. Consumed exactly once
/// by [`MessageFutureTable::wait`].
pub struct MessageFuture {
    pub id: i32,
    rx: oneshot::Receiver<Result<RpcMessage, RpcError>>,
}

struct PendingCompletion {
    tx: oneshot::Sender<Result<RpcMessage, RpcError>>,
    session_key: usize,
}

/// Correlates outgoing request ids with their pending completions.
///
/// One table lives on each endpoint (client or server side of a
/// connection set). Every operation is a single-key update on a concurrent
/// map; the oneshot sender is consumed on first completion, so a duplicate
/// `complete` for the same id is a logged no-op.
#[derive(Default)]
pub struct MessageFutureTable {
    pending: DashMap<i32, PendingCompletion>,
    /// Outstanding ids per connection, for connection-loss fan-out.
    by_session: DashMap<usize, HashSet<i32>>,
}

impl MessageFutureTable {
    pub fn new() -> MessageFutureTable {
        MessageFutureTable::default()
    }

    /// Inserts a pending entry for `id` and hands back its future.
    ///
    /// Must be called strictly before the request frame is sent; otherwise a
    /// fast response could be dispatched to an empty table and dropped.
    pub fn register(&self, id: i32, session: &SessionHandle) -> MessageFuture {
        let (tx, rx) = oneshot::channel();
        self.pending.insert(
            id,
            PendingCompletion {
                tx,
                session_key: session.key(),
            },
        );
        self.by_session
            .entry(session.key())
            .or_default()
            .insert(id);

        MessageFuture { id, rx }
    }

    /// Delivers `response` to the waiter registered under its id.
    ///
    /// Returns false when no entry exists, which happens when the waiter
    /// already timed out; the late response is discarded.
    pub fn complete(&self, id: i32, response: RpcMessage) -> bool {
        self.finish(id, Ok(response))
    }

    /// Delivers an error to the waiter registered under `id`.
    pub fn complete_error(&self, id: i32, error: RpcError) -> bool {
        self.finish(id, Err(error))
    }

    /// Suspends until the future completes or `timeout` elapses.
    ///
    /// A timeout removes the pending entry so the id cannot complete later.
    pub async fn wait(
        &self,
        future: MessageFuture,
        timeout: Duration,
    ) -> Result<RpcMessage, RpcError> {
        let id = future.id;
        match tokio::time::timeout(timeout, future.rx).await {
            Ok(Ok(result)) => result,
            // The sender vanished without completing: its connection records
            // were torn down.
            Ok(Err(_)) => Err(RpcError::ConnectionLost),
            Err(_) => {
                self.forget(id);
                Err(RpcError::Timeout { id })
            }
        }
    }

    /// Completes every future outstanding on `session` with
    /// [`RpcError::ConnectionLost`]. Called by the connection owner on
    /// teardown, local or remote.
    pub fn fail_session(&self, session: &SessionHandle) {
        if let Some((_, ids)) = self.by_session.remove(&session.key()) {
            for id in ids {
                if let Some((_, entry)) = self.pending.remove(&id) {
                    let _ = entry.tx.send(Err(RpcError::ConnectionLost));
                }
            }
        }
    }

    /// Number of requests still waiting for a response.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    fn finish(&self, id: i32, result: Result<RpcMessage, RpcError>) -> bool {
        match self.pending.remove(&id) {
            Some((_, entry)) => {
                self.forget_session_id(entry.session_key, id);
                // The waiter may have given up between removal and here;
                // a dead receiver is fine.
                let _ = entry.tx.send(result);
                true
            }
            None => {
                tracing::debug!(id, "discarded completion with no pending future");
                false
            }
        }
    }

    fn forget(&self, id: i32) {
        if let Some((_, entry)) = self.pending.remove(&id) {
            self.forget_session_id(entry.session_key, id);
        }
    }

    fn forget_session_id(&self, session_key: usize, id: i32) {
        let now_empty = match self.by_session.get_mut(&session_key) {
            Some(mut ids) => {
                ids.remove(&id);
                ids.is_empty()
            }
            None => false,
        };
        if now_empty {
            self.by_session.remove_if(&session_key, |_, ids| ids.is_empty());
        }
    }
}
