use std::io;

/// Byte-level surface of one live connection, provided by the transport
/// layer that owns the socket.
///
/// The protocol core never drives I/O itself: inbound bytes are pushed into
/// [`RpcPackageHandler::read`](crate::handler::RpcPackageHandler::read) by
/// the connection's receive task, and outbound frames go through `send`.
/// `is_closed` is the single source of truth for liveness; session maps that
/// hold a handle to a dead connection evict it lazily on their next
/// traversal.
pub trait TransportSession: Send + Sync {
    /// Remote peer address formatted as `"ip:port"`.
    fn remote_addr(&self) -> String;

    fn is_closed(&self) -> bool;

    /// Closes the connection. Idempotent.
    fn close(&self);

    /// Queues one outbound frame. Per-connection write ordering is the
    /// transport's responsibility.
    fn send(&self, bytes: &[u8]) -> io::Result<()>;
}
