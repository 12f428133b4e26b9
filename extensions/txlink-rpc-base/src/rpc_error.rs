use std::fmt;

/// Errors delivered through a [`MessageFuture`](crate::MessageFuture)'s
/// error slot to the request originator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcError {
    /// No response arrived within the caller's deadline. The pending entry
    /// has been removed; a late response will be discarded.
    Timeout { id: i32 },

    /// The connection carrying the request closed before a response
    /// arrived. Every future outstanding on that connection gets this.
    ConnectionLost,
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcError::Timeout { id } => write!(f, "request {} timed out", id),
            RpcError::ConnectionLost => write!(f, "connection lost before response"),
        }
    }
}

impl std::error::Error for RpcError {}
