mod message_future;
mod rpc_error;

pub use message_future::{MessageFuture, MessageFutureTable};
pub use rpc_error::RpcError;
