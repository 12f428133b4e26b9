mod rpc_context;
mod session_error;
mod session_registry;
mod transaction_role;

pub use rpc_context::{RpcContext, RpcContextBuilder};
pub use session_error::SessionError;
pub use session_registry::SessionRegistry;
pub use transaction_role::TransactionRole;
