mod head_map;
mod message_type;
mod package_header;
mod protocol_error;
mod rpc_message;

pub use head_map::{decode_head_map, encode_head_map};
pub use message_type::MessageType;
pub use package_header::PackageHeader;
pub use protocol_error::ProtocolError;
pub use rpc_message::RpcMessage;
