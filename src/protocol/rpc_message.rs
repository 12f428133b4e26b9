use crate::codec::{CodecKind, MessagePayload};
use crate::protocol::MessageType;
use std::collections::HashMap;

/// The unit of exchange on a coordinator connection.
///
/// `id` correlates a response frame with its originating request and is
/// assigned by the sending endpoint; it is unique per connection and wraps.
/// `head_map` is optional metadata and is omitted from the wire when empty.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcMessage {
    pub id: i32,
    pub message_type: MessageType,
    pub codec: u8,
    pub compressor: u8,
    pub head_map: HashMap<String, String>,
    pub body: MessagePayload,
}

impl RpcMessage {
    pub fn request(id: i32, body: MessagePayload) -> RpcMessage {
        RpcMessage {
            id,
            message_type: MessageType::Request,
            codec: CodecKind::Native.into(),
            compressor: 0,
            head_map: HashMap::new(),
            body,
        }
    }

    pub fn response(id: i32, body: MessagePayload) -> RpcMessage {
        RpcMessage {
            id,
            message_type: MessageType::ResponsePositive,
            codec: CodecKind::Native.into(),
            compressor: 0,
            head_map: HashMap::new(),
            body,
        }
    }

    /// Heartbeat probe. The body is the fixed ping sentinel and encodes to
    /// zero body bytes.
    pub fn heartbeat_request(id: i32) -> RpcMessage {
        RpcMessage {
            id,
            message_type: MessageType::HeartbeatRequest,
            codec: CodecKind::Native.into(),
            compressor: 0,
            head_map: HashMap::new(),
            body: MessagePayload::HeartbeatPing,
        }
    }

    pub fn heartbeat_response(id: i32) -> RpcMessage {
        RpcMessage {
            id,
            message_type: MessageType::HeartbeatResponse,
            codec: CodecKind::Native.into(),
            compressor: 0,
            head_map: HashMap::new(),
            body: MessagePayload::HeartbeatPong,
        }
    }
}
