use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Frame-level message kind carried in the header's type byte.
///
/// Distinct from the 16-bit body type code: this byte only tells the
/// receiving endpoint whether the frame is a request, a response, or a
/// heartbeat, so heartbeats can be answered without touching a body codec.
#[repr(u8)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, TryFromPrimitive, IntoPrimitive)]
pub enum MessageType {
    Request = 0,
    ResponsePositive = 1,
    ResponseNegative = 2,
    HeartbeatRequest = 3,
    HeartbeatResponse = 4,
}

impl MessageType {
    /// True for the two heartbeat kinds, which carry no body bytes.
    pub fn is_heartbeat(&self) -> bool {
        matches!(
            self,
            MessageType::HeartbeatRequest | MessageType::HeartbeatResponse
        )
    }
}
