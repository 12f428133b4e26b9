use bytes::{BufMut, BytesMut};

use crate::codec::{decode_message, encode_message, MessagePayload};
use crate::constants::{MAGIC_CODE_BYTES, MAX_PACKAGE_LENGTH, PROTOCOL_VERSION, V1_HEADER_LENGTH};
use crate::protocol::{encode_head_map, MessageType, PackageHeader, ProtocolError, RpcMessage};
use crate::transport::TransportSession;

/// Stateless frame assembler/disassembler sitting between a raw byte stream
/// and typed [`RpcMessage`]s.
///
/// The handler keeps no buffer of its own: `read` reports how many bytes it
/// needs and the connection owner accumulates them. Being stateless, one
/// handler instance may serve any number of connections concurrently.
pub struct RpcPackageHandler;

impl RpcPackageHandler {
    /// Attempts to read one complete frame from the front of `data`.
    ///
    /// Three outcomes:
    /// - `(None, 0)` — not even a complete header yet; buffer more.
    /// - `(None, total_length)` — header parsed but the body is short;
    ///   buffer until `total_length` bytes are available.
    /// - `(Some(message), total_length)` — a whole frame was consumed.
    ///
    /// `IllegalMagic`, `TooLargePackage` and a corrupt header are returned
    /// as errors and are fatal for the connection. Body-level codec problems
    /// are not: the message surfaces with an empty body and the stream
    /// continues at the next frame boundary.
    pub fn read(
        &self,
        session: &dyn TransportSession,
        data: &[u8],
    ) -> Result<(Option<RpcMessage>, usize), ProtocolError> {
        let header = match PackageHeader::unmarshal(data) {
            Ok(header) => header,
            Err(ProtocolError::NotEnoughData) => return Ok((None, 0)),
            Err(err) => return Err(err),
        };

        let total_length = header.total_length as usize;
        if data.len() < total_length {
            return Ok((None, total_length));
        }

        let body = match header.message_type {
            MessageType::HeartbeatRequest => MessagePayload::HeartbeatPing,
            MessageType::HeartbeatResponse => MessagePayload::HeartbeatPong,
            _ if header.body_length() > 0 => {
                let body_bytes = &data[header.head_length as usize..total_length];
                match decode_message(header.codec, body_bytes) {
                    Some((payload, _consumed)) => payload,
                    None => {
                        // Codec/type-code failures are already logged by the
                        // registry; the peer sees an ill-formed message and
                        // may retry, but the connection stays usable.
                        tracing::warn!(
                            remote = %session.remote_addr(),
                            id = header.id,
                            "substituted empty body for undecodable message"
                        );
                        MessagePayload::Empty
                    }
                }
            }
            _ => MessagePayload::Empty,
        };

        let message = RpcMessage {
            id: header.id,
            message_type: header.message_type,
            codec: header.codec,
            compressor: header.compressor,
            head_map: header.head_map,
            body,
        };

        Ok((Some(message), total_length))
    }

    /// Serializes `message` into one complete frame.
    ///
    /// Heartbeats emit no body bytes; the head map is omitted when empty.
    pub fn write(
        &self,
        _session: &dyn TransportSession,
        message: &RpcMessage,
    ) -> Result<Vec<u8>, ProtocolError> {
        let mut head_map_buf = BytesMut::new();
        if !message.head_map.is_empty() {
            encode_head_map(&message.head_map, &mut head_map_buf);
        }

        let body = if message.message_type.is_heartbeat() {
            Vec::new()
        } else {
            encode_message(message.codec, &message.body)
        };

        let head_length = V1_HEADER_LENGTH + head_map_buf.len();
        let total_length = head_length + body.len();
        if total_length > MAX_PACKAGE_LENGTH {
            return Err(ProtocolError::TooLargePackage { total_length });
        }

        let mut out = BytesMut::with_capacity(total_length);
        out.put_slice(&MAGIC_CODE_BYTES);
        out.put_u8(PROTOCOL_VERSION);
        out.put_u32(total_length as u32);
        out.put_u16(head_length as u16);
        out.put_u8(message.message_type.into());
        out.put_u8(message.codec);
        out.put_u8(message.compressor);
        out.put_u32(message.id as u32);
        out.put_slice(&head_map_buf);
        out.put_slice(&body);

        Ok(out.to_vec())
    }
}
