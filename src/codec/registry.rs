use bytes::{Buf, BufMut, BytesMut};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::codec::message_payload::MessagePayload;
use crate::codec::messages::{MergeResultMessage, MergedWarpMessage};
use crate::codec::payload_codec::*;
use crate::codec::TypeCode;

/// Body serializer id carried in the frame header.
///
/// Only the native codec is wired in; protobuf keeps its id reserved for
/// interop with peers that negotiate it.
#[repr(u8)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, TryFromPrimitive, IntoPrimitive)]
pub enum CodecKind {
    Native = 1,
    Protobuf = 2,
}

/// One registry slot: how to write a body variant and how to read it back.
struct MessageCodec {
    encode: fn(&MessagePayload, &mut BytesMut),
    decode: fn(&mut &[u8]) -> Option<MessagePayload>,
}

/// Dispatch table over every registered type code, built once at first use.
/// Adding a message variant costs exactly one entry here.
static MESSAGE_CODECS: Lazy<HashMap<i16, MessageCodec>> = Lazy::new(|| {
    let mut m: HashMap<i16, MessageCodec> = HashMap::new();

    m.insert(
        TypeCode::GlobalBegin.into(),
        MessageCodec {
            encode: |p, buf| {
                if let MessagePayload::GlobalBegin(body) = p {
                    encode_global_begin_request(body, buf);
                }
            },
            decode: |cur| decode_global_begin_request(cur).map(MessagePayload::GlobalBegin),
        },
    );
    m.insert(
        TypeCode::GlobalBeginResult.into(),
        MessageCodec {
            encode: |p, buf| {
                if let MessagePayload::GlobalBeginResult(body) = p {
                    encode_global_begin_response(body, buf);
                }
            },
            decode: |cur| {
                decode_global_begin_response(cur).map(MessagePayload::GlobalBeginResult)
            },
        },
    );
    m.insert(
        TypeCode::GlobalCommit.into(),
        MessageCodec {
            encode: |p, buf| {
                if let MessagePayload::GlobalCommit(body) = p {
                    encode_global_end_request(body, buf);
                }
            },
            decode: |cur| decode_global_end_request(cur).map(MessagePayload::GlobalCommit),
        },
    );
    m.insert(
        TypeCode::GlobalCommitResult.into(),
        MessageCodec {
            encode: |p, buf| {
                if let MessagePayload::GlobalCommitResult(body) = p {
                    encode_global_end_response(body, buf);
                }
            },
            decode: |cur| {
                decode_global_end_response(cur).map(MessagePayload::GlobalCommitResult)
            },
        },
    );
    m.insert(
        TypeCode::GlobalRollback.into(),
        MessageCodec {
            encode: |p, buf| {
                if let MessagePayload::GlobalRollback(body) = p {
                    encode_global_end_request(body, buf);
                }
            },
            decode: |cur| decode_global_end_request(cur).map(MessagePayload::GlobalRollback),
        },
    );
    m.insert(
        TypeCode::GlobalRollbackResult.into(),
        MessageCodec {
            encode: |p, buf| {
                if let MessagePayload::GlobalRollbackResult(body) = p {
                    encode_global_end_response(body, buf);
                }
            },
            decode: |cur| {
                decode_global_end_response(cur).map(MessagePayload::GlobalRollbackResult)
            },
        },
    );
    m.insert(
        TypeCode::GlobalStatus.into(),
        MessageCodec {
            encode: |p, buf| {
                if let MessagePayload::GlobalStatus(body) = p {
                    encode_global_end_request(body, buf);
                }
            },
            decode: |cur| decode_global_end_request(cur).map(MessagePayload::GlobalStatus),
        },
    );
    m.insert(
        TypeCode::GlobalStatusResult.into(),
        MessageCodec {
            encode: |p, buf| {
                if let MessagePayload::GlobalStatusResult(body) = p {
                    encode_global_end_response(body, buf);
                }
            },
            decode: |cur| {
                decode_global_end_response(cur).map(MessagePayload::GlobalStatusResult)
            },
        },
    );
    m.insert(
        TypeCode::GlobalReport.into(),
        MessageCodec {
            encode: |p, buf| {
                if let MessagePayload::GlobalReport(body) = p {
                    encode_global_report_request(body, buf);
                }
            },
            decode: |cur| decode_global_report_request(cur).map(MessagePayload::GlobalReport),
        },
    );
    m.insert(
        TypeCode::GlobalReportResult.into(),
        MessageCodec {
            encode: |p, buf| {
                if let MessagePayload::GlobalReportResult(body) = p {
                    encode_global_end_response(body, buf);
                }
            },
            decode: |cur| {
                decode_global_end_response(cur).map(MessagePayload::GlobalReportResult)
            },
        },
    );
    m.insert(
        TypeCode::GlobalLockQuery.into(),
        MessageCodec {
            encode: |p, buf| {
                if let MessagePayload::GlobalLockQuery(body) = p {
                    encode_branch_register_request(body, buf);
                }
            },
            decode: |cur| {
                decode_branch_register_request(cur).map(MessagePayload::GlobalLockQuery)
            },
        },
    );
    m.insert(
        TypeCode::GlobalLockQueryResult.into(),
        MessageCodec {
            encode: |p, buf| {
                if let MessagePayload::GlobalLockQueryResult(body) = p {
                    encode_global_lock_query_response(body, buf);
                }
            },
            decode: |cur| {
                decode_global_lock_query_response(cur).map(MessagePayload::GlobalLockQueryResult)
            },
        },
    );

    m.insert(
        TypeCode::BranchRegister.into(),
        MessageCodec {
            encode: |p, buf| {
                if let MessagePayload::BranchRegister(body) = p {
                    encode_branch_register_request(body, buf);
                }
            },
            decode: |cur| {
                decode_branch_register_request(cur).map(MessagePayload::BranchRegister)
            },
        },
    );
    m.insert(
        TypeCode::BranchRegisterResult.into(),
        MessageCodec {
            encode: |p, buf| {
                if let MessagePayload::BranchRegisterResult(body) = p {
                    encode_branch_register_response(body, buf);
                }
            },
            decode: |cur| {
                decode_branch_register_response(cur).map(MessagePayload::BranchRegisterResult)
            },
        },
    );
    m.insert(
        TypeCode::BranchCommit.into(),
        MessageCodec {
            encode: |p, buf| {
                if let MessagePayload::BranchCommit(body) = p {
                    encode_branch_end_request(body, buf);
                }
            },
            decode: |cur| decode_branch_end_request(cur).map(MessagePayload::BranchCommit),
        },
    );
    m.insert(
        TypeCode::BranchCommitResult.into(),
        MessageCodec {
            encode: |p, buf| {
                if let MessagePayload::BranchCommitResult(body) = p {
                    encode_branch_end_response(body, buf);
                }
            },
            decode: |cur| {
                decode_branch_end_response(cur).map(MessagePayload::BranchCommitResult)
            },
        },
    );
    m.insert(
        TypeCode::BranchRollback.into(),
        MessageCodec {
            encode: |p, buf| {
                if let MessagePayload::BranchRollback(body) = p {
                    encode_branch_end_request(body, buf);
                }
            },
            decode: |cur| decode_branch_end_request(cur).map(MessagePayload::BranchRollback),
        },
    );
    m.insert(
        TypeCode::BranchRollbackResult.into(),
        MessageCodec {
            encode: |p, buf| {
                if let MessagePayload::BranchRollbackResult(body) = p {
                    encode_branch_end_response(body, buf);
                }
            },
            decode: |cur| {
                decode_branch_end_response(cur).map(MessagePayload::BranchRollbackResult)
            },
        },
    );
    m.insert(
        TypeCode::BranchStatusReport.into(),
        MessageCodec {
            encode: |p, buf| {
                if let MessagePayload::BranchStatusReport(body) = p {
                    encode_branch_report_request(body, buf);
                }
            },
            decode: |cur| {
                decode_branch_report_request(cur).map(MessagePayload::BranchStatusReport)
            },
        },
    );
    m.insert(
        TypeCode::BranchStatusReportResult.into(),
        MessageCodec {
            encode: |p, buf| {
                if let MessagePayload::BranchStatusReportResult(body) = p {
                    encode_branch_report_response(body, buf);
                }
            },
            decode: |cur| {
                decode_branch_report_response(cur).map(MessagePayload::BranchStatusReportResult)
            },
        },
    );

    m.insert(
        TypeCode::RegisterTm.into(),
        MessageCodec {
            encode: |p, buf| {
                if let MessagePayload::RegisterTm(body) = p {
                    encode_register_tm_request(body, buf);
                }
            },
            decode: |cur| decode_register_tm_request(cur).map(MessagePayload::RegisterTm),
        },
    );
    m.insert(
        TypeCode::RegisterTmResult.into(),
        MessageCodec {
            encode: |p, buf| {
                if let MessagePayload::RegisterTmResult(body) = p {
                    encode_register_tm_response(body, buf);
                }
            },
            decode: |cur| {
                decode_register_tm_response(cur).map(MessagePayload::RegisterTmResult)
            },
        },
    );
    m.insert(
        TypeCode::RegisterRm.into(),
        MessageCodec {
            encode: |p, buf| {
                if let MessagePayload::RegisterRm(body) = p {
                    encode_register_rm_request(body, buf);
                }
            },
            decode: |cur| decode_register_rm_request(cur).map(MessagePayload::RegisterRm),
        },
    );
    m.insert(
        TypeCode::RegisterRmResult.into(),
        MessageCodec {
            encode: |p, buf| {
                if let MessagePayload::RegisterRmResult(body) = p {
                    encode_register_rm_response(body, buf);
                }
            },
            decode: |cur| {
                decode_register_rm_response(cur).map(MessagePayload::RegisterRmResult)
            },
        },
    );
    m.insert(
        TypeCode::UndoLogDelete.into(),
        MessageCodec {
            encode: |p, buf| {
                if let MessagePayload::UndoLogDelete(body) = p {
                    encode_undo_log_delete_request(body, buf);
                }
            },
            decode: |cur| {
                decode_undo_log_delete_request(cur).map(MessagePayload::UndoLogDelete)
            },
        },
    );

    m.insert(
        TypeCode::Merge.into(),
        MessageCodec {
            encode: |p, buf| {
                if let MessagePayload::Merge(body) = p {
                    encode_merge_entries(&body.messages, buf);
                }
            },
            decode: |cur| {
                decode_merge_entries(cur)
                    .map(|messages| MessagePayload::Merge(MergedWarpMessage { messages }))
            },
        },
    );
    m.insert(
        TypeCode::MergeResult.into(),
        MessageCodec {
            encode: |p, buf| {
                if let MessagePayload::MergeResult(body) = p {
                    encode_merge_entries(&body.messages, buf);
                }
            },
            decode: |cur| {
                decode_merge_entries(cur)
                    .map(|messages| MessagePayload::MergeResult(MergeResultMessage { messages }))
            },
        },
    );

    m
});

/// Serializes `payload` for the given codec id: a 2-byte big-endian type
/// code, then the variant's body bytes.
///
/// Unknown codec ids and bodies without a type code are logged and yield an
/// empty buffer; the frame layer still emits a valid (empty-body) frame, so
/// the stream never desynchronizes.
pub fn encode_message(codec: u8, payload: &MessagePayload) -> Vec<u8> {
    match CodecKind::try_from(codec) {
        Ok(CodecKind::Native) => {
            let mut buf = BytesMut::new();
            if encode_body(payload, &mut buf) {
                buf.to_vec()
            } else {
                Vec::new()
            }
        }
        Ok(CodecKind::Protobuf) => {
            tracing::error!("protobuf body codec is reserved and not wired in");
            Vec::new()
        }
        Err(_) => {
            tracing::error!(codec, "not support codec id");
            Vec::new()
        }
    }
}

/// Reads one body (type code plus fields) from `data`.
///
/// Returns the payload and the number of bytes consumed, or `None` when the
/// codec id or type code is unknown or the body is truncated. The outer
/// frame already bounds `data`, so `None` costs the message, not the stream.
pub fn decode_message(codec: u8, data: &[u8]) -> Option<(MessagePayload, usize)> {
    match CodecKind::try_from(codec) {
        Ok(CodecKind::Native) => decode_body(data),
        Ok(CodecKind::Protobuf) => {
            tracing::error!("protobuf body codec is reserved and not wired in");
            None
        }
        Err(_) => {
            tracing::error!(codec, "not support codec id");
            None
        }
    }
}

fn encode_body(payload: &MessagePayload, buf: &mut BytesMut) -> bool {
    let Some(type_code) = payload.type_code() else {
        tracing::error!("message body carries no type code and cannot be encoded");
        return false;
    };
    let code: i16 = type_code.into();
    match MESSAGE_CODECS.get(&code) {
        Some(entry) => {
            buf.put_i16(code);
            (entry.encode)(payload, buf);
            true
        }
        None => {
            tracing::error!(type_code = code, "not support type code");
            false
        }
    }
}

fn decode_body(data: &[u8]) -> Option<(MessagePayload, usize)> {
    let mut cur = data;
    let code = get_i16_type_code(&mut cur)?;
    let entry = match MESSAGE_CODECS.get(&code) {
        Some(entry) => entry,
        None => {
            tracing::error!(type_code = code, "not support type code");
            return None;
        }
    };

    let before = cur.len();
    let payload = (entry.decode)(&mut cur)?;
    Some((payload, 2 + before - cur.len()))
}

fn get_i16_type_code(cur: &mut &[u8]) -> Option<i16> {
    (cur.remaining() >= 2).then(|| cur.get_i16())
}

/// Merge envelope: `u16` entry count, then per entry a `u32` byte length
/// followed by the sub-message (type code + body). The per-entry length lets
/// a reader skip an unknown inner code without losing its place.
fn encode_merge_entries(messages: &[MessagePayload], buf: &mut BytesMut) {
    let encoded: Vec<BytesMut> = messages
        .iter()
        .filter_map(|sub| {
            let mut sub_buf = BytesMut::new();
            encode_body(sub, &mut sub_buf).then_some(sub_buf)
        })
        .collect();

    buf.put_u16(encoded.len() as u16);
    for sub_buf in &encoded {
        buf.put_u32(sub_buf.len() as u32);
        buf.put_slice(sub_buf);
    }
}

fn decode_merge_entries(cur: &mut &[u8]) -> Option<Vec<MessagePayload>> {
    let count = get_u16(cur)? as usize;
    let mut messages = Vec::with_capacity(count);

    for _ in 0..count {
        let len = get_u32(cur)? as usize;
        if cur.remaining() < len {
            return None;
        }
        if let Some((payload, _consumed)) = decode_body(&cur[..len]) {
            messages.push(payload);
        }
        cur.advance(len);
    }

    Some(messages)
}
