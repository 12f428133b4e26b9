//! Field-level encoders and decoders for each body shape.
//!
//! Everything is big-endian. Short strings carry a `u16` length prefix;
//! the long-form fields (`application_data`, `lock_key`, `extra_data`,
//! `resource_ids`) carry a `u32` prefix. Decoders take a cursor and return
//! `None` on truncation, leaving the caller to substitute an empty body.

use bytes::{Buf, BufMut, BytesMut};

use crate::codec::messages::{
    BranchEndRequest, BranchEndResponse, BranchRegisterRequest, BranchRegisterResponse,
    BranchReportRequest, BranchReportResponse, GlobalBeginRequest, GlobalBeginResponse,
    GlobalEndRequest, GlobalEndResponse, GlobalLockQueryResponse, GlobalReportRequest,
    RegisterRmRequest, RegisterRmResponse, RegisterTmRequest, RegisterTmResponse, ResultCode,
    UndoLogDeleteRequest,
};

fn put_str16(buf: &mut BytesMut, s: &str) {
    buf.put_u16(s.len() as u16);
    buf.put_slice(s.as_bytes());
}

fn put_str32(buf: &mut BytesMut, s: &str) {
    buf.put_u32(s.len() as u32);
    buf.put_slice(s.as_bytes());
}

fn get_u8(cur: &mut &[u8]) -> Option<u8> {
    (cur.remaining() >= 1).then(|| cur.get_u8())
}

pub(super) fn get_u16(cur: &mut &[u8]) -> Option<u16> {
    (cur.remaining() >= 2).then(|| cur.get_u16())
}

fn get_i16(cur: &mut &[u8]) -> Option<i16> {
    (cur.remaining() >= 2).then(|| cur.get_i16())
}

pub(super) fn get_u32(cur: &mut &[u8]) -> Option<u32> {
    (cur.remaining() >= 4).then(|| cur.get_u32())
}

fn get_i32(cur: &mut &[u8]) -> Option<i32> {
    (cur.remaining() >= 4).then(|| cur.get_i32())
}

fn get_i64(cur: &mut &[u8]) -> Option<i64> {
    (cur.remaining() >= 8).then(|| cur.get_i64())
}

fn get_bool(cur: &mut &[u8]) -> Option<bool> {
    get_u8(cur).map(|b| b != 0)
}

fn get_str16(cur: &mut &[u8]) -> Option<String> {
    let len = get_u16(cur)? as usize;
    if cur.remaining() < len {
        return None;
    }
    let s = String::from_utf8_lossy(&cur[..len]).into_owned();
    cur.advance(len);
    Some(s)
}

fn get_str32(cur: &mut &[u8]) -> Option<String> {
    let len = get_u32(cur)? as usize;
    if cur.remaining() < len {
        return None;
    }
    let s = String::from_utf8_lossy(&cur[..len]).into_owned();
    cur.advance(len);
    Some(s)
}

fn get_result_code(cur: &mut &[u8]) -> Option<ResultCode> {
    ResultCode::try_from(get_u8(cur)?).ok()
}

pub(super) fn encode_global_begin_request(m: &GlobalBeginRequest, buf: &mut BytesMut) {
    buf.put_i32(m.timeout_millis);
    put_str16(buf, &m.transaction_name);
}

pub(super) fn decode_global_begin_request(cur: &mut &[u8]) -> Option<GlobalBeginRequest> {
    Some(GlobalBeginRequest {
        timeout_millis: get_i32(cur)?,
        transaction_name: get_str16(cur)?,
    })
}

pub(super) fn encode_global_begin_response(m: &GlobalBeginResponse, buf: &mut BytesMut) {
    buf.put_u8(m.result_code.into());
    put_str16(buf, &m.msg);
    put_str16(buf, &m.xid);
    put_str32(buf, &m.extra_data);
}

pub(super) fn decode_global_begin_response(cur: &mut &[u8]) -> Option<GlobalBeginResponse> {
    Some(GlobalBeginResponse {
        result_code: get_result_code(cur)?,
        msg: get_str16(cur)?,
        xid: get_str16(cur)?,
        extra_data: get_str32(cur)?,
    })
}

pub(super) fn encode_global_end_request(m: &GlobalEndRequest, buf: &mut BytesMut) {
    put_str16(buf, &m.xid);
    put_str32(buf, &m.extra_data);
}

pub(super) fn decode_global_end_request(cur: &mut &[u8]) -> Option<GlobalEndRequest> {
    Some(GlobalEndRequest {
        xid: get_str16(cur)?,
        extra_data: get_str32(cur)?,
    })
}

pub(super) fn encode_global_end_response(m: &GlobalEndResponse, buf: &mut BytesMut) {
    buf.put_u8(m.result_code.into());
    put_str16(buf, &m.msg);
    buf.put_u8(m.global_status);
}

pub(super) fn decode_global_end_response(cur: &mut &[u8]) -> Option<GlobalEndResponse> {
    Some(GlobalEndResponse {
        result_code: get_result_code(cur)?,
        msg: get_str16(cur)?,
        global_status: get_u8(cur)?,
    })
}

pub(super) fn encode_global_report_request(m: &GlobalReportRequest, buf: &mut BytesMut) {
    put_str16(buf, &m.xid);
    put_str32(buf, &m.extra_data);
    buf.put_u8(m.global_status);
}

pub(super) fn decode_global_report_request(cur: &mut &[u8]) -> Option<GlobalReportRequest> {
    Some(GlobalReportRequest {
        xid: get_str16(cur)?,
        extra_data: get_str32(cur)?,
        global_status: get_u8(cur)?,
    })
}

pub(super) fn encode_branch_register_request(m: &BranchRegisterRequest, buf: &mut BytesMut) {
    put_str16(buf, &m.xid);
    buf.put_u8(m.branch_type);
    put_str16(buf, &m.resource_id);
    put_str32(buf, &m.lock_key);
    put_str32(buf, &m.application_data);
}

pub(super) fn decode_branch_register_request(cur: &mut &[u8]) -> Option<BranchRegisterRequest> {
    Some(BranchRegisterRequest {
        xid: get_str16(cur)?,
        branch_type: get_u8(cur)?,
        resource_id: get_str16(cur)?,
        lock_key: get_str32(cur)?,
        application_data: get_str32(cur)?,
    })
}

pub(super) fn encode_branch_register_response(m: &BranchRegisterResponse, buf: &mut BytesMut) {
    buf.put_u8(m.result_code.into());
    put_str16(buf, &m.msg);
    buf.put_i64(m.branch_id);
}

pub(super) fn decode_branch_register_response(cur: &mut &[u8]) -> Option<BranchRegisterResponse> {
    Some(BranchRegisterResponse {
        result_code: get_result_code(cur)?,
        msg: get_str16(cur)?,
        branch_id: get_i64(cur)?,
    })
}

pub(super) fn encode_global_lock_query_response(m: &GlobalLockQueryResponse, buf: &mut BytesMut) {
    buf.put_u8(m.result_code.into());
    put_str16(buf, &m.msg);
    buf.put_u8(m.lockable as u8);
}

pub(super) fn decode_global_lock_query_response(
    cur: &mut &[u8],
) -> Option<GlobalLockQueryResponse> {
    Some(GlobalLockQueryResponse {
        result_code: get_result_code(cur)?,
        msg: get_str16(cur)?,
        lockable: get_bool(cur)?,
    })
}

pub(super) fn encode_branch_end_request(m: &BranchEndRequest, buf: &mut BytesMut) {
    put_str16(buf, &m.xid);
    buf.put_i64(m.branch_id);
    buf.put_u8(m.branch_type);
    put_str16(buf, &m.resource_id);
    put_str32(buf, &m.application_data);
}

pub(super) fn decode_branch_end_request(cur: &mut &[u8]) -> Option<BranchEndRequest> {
    Some(BranchEndRequest {
        xid: get_str16(cur)?,
        branch_id: get_i64(cur)?,
        branch_type: get_u8(cur)?,
        resource_id: get_str16(cur)?,
        application_data: get_str32(cur)?,
    })
}

pub(super) fn encode_branch_end_response(m: &BranchEndResponse, buf: &mut BytesMut) {
    buf.put_u8(m.result_code.into());
    put_str16(buf, &m.msg);
    put_str16(buf, &m.xid);
    buf.put_i64(m.branch_id);
    buf.put_u8(m.branch_status);
}

pub(super) fn decode_branch_end_response(cur: &mut &[u8]) -> Option<BranchEndResponse> {
    Some(BranchEndResponse {
        result_code: get_result_code(cur)?,
        msg: get_str16(cur)?,
        xid: get_str16(cur)?,
        branch_id: get_i64(cur)?,
        branch_status: get_u8(cur)?,
    })
}

pub(super) fn encode_branch_report_request(m: &BranchReportRequest, buf: &mut BytesMut) {
    put_str16(buf, &m.xid);
    buf.put_i64(m.branch_id);
    put_str16(buf, &m.resource_id);
    buf.put_u8(m.status);
    put_str32(buf, &m.application_data);
}

pub(super) fn decode_branch_report_request(cur: &mut &[u8]) -> Option<BranchReportRequest> {
    Some(BranchReportRequest {
        xid: get_str16(cur)?,
        branch_id: get_i64(cur)?,
        resource_id: get_str16(cur)?,
        status: get_u8(cur)?,
        application_data: get_str32(cur)?,
    })
}

pub(super) fn encode_branch_report_response(m: &BranchReportResponse, buf: &mut BytesMut) {
    buf.put_u8(m.result_code.into());
    put_str16(buf, &m.msg);
}

pub(super) fn decode_branch_report_response(cur: &mut &[u8]) -> Option<BranchReportResponse> {
    Some(BranchReportResponse {
        result_code: get_result_code(cur)?,
        msg: get_str16(cur)?,
    })
}

pub(super) fn encode_register_tm_request(m: &RegisterTmRequest, buf: &mut BytesMut) {
    put_str16(buf, &m.version);
    put_str16(buf, &m.application_id);
    put_str16(buf, &m.transaction_service_group);
    put_str32(buf, &m.extra_data);
}

pub(super) fn decode_register_tm_request(cur: &mut &[u8]) -> Option<RegisterTmRequest> {
    Some(RegisterTmRequest {
        version: get_str16(cur)?,
        application_id: get_str16(cur)?,
        transaction_service_group: get_str16(cur)?,
        extra_data: get_str32(cur)?,
    })
}

pub(super) fn encode_register_tm_response(m: &RegisterTmResponse, buf: &mut BytesMut) {
    buf.put_u8(m.identified as u8);
    put_str16(buf, &m.version);
}

pub(super) fn decode_register_tm_response(cur: &mut &[u8]) -> Option<RegisterTmResponse> {
    Some(RegisterTmResponse {
        identified: get_bool(cur)?,
        version: get_str16(cur)?,
    })
}

pub(super) fn encode_register_rm_request(m: &RegisterRmRequest, buf: &mut BytesMut) {
    put_str16(buf, &m.version);
    put_str16(buf, &m.application_id);
    put_str16(buf, &m.transaction_service_group);
    put_str32(buf, &m.extra_data);
    put_str32(buf, &m.resource_ids);
}

pub(super) fn decode_register_rm_request(cur: &mut &[u8]) -> Option<RegisterRmRequest> {
    Some(RegisterRmRequest {
        version: get_str16(cur)?,
        application_id: get_str16(cur)?,
        transaction_service_group: get_str16(cur)?,
        extra_data: get_str32(cur)?,
        resource_ids: get_str32(cur)?,
    })
}

pub(super) fn encode_register_rm_response(m: &RegisterRmResponse, buf: &mut BytesMut) {
    buf.put_u8(m.identified as u8);
    put_str16(buf, &m.version);
}

pub(super) fn decode_register_rm_response(cur: &mut &[u8]) -> Option<RegisterRmResponse> {
    Some(RegisterRmResponse {
        identified: get_bool(cur)?,
        version: get_str16(cur)?,
    })
}

pub(super) fn encode_undo_log_delete_request(m: &UndoLogDeleteRequest, buf: &mut BytesMut) {
    put_str16(buf, &m.resource_id);
    buf.put_i16(m.save_days);
}

pub(super) fn decode_undo_log_delete_request(cur: &mut &[u8]) -> Option<UndoLogDeleteRequest> {
    Some(UndoLogDeleteRequest {
        resource_id: get_str16(cur)?,
        save_days: get_i16(cur)?,
    })
}
