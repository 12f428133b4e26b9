use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::codec::MessagePayload;

/// Outcome byte shared by every response body.
#[repr(u8)]
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Default, TryFromPrimitive, IntoPrimitive,
)]
pub enum ResultCode {
    #[default]
    Failed = 0,
    Success = 1,
}

/// Opens a new global transaction on the coordinator.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GlobalBeginRequest {
    pub timeout_millis: i32,
    pub transaction_name: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GlobalBeginResponse {
    pub result_code: ResultCode,
    pub msg: String,
    /// The freshly minted global transaction id, opaque to this layer.
    pub xid: String,
    pub extra_data: String,
}

/// Shared shape of the commit / rollback / status requests that act on an
/// already-open global transaction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GlobalEndRequest {
    pub xid: String,
    pub extra_data: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GlobalEndResponse {
    pub result_code: ResultCode,
    pub msg: String,
    pub global_status: u8,
}

/// Reports a client-observed global status back to the coordinator.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GlobalReportRequest {
    pub xid: String,
    pub extra_data: String,
    pub global_status: u8,
}

/// Registers a branch under a global transaction. The same shape doubles as
/// the global lock query, which probes the lock keys without registering.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BranchRegisterRequest {
    pub xid: String,
    pub branch_type: u8,
    pub resource_id: String,
    pub lock_key: String,
    pub application_data: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BranchRegisterResponse {
    pub result_code: ResultCode,
    pub msg: String,
    pub branch_id: i64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GlobalLockQueryResponse {
    pub result_code: ResultCode,
    pub msg: String,
    pub lockable: bool,
}

/// Shared shape of the branch commit / rollback orders the coordinator sends
/// to a resource manager.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BranchEndRequest {
    pub xid: String,
    pub branch_id: i64,
    pub branch_type: u8,
    pub resource_id: String,
    pub application_data: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BranchEndResponse {
    pub result_code: ResultCode,
    pub msg: String,
    pub xid: String,
    pub branch_id: i64,
    pub branch_status: u8,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BranchReportRequest {
    pub xid: String,
    pub branch_id: i64,
    pub resource_id: String,
    pub status: u8,
    pub application_data: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BranchReportResponse {
    pub result_code: ResultCode,
    pub msg: String,
}

/// First frame a transaction manager sends after connecting.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegisterTmRequest {
    pub version: String,
    pub application_id: String,
    pub transaction_service_group: String,
    pub extra_data: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegisterTmResponse {
    pub identified: bool,
    pub version: String,
}

/// First frame a resource manager sends after connecting. `resource_ids` is
/// the comma-joined list of resources the application owns, in registration
/// order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegisterRmRequest {
    pub version: String,
    pub application_id: String,
    pub transaction_service_group: String,
    pub extra_data: String,
    pub resource_ids: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegisterRmResponse {
    pub identified: bool,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UndoLogDeleteRequest {
    pub resource_id: String,
    pub save_days: i16,
}

/// Batched envelope: several requests coalesced into one frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MergedWarpMessage {
    pub messages: Vec<MessagePayload>,
}

/// Batched envelope of responses, paired one-to-one with a prior merge.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MergeResultMessage {
    pub messages: Vec<MessagePayload>,
}
