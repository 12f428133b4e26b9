use crate::codec::messages::{
    BranchEndRequest, BranchEndResponse, BranchRegisterRequest, BranchRegisterResponse,
    BranchReportRequest, BranchReportResponse, GlobalBeginRequest, GlobalBeginResponse,
    GlobalEndRequest, GlobalEndResponse, GlobalLockQueryResponse, GlobalReportRequest,
    MergeResultMessage, MergedWarpMessage, RegisterRmRequest, RegisterRmResponse,
    RegisterTmRequest, RegisterTmResponse, UndoLogDeleteRequest,
};
use crate::codec::TypeCode;

/// Sum of every body a frame can carry.
///
/// The two heartbeat sentinels and `Empty` have no type code and never pass
/// through the codec registry; everything else maps one-to-one onto a
/// [`TypeCode`]. Shared request/response shapes (global end, branch end) are
/// disambiguated by the variant, not the struct.
#[derive(Debug, Clone, PartialEq)]
pub enum MessagePayload {
    /// Fixed sentinel decoded from a heartbeat request frame.
    HeartbeatPing,
    /// Fixed sentinel decoded from a heartbeat response frame.
    HeartbeatPong,
    /// Substituted when a body is absent or its codec/type code is unknown.
    Empty,

    GlobalBegin(GlobalBeginRequest),
    GlobalBeginResult(GlobalBeginResponse),
    GlobalCommit(GlobalEndRequest),
    GlobalCommitResult(GlobalEndResponse),
    GlobalRollback(GlobalEndRequest),
    GlobalRollbackResult(GlobalEndResponse),
    GlobalStatus(GlobalEndRequest),
    GlobalStatusResult(GlobalEndResponse),
    GlobalReport(GlobalReportRequest),
    GlobalReportResult(GlobalEndResponse),
    GlobalLockQuery(BranchRegisterRequest),
    GlobalLockQueryResult(GlobalLockQueryResponse),

    BranchRegister(BranchRegisterRequest),
    BranchRegisterResult(BranchRegisterResponse),
    BranchCommit(BranchEndRequest),
    BranchCommitResult(BranchEndResponse),
    BranchRollback(BranchEndRequest),
    BranchRollbackResult(BranchEndResponse),
    BranchStatusReport(BranchReportRequest),
    BranchStatusReportResult(BranchReportResponse),

    RegisterTm(RegisterTmRequest),
    RegisterTmResult(RegisterTmResponse),
    RegisterRm(RegisterRmRequest),
    RegisterRmResult(RegisterRmResponse),
    UndoLogDelete(UndoLogDeleteRequest),

    Merge(MergedWarpMessage),
    MergeResult(MergeResultMessage),
}

impl MessagePayload {
    /// The wire discriminator for this body, or `None` for the sentinels
    /// that never reach the codec registry.
    pub fn type_code(&self) -> Option<TypeCode> {
        match self {
            MessagePayload::HeartbeatPing
            | MessagePayload::HeartbeatPong
            | MessagePayload::Empty => None,

            MessagePayload::GlobalBegin(_) => Some(TypeCode::GlobalBegin),
            MessagePayload::GlobalBeginResult(_) => Some(TypeCode::GlobalBeginResult),
            MessagePayload::GlobalCommit(_) => Some(TypeCode::GlobalCommit),
            MessagePayload::GlobalCommitResult(_) => Some(TypeCode::GlobalCommitResult),
            MessagePayload::GlobalRollback(_) => Some(TypeCode::GlobalRollback),
            MessagePayload::GlobalRollbackResult(_) => Some(TypeCode::GlobalRollbackResult),
            MessagePayload::GlobalStatus(_) => Some(TypeCode::GlobalStatus),
            MessagePayload::GlobalStatusResult(_) => Some(TypeCode::GlobalStatusResult),
            MessagePayload::GlobalReport(_) => Some(TypeCode::GlobalReport),
            MessagePayload::GlobalReportResult(_) => Some(TypeCode::GlobalReportResult),
            MessagePayload::GlobalLockQuery(_) => Some(TypeCode::GlobalLockQuery),
            MessagePayload::GlobalLockQueryResult(_) => Some(TypeCode::GlobalLockQueryResult),

            MessagePayload::BranchRegister(_) => Some(TypeCode::BranchRegister),
            MessagePayload::BranchRegisterResult(_) => Some(TypeCode::BranchRegisterResult),
            MessagePayload::BranchCommit(_) => Some(TypeCode::BranchCommit),
            MessagePayload::BranchCommitResult(_) => Some(TypeCode::BranchCommitResult),
            MessagePayload::BranchRollback(_) => Some(TypeCode::BranchRollback),
            MessagePayload::BranchRollbackResult(_) => Some(TypeCode::BranchRollbackResult),
            MessagePayload::BranchStatusReport(_) => Some(TypeCode::BranchStatusReport),
            MessagePayload::BranchStatusReportResult(_) => {
                Some(TypeCode::BranchStatusReportResult)
            }

            MessagePayload::RegisterTm(_) => Some(TypeCode::RegisterTm),
            MessagePayload::RegisterTmResult(_) => Some(TypeCode::RegisterTmResult),
            MessagePayload::RegisterRm(_) => Some(TypeCode::RegisterRm),
            MessagePayload::RegisterRmResult(_) => Some(TypeCode::RegisterRmResult),
            MessagePayload::UndoLogDelete(_) => Some(TypeCode::UndoLogDelete),

            MessagePayload::Merge(_) => Some(TypeCode::Merge),
            MessagePayload::MergeResult(_) => Some(TypeCode::MergeResult),
        }
    }
}
