use num_enum::{IntoPrimitive, TryFromPrimitive};

/// 16-bit discriminator prepended to every non-heartbeat body.
///
/// Requests and their results come in adjacent pairs. The numbering is part
/// of the wire contract and must not be rearranged.
#[repr(i16)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, TryFromPrimitive, IntoPrimitive)]
pub enum TypeCode {
    GlobalBegin = 1,
    GlobalBeginResult = 2,
    BranchCommit = 3,
    BranchCommitResult = 4,
    BranchRollback = 5,
    BranchRollbackResult = 6,
    GlobalCommit = 7,
    GlobalCommitResult = 8,
    GlobalRollback = 9,
    GlobalRollbackResult = 10,
    BranchRegister = 11,
    BranchRegisterResult = 12,
    BranchStatusReport = 13,
    BranchStatusReportResult = 14,
    GlobalStatus = 15,
    GlobalStatusResult = 16,
    GlobalReport = 17,
    GlobalReportResult = 18,
    GlobalLockQuery = 21,
    GlobalLockQueryResult = 22,
    Merge = 59,
    MergeResult = 60,
    RegisterTm = 101,
    RegisterTmResult = 102,
    RegisterRm = 103,
    RegisterRmResult = 104,
    UndoLogDelete = 111,
}
