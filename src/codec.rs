mod message_payload;
mod messages;
mod payload_codec;
mod registry;
mod type_code;

pub use message_payload::MessagePayload;
pub use messages::{
    BranchEndRequest, BranchEndResponse, BranchRegisterRequest, BranchRegisterResponse,
    BranchReportRequest, BranchReportResponse, GlobalBeginRequest, GlobalBeginResponse,
    GlobalEndRequest, GlobalEndResponse, GlobalLockQueryResponse, GlobalReportRequest,
    MergeResultMessage, MergedWarpMessage, RegisterRmRequest, RegisterRmResponse,
    RegisterTmRequest, RegisterTmResponse, ResultCode, UndoLogDeleteRequest,
};
pub use registry::{decode_message, encode_message, CodecKind};
pub use type_code::TypeCode;
