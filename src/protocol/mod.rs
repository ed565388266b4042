//! Wire protocol: message shapes and codec
//!
//! Defines the binary message contract between the bridge and external
//! clients. The shapes here are pure data; behavior lives in the executor
//! and dispatcher.

pub mod codec;
mod request;
mod response;

pub use codec::{
    decode_reply, decode_request, encode_reply, encode_request, read_frame, read_reply,
    read_request, write_frame, write_reply, write_request, LEN_PREFIX_SIZE, MAX_PAYLOAD_SIZE,
};
pub use request::{
    BlockPos, Capability, Command, CommandCode, CommandType, Dimension, PayloadKind, Request,
    StateQuery, Target, Vec3, WritePayload,
};
pub use response::{BlockSummary, EntitySummary, ErrorCode, Reply, Response, StateResponse};
