//! Response definitions
//!
//! Wire shapes for the response direction.

use serde::{Deserialize, Serialize};

use super::request::{Dimension, Vec3};

/// Closed enumeration of faults reported to the client.
///
/// Internal detail (messages, provider errors) never crosses the wire;
/// anything outside the known taxonomy is reported as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    NoGame,
    MalformedRequest,
    NoSuchEntity,
    NoSuchBlock,
    UnsupportedOperation,
    InvalidTypeForWrite,
    UnknownCommand,
    Unknown,
}

/// Result of a command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Response {
    Error(ErrorCode),
    Float(f32),
    Int(i32),
    Text(String),
    Vec3(Vec3),
    Empty,
}

/// Reduced projection of one entity, returned in bulk by state queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySummary {
    pub id: i32,
    pub is_living: bool,
    pub is_alive: bool,
}

/// Reduced projection of one block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSummary {
    pub has_color: bool,
}

/// Best-effort snapshot answering a state query.
///
/// Sections are populated opportunistically; an inactive session yields an
/// empty snapshot, never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StateResponse {
    pub player_entity_id: Option<i32>,
    pub player_world: Option<Dimension>,
    pub entities: Option<Vec<EntitySummary>>,
    pub block: Option<BlockSummary>,
}

/// One encoded response frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Reply {
    Response(Response),
    State(StateResponse),
}

impl Reply {
    /// Create an error reply with the given code
    pub fn error(code: ErrorCode) -> Self {
        Reply::Response(Response::Error(code))
    }
}
