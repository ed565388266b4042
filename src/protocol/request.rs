//! Request definitions
//!
//! Wire shapes for the request direction: commands and state queries.
//! All types are plain immutable data, constructed fresh per message.

use serde::{Deserialize, Serialize};

/// Raw command code as carried on the wire.
///
/// Kept open (any `u16`) rather than a closed enum so an unrecognized code
/// decodes cleanly and reaches the executor, which answers it with
/// `UnknownCommand` instead of tearing down the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandCode(pub u16);

/// Recognized command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum CommandType {
    PlayerName = 0x01,
    EntityType = 0x02,
    EntityHealth = 0x03,
    EntityPosition = 0x04,
    WorldTime = 0x05,
    BlockType = 0x06,
    ControlSay = 0x07,
    ControlMove = 0x08,
    ControlJump = 0x09,
}

/// Capability class of a command: what reads and writes it admits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Read a value; any write payload is rejected
    ReadOnly,
    /// Read the current value, or write one of the declared kind
    ReadWrite(PayloadKind),
    /// Write-only action; requires a payload of the declared kind
    WriteOnly(PayloadKind),
    /// One-shot action; any payload is ignored
    NoPayload,
}

/// Payload kind declared by a command's capability class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Float,
    Int,
    Text,
    Vec3,
}

impl CommandType {
    /// Every recognized command type
    pub const ALL: [CommandType; 9] = [
        CommandType::PlayerName,
        CommandType::EntityType,
        CommandType::EntityHealth,
        CommandType::EntityPosition,
        CommandType::WorldTime,
        CommandType::BlockType,
        CommandType::ControlSay,
        CommandType::ControlMove,
        CommandType::ControlJump,
    ];

    /// The wire code for this command type
    pub fn code(self) -> CommandCode {
        CommandCode(self as u16)
    }

    /// Map a wire code back to a command type, if recognized
    pub fn from_code(code: CommandCode) -> Option<Self> {
        match code.0 {
            0x01 => Some(CommandType::PlayerName),
            0x02 => Some(CommandType::EntityType),
            0x03 => Some(CommandType::EntityHealth),
            0x04 => Some(CommandType::EntityPosition),
            0x05 => Some(CommandType::WorldTime),
            0x06 => Some(CommandType::BlockType),
            0x07 => Some(CommandType::ControlSay),
            0x08 => Some(CommandType::ControlMove),
            0x09 => Some(CommandType::ControlJump),
            _ => None,
        }
    }

    /// The capability class this command type declares
    pub fn capability(self) -> Capability {
        match self {
            CommandType::PlayerName => Capability::ReadOnly,
            CommandType::EntityType => Capability::ReadOnly,
            CommandType::EntityHealth => Capability::ReadWrite(PayloadKind::Float),
            CommandType::EntityPosition => Capability::ReadWrite(PayloadKind::Vec3),
            CommandType::WorldTime => Capability::ReadWrite(PayloadKind::Int),
            CommandType::BlockType => Capability::ReadWrite(PayloadKind::Text),
            CommandType::ControlSay => Capability::WriteOnly(PayloadKind::Text),
            CommandType::ControlMove => Capability::WriteOnly(PayloadKind::Vec3),
            CommandType::ControlJump => Capability::NoPayload,
        }
    }
}

/// Command target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    /// No target supplied
    None,

    /// A specific entity by id
    Entity(i32),

    /// The player associated with the current session
    CurrentPlayer,
}

/// Enumerated world partition used to resolve a target world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Overworld,
    Nether,
    End,
}

/// Integer block coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

/// Double-precision vector (positions, movement)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Write payload attached to a command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WritePayload {
    Float(f32),
    Int(i32),
    Text(String),
    Vec3(Vec3),
}

impl WritePayload {
    /// The kind of this payload, for matching against a command's declaration
    pub fn kind(&self) -> PayloadKind {
        match self {
            WritePayload::Float(_) => PayloadKind::Float,
            WritePayload::Int(_) => PayloadKind::Int,
            WritePayload::Text(_) => PayloadKind::Text,
            WritePayload::Vec3(_) => PayloadKind::Vec3,
        }
    }
}

/// A single field read or mutation request against a resolved target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// Raw command code (see [`CommandType::from_code`])
    pub cmd: CommandCode,

    /// What the command acts on
    pub target: Target,

    /// Explicit world, when the target world is not implied by the session
    pub world: Option<Dimension>,

    /// Block coordinates, for block-addressed commands
    pub block: Option<BlockPos>,

    /// Write payload; absent means "read the current value"
    pub write: Option<WritePayload>,
}

impl Command {
    /// Create a command with no target, world, block or write payload
    pub fn new(ty: CommandType) -> Self {
        Self {
            cmd: ty.code(),
            target: Target::None,
            world: None,
            block: None,
            write: None,
        }
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn with_world(mut self, world: Dimension) -> Self {
        self.world = Some(world);
        self
    }

    pub fn with_block(mut self, block: BlockPos) -> Self {
        self.block = Some(block);
        self
    }

    pub fn with_write(mut self, write: WritePayload) -> Self {
        self.write = Some(write);
        self
    }
}

/// A best-effort snapshot request for session/entity/block summaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateQuery {
    /// Include the entity summary section
    pub want_entities: bool,

    /// Explicit world to snapshot; falls back to the session player's world
    pub world: Option<Dimension>,

    /// Block to summarize, when a world resolves
    pub block: Option<BlockPos>,
}

/// One decoded request frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Request {
    Command(Command),
    Query(StateQuery),
}
