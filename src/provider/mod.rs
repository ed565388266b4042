//! State Provider interface
//!
//! The seam between the bridge and the live simulation. The bridge core
//! never touches simulation state directly; everything goes through
//! [`StateProvider`], which the host implements against its own world
//! representation.
//!
//! All calls are synchronous from the executor's point of view. If the
//! underlying state is only safely touched on another thread (e.g. a
//! simulation main loop), the provider implementation is responsible for
//! marshaling the call there and blocking until it completes.

pub mod memory;

use thiserror::Error;

use crate::protocol::{BlockPos, Dimension, Vec3};

pub use memory::MemoryProvider;

/// A resolved, loaded world
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldHandle {
    pub dimension: Dimension,
}

/// A resolved entity within a world
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityHandle {
    pub world: WorldHandle,
    pub id: i32,
}

/// The player associated with the current session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerHandle {
    pub entity: EntityHandle,
}

/// A block position within a resolved world
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHandle {
    pub world: WorldHandle,
    pub pos: BlockPos,
}

/// An axis-aligned bounding volume used for entity scans
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub min: Vec3,
    pub max: Vec3,
}

impl Region {
    /// A cube of the given half-extent centered on the world origin
    pub fn cube(radius: f64) -> Self {
        Self {
            min: Vec3::new(-radius, -radius, -radius),
            max: Vec3::new(radius, radius, radius),
        }
    }

    /// Whether a point falls within this region (inclusive bounds)
    pub fn contains(&self, p: Vec3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }
}

/// Failures surfaced by a provider.
///
/// Only `UnknownBlockKind` has a dedicated wire code (`NoSuchBlock`); the
/// rest are reported to clients as the opaque `Unknown` code, with detail
/// logged host-side.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Unknown block kind '{0}'")]
    UnknownBlockKind(String),

    #[error("Entity {0} is not a living entity")]
    NotLiving(i32),

    #[error("Handle refers to entity {0} which no longer exists")]
    Stale(i32),

    #[error("Provider internal error: {0}")]
    Internal(String),
}

/// Live simulation state, exposed to the bridge.
///
/// Lookups return `Option` (absence is a normal outcome the executor maps to
/// an error code); accessors and mutators return `Result` because a live
/// simulation can fail underneath any of them.
pub trait StateProvider: Send + Sync {
    // -------------------------------------------------------------------------
    // Resolution
    // -------------------------------------------------------------------------

    /// The player associated with this session, if any
    fn current_player(&self) -> Option<PlayerHandle>;

    /// Resolve a dimension to a loaded world
    fn resolve_world(&self, dimension: Dimension) -> Option<WorldHandle>;

    /// Look up an entity by id in a resolved world
    fn entity_by_id(&self, world: WorldHandle, id: i32) -> Option<EntityHandle>;

    /// All entities within a bounding region of a resolved world
    fn entities_in(&self, world: WorldHandle, region: Region) -> Vec<EntityHandle>;

    /// The block at the given coordinates (always addressable)
    fn block_at(&self, world: WorldHandle, pos: BlockPos) -> BlockHandle;

    // -------------------------------------------------------------------------
    // Entity accessors
    // -------------------------------------------------------------------------

    /// Whether the entity is a living entity (has health)
    fn is_living(&self, entity: EntityHandle) -> bool;

    /// Whether the entity is currently alive
    fn is_alive(&self, entity: EntityHandle) -> bool;

    fn player_name(&self, player: PlayerHandle) -> Result<String, ProviderError>;

    fn entity_kind(&self, entity: EntityHandle) -> Result<String, ProviderError>;

    fn health(&self, entity: EntityHandle) -> Result<f32, ProviderError>;

    /// Set health directly, without damage side effects
    fn set_health(&self, entity: EntityHandle, health: f32) -> Result<(), ProviderError>;

    /// Apply damage, firing whatever side effects the simulation attaches
    /// (death, events)
    fn damage(&self, entity: EntityHandle, amount: f32) -> Result<(), ProviderError>;

    fn position(&self, entity: EntityHandle) -> Result<Vec3, ProviderError>;

    fn teleport(&self, entity: EntityHandle, pos: Vec3) -> Result<(), ProviderError>;

    // -------------------------------------------------------------------------
    // World and block accessors
    // -------------------------------------------------------------------------

    fn world_time(&self, world: WorldHandle) -> Result<i32, ProviderError>;

    fn set_world_time(&self, world: WorldHandle, time: i32) -> Result<(), ProviderError>;

    fn block_kind(&self, block: BlockHandle) -> Result<String, ProviderError>;

    /// Replace the block; an unresolvable kind is `UnknownBlockKind`
    fn set_block_kind(&self, block: BlockHandle, kind: &str) -> Result<(), ProviderError>;

    fn block_has_color(&self, block: BlockHandle) -> Result<bool, ProviderError>;

    // -------------------------------------------------------------------------
    // One-shot actions
    // -------------------------------------------------------------------------

    /// Send a chat message as the player
    fn chat(&self, player: PlayerHandle, text: &str) -> Result<(), ProviderError>;

    /// Apply a movement vector to the player
    fn apply_motion(&self, player: PlayerHandle, motion: Vec3) -> Result<(), ProviderError>;

    /// Trigger a jump
    fn jump(&self, player: PlayerHandle) -> Result<(), ProviderError>;
}
