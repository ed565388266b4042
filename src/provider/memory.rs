//! In-memory State Provider
//!
//! A self-contained provider backed by plain maps, used by the demo host
//! binary and as the test double for executor and socket tests. Mutating
//! side effects (damage, chat, motion, jumps) are recorded so tests can
//! assert on which path a command took.

use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;

use crate::protocol::{BlockPos, Dimension, Vec3};

use super::{
    BlockHandle, EntityHandle, PlayerHandle, ProviderError, Region, StateProvider, WorldHandle,
};

/// Block kind every unset position reports
pub const DEFAULT_BLOCK_KIND: &str = "air";

#[derive(Debug, Clone)]
struct EntityState {
    kind: String,
    /// `None` for non-living entities
    health: Option<f32>,
    alive: bool,
    pos: Vec3,
}

#[derive(Debug, Default)]
struct WorldState {
    time: i32,
    entities: BTreeMap<i32, EntityState>,
    blocks: HashMap<BlockPos, String>,
}

#[derive(Debug, Clone)]
struct PlayerSeat {
    name: String,
    dimension: Dimension,
    entity_id: i32,
}

#[derive(Default)]
struct Inner {
    player: Option<PlayerSeat>,
    worlds: HashMap<Dimension, WorldState>,
    /// kind -> colored flag
    palette: HashMap<String, bool>,
    damage_log: Vec<(i32, f32)>,
    chat_log: Vec<String>,
    motions: Vec<Vec3>,
    jumps: usize,
}

/// In-memory simulation state
pub struct MemoryProvider {
    inner: RwLock<Inner>,
}

impl Default for MemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryProvider {
    pub fn new() -> Self {
        let mut inner = Inner::default();
        inner
            .palette
            .insert(DEFAULT_BLOCK_KIND.to_string(), false);
        Self {
            inner: RwLock::new(inner),
        }
    }

    // -------------------------------------------------------------------------
    // World building
    // -------------------------------------------------------------------------

    /// Create an empty world for the given dimension
    pub fn add_world(&self, dimension: Dimension) {
        self.inner.write().worlds.entry(dimension).or_default();
    }

    /// Spawn an entity; creates the world if needed. `health` of `None`
    /// marks a non-living entity.
    pub fn spawn(&self, dimension: Dimension, id: i32, kind: &str, health: Option<f32>) {
        self.spawn_at(dimension, id, kind, health, Vec3::new(0.0, 0.0, 0.0));
    }

    /// Spawn an entity at a specific position
    pub fn spawn_at(
        &self,
        dimension: Dimension,
        id: i32,
        kind: &str,
        health: Option<f32>,
        pos: Vec3,
    ) {
        let mut inner = self.inner.write();
        let world = inner.worlds.entry(dimension).or_default();
        world.entities.insert(
            id,
            EntityState {
                kind: kind.to_string(),
                health,
                alive: true,
                pos,
            },
        );
    }

    /// Attach a session player to an existing entity
    pub fn seat_player(&self, name: &str, dimension: Dimension, entity_id: i32) {
        self.inner.write().player = Some(PlayerSeat {
            name: name.to_string(),
            dimension,
            entity_id,
        });
    }

    /// Detach the session player
    pub fn clear_player(&self) {
        self.inner.write().player = None;
    }

    /// Register a block kind and whether it carries color
    pub fn register_block_kind(&self, kind: &str, colored: bool) {
        self.inner.write().palette.insert(kind.to_string(), colored);
    }

    /// Pre-place a block without going through the write path
    pub fn place_block(&self, dimension: Dimension, pos: BlockPos, kind: &str) {
        let mut inner = self.inner.write();
        let world = inner.worlds.entry(dimension).or_default();
        world.blocks.insert(pos, kind.to_string());
    }

    // -------------------------------------------------------------------------
    // Recorded side effects
    // -------------------------------------------------------------------------

    /// `(entity id, damage amount)` per damage-path health write
    pub fn damage_log(&self) -> Vec<(i32, f32)> {
        self.inner.read().damage_log.clone()
    }

    pub fn chat_log(&self) -> Vec<String> {
        self.inner.read().chat_log.clone()
    }

    pub fn motions(&self) -> Vec<Vec3> {
        self.inner.read().motions.clone()
    }

    pub fn jump_count(&self) -> usize {
        self.inner.read().jumps
    }
}

impl Inner {
    fn entity(&self, handle: EntityHandle) -> Result<&EntityState, ProviderError> {
        self.worlds
            .get(&handle.world.dimension)
            .and_then(|w| w.entities.get(&handle.id))
            .ok_or(ProviderError::Stale(handle.id))
    }

    fn entity_mut(&mut self, handle: EntityHandle) -> Result<&mut EntityState, ProviderError> {
        self.worlds
            .get_mut(&handle.world.dimension)
            .and_then(|w| w.entities.get_mut(&handle.id))
            .ok_or(ProviderError::Stale(handle.id))
    }

    fn world(&self, handle: WorldHandle) -> Result<&WorldState, ProviderError> {
        self.worlds
            .get(&handle.dimension)
            .ok_or_else(|| ProviderError::Internal(format!("world {:?} not loaded", handle.dimension)))
    }
}

impl StateProvider for MemoryProvider {
    fn current_player(&self) -> Option<PlayerHandle> {
        let inner = self.inner.read();
        let seat = inner.player.as_ref()?;
        Some(PlayerHandle {
            entity: EntityHandle {
                world: WorldHandle {
                    dimension: seat.dimension,
                },
                id: seat.entity_id,
            },
        })
    }

    fn resolve_world(&self, dimension: Dimension) -> Option<WorldHandle> {
        self.inner
            .read()
            .worlds
            .contains_key(&dimension)
            .then_some(WorldHandle { dimension })
    }

    fn entity_by_id(&self, world: WorldHandle, id: i32) -> Option<EntityHandle> {
        let inner = self.inner.read();
        inner
            .worlds
            .get(&world.dimension)
            .is_some_and(|w| w.entities.contains_key(&id))
            .then_some(EntityHandle { world, id })
    }

    fn entities_in(&self, world: WorldHandle, region: Region) -> Vec<EntityHandle> {
        let inner = self.inner.read();
        let Some(state) = inner.worlds.get(&world.dimension) else {
            return Vec::new();
        };
        state
            .entities
            .iter()
            .filter(|(_, e)| region.contains(e.pos))
            .map(|(&id, _)| EntityHandle { world, id })
            .collect()
    }

    fn block_at(&self, world: WorldHandle, pos: BlockPos) -> BlockHandle {
        BlockHandle { world, pos }
    }

    fn is_living(&self, entity: EntityHandle) -> bool {
        self.inner
            .read()
            .entity(entity)
            .map(|e| e.health.is_some())
            .unwrap_or(false)
    }

    fn is_alive(&self, entity: EntityHandle) -> bool {
        self.inner
            .read()
            .entity(entity)
            .map(|e| e.alive)
            .unwrap_or(false)
    }

    fn player_name(&self, player: PlayerHandle) -> Result<String, ProviderError> {
        let inner = self.inner.read();
        inner
            .player
            .as_ref()
            .filter(|seat| seat.entity_id == player.entity.id)
            .map(|seat| seat.name.clone())
            .ok_or(ProviderError::Stale(player.entity.id))
    }

    fn entity_kind(&self, entity: EntityHandle) -> Result<String, ProviderError> {
        self.inner.read().entity(entity).map(|e| e.kind.clone())
    }

    fn health(&self, entity: EntityHandle) -> Result<f32, ProviderError> {
        let inner = self.inner.read();
        inner
            .entity(entity)?
            .health
            .ok_or(ProviderError::NotLiving(entity.id))
    }

    fn set_health(&self, entity: EntityHandle, health: f32) -> Result<(), ProviderError> {
        let mut inner = self.inner.write();
        let state = inner.entity_mut(entity)?;
        if state.health.is_none() {
            return Err(ProviderError::NotLiving(entity.id));
        }
        state.health = Some(health);
        state.alive = health > 0.0;
        Ok(())
    }

    fn damage(&self, entity: EntityHandle, amount: f32) -> Result<(), ProviderError> {
        let mut inner = self.inner.write();
        let state = inner.entity_mut(entity)?;
        let current = state.health.ok_or(ProviderError::NotLiving(entity.id))?;
        let remaining = (current - amount).max(0.0);
        state.health = Some(remaining);
        if remaining <= 0.0 {
            state.alive = false;
        }
        inner.damage_log.push((entity.id, amount));
        Ok(())
    }

    fn position(&self, entity: EntityHandle) -> Result<Vec3, ProviderError> {
        self.inner.read().entity(entity).map(|e| e.pos)
    }

    fn teleport(&self, entity: EntityHandle, pos: Vec3) -> Result<(), ProviderError> {
        let mut inner = self.inner.write();
        inner.entity_mut(entity)?.pos = pos;
        Ok(())
    }

    fn world_time(&self, world: WorldHandle) -> Result<i32, ProviderError> {
        self.inner.read().world(world).map(|w| w.time)
    }

    fn set_world_time(&self, world: WorldHandle, time: i32) -> Result<(), ProviderError> {
        let mut inner = self.inner.write();
        inner
            .worlds
            .get_mut(&world.dimension)
            .ok_or_else(|| {
                ProviderError::Internal(format!("world {:?} not loaded", world.dimension))
            })?
            .time = time;
        Ok(())
    }

    fn block_kind(&self, block: BlockHandle) -> Result<String, ProviderError> {
        let inner = self.inner.read();
        Ok(inner
            .world(block.world)?
            .blocks
            .get(&block.pos)
            .cloned()
            .unwrap_or_else(|| DEFAULT_BLOCK_KIND.to_string()))
    }

    fn set_block_kind(&self, block: BlockHandle, kind: &str) -> Result<(), ProviderError> {
        let mut inner = self.inner.write();
        if !inner.palette.contains_key(kind) {
            return Err(ProviderError::UnknownBlockKind(kind.to_string()));
        }
        inner
            .worlds
            .get_mut(&block.world.dimension)
            .ok_or_else(|| {
                ProviderError::Internal(format!("world {:?} not loaded", block.world.dimension))
            })?
            .blocks
            .insert(block.pos, kind.to_string());
        Ok(())
    }

    fn block_has_color(&self, block: BlockHandle) -> Result<bool, ProviderError> {
        let inner = self.inner.read();
        let kind = inner
            .world(block.world)?
            .blocks
            .get(&block.pos)
            .map(String::as_str)
            .unwrap_or(DEFAULT_BLOCK_KIND);
        Ok(inner.palette.get(kind).copied().unwrap_or(false))
    }

    fn chat(&self, player: PlayerHandle, text: &str) -> Result<(), ProviderError> {
        let mut inner = self.inner.write();
        if inner.player.as_ref().map(|s| s.entity_id) != Some(player.entity.id) {
            return Err(ProviderError::Stale(player.entity.id));
        }
        inner.chat_log.push(text.to_string());
        Ok(())
    }

    fn apply_motion(&self, player: PlayerHandle, motion: Vec3) -> Result<(), ProviderError> {
        let mut inner = self.inner.write();
        let state = inner.entity_mut(player.entity)?;
        state.pos = Vec3::new(
            state.pos.x + motion.x,
            state.pos.y + motion.y,
            state.pos.z + motion.z,
        );
        inner.motions.push(motion);
        Ok(())
    }

    fn jump(&self, player: PlayerHandle) -> Result<(), ProviderError> {
        let mut inner = self.inner.write();
        if inner.player.as_ref().map(|s| s.entity_id) != Some(player.entity.id) {
            return Err(ProviderError::Stale(player.entity.id));
        }
        inner.jumps += 1;
        Ok(())
    }
}
