//! Command Executor
//!
//! Resolves a request's target through the State Provider, applies
//! capability-class read/write semantics, and produces a response value or
//! a [`Fault`].
//!
//! ## Contract
//!
//! `execute` is total: every input maps to either a success `Response` or a
//! `Fault`, never a panic or an unwind. The dispatcher converts faults to
//! wire error codes at the boundary.

mod fault;

use std::sync::Arc;

use crate::protocol::{
    BlockSummary, Command, CommandType, EntitySummary, Response, StateQuery, StateResponse,
    Target, Vec3, WritePayload,
};
use crate::provider::{EntityHandle, PlayerHandle, Region, StateProvider, WorldHandle};

pub use fault::Fault;

/// Executes commands and state queries against a State Provider
pub struct CommandExecutor {
    provider: Arc<dyn StateProvider>,

    /// Half-extent of the entity-scan cube around the world origin
    scan_radius: f64,
}

impl CommandExecutor {
    pub fn new(provider: Arc<dyn StateProvider>, scan_radius: f64) -> Self {
        Self {
            provider,
            scan_radius,
        }
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Execute a single command
    pub fn execute(&self, command: &Command) -> Result<Response, Fault> {
        let Some(ty) = CommandType::from_code(command.cmd) else {
            return Err(Fault::UnknownCommand(command.cmd.0));
        };

        tracing::debug!(command = ?ty, target = ?command.target, "executing command");

        match ty {
            CommandType::PlayerName => {
                self.read_only(command)?;
                let player = self.player()?;
                Ok(Response::Text(self.provider.player_name(player)?))
            }
            CommandType::EntityType => {
                self.read_only(command)?;
                let entity = self.entity(command)?;
                Ok(Response::Text(self.provider.entity_kind(entity)?))
            }
            CommandType::EntityHealth => {
                let write = self.write_float(command)?;
                let entity = self.entity(command)?;
                match write {
                    None => Ok(Response::Float(self.provider.health(entity)?)),
                    Some(value) => {
                        // A lowered value goes through the damage path so the
                        // simulation fires its death/event side effects.
                        let current = self.provider.health(entity)?;
                        if value < current {
                            self.provider.damage(entity, current - value)?;
                        } else {
                            self.provider.set_health(entity, value)?;
                        }
                        Ok(Response::Empty)
                    }
                }
            }
            CommandType::EntityPosition => {
                let write = self.write_vec3(command)?;
                let entity = self.entity(command)?;
                match write {
                    None => Ok(Response::Vec3(self.provider.position(entity)?)),
                    Some(pos) => {
                        self.provider.teleport(entity, pos)?;
                        Ok(Response::Empty)
                    }
                }
            }
            CommandType::WorldTime => {
                let write = self.write_int(command)?;
                let world = self.world(command)?;
                match write {
                    None => Ok(Response::Int(self.provider.world_time(world)?)),
                    Some(time) => {
                        self.provider.set_world_time(world, time)?;
                        Ok(Response::Empty)
                    }
                }
            }
            CommandType::BlockType => {
                let write = self.write_text(command)?;
                let world = self.world(command)?;
                let pos = command.block.ok_or(Fault::MissingBlock)?;
                let block = self.provider.block_at(world, pos);
                match write {
                    None => Ok(Response::Text(self.provider.block_kind(block)?)),
                    Some(kind) => {
                        self.provider.set_block_kind(block, &kind)?;
                        Ok(Response::Empty)
                    }
                }
            }
            CommandType::ControlSay => {
                let text = self.write_text(command)?.ok_or(Fault::MissingWrite)?;
                let player = self.player()?;
                self.provider.chat(player, &text)?;
                Ok(Response::Empty)
            }
            CommandType::ControlMove => {
                let motion = self.write_vec3(command)?.ok_or(Fault::MissingWrite)?;
                let player = self.player()?;
                self.provider.apply_motion(player, motion)?;
                Ok(Response::Empty)
            }
            CommandType::ControlJump => {
                // NoPayload: any write is ignored
                let player = self.player()?;
                self.provider.jump(player)?;
                Ok(Response::Empty)
            }
        }
    }

    // =========================================================================
    // State queries
    // =========================================================================

    /// Compute a best-effort snapshot. No error path: sections that cannot
    /// be resolved are simply absent.
    pub fn snapshot(&self, query: &StateQuery) -> StateResponse {
        let player = self.provider.current_player();

        let world = match query.world {
            Some(dimension) => self.provider.resolve_world(dimension),
            None => player.map(|p| p.entity.world),
        };

        let entities = match world {
            Some(world) if query.want_entities => Some(self.entity_summaries(world)),
            _ => None,
        };

        let block = match (world, query.block) {
            (Some(world), Some(pos)) => {
                let block = self.provider.block_at(world, pos);
                match self.provider.block_has_color(block) {
                    Ok(has_color) => Some(BlockSummary { has_color }),
                    Err(err) => {
                        tracing::debug!("block summary unavailable: {}", err);
                        None
                    }
                }
            }
            _ => None,
        };

        StateResponse {
            player_entity_id: player.map(|p| p.entity.id),
            player_world: player.map(|p| p.entity.world.dimension),
            entities,
            block,
        }
    }

    fn entity_summaries(&self, world: WorldHandle) -> Vec<EntitySummary> {
        self.provider
            .entities_in(world, Region::cube(self.scan_radius))
            .into_iter()
            .map(|entity| EntitySummary {
                id: entity.id,
                is_living: self.provider.is_living(entity),
                is_alive: self.provider.is_alive(entity),
            })
            .collect()
    }

    // =========================================================================
    // Target resolution
    // =========================================================================

    fn player(&self) -> Result<PlayerHandle, Fault> {
        self.provider.current_player().ok_or(Fault::NoGame)
    }

    /// The world a command acts in: the explicit dimension when given,
    /// otherwise the session player's world.
    fn world(&self, command: &Command) -> Result<WorldHandle, Fault> {
        match command.world {
            Some(dimension) => self.provider.resolve_world(dimension).ok_or(Fault::NoGame),
            None => Ok(self.player()?.entity.world),
        }
    }

    fn entity(&self, command: &Command) -> Result<EntityHandle, Fault> {
        match command.target {
            Target::None => Err(Fault::MissingTarget),
            Target::CurrentPlayer => Ok(self.player()?.entity),
            Target::Entity(id) => {
                let world = self.world(command)?;
                self.provider
                    .entity_by_id(world, id)
                    .ok_or(Fault::NoSuchEntity(id))
            }
        }
    }

    // =========================================================================
    // Write payload validation
    // =========================================================================

    fn read_only(&self, command: &Command) -> Result<(), Fault> {
        if command.write.is_some() {
            return Err(Fault::Unsupported);
        }
        Ok(())
    }

    fn write_float(&self, command: &Command) -> Result<Option<f32>, Fault> {
        match &command.write {
            None => Ok(None),
            Some(WritePayload::Float(value)) => Ok(Some(*value)),
            Some(_) => Err(Fault::InvalidWriteType),
        }
    }

    fn write_int(&self, command: &Command) -> Result<Option<i32>, Fault> {
        match &command.write {
            None => Ok(None),
            Some(WritePayload::Int(value)) => Ok(Some(*value)),
            Some(_) => Err(Fault::InvalidWriteType),
        }
    }

    fn write_text(&self, command: &Command) -> Result<Option<String>, Fault> {
        match &command.write {
            None => Ok(None),
            Some(WritePayload::Text(value)) => Ok(Some(value.clone())),
            Some(_) => Err(Fault::InvalidWriteType),
        }
    }

    fn write_vec3(&self, command: &Command) -> Result<Option<Vec3>, Fault> {
        match &command.write {
            None => Ok(None),
            Some(WritePayload::Vec3(value)) => Ok(Some(*value)),
            Some(_) => Err(Fault::InvalidWriteType),
        }
    }
}
