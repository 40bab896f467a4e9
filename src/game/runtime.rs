//! Game Runtime
//!
//! The simulation aggregate. `Game` owns the block registry, the tile map
//! and the player; every mutation of them goes through the operations here.
//!
//! One `tick` per fixed time step:
//! 1. Drop-through request, ground probe, jump start, long-jump charge, gravity
//! 2. Collect and door actions at the player's current (pre-move) cell
//! 3. Horizontal move, then vertical move
//! 4. Ground/ceiling events fed back into the jump state machine
//!
//! Nothing here is reentrant or shared; the host calls `tick` once per step
//! and reads the state back for drawing.

use std::collections::BTreeSet;
use crate::world::{
    load_map, validate_map, BlockRegistry, MapError, RegistryError, TileMap, AIR,
};
use super::collision::{self, MoveResult, SNAP_EPSILON};
use super::event::{CeilingEvent, Events, LandedEvent};
use super::interaction;
use super::jump::{JumpPhase, JumpState};
use super::player::{Direction, Player, Position};
use super::settings::{ConfigError, GameConfig, PhysicsSettings};

/// Map symbol marking where the player starts
pub const SPAWN_MARKER: char = 'p';

/// Player requests for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Jump key currently held (press and hold duration are tracked by the core)
    pub jump: bool,
    /// Drop through the platform under the feet
    pub descend: bool,
}

/// Error type for game construction
#[derive(Debug)]
pub enum GameError {
    Map(MapError),
    Config(ConfigError),
    Registry(RegistryError),
    SpawnOutOfBounds { x: f64, y: f64 },
}

impl From<MapError> for GameError {
    fn from(e: MapError) -> Self {
        GameError::Map(e)
    }
}

impl From<ConfigError> for GameError {
    fn from(e: ConfigError) -> Self {
        GameError::Config(e)
    }
}

impl From<RegistryError> for GameError {
    fn from(e: RegistryError) -> Self {
        GameError::Registry(e)
    }
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameError::Map(e) => write!(f, "Map error: {}", e),
            GameError::Config(e) => write!(f, "Config error: {}", e),
            GameError::Registry(e) => write!(f, "Block registry error: {}", e),
            GameError::SpawnOutOfBounds { x, y } => {
                write!(f, "Spawn position ({}, {}) does not fit in the map", x, y)
            }
        }
    }
}

impl std::error::Error for GameError {}

/// The simulation: map, blocks, player and the jump state machine
pub struct Game {
    settings: PhysicsSettings,
    blocks: BlockRegistry,
    map: TileMap,
    player: Player,
    jump: JumpState,
    /// Events raised during the last tick
    pub events: Events,
    ticks: u64,
}

impl Game {
    /// Build a game from an already loaded map.
    ///
    /// A spawn marker in the map wins over `settings.spawn`; the marker cell
    /// is cleared to air.
    pub fn new(mut map: TileMap, blocks: BlockRegistry, settings: PhysicsSettings) -> Result<Self, GameError> {
        validate_map(&map)?;

        let unknown: BTreeSet<char> = map
            .symbols()
            .map(|(_, _, c)| c)
            .filter(|&c| c != AIR && c != SPAWN_MARKER && !blocks.is_registered(c))
            .collect();
        if !unknown.is_empty() {
            log::warn!("Map uses unregistered symbols {:?}, treating them as air", unknown);
        }

        let spawn = match map.find(SPAWN_MARKER) {
            Some((col, row)) => {
                map.set(col, row, AIR);
                let feet = settings.bounding_box.bottom();
                Position::new(col as f64 + 0.5, (row + 1) as f64 - feet - SNAP_EPSILON)
            }
            None => Position::new(settings.spawn.0, settings.spawn.1),
        };

        let mut player = Player::new(spawn, &settings);
        if !collision::fits_in_map(&map, &player) {
            return Err(GameError::SpawnOutOfBounds { x: spawn.x, y: spawn.y });
        }
        player.touching_ground = collision::is_supported(&map, &blocks, &player);

        log::info!(
            "Game ready: {}x{} map, {} blocks, spawn ({:.2}, {:.2})",
            map.width(), map.height(), blocks.len(), spawn.x, spawn.y
        );

        Ok(Self {
            settings,
            blocks,
            map,
            player,
            jump: JumpState::new(),
            events: Events::new(),
            ticks: 0,
        })
    }

    /// Build a game from config and an already loaded map
    pub fn from_config(config: &GameConfig, map: TileMap) -> Result<Self, GameError> {
        let blocks = BlockRegistry::from_defs(config.square_size, config.blocks.clone())?;
        Self::new(map, blocks, config.physics)
    }

    /// Load the configured map from disk and build the game
    pub fn load(config: &GameConfig) -> Result<Self, GameError> {
        let map = load_map(&config.map_path)?;
        Self::from_config(config, map)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Read-only views for the host
    // ─────────────────────────────────────────────────────────────────────

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn map(&self) -> &TileMap {
        &self.map
    }

    pub fn blocks(&self) -> &BlockRegistry {
        &self.blocks
    }

    pub fn phase(&self) -> JumpPhase {
        JumpPhase::of(&self.player)
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    // ─────────────────────────────────────────────────────────────────────
    // Operations
    // ─────────────────────────────────────────────────────────────────────

    /// Pick up a collectable in the player's cell
    pub fn collect(&mut self) {
        if let Some(event) = interaction::collect(&mut self.map, &self.blocks, &mut self.player) {
            log::debug!("collected {:?} at ({}, {})", event.symbol, event.col, event.row);
            self.events.item_collected.send(event);
        }
    }

    /// Open adjacent closed doors with keys
    pub fn action(&mut self) {
        for event in interaction::action(&mut self.map, &self.blocks, &mut self.player) {
            log::debug!("opened door at ({}, {})", event.col, event.row);
            self.events.door_opened.send(event);
        }
    }

    /// Interactions at the current cell, then the resolved move
    fn step_move(&mut self, dx: f64, dy: f64) -> MoveResult {
        self.collect();
        self.action();
        collision::resolve_move(&self.map, &self.blocks, &mut self.player, dx, dy)
    }

    /// Move by (dx, dy) as far as the grid allows. Returns the "moved" flag
    /// (horizontal motion only counts while grounded).
    pub fn attempt_move(&mut self, dx: f64, dy: f64) -> bool {
        self.step_move(dx, dy).moved
    }

    /// Start dropping through the platform under the feet.
    /// False when not standing on a platform.
    pub fn descend(&mut self) -> bool {
        let row = collision::standing_platform_row(&self.map, &self.blocks, &self.player);
        self.jump.descend(&mut self.player, row)
    }

    /// Advance the simulation by one fixed step
    pub fn tick(&mut self, input: TickInput) -> MoveResult {
        self.events.clear_all();
        self.ticks += 1;

        if input.descend {
            self.descend();
        }

        let supported = collision::is_supported(&self.map, &self.blocks, &self.player);
        let dy = self.jump.begin_tick(&mut self.player, supported, input.jump, &self.settings);

        let dx = match (input.left, input.right) {
            (true, false) => {
                self.player.direction = Direction::Left;
                -self.player.speed
            }
            (false, true) => {
                self.player.direction = Direction::Right;
                self.player.speed
            }
            _ => 0.0,
        };

        let impact_velocity = self.player.vertical_velocity;
        let result = self.step_move(dx, dy);
        self.jump.finish_tick(&mut self.player, &result);

        if result.landed {
            let floor = result.floor.unwrap_or(self.player.position.y);
            log::debug!("landed on {:.2} at velocity {:.2}", floor, impact_velocity);
            self.events.landed.send(LandedEvent { floor, impact_velocity });
        }
        if result.hit_ceiling {
            self.events.ceiling_hit.send(CeilingEvent {
                x: self.player.position.x,
                y: self.player.position.y,
            });
        }

        self.player.walking = result.moved && self.player.touching_ground;
        result
    }
}
