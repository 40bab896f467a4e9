//! Game Module
//!
//! The dynamic side: player state, collision resolution, tile interactions
//! and the jump state machine, tied together by `Game`.
//!
//! Key concepts:
//! - Settings: physics tunables and the RON config
//! - Collision: axis-sequential move resolution against the tile grid
//! - Interaction: collectables and doors
//! - Event: what happened during a tick, for the host to react to
//! - Renderer: macroquad drawing of the map, player and HUD

pub mod settings;
pub mod player;
pub mod collision;
pub mod interaction;
pub mod jump;
pub mod event;
pub mod runtime;
pub mod renderer;

// Re-export main types
pub use settings::{ConfigError, GameConfig, PhysicsSettings};
pub use player::{BoundingBox, Corner, Direction, Item, Player, Position};
pub use collision::MoveResult;
pub use jump::JumpPhase;
pub use event::Events;
pub use runtime::{Game, GameError, TickInput, SPAWN_MARKER};
pub use renderer::{draw_hud, draw_world};
