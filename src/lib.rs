//! Gopherland: a 2D tile platformer
//!
//! The world is a grid of single-character tiles; the player is a box
//! moving through it in fixed ticks. The core is headless and
//! deterministic:
//! - `world`: block registry, tile map, map loading
//! - `game`: player, collision resolution, interactions, jump state machine
//!
//! The binary wraps it in a macroquad window.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod world;
pub mod game;
