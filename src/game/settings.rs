//! Tunables and config loading
//!
//! Everything the physics reads as a constant lives in `PhysicsSettings`.
//! `GameConfig` wraps it together with the block catalog and map path and is
//! loaded from an optional RON file; every field has a default, so a config
//! only needs to list what it changes.

use std::fs;
use std::path::Path;
use serde::{Serialize, Deserialize};
use crate::world::{standard_defs, BlockDef, DEFAULT_SQUARE_SIZE};
use super::player::BoundingBox;

/// Player movement and integration constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Horizontal distance per tick while a direction is held (tiles)
    pub walk_speed: f64,
    /// Added to vertical velocity every airborne tick
    pub gravity: f64,
    /// Vertical velocity set when a jump starts (negative is up)
    pub short_jump_velocity: f64,
    /// Extra velocity added once when the jump key is held long enough
    pub long_jump_boost: f64,
    /// Airborne ticks the jump key must be held before the boost applies
    pub long_jump_threshold: u32,
    /// Converts velocity units into tiles per tick
    pub velocity_scale: f64,
    /// Player collision box
    pub bounding_box: BoundingBox,
    /// Start position when the map has no spawn marker
    pub spawn: (f64, f64),
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            walk_speed: 0.09,
            gravity: 1.0,
            short_jump_velocity: -17.0,
            long_jump_boost: -5.9,
            long_jump_threshold: 8,
            velocity_scale: 0.01,
            bounding_box: BoundingBox::default(),
            spawn: (6.5, 2.0),
        }
    }
}

/// Top-level game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Sprite sheet cell size in pixels
    pub square_size: u32,
    pub map_path: String,
    /// Optional sprite sheet for the host renderer
    pub sprite_sheet: String,
    pub physics: PhysicsSettings,
    pub blocks: Vec<BlockDef>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            square_size: DEFAULT_SQUARE_SIZE,
            map_path: "data/maps/map.txt".to_string(),
            sprite_sheet: "data/ressources.png".to_string(),
            physics: PhysicsSettings::default(),
            blocks: standard_defs(),
        }
    }
}

/// Error type for config loading
#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    SerializeError(ron::Error),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::ParseError(e)
    }
}

impl From<ron::Error> for ConfigError {
    fn from(e: ron::Error) -> Self {
        ConfigError::SerializeError(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Parse error: {}", e),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl GameConfig {
    /// Parse a config from RON text
    pub fn from_ron(s: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(s)?)
    }

    /// Load a config file. A missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => {
                let config = Self::from_ron(&contents)?;
                log::info!("Loaded config {}", path.display());
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        let config = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .indentor("  ".to_string());
        Ok(ron::ser::to_string_pretty(self, config)?)
    }
}
