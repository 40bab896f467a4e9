//! Player kinematic state
//!
//! Position, collision box, velocity and the little inventory the
//! interaction pass writes into. The player never checks the map itself;
//! `translate` applies whatever the collision resolver approved.

use serde::{Serialize, Deserialize};
use super::settings::PhysicsSettings;

/// Continuous position in tile units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Cell containing this position
    pub fn cell(&self) -> (i32, i32) {
        (self.x.floor() as i32, self.y.floor() as i32)
    }
}

/// Corners of the bounding box, in the order they are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    UpLeft,
    UpRight,
    DownRight,
    DownLeft,
}

impl Corner {
    fn index(self) -> usize {
        match self {
            Corner::UpLeft => 0,
            Corner::UpRight => 1,
            Corner::DownRight => 2,
            Corner::DownLeft => 3,
        }
    }
}

/// Rectangle around the player, as four corner offsets from its position.
/// Not necessarily centred on the position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub corners: [(f64, f64); 4],
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self {
            corners: [
                (-0.3, -0.4),
                (0.3, -0.4),
                (0.3, 0.5),
                (-0.3, 0.5),
            ],
        }
    }
}

impl BoundingBox {
    pub fn offset(&self, corner: Corner) -> (f64, f64) {
        self.corners[corner.index()]
    }

    pub fn left(&self) -> f64 {
        self.corners.iter().map(|c| c.0).fold(f64::INFINITY, f64::min)
    }

    pub fn right(&self) -> f64 {
        self.corners.iter().map(|c| c.0).fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn top(&self) -> f64 {
        self.corners.iter().map(|c| c.1).fold(f64::INFINITY, f64::min)
    }

    pub fn bottom(&self) -> f64 {
        self.corners.iter().map(|c| c.1).fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Facing, used by the host to mirror the sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Left,
    #[default]
    Right,
}

/// Something carried by the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Item {
    Key,
}

impl Item {
    pub fn name(&self) -> &'static str {
        match self {
            Item::Key => "Key",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Item::Key => "Into the unknown.",
        }
    }
}

/// The player
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub position: Position,
    pub bounding_box: BoundingBox,

    /// Horizontal distance per tick when walking
    pub speed: f64,

    pub direction: Direction,
    /// On the ground (false while jumping or falling)
    pub touching_ground: bool,
    /// Negative is up
    pub vertical_velocity: f64,
    /// Moved while grounded during the last tick (footstep animation)
    pub walking: bool,
    /// Row of the platform being descended through, ignored for landing
    pub drop_through: Option<i32>,

    pub gold: u32,
    pub keys: u32,
    pub inventory: Vec<Item>,
}

impl Player {
    pub fn new(position: Position, settings: &PhysicsSettings) -> Self {
        Self {
            position,
            bounding_box: settings.bounding_box,
            speed: settings.walk_speed,
            direction: Direction::Right,
            touching_ground: false,
            vertical_velocity: 0.0,
            walking: false,
            drop_through: None,
            gold: 0,
            keys: 0,
            inventory: Vec::new(),
        }
    }

    /// Move without any checks (the resolver's job)
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.position.x += dx;
        self.position.y += dy;
    }

    /// World-space point of a box corner, displaced by (dx, dy)
    pub fn corner_point(&self, corner: Corner, dx: f64, dy: f64) -> (f64, f64) {
        let (ox, oy) = self.bounding_box.offset(corner);
        (self.position.x + ox + dx, self.position.y + oy + dy)
    }

    /// Cell under the player's position
    pub fn cell(&self) -> (i32, i32) {
        self.position.cell()
    }

    /// Add gold, capped at `u32::MAX`
    pub fn collect_gold(&mut self, amount: u32) {
        self.gold = self.gold.saturating_add(amount);
    }

    /// Spend `cost` gold. Refused (balance untouched) when it would go negative.
    pub fn buy(&mut self, cost: u32) -> bool {
        match self.gold.checked_sub(cost) {
            Some(rest) => {
                self.gold = rest;
                true
            }
            None => false,
        }
    }

    pub fn add_item(&mut self, item: Item) {
        self.inventory.push(item);
    }

    /// Remove one copy of `item`; false if none is carried
    pub fn remove_item(&mut self, item: Item) -> bool {
        match self.inventory.iter().position(|&i| i == item) {
            Some(idx) => {
                self.inventory.remove(idx);
                true
            }
            None => false,
        }
    }
}
