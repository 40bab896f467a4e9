//! Collision System
//!
//! Axis-sequential resolution of the player's bounding box against the tile
//! grid. Horizontal motion is resolved first at the pre-move height, then
//! vertical motion from the updated X.
//!
//! Each axis samples only the two corners on its leading edge. Off-map
//! corners resolve to air, so nothing here can fail; the map bounds are
//! enforced separately so the box never leaves `[0, width) x [0, height)`.
//!
//! Solidity rules:
//! - `Solid` blocks every direction
//! - `Platform` blocks descent only, and only from above
//! - `NotSolid` blocks nothing
//!
//! No sub-stepping: a displacement larger than a tile can skip over a thin
//! obstacle. That is a known limitation of the fixed-step integrator.

use crate::world::{BlockRegistry, Solidity, TileMap, AIR};
use super::player::{Corner, Player};

/// Distance below the feet checked for support
pub const GROUND_PROBE: f64 = 0.002;

/// Gap left between the feet and the floor after a ground snap
pub const SNAP_EPSILON: f64 = 0.001;

/// Result of a resolved move
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveResult {
    /// Moved this call (horizontal only counts when grounded)
    pub moved: bool,
    /// Horizontal move was refused
    pub hit_wall: bool,
    /// Downward move was refused: the player is now on the ground
    pub landed: bool,
    /// Upward move was refused
    pub hit_ceiling: bool,
    /// Y of the surface that stopped a fall (tile top or map bottom)
    pub floor: Option<f64>,
}

/// One side of the bounding box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    /// The two corners sampled for this edge
    pub fn corners(self) -> [Corner; 2] {
        match self {
            Edge::Top => [Corner::UpLeft, Corner::UpRight],
            Edge::Bottom => [Corner::DownLeft, Corner::DownRight],
            Edge::Left => [Corner::UpLeft, Corner::DownLeft],
            Edge::Right => [Corner::UpRight, Corner::DownRight],
        }
    }
}

/// A corner of the displaced box and what it lands in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerSample {
    pub corner: Corner,
    pub col: i32,
    pub row: i32,
    pub symbol: char,
    pub solidity: Solidity,
}

/// Sample the two corners of `edge` after displacing the player by (dx, dy)
pub fn sample_edge(
    map: &TileMap,
    blocks: &BlockRegistry,
    player: &Player,
    edge: Edge,
    dx: f64,
    dy: f64,
) -> [CornerSample; 2] {
    edge.corners().map(|corner| {
        let (x, y) = player.corner_point(corner, dx, dy);
        let (col, row) = (x.floor() as i32, y.floor() as i32);
        let symbol = map.get(col, row).unwrap_or(AIR);
        CornerSample {
            corner,
            col,
            row,
            symbol,
            solidity: blocks.lookup(symbol).solidity,
        }
    })
}

/// Lateral and upward motion: only `Solid` gets in the way
fn permits_passage(sample: &CornerSample) -> bool {
    sample.solidity != Solidity::Solid
}

/// Downward motion: platforms catch a corner coming from a row above them,
/// unless the player asked to drop through that row
fn permits_descent(player: &Player, sample: &CornerSample) -> bool {
    match sample.solidity {
        Solidity::NotSolid => true,
        Solidity::Solid => false,
        Solidity::Platform => {
            if player.drop_through == Some(sample.row) {
                return true;
            }
            let (_, y) = player.corner_point(sample.corner, 0.0, 0.0);
            y.floor() as i32 >= sample.row
        }
    }
}

fn fits_horizontally(map: &TileMap, player: &Player, dx: f64) -> bool {
    let x = player.position.x + dx;
    let width = map.width() as f64;
    let bb = &player.bounding_box;
    x >= 0.0 && x < width && x + bb.left() >= 0.0 && x + bb.right() < width
}

fn fits_vertically(map: &TileMap, player: &Player, dy: f64) -> bool {
    let y = player.position.y + dy;
    let height = map.height() as f64;
    let bb = &player.bounding_box;
    y >= 0.0 && y < height && y + bb.top() >= 0.0 && y + bb.bottom() < height
}

/// Does the player's whole box (and position) sit inside the map?
pub fn fits_in_map(map: &TileMap, player: &Player) -> bool {
    fits_horizontally(map, player, 0.0) && fits_vertically(map, player, 0.0)
}

/// Move the player by (dx, dy) as far as the grid allows.
///
/// Applies the ground event (grounded, velocity reset) on a refused descent
/// and the ceiling event (velocity reset) on a refused ascent.
pub fn resolve_move(
    map: &TileMap,
    blocks: &BlockRegistry,
    player: &mut Player,
    dx: f64,
    dy: f64,
) -> MoveResult {
    let mut result = MoveResult::default();

    if dx != 0.0 {
        let edge = if dx > 0.0 { Edge::Right } else { Edge::Left };
        let samples = sample_edge(map, blocks, player, edge, dx, 0.0);
        if samples.iter().all(permits_passage) && fits_horizontally(map, player, dx) {
            player.translate(dx, 0.0);
            if player.touching_ground {
                result.moved = true;
            }
        } else {
            result.hit_wall = true;
        }
    }

    if dy > 0.0 {
        let samples = sample_edge(map, blocks, player, Edge::Bottom, 0.0, dy);
        let blocking_row = samples
            .iter()
            .filter(|s| !permits_descent(player, s))
            .map(|s| s.row)
            .min();

        if blocking_row.is_none() && fits_vertically(map, player, dy) {
            player.translate(0.0, dy);
            result.moved = true;

            // Done dropping once the feet are inside (or past) the platform row
            if let Some(row) = player.drop_through {
                let feet = player.position.y + player.bounding_box.bottom();
                if feet.floor() as i32 >= row {
                    player.drop_through = None;
                }
            }
        } else {
            player.touching_ground = true;
            player.vertical_velocity = 0.0;
            player.drop_through = None;
            result.landed = true;
            result.floor = Some(blocking_row.map_or(map.height() as f64, f64::from));
        }
    } else if dy < 0.0 {
        let samples = sample_edge(map, blocks, player, Edge::Top, 0.0, dy);
        if samples.iter().all(permits_passage) && fits_vertically(map, player, dy) {
            player.translate(0.0, dy);
            result.moved = true;
        } else {
            player.vertical_velocity = 0.0;
            result.hit_ceiling = true;
        }
    }

    result
}

/// Something under the feet within `GROUND_PROBE`?
/// Either bottom corner being caught counts as support.
pub fn is_supported(map: &TileMap, blocks: &BlockRegistry, player: &Player) -> bool {
    let samples = sample_edge(map, blocks, player, Edge::Bottom, 0.0, GROUND_PROBE);
    samples.iter().any(|s| !permits_descent(player, s)) || !fits_vertically(map, player, GROUND_PROBE)
}

/// Row of the platform the player is standing on, if the support under the
/// feet is platform only (nothing solid)
pub fn standing_platform_row(map: &TileMap, blocks: &BlockRegistry, player: &Player) -> Option<i32> {
    let samples = sample_edge(map, blocks, player, Edge::Bottom, 0.0, GROUND_PROBE);
    if samples.iter().any(|s| s.solidity == Solidity::Solid) {
        return None;
    }
    samples
        .iter()
        .find(|s| s.solidity == Solidity::Platform && !permits_descent(player, s))
        .map(|s| s.row)
}
