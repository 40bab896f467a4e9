//! World module - the static side of a level
//!
//! - Block registry: what each tile symbol means
//! - Tile map: which symbol sits in each cell
//! - Level loading from plain-text map files

mod block;
mod tile_map;
mod level;

pub use block::*;
pub use tile_map::*;
pub use level::*;
