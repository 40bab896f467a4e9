//! Block Registry
//!
//! Static catalog mapping a tile symbol to its physical and visual
//! properties. Populated once at startup, read-only afterwards.
//!
//! Lookups are total: any symbol that was not registered (including the air
//! symbol itself) resolves to the synthetic air block, so collision queries
//! never need an error path for blank or off-map cells.

use std::collections::HashMap;
use serde::{Serialize, Deserialize};

/// Symbol reserved for empty space in map sources
pub const AIR: char = ' ';

/// Default sprite sheet cell size in pixels
pub const DEFAULT_SQUARE_SIZE: u32 = 64;

// =============================================================================
// Block properties
// =============================================================================

/// Solidity class of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Solidity {
    /// Blocks movement in every direction
    Solid,
    /// Blocks descent from above only
    Platform,
    /// Blocks nothing
    #[default]
    NotSolid,
}

/// Tile behaviour, resolved once when the registry is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlockKind {
    /// No interaction
    #[default]
    Plain,
    /// Adds to the player's gold when collected
    Currency(u32),
    /// Adds a key when collected
    KeyItem,
    /// Opens into `opens_to` when the player spends a key next to it
    DoorClosed { opens_to: char },
    /// A door that has already been opened
    DoorOpen,
}

/// One animation frame, as a pixel rectangle on the sprite sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRect {
    pub x1: u32,
    pub x2: u32,
    pub y1: u32,
    pub y2: u32,
}

impl FrameRect {
    /// Frame covering one sheet cell at (col, row)
    pub fn cell(col: u32, row: u32, square_size: u32) -> Self {
        Self {
            x1: square_size * col,
            x2: square_size * (col + 1),
            y1: square_size * row,
            y2: square_size * (row + 1),
        }
    }

    pub fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> u32 {
        self.y2 - self.y1
    }
}

/// Static definition of a tile type
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub name: String,
    pub symbol: char,
    pub solidity: Solidity,
    /// Removed from the map on contact
    pub collectable: bool,
    pub kind: BlockKind,
    /// Animation frames, played in order
    pub frames: Vec<FrameRect>,
}

impl Block {
    /// The block every unknown or off-map cell resolves to
    pub fn air() -> Self {
        Self {
            name: "air".to_string(),
            symbol: AIR,
            solidity: Solidity::NotSolid,
            collectable: false,
            kind: BlockKind::Plain,
            frames: Vec::new(),
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Frame to draw at animation tick `tick` (None for invisible blocks)
    pub fn frame(&self, tick: u64) -> Option<&FrameRect> {
        if self.frames.is_empty() {
            return None;
        }
        let idx = (tick % self.frames.len() as u64) as usize;
        self.frames.get(idx)
    }
}

// =============================================================================
// Serialized definitions
// =============================================================================

/// Block definition as written in config files.
///
/// Frames are sheet cells `(col, row)`; they are scaled by the square size
/// when the registry is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDef {
    pub name: String,
    pub symbol: char,
    #[serde(default)]
    pub solidity: Solidity,
    #[serde(default)]
    pub collectable: bool,
    #[serde(default)]
    pub kind: BlockKind,
    #[serde(default)]
    pub frames: Vec<(u32, u32)>,
}

impl BlockDef {
    fn new(name: &str, symbol: char, solidity: Solidity, collectable: bool, kind: BlockKind, frames: &[(u32, u32)]) -> Self {
        Self {
            name: name.to_string(),
            symbol,
            solidity,
            collectable,
            kind,
            frames: frames.to_vec(),
        }
    }

    fn into_block(self, square_size: u32) -> Block {
        Block {
            frames: self.frames
                .iter()
                .map(|&(col, row)| FrameRect::cell(col, row, square_size))
                .collect(),
            name: self.name,
            symbol: self.symbol,
            solidity: self.solidity,
            collectable: self.collectable,
            kind: self.kind,
        }
    }
}

/// The built-in block catalog
pub fn standard_defs() -> Vec<BlockDef> {
    use Solidity::*;
    use BlockKind::*;

    vec![
        BlockDef::new("stone", 's', Solid, false, Plain, &[(0, 0)]),
        BlockDef::new("dirt", 'd', Solid, false, Plain, &[(1, 0)]),
        BlockDef::new("grass", 'g', Solid, false, Plain, &[(2, 0)]),
        BlockDef::new("brick", 'b', Solid, false, Plain, &[(3, 0)]),
        BlockDef::new("door_closed", 'C', Solid, false, DoorClosed { opens_to: 'O' }, &[(4, 0)]),
        BlockDef::new("door_open", 'O', NotSolid, false, DoorOpen, &[(5, 0)]),

        BlockDef::new("pillar_up_down", '0', NotSolid, false, Plain, &[(0, 4)]),
        BlockDef::new("pillar_down", '1', NotSolid, false, Plain, &[(1, 4)]),
        BlockDef::new("pillar_up", '2', NotSolid, false, Plain, &[(2, 4)]),
        BlockDef::new("pillar_central", '3', NotSolid, false, Plain, &[(3, 4)]),
        BlockDef::new("plank", '=', Platform, false, Plain, &[(4, 4)]),

        BlockDef::new("herb", 'h', NotSolid, false, Plain, &[(0, 1), (1, 1), (2, 1), (3, 1)]),
        BlockDef::new("coin", 'c', NotSolid, true, Currency(1),
            &[(0, 2), (1, 2), (2, 2), (3, 2), (4, 2), (5, 2)]),
        BlockDef::new("key", 'k', NotSolid, true, KeyItem, &[(0, 5), (1, 5), (2, 5), (3, 5)]),
        BlockDef::new("player", 'p', NotSolid, false, Plain,
            &[(0, 3), (1, 3), (2, 3), (3, 3), (4, 3), (5, 3), (6, 3), (7, 3)]),
    ]
}

// =============================================================================
// Registry
// =============================================================================

/// Error type for registry construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    DuplicateSymbol(char),
    /// The air symbol cannot be redefined
    ReservedSymbol(char),
    /// A closed door opens into a symbol that is not registered
    UnknownDoorTarget { door: char, opens_to: char },
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::DuplicateSymbol(c) => write!(f, "block symbol {:?} registered twice", c),
            RegistryError::ReservedSymbol(c) => write!(f, "block symbol {:?} is reserved for air", c),
            RegistryError::UnknownDoorTarget { door, opens_to } => {
                write!(f, "door {:?} opens into unregistered symbol {:?}", door, opens_to)
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Symbol-keyed catalog of blocks
#[derive(Debug, Clone)]
pub struct BlockRegistry {
    blocks: HashMap<char, Block>,
    air: Block,
}

impl BlockRegistry {
    /// The built-in catalog at the given sheet cell size
    pub fn standard(square_size: u32) -> Self {
        let mut blocks = HashMap::new();
        for def in standard_defs() {
            blocks.insert(def.symbol, def.into_block(square_size));
        }
        Self { blocks, air: Block::air() }
    }

    /// Build a registry from config definitions, validating the catalog
    pub fn from_defs(square_size: u32, defs: Vec<BlockDef>) -> Result<Self, RegistryError> {
        let mut blocks: HashMap<char, Block> = HashMap::with_capacity(defs.len());
        for def in defs {
            if def.symbol == AIR {
                return Err(RegistryError::ReservedSymbol(def.symbol));
            }
            if blocks.contains_key(&def.symbol) {
                return Err(RegistryError::DuplicateSymbol(def.symbol));
            }
            blocks.insert(def.symbol, def.into_block(square_size));
        }

        for block in blocks.values() {
            if let BlockKind::DoorClosed { opens_to } = block.kind {
                if opens_to != AIR && !blocks.contains_key(&opens_to) {
                    return Err(RegistryError::UnknownDoorTarget { door: block.symbol, opens_to });
                }
            }
        }

        Ok(Self { blocks, air: Block::air() })
    }

    /// Block for `symbol`, or air if it is not registered
    pub fn lookup(&self, symbol: char) -> &Block {
        self.blocks.get(&symbol).unwrap_or(&self.air)
    }

    pub fn is_registered(&self, symbol: char) -> bool {
        self.blocks.contains_key(&symbol)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.values()
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::standard(DEFAULT_SQUARE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_symbol_is_air() {
        let registry = BlockRegistry::default();
        let block = registry.lookup('#');
        assert_eq!(block.solidity, Solidity::NotSolid);
        assert!(!block.collectable);
        assert_eq!(block.frame_count(), 0);
        assert!(block.frame(7).is_none());

        assert_eq!(registry.lookup(AIR).solidity, Solidity::NotSolid);
        assert!(!registry.is_registered(AIR));
    }

    #[test]
    fn test_standard_catalog() {
        let registry = BlockRegistry::standard(64);
        assert_eq!(registry.lookup('s').solidity, Solidity::Solid);
        assert_eq!(registry.lookup('=').solidity, Solidity::Platform);
        assert_eq!(registry.lookup('c').kind, BlockKind::Currency(1));
        assert!(registry.lookup('c').collectable);
        assert_eq!(registry.lookup('C').kind, BlockKind::DoorClosed { opens_to: 'O' });
        assert_eq!(registry.lookup('O').solidity, Solidity::NotSolid);

        // Frames are scaled by the square size
        let dirt = registry.lookup('d');
        assert_eq!(dirt.frames[0], FrameRect { x1: 64, x2: 128, y1: 0, y2: 64 });
        assert_eq!(dirt.frames[0].width(), 64);
    }

    #[test]
    fn test_frame_cycles_with_tick() {
        let registry = BlockRegistry::standard(10);
        let coin = registry.lookup('c');
        assert_eq!(coin.frame_count(), 6);
        assert_eq!(coin.frame(0), coin.frame(6));
        assert_eq!(coin.frame(3).map(|f| f.x1), Some(30));
    }

    #[test]
    fn test_from_defs_rejects_duplicates() {
        let mut defs = standard_defs();
        defs.push(BlockDef::new("stone2", 's', Solidity::Solid, false, BlockKind::Plain, &[]));
        assert_eq!(
            BlockRegistry::from_defs(64, defs).unwrap_err(),
            RegistryError::DuplicateSymbol('s')
        );
    }

    #[test]
    fn test_from_defs_rejects_air_and_dangling_doors() {
        let air = vec![BlockDef::new("void", AIR, Solidity::Solid, false, BlockKind::Plain, &[])];
        assert_eq!(
            BlockRegistry::from_defs(64, air).unwrap_err(),
            RegistryError::ReservedSymbol(AIR)
        );

        let door = vec![BlockDef::new(
            "gate", 'G', Solidity::Solid, false, BlockKind::DoorClosed { opens_to: 'g' }, &[],
        )];
        assert_eq!(
            BlockRegistry::from_defs(64, door).unwrap_err(),
            RegistryError::UnknownDoorTarget { door: 'G', opens_to: 'g' }
        );
    }

    #[test]
    fn test_from_defs_matches_standard() {
        let built = BlockRegistry::from_defs(32, standard_defs()).unwrap();
        let standard = BlockRegistry::standard(32);
        assert_eq!(built.len(), standard.len());
        for block in standard.iter() {
            assert_eq!(built.lookup(block.symbol), block);
        }
    }
}
