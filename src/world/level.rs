//! Map loading
//!
//! Maps are plain text: one line per tile row, one character per tile,
//! space for air. Rows may have different lengths.
//! A map that cannot be read is fatal for the host; nothing here tries to
//! build a partial map from a broken source.

use std::fs;
use std::path::Path;
use super::TileMap;

/// Validation limits to prevent resource exhaustion from oversized files
pub mod limits {
    /// Maximum number of rows or columns in a map
    pub const MAX_MAP_DIM: usize = 4096;
}

/// Error type for map loading
#[derive(Debug)]
pub enum MapError {
    IoError(std::io::Error),
    /// Source contains no tiles at all
    Empty,
    TooLarge { width: usize, height: usize },
}

impl From<std::io::Error> for MapError {
    fn from(e: std::io::Error) -> Self {
        MapError::IoError(e)
    }
}

impl std::fmt::Display for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapError::IoError(e) => write!(f, "IO error: {}", e),
            MapError::Empty => write!(f, "map source is empty"),
            MapError::TooLarge { width, height } => write!(
                f,
                "map too large ({}x{}, limit {} per side)",
                width, height, limits::MAX_MAP_DIM
            ),
        }
    }
}

impl std::error::Error for MapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MapError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

/// Check a built map against the limits
pub fn validate_map(map: &TileMap) -> Result<(), MapError> {
    if map.is_empty() {
        return Err(MapError::Empty);
    }
    if map.width() > limits::MAX_MAP_DIM || map.height() > limits::MAX_MAP_DIM {
        return Err(MapError::TooLarge { width: map.width(), height: map.height() });
    }
    Ok(())
}

/// Build a map from source text.
/// The size limit is checked on the raw rows, before any grid is allocated.
pub fn load_map_from_str(s: &str) -> Result<TileMap, MapError> {
    let mut height = 0;
    let mut width = 0;
    for line in s.lines() {
        height += 1;
        width = width.max(line.chars().count());
    }
    if width > limits::MAX_MAP_DIM || height > limits::MAX_MAP_DIM {
        return Err(MapError::TooLarge { width, height });
    }

    let map = TileMap::parse(s);
    validate_map(&map)?;
    Ok(map)
}

/// Parse map data from bytes (for async loading through the host)
pub fn parse_map_data(bytes: &[u8]) -> Result<TileMap, MapError> {
    let contents = std::str::from_utf8(bytes)
        .map_err(|e| MapError::IoError(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("invalid UTF-8: {}", e)
        )))?;
    load_map_from_str(contents)
}

/// Load a map from a text file
pub fn load_map<P: AsRef<Path>>(path: P) -> Result<TileMap, MapError> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let map = parse_map_data(&bytes)?;
    log::info!("Loaded map {} ({}x{})", path.display(), map.width(), map.height());
    Ok(map)
}
