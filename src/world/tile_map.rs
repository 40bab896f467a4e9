//! Tile Map
//!
//! Rectangular grid of tile symbols, built once from row text.
//! Only the interaction pass writes to it after construction.

use super::block::AIR;

/// Grid of tile symbols, indexed by (col, row)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileMap {
    width: usize,
    height: usize,
    /// Row-major cells
    cells: Vec<char>,
}

impl TileMap {
    /// Build a map from source rows.
    ///
    /// Height is the number of rows and width the longest row (in chars).
    /// Every cell starts as air; non-space characters overwrite it, so short
    /// rows are padded with air on the right.
    pub fn build<S: AsRef<str>>(rows: &[S]) -> Self {
        let height = rows.len();
        let width = rows.iter().map(|r| r.as_ref().chars().count()).max().unwrap_or(0);

        let mut cells = vec![AIR; width * height];
        for (row, line) in rows.iter().enumerate() {
            for (col, c) in line.as_ref().chars().enumerate() {
                if c != AIR {
                    cells[row * width + col] = c;
                }
            }
        }

        Self { width, height, cells }
    }

    /// Build a map from newline-delimited text.
    /// Accepts `\r\n`; a trailing newline does not add a row.
    pub fn parse(source: &str) -> Self {
        let rows: Vec<&str> = source.lines().collect();
        Self::build(&rows)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn in_bounds(&self, col: i32, row: i32) -> bool {
        col >= 0 && row >= 0 && (col as usize) < self.width && (row as usize) < self.height
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        if self.in_bounds(col, row) {
            Some(row as usize * self.width + col as usize)
        } else {
            None
        }
    }

    /// Symbol at (col, row), None when out of bounds
    pub fn get(&self, col: i32, row: i32) -> Option<char> {
        self.index(col, row).map(|i| self.cells[i])
    }

    /// Overwrite a cell. Returns false (and changes nothing) when out of bounds.
    pub fn set(&mut self, col: i32, row: i32, symbol: char) -> bool {
        match self.index(col, row) {
            Some(i) => {
                self.cells[i] = symbol;
                true
            }
            None => false,
        }
    }

    /// First cell holding `symbol`, scanning rows top to bottom
    pub fn find(&self, symbol: char) -> Option<(i32, i32)> {
        self.cells
            .iter()
            .position(|&c| c == symbol)
            .map(|i| ((i % self.width) as i32, (i / self.width) as i32))
    }

    /// All cells as (col, row, symbol), row by row
    pub fn symbols(&self) -> impl Iterator<Item = (i32, i32, char)> + '_ {
        let width = self.width.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &c)| ((i % width) as i32, (i / width) as i32, c))
    }

    /// One row as a string (air included), for debugging and tooling
    pub fn row_string(&self, row: usize) -> Option<String> {
        if row >= self.height {
            return None;
        }
        Some(self.cells[row * self.width..(row + 1) * self.width].iter().collect())
    }
}
