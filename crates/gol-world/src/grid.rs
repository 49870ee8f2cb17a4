//! 2D grid of cell states.

use gol_core::{CellState, Error, Position, Result, ALIVE, DEAD};
use serde::{Deserialize, Serialize};

/// A 2D toroidal grid stored row-major in a flat buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<CellState>,
}

impl Grid {
    /// All-dead grid; both dimensions must be non-zero
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![DEAD; width * height],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Get cell at position (with toroidal wrapping)
    pub fn get(&self, pos: Position) -> CellState {
        self.cells[self.index_of(pos)]
    }

    /// Set cell at position (with toroidal wrapping)
    pub fn set(&mut self, pos: Position, state: CellState) {
        let index = self.index_of(pos);
        self.cells[index] = state;
    }

    /// Flat index of a position after wrapping
    pub fn index_of(&self, pos: Position) -> usize {
        let wrapped = pos.wrap(self.width, self.height);
        wrapped.r as usize * self.width + wrapped.c as usize
    }

    /// Position of a flat index. Out-of-range and negative indices map
    /// onto rows beyond the grid, with the column always in `[0, width)`.
    pub fn position_of(&self, index: i64) -> Position {
        let w = self.width as i64;
        Position::new(index.div_euclid(w), index.rem_euclid(w))
    }

    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [CellState] {
        &mut self.cells
    }

    pub fn clear(&mut self) {
        self.cells.fill(DEAD);
    }

    /// Number of live cells
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&state| state == ALIVE).count()
    }
}
