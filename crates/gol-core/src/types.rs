//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of a single cell: `DEAD` or `ALIVE`.
pub type CellState = u8;

pub const DEAD: CellState = 0;
pub const ALIVE: CellState = 1;

/// Row/column position on the grid. May lie outside the grid until wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub r: i64,
    pub c: i64,
}

impl Position {
    pub fn new(r: i64, c: i64) -> Self {
        Self { r, c }
    }

    pub fn offset(&self, offset: Offset) -> Self {
        Self {
            r: self.r + offset.dr,
            c: self.c + offset.dc,
        }
    }

    /// Apply toroidal wrapping for given grid dimensions
    pub fn wrap(&self, width: usize, height: usize) -> Self {
        let (w, h) = (width as i64, height as i64);
        Self {
            r: ((self.r % h) + h) % h,
            c: ((self.c % w) + w) % w,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.r, self.c)
    }
}

/// Displacement relative to an origin cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Offset {
    pub dr: i64,
    pub dc: i64,
}

impl Offset {
    pub fn new(dr: i64, dc: i64) -> Self {
        Self { dr, dc }
    }

    pub fn is_origin(&self) -> bool {
        self.dr == 0 && self.dc == 0
    }
}
