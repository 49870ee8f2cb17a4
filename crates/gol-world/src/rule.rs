//! Table-driven transition rule.

use gol_core::{CellState, Error, Result, RuleConfig, ALIVE, DEAD};
use serde::{Deserialize, Serialize};

/// Maximum number of live neighbours a cell can have.
pub const MAX_NEIGHBORS: usize = 8;

/// Next-state lookup indexed by `[current_state][live_neighbour_count]`.
pub type RuleTable = [[CellState; MAX_NEIGHBORS + 1]; 2];

/// Conway's rule as a lookup table.
///
/// Number of live neighbours: 0 through 8.
pub const CONWAY_TABLE: RuleTable = [
    [0, 0, 0, 1, 0, 0, 0, 0, 0], // dead: alive iff exactly 3
    [0, 0, 1, 1, 0, 0, 0, 0, 0], // alive: survives on 2 or 3
];

/// A life-like rule. The table is the whole rule; `next_state` never
/// consults anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    table: RuleTable,
}

impl Rule {
    pub const fn from_table(table: RuleTable) -> Self {
        Self { table }
    }

    pub const fn conway() -> Self {
        Self::from_table(CONWAY_TABLE)
    }

    /// Build a table from birth/survival neighbour counts (B/S notation)
    pub fn from_birth_survive(birth: &[u8], survive: &[u8]) -> Result<Self> {
        let mut table = [[DEAD; MAX_NEIGHBORS + 1]; 2];
        for (state, counts) in [(DEAD, birth), (ALIVE, survive)] {
            for &n in counts {
                let slot = table[state as usize]
                    .get_mut(n as usize)
                    .ok_or_else(|| Error::Config(format!("neighbour count {} out of range", n)))?;
                *slot = ALIVE;
            }
        }
        Ok(Self { table })
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    #[inline]
    pub fn next_state(&self, state: CellState, live_neighbors: u8) -> CellState {
        self.table[state as usize][live_neighbors as usize]
    }
}

impl Default for Rule {
    fn default() -> Self {
        Self::conway()
    }
}

impl TryFrom<&RuleConfig> for Rule {
    type Error = Error;

    fn try_from(config: &RuleConfig) -> Result<Self> {
        Self::from_birth_survive(&config.birth, &config.survive)
    }
}
