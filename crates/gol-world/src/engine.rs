//! Generation engine: seeding, neighbour sums and rule application.

use crate::grid::Grid;
use crate::pattern::RelativePattern;
use crate::rule::Rule;
use gol_core::{CellState, Position, Result, SeedConfig, SimulationConfig, ALIVE, DEAD};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeSet;
use tracing::{debug, info, instrument, trace};

pub struct GridEngine {
    grid: Grid,
    // Back buffer; the next generation is written here and then swapped in.
    next: Grid,
    rule: Rule,
    neighborhood: RelativePattern,
    generation: u64,
}

impl GridEngine {
    /// All-dead grid under Conway's rule
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Self::with_rule(width, height, Rule::conway())
    }

    pub fn with_rule(width: usize, height: usize, rule: Rule) -> Result<Self> {
        let grid = Grid::new(width, height)?;
        Ok(Self {
            next: grid.clone(),
            grid,
            rule,
            neighborhood: RelativePattern::adjacent(),
            generation: 0,
        })
    }

    /// Create and seed an engine from simulation configuration
    pub fn from_config(config: &SimulationConfig) -> Result<Self> {
        let rule = Rule::try_from(&config.rule)?;
        let mut engine = Self::with_rule(config.width, config.height, rule)?;
        engine.apply_seed(&config.seed)?;
        Ok(engine)
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Generations advanced since creation or the last seeding
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn population(&self) -> usize {
        self.grid.population()
    }

    pub fn clear(&mut self) {
        self.grid.clear();
    }

    /// Replace every cell with an independent fair coin flip
    pub fn random_fill<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for cell in self.grid.cells_mut() {
            *cell = if rng.gen::<bool>() { ALIVE } else { DEAD };
        }
    }

    /// Set every cell of `pattern` placed at `origin` alive; other cells are untouched
    pub fn paste(&mut self, pattern: &RelativePattern, origin: Position) {
        let (width, height) = (self.width(), self.height());
        for pos in pattern.to_grid(origin, width, height) {
            self.grid.set(pos, ALIVE);
        }
    }

    /// Reset the grid to the configured initial contents
    #[instrument(skip(self))]
    pub fn apply_seed(&mut self, seed: &SeedConfig) -> Result<()> {
        self.grid.clear();
        self.generation = 0;

        match seed {
            SeedConfig::Empty => {
                debug!("Seeded empty grid");
            }
            SeedConfig::Random { seed } => {
                let mut rng = match seed {
                    Some(seed) => ChaCha8Rng::seed_from_u64(*seed),
                    None => ChaCha8Rng::from_entropy(),
                };
                self.random_fill(&mut rng);
                debug!("Seeded random grid: {} cells alive", self.population());
            }
            SeedConfig::Pattern { name, row, col } => {
                let pattern = RelativePattern::named(name)?;
                let origin = Position::new(
                    row.unwrap_or((self.height() / 2) as i64),
                    col.unwrap_or((self.width() / 2) as i64),
                );
                self.paste(&pattern, origin);
                info!("Seeded pattern '{}' at {}", name, origin);
            }
        }

        Ok(())
    }

    /// Live cells among the eight wrapped neighbours of (`r`, `c`)
    pub fn neighbor_sum(&self, r: i64, c: i64) -> u8 {
        neighbor_sum_in(&self.grid, &self.neighborhood, Position::new(r, c))
    }

    /// Current state of (`r`, `c`) after wrapping
    pub fn cell_at(&self, r: i64, c: i64) -> CellState {
        self.grid.get(Position::new(r, c))
    }

    /// Apply the rule `steps` times; each generation is computed from the
    /// previous fully settled one.
    pub fn advance(&mut self, steps: usize) {
        for _ in 0..steps {
            self.step();
        }
        trace!(generation = self.generation, "Advanced {} generations", steps);
    }

    fn step(&mut self) {
        let Self {
            grid,
            next,
            rule,
            neighborhood,
            ..
        } = self;

        for (index, out) in next.cells_mut().iter_mut().enumerate() {
            let pos = grid.position_of(index as i64);
            let sum = neighbor_sum_in(grid, neighborhood, pos);
            *out = rule.next_state(grid.cells()[index], sum);
        }

        std::mem::swap(&mut self.grid, &mut self.next);
        self.generation += 1;
    }

    /// Read-only view of the current generation for rendering
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            width: self.grid.width(),
            height: self.grid.height(),
            generation: self.generation,
            cells: self.grid.cells(),
        }
    }
}

fn neighbor_sum_in(grid: &Grid, neighborhood: &RelativePattern, pos: Position) -> u8 {
    neighborhood
        .to_grid(pos, grid.width(), grid.height())
        .map(|p| grid.get(p))
        .sum()
}

/// Dense row-major view of a grid generation
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub width: usize,
    pub height: usize,
    pub generation: u64,
    pub cells: &'a [CellState],
}

impl<'a> Snapshot<'a> {
    /// State of (`r`, `c`) after toroidal wrapping
    pub fn get(&self, r: i64, c: i64) -> CellState {
        let p = Position::new(r, c).wrap(self.width, self.height);
        self.cells[p.r as usize * self.width + p.c as usize]
    }

    /// Iterator over `(row, col, state)` in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, CellState)> + 'a {
        let (width, cells) = (self.width, self.cells);
        cells
            .iter()
            .enumerate()
            .map(move |(i, &state)| (i / width, i % width, state))
    }

    pub fn alive_positions(&self) -> BTreeSet<Position> {
        self.iter()
            .filter(|&(_, _, state)| state == ALIVE)
            .map(|(r, c, _)| Position::new(r as i64, c as i64))
            .collect()
    }
}
