//! Grid engine.
//!
//! This module implements the toroidal cell grid and the table-driven
//! transition rule that advances it one generation at a time.

pub mod engine;
pub mod grid;
pub mod pattern;
pub mod rule;

pub use engine::{GridEngine, Snapshot};
pub use grid::Grid;
pub use pattern::{offsets_from_mask, RelativePattern};
pub use rule::Rule;
