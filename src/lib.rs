//! Wave Function Collapse over tilesets with labeled directional sockets.
//!
//! A [`generator::Generator`] repeatedly picks the lowest-entropy cell of a 2d grid, collapses it to one weighted-random
//! [`generator::tile::Tile`] and propagates the adjacency constraints to its neighbours, until every cell is collapsed
//! or a contradiction is reached.

use generator::{rules::Tileset, tile::Tile, Generator, RngMode};
use grid::{direction::Direction, GridData, GridDefinition, GridPosition};

/// Named tilesets ready to be used by a [`Generator`]
pub mod catalog;
/// Generator, tiles, sockets and the constraint satisfaction machinery
pub mod generator;
/// Grid definition, positions, directions and per-node data
pub mod grid;
/// Turns generated grids into rows of symbols or text
pub mod render;

/// Errors that can end a generation
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationError {
    /// A cell ran out of possible tiles during propagation
    #[error("Failed to generate, contradiction at node {position}")]
    Contradiction {
        /// Cell whose possibilities became empty
        position: GridPosition,
    },
    /// The propagation queue did not drain within its iteration budget
    #[error("Failed to generate, propagation from node {origin} exceeded its budget of {budget} iterations")]
    PropagationBudgetExceeded {
        /// Cell the propagation started from
        origin: GridPosition,
        /// Iteration budget that was exhausted
        budget: usize,
    },
    /// No cell could be selected while some cells are still uncollapsed. Signals a bookkeeping bug, never a bad random draw.
    #[error("Internal invariant violated: no candidate node while {uncollapsed} nodes are still uncollapsed")]
    InvariantViolation {
        /// Count of uncollapsed cells at the time of the failure
        uncollapsed: usize,
    },
}

impl GenerationError {
    /// Returns `true` if rerunning the generation with another seed may succeed.
    pub fn is_recoverable(&self) -> bool {
        match self {
            GenerationError::Contradiction { .. }
            | GenerationError::PropagationBudgetExceeded { .. } => true,
            GenerationError::InvariantViolation { .. } => false,
        }
    }
}

/// Errors that can occur while defining tiles, tilesets or grids
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TilesetError {
    /// A tileset needs at least one tile
    #[error("Empty tiles collection")]
    Empty,
    /// Weights must be finite and strictly positive
    #[error("Tile {tile} has an invalid weight: {weight}")]
    InvalidWeight {
        /// Index of the tile in the tileset
        tile: usize,
        /// The rejected weight
        weight: f32,
    },
    /// A side of a tile can only carry one socket
    #[error("Tile '{symbol}' declares more than one socket in direction {direction}")]
    DuplicateSocket {
        /// Symbol of the offending tile
        symbol: char,
        /// Direction declared twice
        direction: Direction,
    },
    /// The weights of the tileset, or their `weight * log2(weight)` terms, do not add up to a finite value
    #[error("Tile weights are too large, their sum is {total_weight}")]
    WeightOverflow {
        /// Sum of all the tile weights
        total_weight: f32,
    },
    /// Grids need at least one row and one column
    #[error("Invalid grid size {width} x {height}")]
    InvalidGridSize {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },
}

/// Creates a [`Generator`] for a `width` x `height` grid filled from `tileset`, seeded with `seed`.
///
/// Use [`Generator::builder`] for the other options.
pub fn build_generator(
    width: u32,
    height: u32,
    tileset: Tileset,
    seed: u64,
) -> Result<Generator, TilesetError> {
    let grid = GridDefinition::new(width, height)?;
    Ok(Generator::builder()
        .with_tileset(tileset)
        .with_grid(grid)
        .with_rng(RngMode::Seeded(seed))
        .build())
}

/// Runs `generator` to completion. Same as [`Generator::generate`].
pub fn run(generator: &mut Generator) -> Result<GridData<Tile>, GenerationError> {
    generator.generate()
}
