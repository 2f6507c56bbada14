use std::collections::VecDeque;

use bitvec::{bitvec, vec::BitVec};

#[cfg(feature = "debug-traces")]
use tracing::trace;

use crate::{
    grid::{GridData, GridDefinition, NodeIndex},
    GenerationError,
};

use super::{cell::Cell, rules::Tileset};

/// Lower bound of a [`PropagationBudget::Scaled`] budget
pub const MIN_PROPAGATION_BUDGET: usize = 10_000;

/// Maximum number of queue pops a single propagation may perform before being declared failed.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum PropagationBudget {
    /// `max(MIN_PROPAGATION_BUDGET, width * height * max(4, tiles_count))`
    #[default]
    Scaled,
    /// A fixed number of iterations
    Fixed(usize),
}

impl PropagationBudget {
    /// Resolves the budget for a given grid and tileset size
    pub fn iterations(&self, grid: &GridDefinition, tiles_count: usize) -> usize {
        match self {
            PropagationBudget::Scaled => MIN_PROPAGATION_BUDGET
                .max(grid.total_size().saturating_mul(tiles_count.max(4))),
            PropagationBudget::Fixed(iterations) => *iterations,
        }
    }
}

/// Breadth-first constraint propagation over a grid of [`Cell`].
pub(crate) struct Propagator {
    budget: usize,
    /// FIFO of nodes whose neighbours must be re-examined
    queue: VecDeque<NodeIndex>,
    /// Scratch buffer: tiles supported by the node being processed in the current direction
    supported: BitVec<usize>,
}

impl Propagator {
    pub(crate) fn new(budget: usize, tiles_count: usize) -> Self {
        Self {
            budget,
            queue: VecDeque::new(),
            supported: bitvec![0; tiles_count],
        }
    }

    pub(crate) fn budget(&self) -> usize {
        self.budget
    }

    /// Narrows the possibilities of the neighbours of `origins`, transitively, until a fixed point is reached.
    ///
    /// Returns [`GenerationError::Contradiction`] as soon as a cell has no possibility left, and
    /// [`GenerationError::PropagationBudgetExceeded`] if work is still queued once the budget is spent. In both cases the cells are left partially narrowed.
    pub(crate) fn propagate<I>(
        &mut self,
        grid: &GridDefinition,
        cells: &mut GridData<Cell>,
        tileset: &Tileset,
        origins: I,
    ) -> Result<(), GenerationError>
    where
        I: IntoIterator<Item = NodeIndex>,
    {
        self.queue.clear();
        self.queue.extend(origins);
        let origin = self.queue.front().copied().unwrap_or_default();

        let mut iterations = 0;
        while iterations < self.budget {
            let Some(from_index) = self.queue.pop_front() else {
                break;
            };
            iterations += 1;

            for (direction, to_index) in grid.neighbours(from_index) {
                if cells.get(to_index).is_collapsed() {
                    continue;
                }

                // Union of the tiles allowed in `direction` by any candidate of the `from` cell.
                // A collapsed cell only has its chosen tile as candidate.
                self.supported.fill(false);
                for from_tile in cells.get(from_index).possible_tiles() {
                    for &allowed in tileset.allowed_tiles(from_tile, direction) {
                        self.supported.set(allowed, true);
                    }
                }

                let neighbour = cells.get(to_index);
                let mut narrowed = bitvec![0; tileset.tiles_count()];
                let mut remaining = 0;
                for tile in neighbour.possible_tiles() {
                    if self.supported[tile] {
                        narrowed.set(tile, true);
                        remaining += 1;
                    }
                }
                if remaining == neighbour.possible_count() {
                    continue;
                }

                #[cfg(feature = "debug-traces")]
                trace!(
                    "Propagation from {:?} narrows {:?} from {} to {} tiles",
                    grid.get_position(from_index),
                    grid.get_position(to_index),
                    neighbour.possible_count(),
                    remaining
                );

                if cells.get_mut(to_index).narrow(narrowed, tileset) == 0 {
                    return Err(GenerationError::Contradiction {
                        position: grid.get_position(to_index),
                    });
                }
                self.queue.push_back(to_index);
            }
        }

        if self.queue.is_empty() {
            Ok(())
        } else {
            Err(GenerationError::PropagationBudgetExceeded {
                origin: grid.get_position(origin),
                budget: self.budget,
            })
        }
    }
}
