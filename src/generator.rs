use std::sync::Arc;

use bitvec::{bitvec, vec::BitVec};
use rand::{
    distributions::{Distribution, WeightedIndex},
    rngs::StdRng,
    Rng, SeedableRng,
};
use tracing::{debug, warn};

#[cfg(feature = "debug-traces")]
use tracing::{info, trace};

use crate::{
    grid::{direction::CARDINAL_DIRECTIONS, GridData, GridDefinition, NodeIndex},
    GenerationError,
};

use self::{
    builder::{GeneratorBuilder, Unset},
    cell::Cell,
    node_heuristic::NodeSelectionHeuristic,
    propagator::{PropagationBudget, Propagator},
    rules::Tileset,
    tile::{Tile, TileIndex},
};

/// Defines a [`GeneratorBuilder`] used to create a generator
pub mod builder;
/// Defines the per-position [`Cell`] state
pub mod cell;
/// Defines the different possible [`NodeSelectionHeuristic`]
pub mod node_heuristic;
/// Defines the bounded constraint propagation and its [`PropagationBudget`]
pub mod propagator;
/// Defines the [`Tileset`] used by a [`Generator`]
pub mod rules;
/// Defines [`socket::SocketLabel`], [`socket::Sockets`] and the compatibility function
pub mod socket;
/// Defines [`Tile`] and their associated type & utilities
pub mod tile;

/// Seed used when none is given, so that unseeded generations are reproducible
pub const DEFAULT_SEED: u64 = 42;
/// Default retry count of [`Generator::generate_with_retries`]
pub const DEFAULT_RETRY_COUNT: u32 = 10;

/// Different ways to seed the RNG of the generator.
///
/// The RNG is owned by the generator: no other random source is ever consumed, and nothing else consumes it.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RngMode {
    /// The generator will use the given seed for its random source.
    Seeded(u64),
    /// The generator will use a random seed for its random source.
    ///
    /// The randomly generated seed can still be retrieved by calling `seed` on the generator once created.
    RandomSeed,
}

impl Default for RngMode {
    fn default() -> Self {
        RngMode::Seeded(DEFAULT_SEED)
    }
}

/// Represents the current generation state, if not failed.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum GenerationStatus {
    /// The generation has not ended yet.
    Ongoing,
    /// The generation ended succesfully. The whole grid is generated.
    Done,
}

/// State machine of a generation run
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum GeneratorState {
    /// Cells are still being collapsed.
    Running,
    /// Every cell is collapsed.
    Succeeded,
    /// The run ended on this error. It will not resume.
    Failed(GenerationError),
}

/// Information about a successful generation
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct GenInfo {
    /// How many runs were needed, including the successful one
    pub try_count: u32,
    /// Seed of the successful run
    pub seed: u64,
}

/// Wave function collapse generator.
/// Use a [`GeneratorBuilder`] to get an instance of a [`Generator`].
pub struct Generator {
    // === Read-only configuration ===
    grid: GridDefinition,
    tileset: Arc<Tileset>,
    node_selection_heuristic: NodeSelectionHeuristic,

    // === Generation state ===
    seed: u64,
    rng: StdRng,
    state: GeneratorState,
    /// Whether the initial constraint pass was done for the current run
    initialized: bool,
    cells: GridData<Cell>,
    nodes_left_to_generate: usize,

    // === Constraint satisfaction algorithm data ===
    propagator: Propagator,
}

impl Generator {
    /// Returns a new `GeneratorBuilder`
    pub fn builder() -> GeneratorBuilder<Unset, Unset> {
        GeneratorBuilder::new()
    }

    fn new(
        tileset: Arc<Tileset>,
        grid: GridDefinition,
        node_selection_heuristic: NodeSelectionHeuristic,
        propagation_budget: PropagationBudget,
        rng_mode: RngMode,
    ) -> Self {
        let seed = match rng_mode {
            RngMode::Seeded(seed) => seed,
            RngMode::RandomSeed => rand::thread_rng().gen::<u64>(),
        };
        let budget = propagation_budget.iterations(&grid, tileset.tiles_count());

        Self {
            cells: new_cells(&grid, &tileset),
            nodes_left_to_generate: grid.total_size(),
            propagator: Propagator::new(budget, tileset.tiles_count()),

            grid,
            tileset,
            node_selection_heuristic,

            rng: StdRng::seed_from_u64(seed),
            seed,
            state: GeneratorState::Running,
            initialized: false,
        }
    }

    /// Returns the seed that was used to initialize the generator RNG for the current run.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the [`GridDefinition`] used by the generator
    pub fn grid(&self) -> &GridDefinition {
        &self.grid
    }

    /// Returns the [`Tileset`] used by the generator
    pub fn tileset(&self) -> &Arc<Tileset> {
        &self.tileset
    }

    /// Returns the current [`GeneratorState`]
    pub fn state(&self) -> GeneratorState {
        self.state
    }

    /// Returns the current state of every cell
    pub fn cells(&self) -> &GridData<Cell> {
        &self.cells
    }

    /// Returns the propagation budget resolved for this grid and tileset
    pub fn propagation_budget(&self) -> usize {
        self.propagator.budget()
    }

    /// Runs the generation until every cell is collapsed or a [`GenerationError`] ends it, and returns the generated grid.
    ///
    /// There is no retry: a failed generator keeps returning the same error. See [`Generator::generate_with_retries`].
    /// If the generation was already started by previous calls to `select_and_collapse`, this will simply continue the generation.
    pub fn generate(&mut self) -> Result<GridData<Tile>, GenerationError> {
        // Grid total size is an upper limit to the number of steps: each one collapses a cell.
        for _ in 0..=self.grid.total_size() {
            if self.select_and_collapse()? == GenerationStatus::Done {
                break;
            }
        }
        self.collapsed_grid()
            .ok_or(GenerationError::InvariantViolation {
                uncollapsed: self.nodes_left_to_generate,
            })
    }

    /// Advances the generation by one step: select a cell, collapse it and propagate the changes.
    ///
    /// Returns the [`GenerationStatus`] if the step executed successfully and a [`GenerationError`] if the generation fails.
    /// Once failed, the generator does not resume and keeps returning the same error.
    pub fn select_and_collapse(&mut self) -> Result<GenerationStatus, GenerationError> {
        match self.state {
            GeneratorState::Failed(err) => return Err(err),
            GeneratorState::Succeeded => return Ok(GenerationStatus::Done),
            GeneratorState::Running => (),
        }

        let res = self.internal_select_and_collapse();
        match res {
            Ok(GenerationStatus::Done) => {
                debug!("Generation succeeded with seed {}", self.seed);
                self.state = GeneratorState::Succeeded;
            }
            Ok(GenerationStatus::Ongoing) => (),
            Err(err) => {
                debug!("Generation with seed {} failed: {}", self.seed, err);
                self.state = GeneratorState::Failed(err);
            }
        }
        res
    }

    /// Runs [`Generator::generate`], and on a recoverable failure reruns the whole generation from scratch with a new seed drawn from the current random stream, up to `max_retry_count` more times.
    ///
    /// Two generators created with the same seed go through the same seeds sequence.
    pub fn generate_with_retries(
        &mut self,
        max_retry_count: u32,
    ) -> Result<(GenInfo, GridData<Tile>), GenerationError> {
        let mut try_count = 1;
        loop {
            match self.generate() {
                Ok(grid_data) => {
                    let info = GenInfo {
                        try_count,
                        seed: self.seed,
                    };
                    return Ok((info, grid_data));
                }
                Err(err) if err.is_recoverable() && try_count <= max_retry_count => {
                    warn!(
                        "Try n°{} with seed {} failed: {}, retrying",
                        try_count, self.seed, err
                    );
                    self.reinitialize();
                    try_count += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Returns the generated grid if every cell is collapsed
    pub fn collapsed_grid(&self) -> Option<GridData<Tile>> {
        let tiles: Option<Vec<Tile>> = self
            .cells
            .nodes()
            .iter()
            .map(|cell| cell.chosen().map(|t| self.tileset.tile(t).clone()))
            .collect();
        tiles.map(|tiles| GridData::new(self.grid, tiles))
    }

    fn reinitialize(&mut self) {
        self.seed = self.rng.gen::<u64>();
        self.rng = StdRng::seed_from_u64(self.seed);

        #[cfg(feature = "debug-traces")]
        info!(
            "Reinitializing generator with seed {}, state was {:?}",
            self.seed, self.state
        );

        self.state = GeneratorState::Running;
        self.initialized = false;
        self.cells = new_cells(&self.grid, &self.tileset);
        self.nodes_left_to_generate = self.grid.total_size();
    }

    /// Removes from every cell the tiles which have no possible neighbour at all in one of the in-bounds directions, then propagates those removals.
    fn initialize(&mut self) -> Result<(), GenerationError> {
        #[cfg(feature = "debug-traces")]
        debug!("Initial constraint pass");

        let tiles_count = self.tileset.tiles_count();
        // `dead_ends[direction][tile]` is true if `tile` has no allowed neighbour in `direction`
        let dead_ends: Vec<BitVec<usize>> = CARDINAL_DIRECTIONS
            .iter()
            .map(|&dir| {
                (0..tiles_count)
                    .map(|tile| self.tileset.allowed_tiles(tile, dir).is_empty())
                    .collect()
            })
            .collect();

        let mut origins = Vec::new();
        for node_index in self.grid.indexes() {
            let mut kept = bitvec![1; tiles_count];
            for (direction, _) in self.grid.neighbours(node_index) {
                for tile in dead_ends[direction as usize].iter_ones() {
                    kept.set(tile, false);
                }
            }
            let kept_count = kept.count_ones();
            if kept_count == tiles_count {
                continue;
            }
            if self.cells.get_mut(node_index).narrow(kept, &self.tileset) == 0 {
                return Err(GenerationError::Contradiction {
                    position: self.grid.get_position(node_index),
                });
            }
            origins.push(node_index);
        }

        if !origins.is_empty() {
            self.propagator
                .propagate(&self.grid, &mut self.cells, &self.tileset, origins)?;
        }
        self.initialized = true;
        Ok(())
    }

    fn internal_select_and_collapse(&mut self) -> Result<GenerationStatus, GenerationError> {
        if !self.initialized {
            self.initialize()?;
        }
        if self.nodes_left_to_generate == 0 {
            return Ok(GenerationStatus::Done);
        }

        let node_index = self
            .node_selection_heuristic
            .select_node(&self.cells)
            .ok_or(GenerationError::InvariantViolation {
                uncollapsed: self.nodes_left_to_generate,
            })?;

        let _tile_index = collapse(self.cells.get_mut(node_index), &self.tileset, &mut self.rng)
            .ok_or(GenerationError::InvariantViolation {
                uncollapsed: self.nodes_left_to_generate,
            })?;
        self.nodes_left_to_generate -= 1;

        #[cfg(feature = "debug-traces")]
        trace!(
            "Collapsed node {:?} to tile {}, {} nodes left",
            self.grid.get_position(node_index),
            self.tileset.tile(_tile_index),
            self.nodes_left_to_generate
        );

        self.propagate_from(node_index)?;

        match self.nodes_left_to_generate {
            0 => Ok(GenerationStatus::Done),
            _ => Ok(GenerationStatus::Ongoing),
        }
    }

    fn propagate_from(&mut self, node_index: NodeIndex) -> Result<(), GenerationError> {
        self.propagator
            .propagate(&self.grid, &mut self.cells, &self.tileset, [node_index])
    }
}

fn new_cells(grid: &GridDefinition, tileset: &Tileset) -> GridData<Cell> {
    let cells = grid
        .indexes()
        .map(|index| Cell::new(grid.get_position(index), tileset))
        .collect();
    GridData::new(*grid, cells)
}

/// Collapse step: picks one of the possible tiles of `cell` at random, weighted by the tiles weights, and commits the cell to it.
///
/// Returns the chosen tile, or `None` if the cell had no possibility left.
pub fn collapse<R: Rng>(cell: &mut Cell, tileset: &Tileset, rng: &mut R) -> Option<TileIndex> {
    let possible_tiles: Vec<TileIndex> = cell.possible_tiles().collect();
    let weighted_distribution =
        WeightedIndex::new(possible_tiles.iter().map(|&t| tileset.weight(t))).ok()?;
    let chosen = possible_tiles[weighted_distribution.sample(rng)];
    cell.collapse(chosen);
    Some(chosen)
}
