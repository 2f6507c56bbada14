use std::{marker::PhantomData, sync::Arc};

use crate::grid::GridDefinition;

use super::{
    node_heuristic::NodeSelectionHeuristic, propagator::PropagationBudget, rules::Tileset,
    Generator, RngMode,
};

/// Internal type used to provide a type-safe builder with a [`GridDefinition`] and a [`Tileset`]
pub enum Set {}
/// Internal type used to provide a type-safe builder with a [`GridDefinition`] and a [`Tileset`]
pub enum Unset {}

/// Used to instantiate a new [`Generator`].
///
/// A [`Tileset`] and a [`GridDefinition`] are the two non-optionnal parameters needed before being able to call `build`.
///
/// ### Example
///
/// Create a `Generator` from a `GeneratorBuilder`.
/// ```
/// use glyph_wfc::{grid::GridDefinition, generator::{builder::GeneratorBuilder, rules::Tileset, socket::Sockets, RngMode}};
///
/// let tileset = Tileset::new(vec![
///     Sockets::Mono("wall".into()).new_tile('#').with_weight(2.),
///     Sockets::Mono("path".into()).new_tile(' '),
/// ]).unwrap();
///
/// let grid = GridDefinition::new(10, 10).unwrap();
/// let mut generator = GeneratorBuilder::new()
///    .with_tileset(tileset)
///    .with_grid(grid)
///    .with_rng(RngMode::Seeded(7))
///    .build();
/// assert!(generator.generate().is_ok());
/// ```
pub struct GeneratorBuilder<G, T> {
    tileset: Option<Arc<Tileset>>,
    grid: Option<GridDefinition>,
    node_selection_heuristic: NodeSelectionHeuristic,
    propagation_budget: PropagationBudget,
    rng_mode: RngMode,
    typestate: PhantomData<(G, T)>,
}

impl GeneratorBuilder<Unset, Unset> {
    /// Creates a [`GeneratorBuilder`] with its values set to their default.
    pub fn new() -> Self {
        Self {
            tileset: None,
            grid: None,
            node_selection_heuristic: NodeSelectionHeuristic::default(),
            propagation_budget: PropagationBudget::default(),
            rng_mode: RngMode::default(),
            typestate: PhantomData,
        }
    }
}

impl<G> GeneratorBuilder<G, Unset> {
    /// Sets the [`Tileset`] to be used by the [`Generator`]
    pub fn with_tileset(self, tileset: Tileset) -> GeneratorBuilder<G, Set> {
        self.with_shared_tileset(Arc::new(tileset))
    }

    /// Sets the [`Tileset`] to be used by the [`Generator`]. The `Generator` will hold a read-only reference onto this `Tileset` which can be safely shared by multiple `Generator`.
    pub fn with_shared_tileset(self, tileset: Arc<Tileset>) -> GeneratorBuilder<G, Set> {
        GeneratorBuilder {
            tileset: Some(tileset),

            grid: self.grid,
            node_selection_heuristic: self.node_selection_heuristic,
            propagation_budget: self.propagation_budget,
            rng_mode: self.rng_mode,

            typestate: PhantomData,
        }
    }
}

impl<T> GeneratorBuilder<Unset, T> {
    /// Sets the [`GridDefinition`] to be used by the [`Generator`].
    pub fn with_grid(self, grid: GridDefinition) -> GeneratorBuilder<Set, T> {
        GeneratorBuilder {
            grid: Some(grid),

            tileset: self.tileset,
            node_selection_heuristic: self.node_selection_heuristic,
            propagation_budget: self.propagation_budget,
            rng_mode: self.rng_mode,

            typestate: PhantomData,
        }
    }
}

impl<G, T> GeneratorBuilder<G, T> {
    /// Specifies the [`NodeSelectionHeuristic`] to be used by the [`Generator`]. Defaults to [`NodeSelectionHeuristic::MinimumEntropy`].
    pub fn with_node_heuristic(mut self, heuristic: NodeSelectionHeuristic) -> Self {
        self.node_selection_heuristic = heuristic;
        self
    }
    /// Specifies the [`PropagationBudget`] of each propagation. Defaults to [`PropagationBudget::Scaled`].
    pub fn with_propagation_budget(mut self, budget: PropagationBudget) -> Self {
        self.propagation_budget = budget;
        self
    }
    /// Specifies the [`RngMode`] to be used by the [`Generator`]. Defaults to [`RngMode::Seeded`] with [`super::DEFAULT_SEED`].
    pub fn with_rng(mut self, rng_mode: RngMode) -> Self {
        self.rng_mode = rng_mode;
        self
    }
}

impl GeneratorBuilder<Set, Set> {
    /// Instantiates a [`Generator`] as specified by the various builder parameters.
    pub fn build(self) -> Generator {
        // Both are `Some` thanks to the typing.
        match (self.tileset, self.grid) {
            (Some(tileset), Some(grid)) => Generator::new(
                tileset,
                grid,
                self.node_selection_heuristic,
                self.propagation_budget,
                self.rng_mode,
            ),
            _ => unreachable!("GeneratorBuilder<Set, Set> always holds a tileset and a grid"),
        }
    }
}
