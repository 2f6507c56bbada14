use bitvec::{bitvec, vec::BitVec};

use crate::grid::GridPosition;

use super::{rules::Tileset, tile::TileIndex};

/// State of one grid position during a generation.
///
/// A cell is only marked as collapsed when a tile is explicitly chosen for it. A cell narrowed down to a single possibility by propagation
/// stays uncollapsed (with an entropy of 0) until it is selected and collapsed.
#[derive(Clone, Debug)]
pub struct Cell {
    position: GridPosition,
    /// `possibilities[tile_index]` is true if the tile is still allowed on this cell
    possibilities: BitVec<usize>,
    /// Cached count of ones in `possibilities`
    possible_count: usize,
    /// Cached Shannon entropy of the weighted possibilities
    entropy: f32,
    chosen: Option<TileIndex>,
}

impl Cell {
    pub(crate) fn new(position: GridPosition, tileset: &Tileset) -> Self {
        let tiles_count = tileset.tiles_count();
        let mut cell = Self {
            position,
            possibilities: bitvec![1; tiles_count],
            possible_count: tiles_count,
            entropy: 0.,
            chosen: None,
        };
        cell.entropy = cell.compute_entropy(tileset);
        cell
    }

    /// Returns the position of the cell in its grid
    pub fn position(&self) -> GridPosition {
        self.position
    }

    /// Returns `true` once a tile was chosen for this cell
    #[inline]
    pub fn is_collapsed(&self) -> bool {
        self.chosen.is_some()
    }

    /// Returns the chosen tile, if collapsed
    pub fn chosen(&self) -> Option<TileIndex> {
        self.chosen
    }

    /// Returns how many tiles are still possible on this cell
    #[inline]
    pub fn possible_count(&self) -> usize {
        self.possible_count
    }

    /// Returns `true` if `tile_index` is still possible on this cell
    #[inline]
    pub fn is_possible(&self, tile_index: TileIndex) -> bool {
        self.possibilities[tile_index]
    }

    /// Iterates over the indexes of the tiles still possible on this cell, in tileset order.
    pub fn possible_tiles(&self) -> impl Iterator<Item = TileIndex> + '_ {
        self.possibilities.iter_ones()
    }

    /// Shannon entropy (base 2) of the weighted distribution of the remaining possibilities.
    ///
    /// 0 when collapsed or when at most one possibility remains.
    #[inline]
    pub fn entropy(&self) -> f32 {
        self.entropy
    }

    /// Replaces the possibilities with `narrowed`, which must be a subset of the current possibilities.
    ///
    /// Returns the new possibilities count.
    pub(crate) fn narrow(&mut self, narrowed: BitVec<usize>, tileset: &Tileset) -> usize {
        debug_assert!(narrowed.iter_ones().all(|t| self.possibilities[t]));
        self.possible_count = narrowed.count_ones();
        self.possibilities = narrowed;
        self.entropy = self.compute_entropy(tileset);
        self.possible_count
    }

    /// Commits the cell to `tile_index`.
    pub(crate) fn collapse(&mut self, tile_index: TileIndex) {
        self.possibilities.fill(false);
        self.possibilities.set(tile_index, true);
        self.possible_count = 1;
        self.entropy = 0.;
        self.chosen = Some(tile_index);
    }

    /// Recomputed from scratch over the possibilities in tileset order, so that two cells with the same possibilities always get the exact same value.
    fn compute_entropy(&self, tileset: &Tileset) -> f32 {
        if self.is_collapsed() || self.possible_count <= 1 {
            return 0.;
        }
        let mut weight_sum = 0.;
        let mut weight_log_weight_sum = 0.;
        for tile_index in self.possibilities.iter_ones() {
            weight_sum += tileset.weight(tile_index);
            weight_log_weight_sum += tileset.weight_log_weight(tile_index);
        }
        // -sum(p * log2(p)) with p = w / sum(w)
        f32::log2(weight_sum) - weight_log_weight_sum / weight_sum
    }
}

#[cfg(test)]
mod tests {
    use bitvec::{bitvec, order::Lsb0};

    use crate::{
        generator::{rules::Tileset, socket::Sockets},
        grid::GridPosition,
    };

    use super::Cell;

    fn tileset(weights: &[f32]) -> Tileset {
        Tileset::new(
            weights
                .iter()
                .map(|&w| Sockets::Mono("a".into()).new_tile('a').with_weight(w))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn uniform_entropy_is_log2_of_count() {
        let tileset = tileset(&[1., 1., 1., 1.]);
        let cell = Cell::new(GridPosition::new(0, 0), &tileset);
        assert!((cell.entropy() - 2.).abs() < 1e-5);
        assert_eq!(cell.possible_count(), 4);
        assert!(!cell.is_collapsed());
    }

    #[test]
    fn weighted_entropy_matches_shannon_formula() {
        let tileset = tileset(&[2., 1.]);
        let cell = Cell::new(GridPosition::new(0, 0), &tileset);
        let (p, q) = (2. / 3., 1. / 3.);
        let expected: f32 = -(p * f32::log2(p) + q * f32::log2(q));
        assert!((cell.entropy() - expected).abs() < 1e-5);
    }

    #[test]
    fn singleton_is_not_collapsed_but_has_no_entropy() {
        let tileset = tileset(&[1., 3., 2.]);
        let mut cell = Cell::new(GridPosition::new(1, 2), &tileset);
        assert_eq!(cell.narrow(bitvec![0, 1, 0], &tileset), 1);
        assert_eq!(cell.entropy(), 0.);
        assert!(!cell.is_collapsed());
        assert_eq!(cell.possible_tiles().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn collapse_keeps_only_the_chosen_tile() {
        let tileset = tileset(&[1., 1., 1.]);
        let mut cell = Cell::new(GridPosition::new(0, 0), &tileset);
        cell.collapse(2);
        assert!(cell.is_collapsed());
        assert_eq!(cell.chosen(), Some(2));
        assert_eq!(cell.possible_count(), 1);
        assert!(cell.is_possible(2) && !cell.is_possible(0));
        assert_eq!(cell.entropy(), 0.);
    }

    #[test]
    fn narrowing_to_empty_reports_zero() {
        let tileset = tileset(&[1., 1.]);
        let mut cell = Cell::new(GridPosition::new(0, 0), &tileset);
        assert_eq!(cell.narrow(bitvec![0, 0], &tileset), 0);
        assert_eq!(cell.possible_tiles().count(), 0);
    }
}
