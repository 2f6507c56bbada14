use ndarray::{Array, Ix2};

use crate::{
    grid::direction::{Direction, CARDINAL_DIRECTIONS, DIRECTIONS_COUNT},
    TilesetError,
};

use super::{
    socket::can_connect,
    tile::{Tile, TileIndex},
};

/// Ordered, validated collection of [`Tile`] used by a [`super::Generator`], along with their precomputed adjacency rules.
///
/// Read-only once created: it can be shared between generators through an [`std::sync::Arc`].
#[derive(Clone, Debug)]
pub struct Tileset {
    tiles: Vec<Tile>,
    /// The vector `allowed_neighbours[tile_index][direction]` holds all the allowed adjacent tiles (indexes) to `tile_index` in `direction`.
    ///
    /// Calculated from the tiles sockets with [`can_connect`].
    ///
    /// Note: this cannot be a 3d array since the third dimension is different for each element.
    allowed_neighbours: Array<Vec<TileIndex>, Ix2>,
    /// Value of `weight * log2(weight)` for a given tile
    weight_log_weights: Vec<f32>,
}

impl Tileset {
    /// Creates a [`Tileset`] from `tiles`. The order of the tiles is kept and defines their [`TileIndex`].
    ///
    /// Returns an error if `tiles` is empty, if a tile weight is not finite and strictly positive, or if the weights are too large to be summed.
    pub fn new(tiles: Vec<Tile>) -> Result<Tileset, TilesetError> {
        if tiles.is_empty() {
            return Err(TilesetError::Empty);
        }
        for (tile, weight) in tiles.iter().map(|t| t.weight()).enumerate() {
            if !weight.is_finite() || weight <= 0. {
                return Err(TilesetError::InvalidWeight { tile, weight });
            }
        }

        let mut allowed_neighbours =
            Array::from_elem((tiles.len(), DIRECTIONS_COUNT), Vec::new());
        for (from_index, from) in tiles.iter().enumerate() {
            for &direction in CARDINAL_DIRECTIONS {
                let allowed = &mut allowed_neighbours[(from_index, direction as usize)];
                for (to_index, to) in tiles.iter().enumerate() {
                    if can_connect(from, to, direction) {
                        allowed.push(to_index);
                    }
                }
            }
        }

        let weight_log_weights: Vec<f32> = tiles
            .iter()
            .map(|t| t.weight() * f32::log2(t.weight()))
            .collect();

        // Bounds every partial sum computed during entropy updates and weighted draws.
        let total_weight: f32 = tiles.iter().map(|t| t.weight()).sum();
        let total_weight_log_weight: f32 = weight_log_weights.iter().map(|w| w.abs()).sum();
        if !total_weight.is_finite() || !total_weight_log_weight.is_finite() {
            return Err(TilesetError::WeightOverflow { total_weight });
        }

        Ok(Tileset {
            tiles,
            allowed_neighbours,
            weight_log_weights,
        })
    }

    /// Returns how many tiles are in the tileset
    #[inline]
    pub fn tiles_count(&self) -> usize {
        self.tiles.len()
    }

    /// Returns the tiles, in order
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Returns the tile with index `tile_index`.
    ///
    /// Panics if the index is out of bounds.
    #[inline]
    pub fn tile(&self, tile_index: TileIndex) -> &Tile {
        &self.tiles[tile_index]
    }

    /// Returns all the tiles allowed to lie in `direction` from a `tile_index` tile.
    #[inline]
    pub fn allowed_tiles(&self, tile_index: TileIndex, direction: Direction) -> &[TileIndex] {
        &self.allowed_neighbours[(tile_index, direction as usize)]
    }

    #[inline]
    pub(crate) fn weight(&self, tile_index: TileIndex) -> f32 {
        self.tiles[tile_index].weight()
    }

    #[inline]
    pub(crate) fn weight_log_weight(&self, tile_index: TileIndex) -> f32 {
        self.weight_log_weights[tile_index]
    }
}
