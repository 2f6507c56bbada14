use std::fmt;

#[cfg(feature = "debug-traces")]
use tracing::warn;

use crate::{
    grid::direction::{Direction, DIRECTIONS_COUNT},
    TilesetError,
};

use super::socket::{can_connect, SocketLabel};

/// Index of a tile in a [`super::rules::Tileset`]
pub type TileIndex = usize;

/// Immutable building block of a generated grid: a rendered symbol, up to one socket per side and a selection weight.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    symbol: char,
    /// `sockets[direction]`, `None` when the tile exposes no connector on that side.
    sockets: [Option<SocketLabel>; DIRECTIONS_COUNT],
    /// Weight factor influencing the density of this [`Tile`] in the generated output.
    ///
    /// Defaults to 1.0
    weight: f32,
    /// Name given to this tile for debug purposes.
    name: Option<&'static str>,
}

impl Tile {
    /// Creates a [`Tile`] with a weight of 1.0.
    ///
    /// Prefer [`super::socket::Sockets::new_tile`].
    pub fn new(symbol: char, sockets: [Option<SocketLabel>; DIRECTIONS_COUNT]) -> Self {
        Self {
            symbol,
            sockets,
            weight: 1.0,
            name: None,
        }
    }

    /// Creates a [`Tile`] from a list of `(direction, label)` socket declarations, with a weight of 1.0.
    ///
    /// Directions absent from the list get no socket. Returns [`TilesetError::DuplicateSocket`] if a direction is declared more than once.
    pub fn try_from_sockets<I>(symbol: char, sockets: I) -> Result<Self, TilesetError>
    where
        I: IntoIterator<Item = (Direction, SocketLabel)>,
    {
        let mut checked: [Option<SocketLabel>; DIRECTIONS_COUNT] = Default::default();
        for (direction, label) in sockets {
            let slot = &mut checked[direction as usize];
            if slot.is_some() {
                return Err(TilesetError::DuplicateSocket { symbol, direction });
            }
            *slot = Some(label);
        }
        Ok(Self::new(symbol, checked))
    }

    /// Specify this [`Tile`] weight. The `weight` value should be strictly superior to `0`. If it is not the case, the value will be overriden by `f32::MIN_POSITIVE`.
    pub fn with_weight(mut self, weight: f32) -> Self {
        let mut checked_weight = weight;
        if !(checked_weight > 0.) {
            #[cfg(feature = "debug-traces")]
            warn!(
                "Tile {} had an invalid weight {} <= 0., weight overriden to f32::MIN_POSITIVE: {}",
                self, checked_weight, f32::MIN_POSITIVE
            );
            checked_weight = f32::MIN_POSITIVE
        };
        self.weight = checked_weight;
        self
    }

    #[allow(unused_mut)]
    /// Register the given name for this tile.
    ///
    /// Does nothing if the `tile-names` feature is not enabled.
    pub fn with_name(mut self, _name: &'static str) -> Self {
        #[cfg(feature = "tile-names")]
        {
            self.name = Some(_name);
        }

        self
    }

    /// Returns the symbol rendered for this tile
    pub fn symbol(&self) -> char {
        self.symbol
    }

    /// Returns the weight of this tile
    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Returns the debug name of this tile, if any
    pub fn name(&self) -> Option<&'static str> {
        self.name
    }

    /// Returns the socket exposed on the `direction` side, if any
    #[inline]
    pub fn socket(&self, direction: Direction) -> Option<&SocketLabel> {
        self.sockets[direction as usize].as_ref()
    }

    /// See [`super::socket::can_connect`]
    pub fn can_connect(&self, other: &Tile, direction: Direction) -> bool {
        can_connect(self, other, direction)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name {
            Some(name) => write!(f, "'{}' ({})", self.symbol, name),
            None => write!(f, "'{}'", self.symbol),
        }
    }
}
