use std::fmt;

/// Represents a side of a grid cell.
///
/// `North` points towards `y - 1`: rows are laid out top to bottom, like the rendered text output.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Direction {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Direction {
    /// Returns the opposite [`Direction`]
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Returns the [`GridDelta`] of a one unit move in this direction
    #[inline]
    pub fn delta(&self) -> &'static GridDelta {
        &CARDINAL_DELTAS[*self as usize]
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Direction::North => "N",
            Direction::East => "E",
            Direction::South => "S",
            Direction::West => "W",
        };
        write!(f, "{}", letter)
    }
}

/// All the directions of a 2d cartesian grid, in the order used to index per-direction data.
pub const CARDINAL_DIRECTIONS: &'static [Direction] = &[
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];

/// Number of directions of a 2d cartesian grid
pub const DIRECTIONS_COUNT: usize = 4;

/// Represents a displacement on a 2d grid
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridDelta {
    pub(crate) dx: i32,
    pub(crate) dy: i32,
}

impl GridDelta {
    /// Creates a new [`GridDelta`]
    pub fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }
}

const CARDINAL_DELTAS: &'static [GridDelta] = &[
    GridDelta {
        // North
        dx: 0,
        dy: -1,
    },
    GridDelta {
        // East
        dx: 1,
        dy: 0,
    },
    GridDelta {
        // South
        dx: 0,
        dy: 1,
    },
    GridDelta {
        // West
        dx: -1,
        dy: 0,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_an_involution() {
        for dir in CARDINAL_DIRECTIONS {
            assert_eq!(dir.opposite().opposite(), *dir);
            assert_ne!(dir.opposite(), *dir);
        }
    }

    #[test]
    fn opposite_deltas_cancel_out() {
        for dir in CARDINAL_DIRECTIONS {
            let (d, o) = (dir.delta(), dir.opposite().delta());
            assert_eq!((d.dx + o.dx, d.dy + o.dy), (0, 0));
        }
    }

    #[test]
    fn directions_index_their_own_slot() {
        for (index, dir) in CARDINAL_DIRECTIONS.iter().enumerate() {
            assert_eq!(*dir as usize, index);
        }
        assert_eq!(CARDINAL_DIRECTIONS.len(), DIRECTIONS_COUNT);
    }
}
