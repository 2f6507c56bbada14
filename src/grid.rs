use std::{fmt, ops::Range};

use crate::TilesetError;

use self::direction::{Direction, GridDelta, CARDINAL_DIRECTIONS};

/// Defines directions and their deltas
pub mod direction;

/// Index of a Node
pub type NodeIndex = usize;

/// Represents a position in a grid in a practical format
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub struct GridPosition {
    /// Position on the x axis (column)
    pub x: u32,
    /// Position on the y axis (row, growing downward)
    pub y: u32,
}

impl GridPosition {
    /// Creates a new [`GridPosition`]
    pub fn new(x: u32, y: u32) -> GridPosition {
        Self { x, y }
    }

    fn get_delta_position(&self, delta: &GridDelta) -> (i64, i64) {
        (
            i64::from(self.x) + i64::from(delta.dx),
            i64::from(self.y) + i64::from(delta.dy),
        )
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Shape of a bounded 2d grid. Coordinates never wrap around.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GridDefinition {
    width: u32,
    height: u32,
}

impl fmt::Display for GridDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "( size: {} x {} )", self.width, self.height)
    }
}

impl GridDefinition {
    /// Creates a new [`GridDefinition`].
    ///
    /// Returns [`TilesetError::InvalidGridSize`] if one of the dimensions is 0.
    pub fn new(width: u32, height: u32) -> Result<GridDefinition, TilesetError> {
        if width == 0 || height == 0 {
            return Err(TilesetError::InvalidGridSize { width, height });
        }
        Ok(Self { width, height })
    }

    /// Returns the size of the grid on the X axis.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the size of the grid on the Y axis.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the total size of the grid
    pub fn total_size(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns a [`Range`] over all node indexes in this grid
    pub fn indexes(&self) -> Range<NodeIndex> {
        0..self.total_size()
    }

    /// Returns the index from a grid position.
    ///
    /// NO CHECK is done to verify that the given position is a valid position for this grid.
    #[inline]
    pub fn get_index(&self, x: u32, y: u32) -> NodeIndex {
        x as usize + y as usize * self.width as usize
    }

    /// Returns the index from a [`GridPosition`].
    ///
    /// NO CHECK is done to verify that the given position is a valid position for this grid.
    #[inline]
    pub fn get_index_from_pos(&self, grid_position: &GridPosition) -> NodeIndex {
        self.get_index(grid_position.x, grid_position.y)
    }

    /// Returns a [`GridPosition`] from the index of a node in this [`GridDefinition`].
    ///
    /// NO CHECK is done to verify that the given index is a valid index for this grid.
    pub fn get_position(&self, grid_index: NodeIndex) -> GridPosition {
        let width = self.width as usize;
        GridPosition {
            x: (grid_index % width) as u32,
            y: (grid_index / width) as u32,
        }
    }

    /// Returns the next position in the grid when moving `delta` from `grid_position`.
    ///
    /// Returns `None` if the destination is not in the grid.
    pub fn get_next_pos(
        &self,
        grid_position: &GridPosition,
        delta: &GridDelta,
    ) -> Option<GridPosition> {
        let (x, y) = grid_position.get_delta_position(delta);
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return None;
        }
        Some(GridPosition {
            x: x as u32,
            y: y as u32,
        })
    }

    /// Returns the index of the neighbour of `grid_position` in `direction`.
    ///
    /// Returns `None` if the neighbour is not in the grid.
    #[inline]
    pub fn get_next_index(
        &self,
        grid_position: &GridPosition,
        direction: Direction,
    ) -> Option<NodeIndex> {
        self.get_next_pos(grid_position, direction.delta())
            .map(|next_pos| self.get_index_from_pos(&next_pos))
    }

    /// Returns the in-bounds neighbours of `node_index`, with the direction leading to each of them.
    pub fn neighbours(
        &self,
        node_index: NodeIndex,
    ) -> impl Iterator<Item = (Direction, NodeIndex)> + '_ {
        let position = self.get_position(node_index);
        CARDINAL_DIRECTIONS.iter().filter_map(move |&dir| {
            self.get_next_index(&position, dir)
                .map(|neighbour| (dir, neighbour))
        })
    }

    /// Creates a [`GridData`] with the size of the [`GridDefinition`] with each element value being a copy of the given one.
    pub fn new_grid_data<D: Clone>(&self, element: D) -> GridData<D> {
        GridData {
            grid: *self,
            data: vec![element; self.total_size()],
        }
    }
}

/// Holds a [`GridDefinition`] and generic data in a row-major linear buffer, one element per node.
/// ### Example
///
/// ```
/// use glyph_wfc::grid::GridDefinition;
///
/// let grid = GridDefinition::new(3, 2).unwrap();
/// let mut grid_data = grid.new_grid_data('.');
/// *grid_data.get_2d_mut(2, 1) = '#';
/// assert_eq!(grid_data.rows().last().unwrap(), &['.', '.', '#']);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GridData<D> {
    grid: GridDefinition,
    data: Vec<D>,
}

impl<D> GridData<D> {
    /// Prefer using `new_grid_data` directly on an existing grid definition to create a `GridData` with a correct data Vec.
    pub fn new(grid: GridDefinition, data: Vec<D>) -> Self {
        Self { grid, data }
    }

    /// Returns a reference to the `GridDefinition` this is based on
    pub fn grid(&self) -> &GridDefinition {
        &self.grid
    }

    /// Sets the value of the element at `index` in the grid.
    ///
    /// NO CHECK is done to verify that the given index is a valid index for this grid.
    pub fn set(&mut self, index: NodeIndex, value: D) {
        self.data[index] = value;
    }

    /// Returns a reference to the element at this index.
    ///
    /// NO CHECK is done to verify that the given index is a valid index for this grid.
    pub fn get(&self, index: NodeIndex) -> &D {
        &self.data[index]
    }

    /// Returns a mutable reference to the element at this index.
    ///
    /// NO CHECK is done to verify that the given index is a valid index for this grid.
    pub fn get_mut(&mut self, index: NodeIndex) -> &mut D {
        &mut self.data[index]
    }

    /// Returns a reference to the element at this position.
    ///
    /// NO CHECK is done to verify that the given position is a valid position for this grid.
    pub fn get_2d(&self, x: u32, y: u32) -> &D {
        &self.data[self.grid.get_index(x, y)]
    }

    /// Returns a mutable reference to the element at this position.
    ///
    /// NO CHECK is done to verify that the given position is a valid position for this grid.
    pub fn get_2d_mut(&mut self, x: u32, y: u32) -> &mut D {
        &mut self.data[self.grid.get_index(x, y)]
    }

    /// Returns a reference to the underlying data buffer.
    pub fn nodes(&self) -> &[D] {
        &self.data
    }

    /// Iterates over the rows of the grid, from `y = 0` downward.
    pub fn rows(&self) -> std::slice::Chunks<'_, D> {
        self.data.chunks(self.grid.width() as usize)
    }

    /// Builds a new [`GridData`] on the same grid by applying `f` to every element.
    pub fn map<E, F: FnMut(&D) -> E>(&self, f: F) -> GridData<E> {
        GridData {
            grid: self.grid,
            data: self.data.iter().map(f).collect(),
        }
    }
}
