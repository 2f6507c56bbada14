use crate::{generator::tile::Tile, grid::GridData};

/// Returns the symbols of a generated grid, one `Vec` per row, from `y = 0` (top) downward.
pub fn rows(grid_data: &GridData<Tile>) -> Vec<Vec<char>> {
    grid_data
        .rows()
        .map(|row| row.iter().map(Tile::symbol).collect())
        .collect()
}

/// Renders a generated grid as text: one line per row, without trailing newline.
///
/// ### Example
///
/// ```
/// use glyph_wfc::{build_generator, catalog::Pattern, render};
///
/// let mut generator = build_generator(6, 3, Pattern::Mosaic.tileset(), 42).unwrap();
/// let text = render::to_text(&generator.generate().unwrap());
/// assert_eq!(text.lines().count(), 3);
/// assert!(text.lines().all(|line| line.chars().count() == 6));
/// ```
pub fn to_text(grid_data: &GridData<Tile>) -> String {
    rows(grid_data)
        .iter()
        .map(|row| row.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
