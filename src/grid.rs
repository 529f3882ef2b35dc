//! 2-D numeric grids and borrowed sub-regions.
//!
//! [`Grid`] is the image-side input type: a rectangular, row-major `f64`
//! array validated at construction (no ragged rows, no NaN/infinite values),
//! so downstream scoring never has to re-check shape. [`Region`] is a cheap
//! borrowed view over a sub-rectangle, identified by its top-left offset —
//! the unit the image pipeline routes.

use crate::InvalidInputError;

/// An owned, rectangular 2-D array of `f64` values in row-major order.
///
/// Construction validates shape and values, so a `Grid` in hand is always
/// rectangular, non-empty, and finite.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl Grid {
    /// Build a grid from a list of rows.
    ///
    /// # Errors
    ///
    /// - [`InvalidInputError::EmptyInput`] if there are no rows or row 0 is
    ///   empty.
    /// - [`InvalidInputError::RaggedRows`] if any row differs in length from
    ///   row 0.
    /// - [`InvalidInputError::NonFinite`] if any value is NaN or infinite.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, InvalidInputError> {
        let Some(first) = rows.first() else {
            return Err(InvalidInputError::EmptyInput);
        };
        let cols = first.len();
        if cols == 0 {
            return Err(InvalidInputError::EmptyInput);
        }

        let mut data = Vec::with_capacity(rows.len() * cols);
        for (r, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(InvalidInputError::RaggedRows {
                    row: r,
                    found: row.len(),
                    expected: cols,
                });
            }
            for (c, &v) in row.iter().enumerate() {
                if !v.is_finite() {
                    return Err(InvalidInputError::NonFinite { row: r, col: c });
                }
                data.push(v);
            }
        }

        Ok(Self {
            data,
            rows: rows.len(),
            cols,
        })
    }

    /// Build a `rows × cols` grid where every cell holds `value`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInputError::EmptyInput`] if either dimension is zero,
    /// or [`InvalidInputError::NonFinite`] if `value` is NaN or infinite.
    pub fn filled(rows: usize, cols: usize, value: f64) -> Result<Self, InvalidInputError> {
        if rows == 0 || cols == 0 {
            return Err(InvalidInputError::EmptyInput);
        }
        if !value.is_finite() {
            return Err(InvalidInputError::NonFinite { row: 0, col: 0 });
        }
        Ok(Self {
            data: vec![value; rows * cols],
            rows,
            cols,
        })
    }

    /// Build a `rows × cols` grid by evaluating `f(row, col)` per cell.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInputError::EmptyInput`] if either dimension is zero,
    /// or [`InvalidInputError::NonFinite`] if `f` produces a NaN or infinite
    /// value.
    pub fn from_fn(
        rows: usize,
        cols: usize,
        mut f: impl FnMut(usize, usize) -> f64,
    ) -> Result<Self, InvalidInputError> {
        if rows == 0 || cols == 0 {
            return Err(InvalidInputError::EmptyInput);
        }
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                let v = f(r, c);
                if !v.is_finite() {
                    return Err(InvalidInputError::NonFinite { row: r, col: c });
                }
                data.push(v);
            }
        }
        Ok(Self { data, rows, cols })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always `false` — an empty `Grid` cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value at `(row, col)`, or `None` if out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            self.data.get(row * self.cols + col).copied()
        } else {
            None
        }
    }

    /// A view over the entire grid.
    pub fn full_region(&self) -> Region<'_> {
        Region {
            grid: self,
            row: 0,
            col: 0,
            height: self.rows,
            width: self.cols,
        }
    }

    /// A view over the sub-rectangle starting at `(row, col)` with the given
    /// extent, clipped to the grid bounds.
    pub fn region(&self, row: usize, col: usize, height: usize, width: usize) -> Region<'_> {
        let row = row.min(self.rows);
        let col = col.min(self.cols);
        Region {
            grid: self,
            row,
            col,
            height: height.min(self.rows - row),
            width: width.min(self.cols - col),
        }
    }

    /// Iterate the grid as a row-major raster of non-overlapping square
    /// tiles of the given edge length. Boundary tiles are smaller when the
    /// grid dimensions are not multiples of `edge`.
    ///
    /// An `edge` of zero yields no tiles.
    pub fn tiles(&self, edge: usize) -> Tiles<'_> {
        Tiles {
            grid: self,
            edge,
            row: 0,
            col: 0,
        }
    }
}

/// A borrowed view over a rectangular sub-region of a [`Grid`].
///
/// Identified by its top-left `(row, col)` offset; values iterate in
/// row-major order. Regions produced by [`Grid::tiles`] are never empty.
#[derive(Debug, Clone, Copy)]
pub struct Region<'a> {
    grid: &'a Grid,
    row: usize,
    col: usize,
    height: usize,
    width: usize,
}

impl<'a> Region<'a> {
    /// Top-left offset of this region within its grid.
    pub fn origin(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// Number of rows in the region.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns in the region.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of cells in the region.
    pub fn len(&self) -> usize {
        self.height * self.width
    }

    /// `true` if the region covers zero cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate all values in row-major order.
    pub fn values(&self) -> impl Iterator<Item = f64> + 'a {
        let grid = self.grid;
        let (row, col, width) = (self.row, self.col, self.width);
        (row..row + self.height).flat_map(move |r| {
            let start = r * grid.cols + col;
            grid.data[start..start + width].iter().copied()
        })
    }

    /// Iterate the values of one region row, or an empty iterator if `r` is
    /// out of range.
    pub fn row_values(&self, r: usize) -> impl Iterator<Item = f64> + 'a {
        let grid = self.grid;
        let (width, col) = (self.width, self.col);
        let slice = if r < self.height {
            let start = (self.row + r) * grid.cols + col;
            &grid.data[start..start + width]
        } else {
            &[]
        };
        slice.iter().copied()
    }
}

/// Row-major tile iterator returned by [`Grid::tiles`].
#[derive(Debug)]
pub struct Tiles<'a> {
    grid: &'a Grid,
    edge: usize,
    row: usize,
    col: usize,
}

impl<'a> Iterator for Tiles<'a> {
    type Item = Region<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.edge == 0 || self.row >= self.grid.rows {
            return None;
        }
        let region = self.grid.region(self.row, self.col, self.edge, self.edge);
        self.col += self.edge;
        if self.col >= self.grid.cols {
            self.col = 0;
            self.row += self.edge;
        }
        Some(region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_rejects_empty() {
        assert_eq!(
            Grid::from_rows(vec![]),
            Err(InvalidInputError::EmptyInput)
        );
        assert_eq!(
            Grid::from_rows(vec![vec![]]),
            Err(InvalidInputError::EmptyInput)
        );
    }

    #[test]
    fn test_from_rows_rejects_ragged_rows() {
        let result = Grid::from_rows(vec![vec![1.0, 2.0], vec![3.0]]);
        assert_eq!(
            result,
            Err(InvalidInputError::RaggedRows {
                row: 1,
                found: 1,
                expected: 2
            })
        );
    }

    #[test]
    fn test_from_rows_rejects_nan() {
        let result = Grid::from_rows(vec![vec![1.0, f64::NAN]]);
        assert_eq!(result, Err(InvalidInputError::NonFinite { row: 0, col: 1 }));
    }

    #[test]
    fn test_filled_rejects_zero_dimension() {
        assert_eq!(Grid::filled(0, 4, 1.0), Err(InvalidInputError::EmptyInput));
        assert_eq!(Grid::filled(4, 0, 1.0), Err(InvalidInputError::EmptyInput));
    }

    #[test]
    fn test_get_in_and_out_of_bounds() {
        let g = Grid::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]])
            .unwrap_or_else(|e| std::panic::panic_any(format!("grid: {e}")));
        assert_eq!(g.get(1, 0), Some(3.0));
        assert_eq!(g.get(2, 0), None);
        assert_eq!(g.get(0, 2), None);
    }

    #[test]
    fn test_region_values_are_row_major() {
        let g = Grid::from_fn(4, 4, |r, c| (r * 4 + c) as f64)
            .unwrap_or_else(|e| std::panic::panic_any(format!("grid: {e}")));
        let region = g.region(1, 1, 2, 2);
        let vals: Vec<f64> = region.values().collect();
        assert_eq!(vals, vec![5.0, 6.0, 9.0, 10.0]);
        assert_eq!(region.origin(), (1, 1));
    }

    #[test]
    fn test_region_clips_to_grid_bounds() {
        let g = Grid::filled(5, 5, 0.0).unwrap_or_else(|e| std::panic::panic_any(format!("grid: {e}")));
        let region = g.region(3, 3, 8, 8);
        assert_eq!(region.height(), 2);
        assert_eq!(region.width(), 2);
    }

    #[test]
    fn test_tiles_cover_grid_in_row_major_order() {
        let g = Grid::filled(16, 16, 0.5).unwrap_or_else(|e| std::panic::panic_any(format!("grid: {e}")));
        let origins: Vec<(usize, usize)> = g.tiles(8).map(|t| t.origin()).collect();
        assert_eq!(origins, vec![(0, 0), (0, 8), (8, 0), (8, 8)]);
    }

    #[test]
    fn test_tiles_boundary_tiles_are_smaller() {
        // 10×12 with edge 8: tiles at (0,0) 8×8, (0,8) 8×4, (8,0) 2×8, (8,8) 2×4
        let g = Grid::filled(10, 12, 1.0).unwrap_or_else(|e| std::panic::panic_any(format!("grid: {e}")));
        let tiles: Vec<_> = g.tiles(8).collect();
        assert_eq!(tiles.len(), 4);
        assert_eq!((tiles[1].height(), tiles[1].width()), (8, 4));
        assert_eq!((tiles[2].height(), tiles[2].width()), (2, 8));
        assert_eq!((tiles[3].height(), tiles[3].width()), (2, 4));
    }

    #[test]
    fn test_tiles_zero_edge_yields_nothing() {
        let g = Grid::filled(4, 4, 0.0).unwrap_or_else(|e| std::panic::panic_any(format!("grid: {e}")));
        assert_eq!(g.tiles(0).count(), 0);
    }

    #[test]
    fn test_tiles_smaller_grid_than_edge_is_one_tile() {
        let g = Grid::filled(3, 5, 0.0).unwrap_or_else(|e| std::panic::panic_any(format!("grid: {e}")));
        let tiles: Vec<_> = g.tiles(8).collect();
        assert_eq!(tiles.len(), 1);
        assert_eq!((tiles[0].height(), tiles[0].width()), (3, 5));
    }

    #[test]
    fn test_row_values_iterates_single_row() {
        let g = Grid::from_fn(3, 3, |r, c| (r * 3 + c) as f64)
            .unwrap_or_else(|e| std::panic::panic_any(format!("grid: {e}")));
        let row: Vec<f64> = g.full_region().row_values(1).collect();
        assert_eq!(row, vec![3.0, 4.0, 5.0]);
        assert_eq!(g.full_region().row_values(5).count(), 0);
    }
}
