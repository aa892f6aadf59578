//! Symmetric constant padding and its inverse crop.

use crate::error::{FetchError, Result};
use crate::types::Grid;

/// Number of cells to pad on each side so that a rotation about the grid
/// centre by any angle keeps every original cell inside the padded bounds.
///
/// This is the half-diagonal excess over the shorter side, rounded up, plus
/// one cell of slack for nearest-neighbour rounding.
pub fn required_pad(rows: usize, cols: usize, resolution: f64) -> usize {
    let xlen = resolution * cols as f64;
    let ylen = resolution * rows as f64;
    let excess = xlen.hypot(ylen) - xlen.min(ylen);

    (excess / (2.0 * resolution)).ceil() as usize + 1
}

/// Pad `grid` with `pad_cells` cells of `fill` on all four sides.
pub fn pad(grid: &Grid, pad_cells: usize, fill: f32) -> Grid {
    let (rows, cols) = grid.shape();
    let new_rows = rows + 2 * pad_cells;
    let new_cols = cols + 2 * pad_cells;

    let mut data = vec![fill; new_rows * new_cols];
    for (row, values) in grid.data().chunks_exact(cols).enumerate() {
        let start = (row + pad_cells) * new_cols + pad_cells;
        data[start..start + cols].copy_from_slice(values);
    }

    grid.reshaped(data, new_rows, new_cols)
}

/// Remove `pad_cells` cells from all four sides of `grid`.
pub fn unpad(grid: &Grid, pad_cells: usize) -> Result<Grid> {
    let (rows, cols) = grid.shape();
    if rows <= 2 * pad_cells || cols <= 2 * pad_cells {
        return Err(FetchError::shape_mismatch(
            (2 * pad_cells + 1, 2 * pad_cells + 1),
            (rows, cols),
        ));
    }

    let new_rows = rows - 2 * pad_cells;
    let new_cols = cols - 2 * pad_cells;

    let data: Vec<f32> = grid
        .data()
        .chunks_exact(cols)
        .skip(pad_cells)
        .take(new_rows)
        .flat_map(|row| row[pad_cells..pad_cells + new_cols].iter().copied())
        .collect();

    Ok(grid.reshaped(data, new_rows, new_cols))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_pad() {
        // 5x5 at 10 m: diagonal 70.71, excess 20.71 -> ceil(1.04) + 1
        assert_eq!(required_pad(5, 5, 10.0), 3);
        // 5 rows x 1 col: diagonal 50.99, excess 40.99 -> ceil(2.05) + 1
        assert_eq!(required_pad(5, 1, 10.0), 4);
        assert_eq!(required_pad(1, 1, 1.0), 2);
        assert_eq!(required_pad(6, 4, 1.0), 3);
    }

    #[test]
    fn test_required_pad_independent_of_resolution() {
        for &res in &[0.5, 1.0, 5.0, 25.0] {
            assert_eq!(required_pad(40, 17, res), required_pad(40, 17, 1.0));
        }
    }

    #[test]
    fn test_pad_places_grid_in_centre() {
        let grid = Grid::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]], 1.0).unwrap();
        let padded = pad(&grid, 2, -7.0);

        assert_eq!(padded.shape(), (6, 7));
        assert_eq!(padded.get(0, 0), Some(-7.0));
        assert_eq!(padded.get(2, 2), Some(1.0));
        assert_eq!(padded.get(2, 4), Some(3.0));
        assert_eq!(padded.get(3, 3), Some(5.0));
        assert_eq!(padded.get(3, 5), Some(-7.0));
        assert_eq!(padded.get(5, 6), Some(-7.0));
        assert_eq!(padded.resolution(), 1.0);
    }

    #[test]
    fn test_unpad_inverts_pad() {
        let grid = Grid::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]], 1.0).unwrap();
        for pad_cells in 0..4 {
            let restored = unpad(&pad(&grid, pad_cells, f32::NAN), pad_cells).unwrap();
            assert_eq!(restored, grid);
        }
    }

    #[test]
    fn test_unpad_too_small() {
        let grid = Grid::filled(4, 6, 1.0, 0.0).unwrap();
        assert!(matches!(
            unpad(&grid, 2),
            Err(FetchError::ShapeMismatch { .. })
        ));
        assert_eq!(unpad(&grid, 1).unwrap().shape(), (2, 4));
    }
}
