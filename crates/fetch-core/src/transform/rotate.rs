//! Nearest-neighbour rotation about the grid centre.
//!
//! Only nearest-neighbour sampling is offered. Blending water (-1) with
//! obstruction (NaN) cells would produce values that are neither, and the
//! scan relies on every cell being exactly one of the two.

use crate::types::{normalize_bearing, Grid};

/// Rotate `grid` by `angle_degrees` about its centre, keeping its shape.
///
/// Destination cells whose source lies outside the input take `fill`.
/// Positive angles follow the row/column convention
/// `src = R(θ) · (dst - centre) + centre` with `R = [[cos, sin], [-sin, cos]]`.
pub fn rotate(grid: &Grid, angle_degrees: f64, fill: f32) -> Grid {
    let angle = normalize_bearing(angle_degrees);
    if angle == 0.0 {
        return grid.clone();
    }

    let (rows, cols) = grid.shape();
    let (sin, cos) = sin_cos_degrees(angle);
    let centre_row = (rows as f64 - 1.0) / 2.0;
    let centre_col = (cols as f64 - 1.0) / 2.0;

    let mut data = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        let dr = row as f64 - centre_row;
        for col in 0..cols {
            let dc = col as f64 - centre_col;
            let src_row = cos * dr + sin * dc + centre_row;
            let src_col = -sin * dr + cos * dc + centre_col;
            data.push(nearest_sample(grid, src_row, src_col).unwrap_or(fill));
        }
    }

    grid.with_data(data)
}

/// Value of the cell nearest to fractional position `(row, col)`.
///
/// Halves round up. Returns `None` outside the grid.
pub fn nearest_sample(grid: &Grid, row: f64, col: f64) -> Option<f32> {
    let row = (row + 0.5).floor();
    let col = (col + 0.5).floor();
    if row < 0.0 || col < 0.0 {
        return None;
    }
    grid.get(row as usize, col as usize)
}

/// Sine and cosine of an angle in `[0, 360)` degrees, exact at quarter turns.
fn sin_cos_degrees(angle: f64) -> (f64, f64) {
    if angle == 90.0 {
        (1.0, 0.0)
    } else if angle == 180.0 {
        (0.0, -1.0)
    } else if angle == 270.0 {
        (-1.0, 0.0)
    } else {
        angle.to_radians().sin_cos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{pad, required_pad};

    fn numbered(rows: usize, cols: usize) -> Grid {
        let data = (0..rows * cols).map(|i| i as f32).collect();
        Grid::new(data, rows, cols, 1.0).unwrap()
    }

    #[test]
    fn test_zero_and_full_turn_are_identity() {
        let grid = numbered(4, 6);
        assert_eq!(rotate(&grid, 0.0, f32::NAN), grid);
        assert_eq!(rotate(&grid, 360.0, f32::NAN), grid);
        assert_eq!(rotate(&grid, -360.0, f32::NAN), grid);
    }

    #[test]
    fn test_half_turn_reverses_rows_and_cols() {
        let grid = numbered(3, 4);
        let rotated = rotate(&grid, 180.0, f32::NAN);
        for row in 0..3 {
            for col in 0..4 {
                assert_eq!(rotated.get(row, col), grid.get(2 - row, 3 - col));
            }
        }
    }

    #[test]
    fn test_quarter_turn_on_square_grid() {
        let grid = numbered(3, 3);
        let rotated = rotate(&grid, 90.0, f32::NAN);
        // dst (r, c) reads src (c, 2 - r)
        assert_eq!(rotated.get(0, 0), grid.get(0, 2));
        assert_eq!(rotated.get(0, 2), grid.get(2, 2));
        assert_eq!(rotated.get(2, 0), grid.get(0, 0));
        assert_eq!(rotated.get(1, 1), grid.get(1, 1));
    }

    #[test]
    fn test_quarter_turn_round_trips() {
        let grid = numbered(7, 7);
        for &angle in &[90.0, 180.0, 270.0] {
            let forward = rotate(&grid, angle, f32::NAN);
            let back = rotate(&forward, 360.0 - angle, f32::NAN);
            assert_eq!(back, grid, "round trip failed for {}", angle);
        }
    }

    #[test]
    fn test_centre_cell_is_fixed() {
        let mut data = vec![f32::NAN; 81];
        data[40] = -1.0;
        let grid = Grid::new(data, 9, 9, 1.0).unwrap();
        for step in 0..24 {
            let rotated = rotate(&grid, step as f64 * 15.0, f32::NAN);
            assert_eq!(rotated.get(4, 4), Some(-1.0));
        }
    }

    #[test]
    fn test_padding_keeps_rotated_cells_off_the_border() {
        let grid = Grid::filled(6, 4, 1.0, -1.0).unwrap();
        let pad_cells = required_pad(6, 4, 1.0);
        let padded = pad(&grid, pad_cells, f32::NAN);
        let (rows, cols) = padded.shape();

        for &angle in &[30.0, 45.0, 60.0, 135.0, 200.0, 315.0] {
            let rotated = rotate(&padded, angle, f32::NAN);
            for col in 0..cols {
                assert!(rotated.get(0, col).unwrap().is_nan());
                assert!(rotated.get(rows - 1, col).unwrap().is_nan());
            }
            for row in 0..rows {
                assert!(rotated.get(row, 0).unwrap().is_nan());
                assert!(rotated.get(row, cols - 1).unwrap().is_nan());
            }
            assert!(rotated.data().iter().any(|&v| v == -1.0));
        }
    }

    #[test]
    fn test_fill_used_outside_source() {
        let grid = Grid::filled(2, 6, 1.0, 1.0).unwrap();
        let rotated = rotate(&grid, 90.0, -5.0);
        assert!(rotated.data().iter().any(|&v| v == -5.0));
    }

    #[test]
    fn test_nearest_sample_rounding() {
        let grid = numbered(3, 3);
        assert_eq!(nearest_sample(&grid, 0.4, 0.4), Some(0.0));
        assert_eq!(nearest_sample(&grid, 0.5, 0.5), Some(4.0));
        assert_eq!(nearest_sample(&grid, -0.4, 2.2), Some(2.0));
        assert_eq!(nearest_sample(&grid, -0.6, 0.0), None);
        assert_eq!(nearest_sample(&grid, 2.6, 0.0), None);
    }
}
