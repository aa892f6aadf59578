//! Synthetic land/water classifications.
//!
//! All generators return row-major `Vec<f32>` grids holding
//! [`WATER_ID`](crate::WATER_ID) for water and [`LAND_ID`](crate::LAND_ID)
//! for land, row 0 first.

use crate::fixtures::{LAND_ID, WATER_ID};

/// A rectangular lake with a one-cell land border.
///
/// ```
/// use test_utils::{create_rect_lake, WATER_ID, LAND_ID};
///
/// let grid = create_rect_lake(4, 3);
/// assert_eq!(grid.len(), 12);
/// assert_eq!(grid[0], LAND_ID);
/// assert_eq!(grid[4], WATER_ID); // row 1, col 1
/// ```
pub fn create_rect_lake(rows: usize, cols: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            let border = row == 0 || col == 0 || row + 1 == rows || col + 1 == cols;
            data.push(if border { LAND_ID } else { WATER_ID });
        }
    }
    data
}

/// An elliptical lake centred in the grid, touching no edge.
pub fn create_elliptical_lake(rows: usize, cols: usize) -> Vec<f32> {
    let centre_row = (rows as f32 - 1.0) / 2.0;
    let centre_col = (cols as f32 - 1.0) / 2.0;
    let semi_rows = (rows as f32 / 2.0 - 1.0).max(0.5);
    let semi_cols = (cols as f32 / 2.0 - 1.0).max(0.5);

    let mut data = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            let dy = (row as f32 - centre_row) / semi_rows;
            let dx = (col as f32 - centre_col) / semi_cols;
            data.push(if dx * dx + dy * dy < 1.0 { WATER_ID } else { LAND_ID });
        }
    }
    data
}

/// A rectangular lake with a square island of `island` cells at its centre.
pub fn create_island_lake(rows: usize, cols: usize, island: usize) -> Vec<f32> {
    let mut data = create_rect_lake(rows, cols);
    let top = rows.saturating_sub(island) / 2;
    let left = cols.saturating_sub(island) / 2;
    for row in top..(top + island).min(rows) {
        for col in left..(left + island).min(cols) {
            data[row * cols + col] = LAND_ID;
        }
    }
    data
}

/// A grid where only column `channel_col` is water, between land rows 0 and
/// `rows - 1`.
pub fn create_channel(rows: usize, cols: usize, channel_col: usize) -> Vec<f32> {
    let mut data = vec![LAND_ID; rows * cols];
    for row in 1..rows.saturating_sub(1) {
        data[row * cols + channel_col] = WATER_ID;
    }
    data
}

/// Scattered land cells over water, about one in `every`.
///
/// Simple deterministic pseudo-random.
pub fn create_scattered_land(rows: usize, cols: usize, every: u32, seed: u32) -> Vec<f32> {
    let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
    (0..rows * cols)
        .map(|_| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            if (state >> 16) % every.max(1) == 0 {
                LAND_ID
            } else {
                WATER_ID
            }
        })
        .collect()
}

/// Counts cells equal to [`WATER_ID`].
pub fn count_water(data: &[f32]) -> usize {
    data.iter().filter(|&&v| v == WATER_ID).count()
}
