//! Fetch along a single bearing.
//!
//! ```text
//! mask ─► pad(NaN) ─► rotate(θ, NaN) ─► scan ─► rotate(360-θ, -res) ─► unpad ─► fetch
//! ```

use tracing::debug;

use crate::error::{FetchError, Result};
use crate::scan::ScanMethod;
use crate::transform::{pad, required_pad, rotate, unpad};
use crate::types::{normalize_bearing, Grid, LandWaterMask, NO_DATA};

/// Compute the fetch grid for one bearing, in the mask's coordinate frame.
///
/// Pure: reads `mask` only and allocates its own output, so it may run
/// concurrently for any number of bearings.
pub fn fetch_single_direction(
    mask: &LandWaterMask,
    bearing: f64,
    method: ScanMethod,
) -> Result<Grid> {
    let bearing = normalize_bearing(bearing);
    let (rows, cols) = mask.shape();
    let resolution = mask.resolution();
    let pad_cells = required_pad(rows, cols, resolution);

    debug!(bearing, pad_cells, %method, "Computing single-direction fetch");

    let padded = pad(mask.grid(), pad_cells, NO_DATA);
    let rotated = rotate(&padded, bearing, NO_DATA);
    let scanned = method.scan(&rotated);
    let restored = rotate(&scanned, 360.0 - bearing, -resolution as f32);
    let fetch = unpad(&restored, pad_cells)?;

    if fetch.shape() != (rows, cols) {
        return Err(FetchError::shape_mismatch((rows, cols), fetch.shape()));
    }

    Ok(fetch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WATER;

    const L: f32 = f32::NAN;
    const W: f32 = WATER;

    fn top_row_land(res: f64) -> LandWaterMask {
        let mut rows = vec![vec![L; 5]];
        rows.extend((0..4).map(|_| vec![W; 5]));
        let grid = Grid::from_rows(&rows, res).unwrap();
        LandWaterMask::from_classification(&grid.map(|v| if v.is_nan() { 0.0 } else { 1.0 }), 1.0)
    }

    #[test]
    fn test_bearing_zero_counts_down_columns() {
        let mask = top_row_land(10.0);
        for method in [ScanMethod::Direct, ScanMethod::Cumulative] {
            let fetch = fetch_single_direction(&mask, 0.0, method).unwrap();
            assert_eq!(fetch.shape(), (5, 5));
            for col in 0..5 {
                let column: Vec<f32> = (0..5).map(|r| fetch.get(r, col).unwrap()).collect();
                assert_eq!(column, vec![0.0, 10.0, 20.0, 30.0, 40.0]);
            }
        }
    }

    #[test]
    fn test_half_turn_reverses_column() {
        let grid = Grid::from_rows(&[vec![0.0], vec![1.0], vec![1.0], vec![1.0], vec![0.0]], 10.0)
            .unwrap();
        let mask = LandWaterMask::from_classification(&grid, 1.0);

        let north = fetch_single_direction(&mask, 0.0, ScanMethod::Cumulative).unwrap();
        let south = fetch_single_direction(&mask, 180.0, ScanMethod::Cumulative).unwrap();

        assert_eq!(north.data(), &[0.0, 10.0, 20.0, 30.0, 0.0]);
        assert_eq!(south.data(), &[0.0, 30.0, 20.0, 10.0, 0.0]);
    }

    #[test]
    fn test_quarter_turns_on_square_lake() {
        // 3x3 water surrounded by a ring of land.
        let mut rows = vec![vec![0.0; 5]];
        rows.extend((0..3).map(|_| vec![0.0, 1.0, 1.0, 1.0, 0.0]));
        rows.push(vec![0.0; 5]);
        let mask = LandWaterMask::from_classification(&Grid::from_rows(&rows, 1.0).unwrap(), 1.0);

        let fetches: Vec<Grid> = [0.0, 90.0, 180.0, 270.0]
            .iter()
            .map(|&b| fetch_single_direction(&mask, b, ScanMethod::Direct).unwrap())
            .collect();

        // Every quarter turn sees runs of 1, 2, 3 across the lake.
        for fetch in &fetches {
            let mut water: Vec<f32> = (1..4)
                .flat_map(|r| (1..4).map(move |c| (r, c)))
                .map(|(r, c)| fetch.get(r, c).unwrap())
                .collect();
            water.sort_by(|a, b| a.partial_cmp(b).unwrap());
            assert_eq!(water, vec![1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 3.0, 3.0, 3.0]);
        }
        assert_eq!(fetches[0].get(3, 2), Some(3.0));
        assert_eq!(fetches[2].get(1, 2), Some(3.0));
    }

    #[test]
    fn test_methods_agree_at_oblique_bearings() {
        let rows: Vec<Vec<f32>> = (0..12)
            .map(|r| {
                (0..9)
                    .map(|c| if (r * 3 + c * 5) % 11 == 0 { 0.0 } else { 1.0 })
                    .collect()
            })
            .collect();
        let mask = LandWaterMask::from_classification(&Grid::from_rows(&rows, 5.0).unwrap(), 1.0);

        for &bearing in &[17.0, 45.0, 133.0, 250.0] {
            let direct = fetch_single_direction(&mask, bearing, ScanMethod::Direct).unwrap();
            let cumulative =
                fetch_single_direction(&mask, bearing, ScanMethod::Cumulative).unwrap();
            for (a, b) in direct.data().iter().zip(cumulative.data()) {
                assert!(a.is_nan() == b.is_nan());
                if !a.is_nan() {
                    assert!((a - b).abs() < 1e-3);
                }
            }
        }
    }

    #[test]
    fn test_water_cells_are_never_unset() {
        let grid = Grid::filled(6, 8, 2.0, 1.0).unwrap();
        let mask = LandWaterMask::from_classification(&grid, 1.0);
        for step in 0..12 {
            let fetch =
                fetch_single_direction(&mask, step as f64 * 30.0, ScanMethod::Cumulative).unwrap();
            assert!(fetch.data().iter().all(|v| v.is_finite()));
        }
    }
}
