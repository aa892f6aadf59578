//! Directional distance scan.
//!
//! The scan runs down each column of a land/water grid (top row first) and
//! records, for every water cell, the distance travelled since the last
//! obstruction above it. Obstructions record 0. Water cells with no
//! obstruction above them in their column stay unset ([`NO_DATA`]); the
//! padding applied by the pipeline guarantees such cells never reach the
//! output.
//!
//! Two realizations are provided and agree on every input:
//!
//! - [`scan_direct`] walks each column with an explicit accumulator.
//! - [`scan_cumulative`] decodes the whole grid from a single running sum,
//!   with no per-column state machine.

use serde::{Deserialize, Serialize};

use crate::types::{Grid, NO_DATA};

/// Realization of the directional distance scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMethod {
    /// Explicit per-column accumulator.
    Direct,
    /// Closed-form decode from a cumulative sum over the column-major grid.
    #[default]
    Cumulative,
}

impl ScanMethod {
    /// Parse from string (case-insensitive). Unknown names fall back to
    /// [`ScanMethod::Cumulative`].
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "direct" | "scalar" => Self::Direct,
            _ => Self::Cumulative,
        }
    }

    /// Run the scan with this realization.
    pub fn scan(self, grid: &Grid) -> Grid {
        match self {
            Self::Direct => scan_direct(grid),
            Self::Cumulative => scan_cumulative(grid),
        }
    }
}

impl std::fmt::Display for ScanMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Cumulative => write!(f, "cumulative"),
        }
    }
}

/// Scan with one accumulator per column.
pub fn scan_direct(grid: &Grid) -> Grid {
    let cols = grid.cols();
    let resolution = grid.resolution();

    // NaN marks a column that has not met an obstruction yet.
    let mut fetch = vec![f64::NAN; cols];
    let mut output = Vec::with_capacity(grid.len());

    for row in grid.data().chunks_exact(cols) {
        for (acc, &cell) in fetch.iter_mut().zip(row) {
            if cell.is_nan() {
                *acc = 0.0;
            } else if *acc >= 0.0 {
                *acc += resolution;
            }
            output.push(*acc as f32);
        }
    }

    grid.with_data(output)
}

/// Scan by decoding a cumulative sum over the column-major cell sequence.
///
/// Water cells contribute `+1`. Each obstruction contributes minus the number
/// of water cells since the previous obstruction, which is the difference of
/// the running water count at consecutive obstructions. The running sum of
/// that sequence is therefore the length of the current water run, and is 0
/// on obstructions.
pub fn scan_cumulative(grid: &Grid) -> Grid {
    let (rows, cols) = grid.shape();
    let resolution = grid.resolution();
    let data = grid.data();

    let column_major = (0..cols).flat_map(|col| (0..rows).map(move |row| data[row * cols + col]));

    let mut water_count = 0u64;
    let mut count_at_last_obstruction = 0u64;
    let steps = column_major.map(|cell| {
        if cell.is_nan() {
            let run = water_count - count_at_last_obstruction;
            count_at_last_obstruction = water_count;
            (true, -(run as f64))
        } else {
            water_count += 1;
            (false, 1.0)
        }
    });

    let mut output = vec![NO_DATA; rows * cols];
    let mut running = 0.0f64;
    let mut last_obstruction: Option<usize> = None;

    for (index, (is_obstruction, step)) in steps.enumerate() {
        running += step;
        if is_obstruction {
            last_obstruction = Some(index);
        }

        let col = index / rows;
        let row = index % rows;
        let column_start = col * rows;
        let reset_in_column = last_obstruction.is_some_and(|last| last >= column_start);

        output[row * cols + col] = if reset_in_column {
            (running * resolution) as f32
        } else {
            NO_DATA
        };
    }

    grid.with_data(output)
}
