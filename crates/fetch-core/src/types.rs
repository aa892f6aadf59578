//! Core grid types: classification grids, land/water masks and fetch stacks.

use serde::{Deserialize, Serialize};

use crate::error::{FetchError, Result};

/// Sentinel for land, obstructions and out-of-frame padding.
pub const NO_DATA: f32 = f32::NAN;

/// Value of a traversable (water) cell in a land/water mask.
pub const WATER: f32 = -1.0;

/// A rectangular grid of `f32` values with a square cell size.
///
/// Values are stored row-major, top row first. A grid never changes after
/// construction; every transformation returns a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    data: Vec<f32>,
    rows: usize,
    cols: usize,
    resolution: f64,
}

impl Grid {
    /// Create a grid from row-major data.
    pub fn new(data: Vec<f32>, rows: usize, cols: usize, resolution: f64) -> Result<Self> {
        validate_resolution(resolution)?;
        if rows == 0 || cols == 0 {
            return Err(FetchError::EmptyGrid);
        }
        if rows.checked_mul(cols) != Some(data.len()) {
            let actual_rows = data.len() / cols;
            return Err(FetchError::shape_mismatch((rows, cols), (actual_rows, cols)));
        }
        Ok(Self {
            data,
            rows,
            cols,
            resolution,
        })
    }

    /// Create a grid with every cell set to `value`.
    pub fn filled(rows: usize, cols: usize, resolution: f64, value: f32) -> Result<Self> {
        let cells = rows
            .checked_mul(cols)
            .ok_or(FetchError::shape_mismatch((rows, cols), (0, cols)))?;
        Self::new(vec![value; cells], rows, cols, resolution)
    }

    /// Create a grid from a list of rows. All rows must have equal length.
    pub fn from_rows(rows: &[Vec<f32>], resolution: f64) -> Result<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map(Vec::len).unwrap_or(0);
        if let Some(bad) = rows.iter().find(|r| r.len() != ncols) {
            return Err(FetchError::shape_mismatch((nrows, ncols), (nrows, bad.len())));
        }
        Self::new(rows.concat(), nrows, ncols, resolution)
    }

    /// Build a grid with the same shape and resolution as `self` but new data.
    pub(crate) fn with_data(&self, data: Vec<f32>) -> Self {
        debug_assert_eq!(data.len(), self.data.len());
        Self {
            data,
            rows: self.rows,
            cols: self.cols,
            resolution: self.resolution,
        }
    }

    /// Build a grid of a new shape sharing this grid's resolution.
    pub(crate) fn reshaped(&self, data: Vec<f32>, rows: usize, cols: usize) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        Self {
            data,
            rows,
            cols,
            resolution: self.resolution,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Real-world length of one cell edge.
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Row-major cell values.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    /// Get the value at `(row, col)`, or `None` outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get(row * self.cols + col).copied()
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false; grids are rejected at construction when empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Apply `f` to every cell, producing a new grid.
    pub fn map(&self, f: impl Fn(f32) -> f32) -> Self {
        self.with_data(self.data.iter().map(|&v| f(v)).collect())
    }

    /// Check that `other` has the same shape as `self`.
    pub(crate) fn ensure_same_shape(&self, other: &Grid) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(FetchError::shape_mismatch(self.shape(), other.shape()));
        }
        Ok(())
    }
}

pub(crate) fn validate_resolution(resolution: f64) -> Result<()> {
    if !resolution.is_finite() || resolution <= 0.0 {
        return Err(FetchError::InvalidResolution(resolution));
    }
    Ok(())
}

/// Binary land/water classification derived from a source grid.
///
/// Water cells hold [`WATER`]; everything else, including source no-data,
/// holds [`NO_DATA`] and acts as an obstruction.
#[derive(Debug, Clone, PartialEq)]
pub struct LandWaterMask {
    grid: Grid,
}

impl LandWaterMask {
    /// Classify `source`: cells equal to `water_id` are water.
    pub fn from_classification(source: &Grid, water_id: f32) -> Self {
        let grid = source.map(|v| if v == water_id { WATER } else { NO_DATA });
        Self { grid }
    }

    /// The mask as a grid of [`WATER`] / [`NO_DATA`] cells.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn shape(&self) -> (usize, usize) {
        self.grid.shape()
    }

    pub fn resolution(&self) -> f64 {
        self.grid.resolution()
    }

    pub fn is_water(&self, row: usize, col: usize) -> bool {
        self.grid.get(row, col) == Some(WATER)
    }

    /// Number of water cells.
    pub fn water_cells(&self) -> usize {
        self.grid.data().iter().filter(|v| !v.is_nan()).count()
    }
}

/// Minor-direction oversampling around each major bearing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinorDirections {
    /// Number of offset bearings averaged per major bearing.
    pub count: usize,
    /// Spacing between offset bearings, in degrees.
    pub interval: f64,
}

impl MinorDirections {
    pub fn new(count: usize, interval: f64) -> Result<Self> {
        let minor = Self { count, interval };
        minor.validate()?;
        Ok(minor)
    }

    pub fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(FetchError::invalid_minor("count must be >= 1"));
        }
        if !self.interval.is_finite() {
            return Err(FetchError::invalid_minor(format!(
                "interval must be finite, got {}",
                self.interval
            )));
        }
        Ok(())
    }

    /// Offset bearings around `bearing`, each in `[0, 360)`.
    ///
    /// The centre index is `count / 2`, so even counts lean one interval
    /// towards the lower side: count 4, interval 3 around 90 gives
    /// 84, 87, 90, 93.
    pub fn offsets(&self, bearing: f64) -> Vec<f64> {
        let mid = (self.count / 2) as f64 * self.interval;
        (0..self.count)
            .map(|i| normalize_bearing(bearing + (i as f64 * self.interval - mid)))
            .collect()
    }
}

/// Reduce a bearing into `[0, 360)`.
pub fn normalize_bearing(bearing: f64) -> f64 {
    bearing.rem_euclid(360.0)
}

/// Weights applied to a fetch field, before and after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub original: Vec<f64>,
    pub normalized: Vec<f64>,
}

impl Weights {
    /// Normalize `weights` so they sum to 1.
    pub fn normalize(weights: &[f64]) -> Result<Self> {
        let sum: f64 = weights.iter().sum();
        if !sum.is_finite() || sum == 0.0 {
            return Err(FetchError::DegenerateWeights(sum));
        }
        Ok(Self {
            original: weights.to_vec(),
            normalized: weights.iter().map(|w| w / sum).collect(),
        })
    }
}

/// Stack of fetch grids, one per requested bearing.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchField {
    pub(crate) layers: Vec<Grid>,
    pub(crate) directions: Vec<f64>,
    pub(crate) minor: Option<MinorDirections>,
    pub(crate) weights: Option<Weights>,
}

impl FetchField {
    /// Assemble a field from per-direction layers.
    ///
    /// Every layer must share one shape and there must be exactly one layer
    /// per direction.
    pub fn new(layers: Vec<Grid>, directions: Vec<f64>) -> Result<Self> {
        let first = layers.first().ok_or(FetchError::EmptyField)?;
        if layers.len() != directions.len() {
            return Err(FetchError::LayerCountMismatch {
                layers: layers.len(),
                directions: directions.len(),
            });
        }
        for layer in &layers[1..] {
            first.ensure_same_shape(layer)?;
        }
        Ok(Self {
            layers,
            directions,
            minor: None,
            weights: None,
        })
    }

    pub fn layers(&self) -> &[Grid] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> Option<&Grid> {
        self.layers.get(index)
    }

    /// Requested bearings, in layer order.
    pub fn directions(&self) -> &[f64] {
        &self.directions
    }

    /// Minor-direction settings used to build the layers, if any.
    pub fn minor(&self) -> Option<MinorDirections> {
        self.minor
    }

    /// Weights applied to the layers, if any.
    pub fn weights(&self) -> Option<&Weights> {
        self.weights.as_ref()
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.layers[0].shape()
    }

    pub fn resolution(&self) -> f64 {
        self.layers[0].resolution()
    }

    pub fn into_layers(self) -> Vec<Grid> {
        self.layers
    }
}
