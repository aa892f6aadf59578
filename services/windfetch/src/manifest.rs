//! JSON sidecar describing the bands written by `windfetch fetch`.

use std::path::{Path, PathBuf};

use fetch_core::{FetchField, MinorDirections, Statistic, Weights};
use serde::Serialize;

use crate::ascii_grid::{AsciiGrid, Origin};

#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub input: PathBuf,
    pub rows: usize,
    pub cols: usize,
    pub resolution: f64,
    pub origin: Origin,
    pub nodata: f32,
    pub directions: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minor: Option<MinorDirections>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weights: Option<Weights>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub statistics: Vec<Statistic>,
    pub bands: Vec<BandInfo>,
}

/// One written band file.
#[derive(Debug, Clone, Serialize)]
pub struct BandInfo {
    pub label: String,
    pub file: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistic: Option<Statistic>,
}

impl BandInfo {
    pub fn direction(file: &Path, label: String, bearing: f64) -> Self {
        Self {
            label,
            file: file.to_path_buf(),
            direction: Some(bearing),
            statistic: None,
        }
    }

    pub fn statistic(file: &Path, label: String, stat: Statistic) -> Self {
        Self {
            label,
            file: file.to_path_buf(),
            direction: None,
            statistic: Some(stat),
        }
    }
}

impl Manifest {
    /// Manifest for `field` computed from `source`, with no bands yet.
    pub fn new(input: &Path, source: &AsciiGrid, field: &FetchField, nodata: f32) -> Self {
        let (rows, cols) = field.shape();
        Self {
            input: input.to_path_buf(),
            rows,
            cols,
            resolution: field.resolution(),
            origin: source.header.origin,
            nodata,
            directions: field.directions().to_vec(),
            minor: field.minor(),
            weights: field.weights().cloned(),
            statistics: Vec::new(),
            bands: Vec::new(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn write(&self, path: &Path) -> anyhow::Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
