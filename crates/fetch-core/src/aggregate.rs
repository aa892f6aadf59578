//! Multi-direction fetch: fan out single-bearing pipelines on a worker pool,
//! average minor directions, weight, and mask to water.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::FetchConfig;
use crate::error::{FetchError, Result};
use crate::pipeline::fetch_single_direction;
use crate::types::{FetchField, Grid, LandWaterMask, MinorDirections, Weights};

/// Parameters of a multi-direction fetch request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FetchRequest {
    /// Bearings in degrees; output layers follow this order.
    pub directions: Vec<f64>,
    /// Optional weight per bearing.
    #[serde(default)]
    pub weights: Option<Vec<f64>>,
    /// Optional minor-direction averaging around each bearing.
    #[serde(default)]
    pub minor: Option<MinorDirections>,
}

impl FetchRequest {
    pub fn new(directions: Vec<f64>) -> Self {
        Self {
            directions,
            ..Self::default()
        }
    }

    pub fn with_weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn with_minor(mut self, minor: MinorDirections) -> Self {
        self.minor = Some(minor);
        self
    }

    /// Check every parameter before any work starts.
    ///
    /// Returns the normalized weights when weights were supplied.
    pub fn validate(&self) -> Result<Option<Weights>> {
        if self.directions.is_empty() {
            return Err(FetchError::EmptyDirections);
        }
        if let Some(minor) = &self.minor {
            minor.validate()?;
        }
        self.weights
            .as_deref()
            .map(|weights| {
                check_weight_count(self.directions.len(), weights)?;
                Weights::normalize(weights)
            })
            .transpose()
    }

    /// Every bearing the pipeline must run, grouped by major bearing.
    fn expanded_bearings(&self) -> Vec<f64> {
        match &self.minor {
            Some(minor) => self
                .directions
                .iter()
                .flat_map(|&d| minor.offsets(d))
                .collect(),
            None => self.directions.clone(),
        }
    }
}

fn check_weight_count(directions: usize, weights: &[f64]) -> Result<()> {
    if weights.len() != directions {
        return Err(FetchError::DirectionCountMismatch {
            directions,
            weights: weights.len(),
        });
    }
    Ok(())
}

/// Runs fetch requests on a bounded worker pool.
#[derive(Debug)]
pub struct FetchEngine {
    config: FetchConfig,
    pool: ThreadPool,
}

impl FetchEngine {
    /// Build an engine and its worker pool.
    pub fn new(config: FetchConfig) -> Result<Self> {
        config.validate()?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.max_workers)
            .thread_name(|i| format!("fetch-worker-{}", i))
            .build()?;

        debug!(
            workers = pool.current_num_threads(),
            scan_method = %config.scan_method,
            "Fetch engine ready"
        );

        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Number of worker threads in the pool.
    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Compute a fetch field for every bearing in `request`.
    ///
    /// Layers are averaged over minor directions when requested, weighted
    /// when weights are given, and finally masked so land cells read 0.
    pub fn fetch(&self, mask: &LandWaterMask, request: &FetchRequest) -> Result<FetchField> {
        let weights = request.validate()?;
        let bearings = request.expanded_bearings();
        let method = self.config.scan_method;

        info!(
            directions = request.directions.len(),
            pipelines = bearings.len(),
            weighted = weights.is_some(),
            "Calculating fetch"
        );

        let grids: Vec<Grid> = self.pool.install(|| {
            bearings
                .par_iter()
                .map(|&bearing| fetch_single_direction(mask, bearing, method))
                .collect::<Result<Vec<_>>>()
        })?;

        let layers = match &request.minor {
            Some(minor) => grids
                .chunks(minor.count)
                .map(mean_of_layers)
                .collect::<Result<Vec<_>>>()?,
            None => grids,
        };

        let mut field = FetchField::new(layers, request.directions.clone())?;
        field.minor = request.minor;

        let field = match weights {
            Some(weights) => field.apply_weights(weights),
            None => field,
        };

        field.masked(mask)
    }
}

impl FetchField {
    /// Multiply each layer by its normalized weight.
    pub fn weighted(&self, weights: &[f64]) -> Result<FetchField> {
        check_weight_count(self.len(), weights)?;
        let weights = Weights::normalize(weights)?;
        Ok(self.clone().apply_weights(weights))
    }

    fn apply_weights(self, weights: Weights) -> FetchField {
        let layers = self
            .layers
            .iter()
            .zip(&weights.normalized)
            .map(|(layer, &w)| layer.map(|v| (v as f64 * w) as f32))
            .collect();

        FetchField {
            layers,
            weights: Some(weights),
            ..self
        }
    }

    /// Keep values on water cells and set land cells to 0.
    pub fn masked(&self, mask: &LandWaterMask) -> Result<FetchField> {
        self.masked_with_fill(mask, None)
    }

    /// Like [`FetchField::masked`], but NaN cells on water take `fill` first.
    pub fn masked_with_fill(&self, mask: &LandWaterMask, fill: Option<f32>) -> Result<FetchField> {
        let mask_grid = mask.grid();
        let layers = self
            .layers
            .iter()
            .map(|layer| {
                layer.ensure_same_shape(mask_grid)?;
                let data = layer
                    .data()
                    .iter()
                    .zip(mask_grid.data())
                    .map(|(&v, &m)| {
                        if m.is_nan() {
                            0.0
                        } else if v.is_nan() {
                            fill.unwrap_or(v)
                        } else {
                            v
                        }
                    })
                    .collect();
                Ok(layer.with_data(data))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(FetchField {
            layers,
            directions: self.directions.clone(),
            minor: self.minor,
            weights: self.weights.clone(),
        })
    }

    /// Sum all layers cell-wise into one grid.
    ///
    /// On a weighted field this is the weighted mean fetch.
    pub fn weighted_total(&self) -> Grid {
        let first = &self.layers[0];
        let mut total = vec![0.0f64; first.len()];
        for layer in &self.layers {
            for (acc, &v) in total.iter_mut().zip(layer.data()) {
                *acc += v as f64;
            }
        }
        first.with_data(total.into_iter().map(|v| v as f32).collect())
    }
}

/// Cell-wise arithmetic mean of equally shaped grids.
fn mean_of_layers(layers: &[Grid]) -> Result<Grid> {
    let first = layers.first().ok_or(FetchError::EmptyField)?;
    let mut sum = vec![0.0f64; first.len()];
    for layer in layers {
        first.ensure_same_shape(layer)?;
        for (acc, &v) in sum.iter_mut().zip(layer.data()) {
            *acc += v as f64;
        }
    }
    let n = layers.len() as f64;
    Ok(first.with_data(sum.into_iter().map(|v| (v / n) as f32).collect()))
}
