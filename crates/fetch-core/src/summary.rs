//! Cross-direction summary statistics.
//!
//! Each statistic collapses the direction axis of a [`FetchField`] cell by
//! cell, over the cells that are not NaN. A cell that is NaN in every layer
//! stays NaN.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FetchError, Result};
use crate::types::{FetchField, Grid};

/// A cell-wise reduction across directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Statistic {
    Mean,
    Min,
    Max,
    Median,
    /// Population standard deviation.
    Std,
    /// Population variance.
    Var,
    /// `max - min`.
    Range,
}

impl Statistic {
    pub const ALL: [Statistic; 7] = [
        Self::Mean,
        Self::Min,
        Self::Max,
        Self::Median,
        Self::Std,
        Self::Var,
        Self::Range,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Min => "min",
            Self::Max => "max",
            Self::Median => "median",
            Self::Std => "std",
            Self::Var => "var",
            Self::Range => "range",
        }
    }

    /// Parse a comma-separated list such as `"min,mean,max"`.
    pub fn parse_list(s: &str) -> Result<Vec<Statistic>> {
        s.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::parse)
            .collect()
    }

    /// Reduce the valid values of one cell. `values` must be non-empty.
    fn reduce(&self, values: &mut [f64]) -> f64 {
        let n = values.len() as f64;
        match self {
            Self::Mean => values.iter().sum::<f64>() / n,
            Self::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            Self::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Self::Median => {
                values.sort_by(|a, b| a.total_cmp(b));
                let mid = values.len() / 2;
                if values.len() % 2 == 0 {
                    (values[mid - 1] + values[mid]) / 2.0
                } else {
                    values[mid]
                }
            }
            Self::Std => Self::Var.reduce(values).sqrt(),
            Self::Var => {
                let mean = Self::Mean.reduce(values);
                values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
            }
            Self::Range => Self::Max.reduce(values) - Self::Min.reduce(values),
        }
    }
}

impl FromStr for Statistic {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "mean" => Ok(Self::Mean),
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            "median" => Ok(Self::Median),
            "std" => Ok(Self::Std),
            "var" => Ok(Self::Var),
            "range" => Ok(Self::Range),
            _ => Err(FetchError::UnknownStatistic(s.to_string())),
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stack of statistic grids, one per requested statistic.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryField {
    layers: Vec<Grid>,
    stats: Vec<Statistic>,
}

impl SummaryField {
    pub fn layers(&self) -> &[Grid] {
        &self.layers
    }

    /// Statistics in layer order.
    pub fn stats(&self) -> &[Statistic] {
        &self.stats
    }

    /// Layer for `stat`, if it was requested.
    pub fn get(&self, stat: Statistic) -> Option<&Grid> {
        self.stats
            .iter()
            .position(|&s| s == stat)
            .map(|i| &self.layers[i])
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn into_layers(self) -> Vec<Grid> {
        self.layers
    }
}

impl FetchField {
    /// Reduce the direction axis with each of `stats`, in order.
    pub fn summary(&self, stats: &[Statistic]) -> Result<SummaryField> {
        summarize(&self.layers, stats)
    }

    /// Like [`FetchField::summary`], with statistics given by name.
    pub fn summary_by_name<S: AsRef<str>>(&self, names: &[S]) -> Result<SummaryField> {
        let stats = names
            .iter()
            .map(|n| n.as_ref().parse())
            .collect::<Result<Vec<Statistic>>>()?;
        self.summary(&stats)
    }
}

/// Reduce a stack of equally shaped grids cell by cell.
pub fn summarize(layers: &[Grid], stats: &[Statistic]) -> Result<SummaryField> {
    let first = layers.first().ok_or(FetchError::EmptyField)?;
    if stats.is_empty() {
        return Err(FetchError::EmptyStatistics);
    }
    for layer in layers {
        first.ensure_same_shape(layer)?;
    }

    debug!(layers = layers.len(), stats = stats.len(), "Summarizing fetch");

    let cells = first.len();
    let mut outputs: Vec<Vec<f32>> = stats.iter().map(|_| Vec::with_capacity(cells)).collect();
    let mut values = Vec::with_capacity(layers.len());

    for cell in 0..cells {
        values.clear();
        values.extend(
            layers
                .iter()
                .map(|layer| layer.data()[cell])
                .filter(|v| !v.is_nan())
                .map(f64::from),
        );

        for (stat, output) in stats.iter().zip(outputs.iter_mut()) {
            let value = if values.is_empty() {
                f32::NAN
            } else {
                stat.reduce(&mut values) as f32
            };
            output.push(value);
        }
    }

    Ok(SummaryField {
        layers: outputs.into_iter().map(|data| first.with_data(data)).collect(),
        stats: stats.to_vec(),
    })
}
