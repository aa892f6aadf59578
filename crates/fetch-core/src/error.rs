//! Error types for fetch computation.

use thiserror::Error;

/// Errors that can occur while computing or summarizing fetch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Cell resolution must be finite and strictly positive.
    #[error("invalid resolution {0}: must be finite and > 0")]
    InvalidResolution(f64),

    /// A grid with zero rows or columns.
    #[error("grid must have at least one row and one column")]
    EmptyGrid,

    /// A grid stage produced (or was given) data of the wrong shape.
    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// Number of weights differs from the number of directions.
    #[error("{weights} weights supplied for {directions} directions")]
    DirectionCountMismatch { directions: usize, weights: usize },

    /// Weights cannot be normalized.
    #[error("weights sum to {0}; cannot normalize")]
    DegenerateWeights(f64),

    /// Requested statistic is not supported.
    #[error("unknown statistic '{0}' (expected one of mean, min, max, median, std, var, range)")]
    UnknownStatistic(String),

    /// A fetch field whose layer count disagrees with its direction count.
    #[error("fetch field has {layers} layers for {directions} directions")]
    LayerCountMismatch { layers: usize, directions: usize },

    /// No directions were requested.
    #[error("at least one direction is required")]
    EmptyDirections,

    /// No statistics were requested.
    #[error("at least one statistic is required")]
    EmptyStatistics,

    /// A fetch field with no layers.
    #[error("fetch field has no layers")]
    EmptyField,

    /// Minor-direction parameters out of range.
    #[error("invalid minor directions: {0}")]
    InvalidMinorDirections(String),

    /// Engine configuration rejected by validation.
    #[error("configuration error: {0}")]
    InvalidConfig(String),

    /// Worker pool could not be built.
    #[error("thread pool error: {0}")]
    ThreadPool(String),
}

impl FetchError {
    /// Create a ShapeMismatch error.
    pub fn shape_mismatch(expected: (usize, usize), actual: (usize, usize)) -> Self {
        Self::ShapeMismatch { expected, actual }
    }

    /// Create an InvalidMinorDirections error.
    pub fn invalid_minor(msg: impl Into<String>) -> Self {
        Self::InvalidMinorDirections(msg.into())
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

impl From<rayon::ThreadPoolBuildError> for FetchError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        Self::ThreadPool(err.to_string())
    }
}

/// Result type for fetch operations.
pub type Result<T> = std::result::Result<T, FetchError>;
