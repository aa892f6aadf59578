//! Wind fetch computation on gridded land/water classifications.
//!
//! Fetch is the unobstructed distance wind travels across water before it
//! reaches land. This crate computes it per cell for any set of compass
//! bearings:
//!
//! - **Bearing alignment**: each bearing is turned into a plain top-to-bottom
//!   column scan by padding and rotating the grid (nearest neighbour only).
//! - **Two scan realizations**: an explicit per-column walk and a closed-form
//!   cumulative-sum decode, selectable via [`ScanMethod`].
//! - **Parallel aggregation**: bearings (and minor offsets around them) run on
//!   a bounded rayon pool, then are averaged, weighted and masked to water.
//! - **Summaries**: NaN-aware min/mean/max/median/std/var/range across
//!   directions.
//!
//! # Architecture
//!
//! ```text
//! classification grid ──► LandWaterMask
//!                              │
//!                              ▼
//! FetchEngine::fetch(mask, request)
//!      │
//!      ├─► expand bearings (minor offsets)
//!      │
//!      ├─► per bearing, on the pool:
//!      │       pad ─► rotate(θ) ─► scan ─► rotate(360-θ) ─► unpad
//!      │
//!      ├─► average minor offsets per bearing
//!      │
//!      ├─► weight (optional) ─► mask land to 0
//!      │
//!      ▼
//! FetchField ──► summary(stats) ──► SummaryField
//! ```
//!
//! # Example
//!
//! ```
//! use fetch_core::{FetchConfig, FetchEngine, FetchRequest, Grid, LandWaterMask, Statistic};
//!
//! // 1 = water, 0 = land
//! let lake = Grid::from_rows(
//!     &[
//!         vec![0.0, 0.0, 0.0],
//!         vec![0.0, 1.0, 0.0],
//!         vec![0.0, 1.0, 0.0],
//!         vec![0.0, 0.0, 0.0],
//!     ],
//!     10.0,
//! )?;
//! let mask = LandWaterMask::from_classification(&lake, 1.0);
//!
//! let engine = FetchEngine::new(FetchConfig::default())?;
//! let fetch = engine.fetch(&mask, &FetchRequest::new(vec![0.0, 180.0]))?;
//! assert_eq!(fetch.layer(0).unwrap().get(2, 1), Some(20.0));
//!
//! let summary = fetch.summary(&[Statistic::Max])?;
//! assert_eq!(summary.layers()[0].get(1, 1), Some(20.0));
//! # Ok::<(), fetch_core::FetchError>(())
//! ```

pub mod aggregate;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod scan;
pub mod summary;
pub mod transform;
pub mod types;

// Re-export commonly used types at crate root
pub use aggregate::{FetchEngine, FetchRequest};
pub use config::FetchConfig;
pub use error::{FetchError, Result};
pub use pipeline::fetch_single_direction;
pub use scan::{scan_cumulative, scan_direct, ScanMethod};
pub use summary::{summarize, Statistic, SummaryField};
pub use transform::{pad, required_pad, rotate, unpad};
pub use types::{
    normalize_bearing, FetchField, Grid, LandWaterMask, MinorDirections, Weights, NO_DATA, WATER,
};
