//! Configuration for the fetch engine.

use crate::error::{FetchError, Result};
use crate::scan::ScanMethod;
use serde::{Deserialize, Serialize};

/// Upper bound on worker threads accepted from configuration.
const MAX_WORKERS_LIMIT: usize = 1024;

/// Configuration for the fetch engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Size of the worker pool used for per-bearing pipelines.
    /// Zero lets rayon pick one thread per logical CPU.
    pub max_workers: usize,

    /// Realization of the directional distance scan.
    pub scan_method: ScanMethod,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_workers: 0,
            scan_method: ScanMethod::Cumulative,
        }
    }
}

impl FetchConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("FETCH_MAX_WORKERS") {
            if let Ok(workers) = val.parse() {
                config.max_workers = workers;
            }
        }

        if let Ok(val) = std::env::var("FETCH_SCAN_METHOD") {
            config.scan_method = ScanMethod::from_str(&val);
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.max_workers > MAX_WORKERS_LIMIT {
            return Err(FetchError::invalid_config(format!(
                "max_workers must be <= {}, got {}",
                MAX_WORKERS_LIMIT, self.max_workers
            )));
        }

        Ok(())
    }

    /// Builder-style override of the worker count.
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    /// Builder-style override of the scan realization.
    pub fn with_scan_method(mut self, scan_method: ScanMethod) -> Self {
        self.scan_method = scan_method;
        self
    }
}
