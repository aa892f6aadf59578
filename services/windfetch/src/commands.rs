//! `fetch` and `weight` subcommands.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use fetch_core::{
    FetchConfig, FetchEngine, FetchField, FetchRequest, Grid, LandWaterMask, MinorDirections,
    ScanMethod, Statistic,
};
use tracing::info;

use crate::ascii_grid::{read_ascii_grid, write_ascii_grid, AsciiGrid, Origin};
use crate::manifest::{BandInfo, Manifest};

/// Allowed deviation of a weight vector's sum from 1.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    /// Land/water classification grid (ESRI ASCII)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output prefix; bands go to <output>_<label>.asc
    #[arg(short, long)]
    pub output: PathBuf,

    /// Cell value that marks water
    #[arg(long, allow_negative_numbers = true)]
    pub water_id: f32,

    /// Compass bearings in degrees, comma separated
    #[arg(
        short,
        long,
        value_delimiter = ',',
        required = true,
        allow_negative_numbers = true
    )]
    pub directions: Vec<f64>,

    /// Per-bearing weights, comma separated
    #[arg(short, long, value_delimiter = ',')]
    pub weights: Option<Vec<f64>>,

    /// Number of minor bearings averaged around each bearing
    #[arg(long, requires = "minor_interval")]
    pub minor_directions: Option<usize>,

    /// Spacing between minor bearings in degrees
    #[arg(long, requires = "minor_directions")]
    pub minor_interval: Option<f64>,

    /// Summary statistics to write instead of per-bearing bands
    #[arg(short, long, value_delimiter = ',')]
    pub stats: Option<Vec<String>>,

    /// Worker threads (0 = one per CPU)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Scan realization: direct or cumulative
    #[arg(long)]
    pub scan_method: Option<String>,

    /// Value written for cells without a result
    #[arg(long, default_value_t = -9999.0, allow_negative_numbers = true)]
    pub nodata: f32,
}

impl FetchArgs {
    /// Engine configuration: environment first, flags on top.
    pub fn config(&self) -> FetchConfig {
        let mut config = FetchConfig::from_env();
        if let Some(workers) = self.workers {
            config = config.with_max_workers(workers);
        }
        if let Some(method) = &self.scan_method {
            config = config.with_scan_method(ScanMethod::from_str(method));
        }
        config
    }

    pub fn request(&self) -> Result<FetchRequest> {
        let mut request = FetchRequest::new(self.directions.clone());
        if let Some(weights) = &self.weights {
            request = request.with_weights(weights.clone());
        }
        if let (Some(count), Some(interval)) = (self.minor_directions, self.minor_interval) {
            request = request.with_minor(MinorDirections::new(count, interval)?);
        }
        Ok(request)
    }

    pub fn statistics(&self) -> Result<Vec<Statistic>> {
        match &self.stats {
            Some(names) => names
                .iter()
                .map(|name| name.parse::<Statistic>().map_err(Into::into))
                .collect(),
            None => Ok(Vec::new()),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct WeightArgs {
    /// Per-bearing fetch bands (ESRI ASCII), comma separated
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub input: Vec<PathBuf>,

    /// Output grid (ESRI ASCII)
    #[arg(short, long)]
    pub output: PathBuf,

    /// One weight per band, summing to 1
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub weights: Vec<f64>,

    /// Value written for cells without a result
    #[arg(long, default_value_t = -9999.0, allow_negative_numbers = true)]
    pub nodata: f32,
}

/// Run the `fetch` subcommand and return the written manifest.
pub fn run_fetch(args: &FetchArgs) -> Result<Manifest> {
    if let Some(weights) = &args.weights {
        check_weight_sum(weights)?;
    }
    let stats = args.statistics()?;
    let request = args.request()?;
    let config = args.config();

    let source = read_ascii_grid(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let mask = LandWaterMask::from_classification(&source.grid, args.water_id);
    info!(
        rows = mask.shape().0,
        cols = mask.shape().1,
        water_cells = mask.water_cells(),
        "Loaded classification grid"
    );

    let engine = FetchEngine::new(config).context("Failed to start fetch engine")?;
    let field = engine
        .fetch(&mask, &request)
        .context("Fetch computation failed")?;

    let mut manifest = Manifest::new(&args.input, &source, &field, args.nodata);

    if stats.is_empty() {
        let labels = band_labels(field.directions());
        for ((grid, &bearing), label) in field.layers().iter().zip(field.directions()).zip(labels) {
            let path = write_band(&args.output, &label, grid, source.header.origin, args.nodata)?;
            manifest.bands.push(BandInfo::direction(&path, label, bearing));
        }
    } else {
        let summary = field.summary(&stats).context("Summary failed")?;
        for (grid, &stat) in summary.layers().iter().zip(summary.stats()) {
            let label = stat.to_string();
            let path = write_band(&args.output, &label, grid, source.header.origin, args.nodata)?;
            manifest.bands.push(BandInfo::statistic(&path, label, stat));
        }
        manifest.statistics = stats;
    }

    let manifest_path = sibling_path(&args.output, ".json");
    manifest
        .write(&manifest_path)
        .with_context(|| format!("Failed to write {}", manifest_path.display()))?;

    info!(
        bands = manifest.bands.len(),
        manifest = %manifest_path.display(),
        "Fetch complete"
    );
    Ok(manifest)
}

/// Run the `weight` subcommand and return the weighted-mean grid.
pub fn run_weight(args: &WeightArgs) -> Result<Grid> {
    check_weight_sum(&args.weights)?;

    let bands = args
        .input
        .iter()
        .map(|path| {
            read_ascii_grid(path).with_context(|| format!("Failed to read {}", path.display()))
        })
        .collect::<Result<Vec<AsciiGrid>>>()?;

    let origin = bands
        .first()
        .map(|band| band.header.origin)
        .unwrap_or_default();
    let layers: Vec<Grid> = bands.iter().map(AsciiGrid::nodata_as_nan).collect();
    let labels: Vec<f64> = (0..layers.len()).map(|i| i as f64).collect();

    let field = FetchField::new(layers, labels).context("Input bands do not line up")?;
    let total = field.weighted(&args.weights)?.weighted_total();

    write_ascii_grid(&args.output, &total, origin, args.nodata)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    info!(bands = field.len(), output = %args.output.display(), "Weighting complete");
    Ok(total)
}

/// Reject weight vectors whose sum is not 1 within [`WEIGHT_SUM_TOLERANCE`].
pub fn check_weight_sum(weights: &[f64]) -> Result<()> {
    let sum: f64 = weights.iter().sum();
    if !((1.0 - WEIGHT_SUM_TOLERANCE)..=(1.0 + WEIGHT_SUM_TOLERANCE)).contains(&sum) {
        bail!("Weights must sum to 1 (got {sum})");
    }
    Ok(())
}

fn sibling_path(prefix: &Path, suffix: &str) -> PathBuf {
    let stem = prefix
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    prefix.with_file_name(format!("{stem}{suffix}"))
}

/// One label per bearing. Repeated bearings get their layer index appended.
fn band_labels(directions: &[f64]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::with_capacity(directions.len());
    for (index, bearing) in directions.iter().enumerate() {
        let label = bearing.to_string();
        if labels.contains(&label) {
            labels.push(format!("{label}_{index}"));
        } else {
            labels.push(label);
        }
    }
    labels
}

fn band_path(prefix: &Path, label: &str) -> PathBuf {
    sibling_path(prefix, &format!("_{label}.asc"))
}

fn write_band(prefix: &Path, label: &str, grid: &Grid, origin: Origin, nodata: f32) -> Result<PathBuf> {
    let path = band_path(prefix, label);
    write_ascii_grid(&path, grid, origin, nodata)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_sum_tolerance() {
        assert!(check_weight_sum(&[0.5, 0.5]).is_ok());
        assert!(check_weight_sum(&[0.3, 0.3, 0.395]).is_ok());
        assert!(check_weight_sum(&[0.5, 0.6]).is_err());
        assert!(check_weight_sum(&[]).is_err());
    }

    #[test]
    fn test_band_labels_are_unique() {
        assert_eq!(band_labels(&[0.0, 90.0]), vec!["0", "90"]);
        assert_eq!(band_labels(&[0.0, 0.0, 45.0, 0.0]), vec!["0", "0_1", "45", "0_3"]);
    }

    #[test]
    fn test_band_path() {
        assert_eq!(
            band_path(Path::new("/tmp/out/lake"), "22.5"),
            PathBuf::from("/tmp/out/lake_22.5.asc")
        );
        assert_eq!(band_path(Path::new("lake"), "max"), PathBuf::from("lake_max.asc"));
        assert_eq!(
            sibling_path(Path::new("out/lake.v2"), ".json"),
            PathBuf::from("out/lake.v2.json")
        );
    }
}
