//! ESRI ASCII grid reading and writing.
//!
//! ```text
//! ncols         4
//! nrows         3
//! xllcorner     500000.0
//! yllcorner     6200000.0
//! cellsize      5.0
//! NODATA_value  -9999
//! 0 0 0 0
//! 0 1 1 0
//! 0 0 0 0
//! ```

use std::fmt::Write as _;
use std::path::Path;

use fetch_core::{FetchError, Grid};
use serde::Serialize;
use thiserror::Error;

/// Errors raised while parsing or writing an ASCII grid.
#[derive(Error, Debug)]
pub enum AsciiGridError {
    #[error("missing header field '{0}'")]
    MissingField(&'static str),

    #[error("invalid value '{value}' for header field '{field}'")]
    InvalidHeader { field: String, value: String },

    #[error("invalid cell value '{0}'")]
    InvalidCell(String),

    #[error("expected {expected} cell values, found {found}")]
    CellCount { expected: usize, found: usize },

    #[error(transparent)]
    Grid(#[from] FetchError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Lower-left reference point of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// `xllcorner` / `yllcorner`.
    Corner { x: f64, y: f64 },
    /// `xllcenter` / `yllcenter`.
    Center { x: f64, y: f64 },
}

impl Default for Origin {
    fn default() -> Self {
        Self::Corner { x: 0.0, y: 0.0 }
    }
}

/// Header of an ASCII grid, minus the shape (carried by the grid itself).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AsciiHeader {
    pub origin: Origin,
    pub cellsize: f64,
    pub nodata: Option<f64>,
}

/// A parsed ASCII grid with raw cell values.
#[derive(Debug, Clone)]
pub struct AsciiGrid {
    pub header: AsciiHeader,
    pub grid: Grid,
}

impl AsciiGrid {
    /// Copy of the grid with `NODATA_value` cells replaced by NaN.
    pub fn nodata_as_nan(&self) -> Grid {
        match self.header.nodata {
            Some(nodata) => {
                let nodata = nodata as f32;
                self.grid.map(|v| if v == nodata { f32::NAN } else { v })
            }
            None => self.grid.clone(),
        }
    }
}

/// Read an ASCII grid from `path`.
pub fn read_ascii_grid(path: &Path) -> Result<AsciiGrid, AsciiGridError> {
    let text = std::fs::read_to_string(path)?;
    parse_ascii_grid(&text)
}

/// Parse ASCII grid text.
pub fn parse_ascii_grid(text: &str) -> Result<AsciiGrid, AsciiGridError> {
    let mut ncols = None;
    let mut nrows = None;
    let mut xll = None;
    let mut yll = None;
    let mut centre = false;
    let mut cellsize = None;
    let mut nodata = None;

    let mut lines = text.lines().peekable();
    while let Some(line) = lines.peek() {
        let mut parts = line.split_whitespace();
        let Some(key) = parts.next() else {
            lines.next();
            continue;
        };
        let key = key.to_ascii_lowercase();
        let value = parts.next().unwrap_or("");

        match key.as_str() {
            "ncols" => ncols = Some(parse_header::<usize>(&key, value)?),
            "nrows" => nrows = Some(parse_header::<usize>(&key, value)?),
            "xllcorner" => xll = Some(parse_header::<f64>(&key, value)?),
            "yllcorner" => yll = Some(parse_header::<f64>(&key, value)?),
            "xllcenter" => {
                xll = Some(parse_header::<f64>(&key, value)?);
                centre = true;
            }
            "yllcenter" => {
                yll = Some(parse_header::<f64>(&key, value)?);
                centre = true;
            }
            "cellsize" => cellsize = Some(parse_header::<f64>(&key, value)?),
            "nodata_value" => nodata = Some(parse_header::<f64>(&key, value)?),
            // First data row.
            _ => break,
        }
        lines.next();
    }

    let ncols = ncols.ok_or(AsciiGridError::MissingField("ncols"))?;
    let nrows = nrows.ok_or(AsciiGridError::MissingField("nrows"))?;
    let cellsize = cellsize.ok_or(AsciiGridError::MissingField("cellsize"))?;
    let (x, y) = (xll.unwrap_or(0.0), yll.unwrap_or(0.0));
    let origin = if centre {
        Origin::Center { x, y }
    } else {
        Origin::Corner { x, y }
    };

    let data = lines
        .flat_map(str::split_whitespace)
        .map(|token| {
            token
                .parse::<f32>()
                .map_err(|_| AsciiGridError::InvalidCell(token.to_string()))
        })
        .collect::<Result<Vec<f32>, _>>()?;

    let expected = nrows
        .checked_mul(ncols)
        .ok_or(AsciiGridError::CellCount {
            expected: usize::MAX,
            found: data.len(),
        })?;
    if data.len() != expected {
        return Err(AsciiGridError::CellCount {
            expected,
            found: data.len(),
        });
    }

    Ok(AsciiGrid {
        header: AsciiHeader {
            origin,
            cellsize,
            nodata,
        },
        grid: Grid::new(data, nrows, ncols, cellsize)?,
    })
}

fn parse_header<T: std::str::FromStr>(field: &str, value: &str) -> Result<T, AsciiGridError> {
    value.parse().map_err(|_| AsciiGridError::InvalidHeader {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Render `grid` as ASCII grid text. NaN cells are written as `nodata`.
pub fn format_ascii_grid(grid: &Grid, origin: Origin, nodata: f32) -> String {
    let mut out = String::new();
    let (x_key, y_key, x, y) = match origin {
        Origin::Corner { x, y } => ("xllcorner", "yllcorner", x, y),
        Origin::Center { x, y } => ("xllcenter", "yllcenter", x, y),
    };

    // Writing into a String cannot fail.
    let _ = writeln!(out, "ncols {}", grid.cols());
    let _ = writeln!(out, "nrows {}", grid.rows());
    let _ = writeln!(out, "{} {}", x_key, x);
    let _ = writeln!(out, "{} {}", y_key, y);
    let _ = writeln!(out, "cellsize {}", grid.resolution());
    let _ = writeln!(out, "NODATA_value {}", nodata);

    for row in grid.data().chunks_exact(grid.cols()) {
        let line: Vec<String> = row
            .iter()
            .map(|&v| if v.is_nan() { nodata } else { v })
            .map(|v| v.to_string())
            .collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }

    out
}

/// Write `grid` to `path` as an ASCII grid.
pub fn write_ascii_grid(
    path: &Path,
    grid: &Grid,
    origin: Origin,
    nodata: f32,
) -> Result<(), AsciiGridError> {
    std::fs::write(path, format_ascii_grid(grid, origin, nodata))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "ncols 4\nnrows 3\nxllcorner 500000.5\nyllcorner 6200000\ncellsize 5\nNODATA_value -9999\n0 0 0 0\n0 1 1 -9999\n0 0 0 0\n";

    #[test]
    fn test_parse_sample() {
        let parsed = parse_ascii_grid(SAMPLE).unwrap();
        assert_eq!(parsed.grid.shape(), (3, 4));
        assert_eq!(parsed.grid.resolution(), 5.0);
        assert_eq!(parsed.header.nodata, Some(-9999.0));
        assert_eq!(
            parsed.header.origin,
            Origin::Corner {
                x: 500000.5,
                y: 6200000.0
            }
        );
        assert_eq!(parsed.grid.get(1, 1), Some(1.0));
        assert_eq!(parsed.grid.get(1, 3), Some(-9999.0));
        assert!(parsed.nodata_as_nan().get(1, 3).unwrap().is_nan());
    }

    #[test]
    fn test_parse_centre_origin_and_case() {
        let text = "NCOLS 2\nNROWS 1\nXLLCENTER 1.5\nYLLCENTER 2.5\nCELLSIZE 1\n3 4\n";
        let parsed = parse_ascii_grid(text).unwrap();
        assert_eq!(parsed.header.origin, Origin::Center { x: 1.5, y: 2.5 });
        assert_eq!(parsed.header.nodata, None);
        assert_eq!(parsed.grid.data(), &[3.0, 4.0]);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_ascii_grid("nrows 1\ncellsize 1\n0\n"),
            Err(AsciiGridError::MissingField("ncols"))
        ));
        assert!(matches!(
            parse_ascii_grid("ncols 2\nnrows 1\ncellsize 1\n0\n"),
            Err(AsciiGridError::CellCount {
                expected: 2,
                found: 1
            })
        ));
        assert!(matches!(
            parse_ascii_grid("ncols 1\nnrows 1\ncellsize 1\nx\n"),
            Err(AsciiGridError::InvalidCell(_))
        ));
        assert!(matches!(
            parse_ascii_grid("ncols 1\nnrows 1\ncellsize abc\n0\n"),
            Err(AsciiGridError::InvalidHeader { .. })
        ));
        assert!(matches!(
            parse_ascii_grid("ncols 1\nnrows 1\ncellsize 1\nbogus 3\n"),
            Err(AsciiGridError::InvalidCell(_))
        ));
        assert!(matches!(
            parse_ascii_grid("ncols 1\nnrows 1\ncellsize 0\n0\n"),
            Err(AsciiGridError::Grid(FetchError::InvalidResolution(_)))
        ));
    }

    #[test]
    fn test_parse_data_rows_starting_with_nan() {
        let text = "ncols 2\nnrows 2\ncellsize 1\nnan 1\nNaN 0\n";
        let parsed = parse_ascii_grid(text).unwrap();
        assert_eq!(parsed.grid.shape(), (2, 2));
        assert!(parsed.grid.get(0, 0).unwrap().is_nan());
        assert!(parsed.grid.get(1, 0).unwrap().is_nan());
        assert_eq!(parsed.grid.get(0, 1), Some(1.0));
    }

    #[test]
    fn test_parse_rejects_overflowing_shape() {
        let text = format!("ncols {}\nnrows 2\ncellsize 1\n0\n", usize::MAX);
        assert!(matches!(
            parse_ascii_grid(&text),
            Err(AsciiGridError::CellCount { found: 1, .. })
        ));
    }

    #[test]
    fn test_format_round_trip() {
        let grid = Grid::from_rows(&[vec![0.0, 12.5], vec![f32::NAN, 40.0]], 10.0).unwrap();
        let origin = Origin::Corner { x: 10.0, y: 20.0 };
        let text = format_ascii_grid(&grid, origin, -9999.0);
        assert!(text.starts_with("ncols 2\nnrows 2\nxllcorner 10\nyllcorner 20\ncellsize 10\n"));
        assert!(text.ends_with("0 12.5\n-9999 40\n"));

        let parsed = parse_ascii_grid(&text).unwrap();
        assert_eq!(parsed.header.origin, origin);
        let restored = parsed.nodata_as_nan();
        assert_eq!(restored.get(0, 1), Some(12.5));
        assert!(restored.get(1, 0).unwrap().is_nan());
    }
}
