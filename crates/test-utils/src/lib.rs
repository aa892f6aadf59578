//! Shared test utilities for the wind fetch workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Synthetic land/water classification generators
//! - Common fixtures (class ids, direction sets)
//! - Temporary directory helpers
//! - Approximate-equality assertion macros
//!
//! Generators return plain row-major `Vec<f32>` so this crate stays free of
//! workspace dependencies.
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Cell-by-cell approximate equality of two `f32` slices.
///
/// NaN matches NaN; any other value must be within `epsilon`.
///
/// ```
/// use test_utils::assert_cells_approx_eq;
///
/// assert_cells_approx_eq!(&[1.0_f32, f32::NAN], &[1.0005_f32, f32::NAN], 0.001);
/// ```
#[macro_export]
macro_rules! assert_cells_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: &[f32] = $left;
        let right: &[f32] = $right;
        assert_eq!(left.len(), right.len(), "cell count differs");
        for (i, (&l, &r)) in left.iter().zip(right.iter()).enumerate() {
            if l.is_nan() || r.is_nan() {
                if !(l.is_nan() && r.is_nan()) {
                    panic!("cell {}: `{:?}` vs `{:?}` (NaN mismatch)", i, l, r);
                }
            } else if ((l - r).abs() as f64) > ($epsilon as f64) {
                panic!("cell {}: `{:?}` vs `{:?}` differ by more than {:?}", i, l, r, $epsilon);
            }
        }
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_assert_approx_eq_passes() {
        assert_approx_eq!(1.0001, 1.0, 0.001);
        assert_approx_eq!(0.0, 0.0, 0.0001);
        assert_approx_eq!(-5.5, -5.500001, 0.0001);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_approx_eq_fails() {
        assert_approx_eq!(1.1, 1.0, 0.001);
    }

    #[test]
    fn test_assert_cells_approx_eq_passes() {
        assert_cells_approx_eq!(&[0.0, f32::NAN, 3.0], &[0.0, f32::NAN, 3.0001], 0.001);
    }

    #[test]
    #[should_panic(expected = "NaN mismatch")]
    fn test_assert_cells_approx_eq_nan_mismatch() {
        assert_cells_approx_eq!(&[f32::NAN], &[1.0], 0.001);
    }
}
