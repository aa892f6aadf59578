//! Padding and rotation of grids about their centre.
//!
//! A bearing is aligned with the scan axis by rotating the whole grid. The
//! grid is padded first so that no cell is pushed out of bounds by the
//! rotation, then rotated back and cropped once the scan is done.

pub mod pad;
pub mod rotate;

pub use pad::{pad, required_pad, unpad};
pub use rotate::{nearest_sample, rotate};
