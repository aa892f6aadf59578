//! Common fixtures for fetch tests.

/// Class value used for water in generated classifications.
pub const WATER_ID: f32 = 1.0;

/// Class value used for land in generated classifications.
pub const LAND_ID: f32 = 0.0;

/// Common direction sets, in degrees.
pub mod directions {
    /// The four cardinal bearings.
    pub const CARDINAL: [f64; 4] = [0.0, 90.0, 180.0, 270.0];

    /// Eight compass bearings, 45 degrees apart.
    pub const COMPASS_8: [f64; 8] = [0.0, 45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0];

    /// Weights for [`COMPASS_8`] that sum to 1.
    pub const COMPASS_8_WEIGHTS: [f64; 8] = [0.1, 0.3, 0.1, 0.2, 0.0, 0.0, 0.2, 0.1];
}
