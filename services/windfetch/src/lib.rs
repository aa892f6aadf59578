//! Command-line front end for wind fetch computation.
//!
//! This module exposes the internal modules for testing purposes.

pub mod ascii_grid;
pub mod commands;
pub mod manifest;
