//! Simulation state: the credence grid.

pub mod grid;

pub use grid::{wrap_index, Grid, EXPERIMENT_THRESHOLD};
