//! Run Setup
//!
//! Neighborhood construction and initial grid generation.

pub mod initial;
pub mod neighborhood;

pub use initial::*;
pub use neighborhood::*;
