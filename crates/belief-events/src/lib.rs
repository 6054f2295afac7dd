//! Shared data types for the belief-dynamics simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! Anything that observes a run (a presentation layer polling snapshots, a
//! batch driver collecting results) depends on these types rather than on
//! the engine itself.

pub mod output;
pub mod snapshot;
pub mod status;

// Re-export output mode types
pub use output::{OutputMode, ParseOutputModeError};

// Re-export snapshot types
pub use snapshot::{generate_snapshot_id, GridSnapshot};

// Re-export status types
pub use status::RunStatus;
