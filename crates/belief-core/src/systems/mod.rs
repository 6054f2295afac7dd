//! Simulation Systems
//!
//! The evidence model, the posterior lookup table and its cache, plus the
//! per-step measurements: entropy and the stability test.

pub mod cache;
pub mod entropy;
pub mod evidence;
pub mod stability;
pub mod update_table;

// Re-export commonly used items
pub use cache::{TableCache, UpdateKey};
pub use entropy::{credence_entropy, HISTOGRAM_BINS};
pub use evidence::{binomial_pmf, EvidenceTables, Experiment, HYPOTHESIS_CUTOFF};
pub use stability::{is_stable, negative_threshold, CONFIDENT_THRESHOLD};
pub use update_table::{UpdateTable, HYPOTHESIS_PRIOR_WEIGHT};
