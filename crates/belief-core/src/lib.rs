//! Trust-Discounted Belief Dynamics
//!
//! Agents on a toroidal grid choose between a known option and an uncertain
//! one. Those who favour the uncertain option experiment with it, and
//! everyone updates on their neighbors' results, trusting a neighbor less
//! the further its credence is from their own. Depending on parameters the
//! community reaches the right consensus, the wrong one, or splits.
//!
//! # Modules
//!
//! - [`setup`]: neighborhood construction and initial grids
//! - [`systems`]: evidence model, update table, table cache, entropy, stability
//! - [`engine`]: the step-wise state machine and the single-shot [`run`]
//! - [`output`]: result assembly for each output mode
//! - [`config`]: run parameters and TOML loading

pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod output;
pub mod setup;
pub mod systems;

pub use components::Grid;
pub use config::SimulationConfig;
pub use engine::{run, AbortSignal, SimulationEngine};
pub use error::{ConfigError, SimError};
pub use output::{ResultAssembler, RunResult, StoredValues};
pub use setup::NeighborhoodTable;
pub use systems::{EvidenceTables, TableCache, UpdateTable};

pub use belief_events::{GridSnapshot, OutputMode, RunStatus};
