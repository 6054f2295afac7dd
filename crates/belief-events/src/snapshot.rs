//! Snapshot Types
//!
//! Serialization structs for per-step grid snapshots.
//!
//! A snapshot captures the credence grid and machine status after a step,
//! which is what a presentation layer polls in step-wise mode.

use serde::{Deserialize, Serialize};

use crate::RunStatus;

/// Generates a snapshot ID with the given step number.
pub fn generate_snapshot_id(step: u64) -> String {
    format!("step_{:06}", step)
}

/// State of the grid after a completed step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub snapshot_id: String,
    /// Number of steps executed so far
    pub step: u64,
    pub status: RunStatus,
    /// Grid side length
    pub dim: usize,
    /// Row-major credences, `dim * dim` entries
    pub credences: Vec<f64>,
    /// Entropy recorded for this step; absent before the first step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entropy: Option<f64>,
}

impl GridSnapshot {
    pub fn new(step: u64, status: RunStatus, dim: usize, credences: Vec<f64>) -> Self {
        Self {
            snapshot_id: generate_snapshot_id(step),
            step,
            status,
            dim,
            credences,
            entropy: None,
        }
    }

    pub fn with_entropy(mut self, entropy: f64) -> Self {
        self.entropy = Some(entropy);
        self
    }

    /// Credence at (row, col), wrapping toroidally.
    pub fn credence_at(&self, row: usize, col: usize) -> f64 {
        self.credences[(row % self.dim) * self.dim + (col % self.dim)]
    }

    /// The grid as `dim` rows of `dim` credences.
    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.credences
            .chunks(self.dim.max(1))
            .map(|row| row.to_vec())
            .collect()
    }
}
