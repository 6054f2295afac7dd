//! Error Types
//!
//! Every failure is a deterministic function of the inputs, so errors are
//! surfaced synchronously and never retried.

use belief_events::ParseOutputModeError;
use thiserror::Error;

/// Errors raised while loading or validating a run configuration.
///
/// These are always reported before any table is computed or cached.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("grid dimension must be at least 1")]
    Dimension,

    #[error("max_steps must be at least 1")]
    MaxSteps,

    #[error("degree {degree} out of range [1, {cells}]")]
    Degree { degree: usize, cells: usize },

    #[error("success probability {0} out of range [0.501, 0.8]")]
    SuccessProbability(f64),

    #[error("trials per experiment {0} out of range [1, 100]")]
    Trials(u32),

    #[error("trust multiplier {0} out of range [1, 3]")]
    TrustMultiplier(f64),

    #[error("granularity {0} out of range [1, {max}]", max = crate::config::MAX_GRANULARITY)]
    Granularity(u32),

    #[error("initial grid has {found} cells, expected {expected}")]
    GridCells { expected: usize, found: usize },

    #[error("initial grid has {found} rows, expected {expected}")]
    GridRows { expected: usize, found: usize },

    #[error("initial grid row {row} has {found} entries, expected {expected}")]
    GridRowLength {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("credence {value} at ({row}, {col}) is outside [0, 1]")]
    Credence { row: usize, col: usize, value: f64 },

    #[error("neighborhood table is for a {found_dim}x{found_dim} grid with degree {found_degree}, expected {dim}x{dim} with degree {degree}")]
    NeighborhoodMismatch {
        dim: usize,
        degree: usize,
        found_dim: usize,
        found_degree: usize,
    },
}

/// Top-level error for simulation runs.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Zero or invalid probability mass met while building a table.
    #[error("numeric domain error in {table} at evidence count {evidence}: {detail}")]
    NumericDomain {
        table: &'static str,
        evidence: usize,
        detail: String,
    },

    #[error(transparent)]
    InvalidOutputMode(#[from] ParseOutputModeError),
}

impl SimError {
    pub(crate) fn numeric(table: &'static str, evidence: usize, detail: impl Into<String>) -> Self {
        SimError::NumericDomain {
            table,
            evidence,
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_wraps_into_sim_error() {
        let err: SimError = ConfigError::Degree { degree: 10, cells: 9 }.into();
        assert!(matches!(err, SimError::Config(ConfigError::Degree { .. })));
        assert_eq!(
            err.to_string(),
            "configuration error: degree 10 out of range [1, 9]"
        );
    }

    #[test]
    fn test_output_mode_error_is_transparent() {
        let err: SimError = ParseOutputModeError("bogus".to_string()).into();
        assert!(err.to_string().starts_with("invalid output mode: 'bogus'"));
    }
}
