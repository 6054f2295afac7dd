//! Configuration System
//!
//! Run parameters, loadable from a TOML file so sweeps can be scripted
//! without recompiling. Every field has a default; a file only needs to name
//! what it changes.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::components::Grid;
use crate::error::ConfigError;

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "belief.toml";

/// Accepted range for the true success probability of the superior option
pub const SUCCESS_PROBABILITY_RANGE: (f64, f64) = (0.501, 0.8);
/// Largest number of trials per experiment
pub const MAX_TRIALS: u32 = 100;
/// Largest update-table granularity
pub const MAX_GRANULARITY: u32 = 500;
/// Accepted range for the trust-decay multiplier
pub const TRUST_MULTIPLIER_RANGE: (f64, f64) = (1.0, 3.0);

/// Parameters of a single simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Grid side length
    pub dim: usize,
    /// Upper bound on executed steps
    pub max_steps: u64,
    /// Neighborhood size, including the agent itself
    pub degree: usize,
    /// True success probability of the superior option
    pub p: f64,
    /// Trials per experiment
    pub n: u32,
    /// Trust-decay multiplier
    pub m: f64,
    /// Update-table resolution: credences snap to multiples of 1/granularity
    pub granularity: u32,
    /// Seed for the run's random number generator
    pub seed: u64,
    /// Requested result representation
    pub output_mode: String,
    /// Starting credences as `dim` rows; random when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_grid: Option<Vec<Vec<f64>>>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            dim: 10,
            max_steps: 100,
            degree: 9,
            p: 0.6,
            n: 10,
            m: 2.0,
            granularity: 100,
            seed: 42,
            output_mode: "correct".to_string(),
            initial_grid: None,
        }
    }
}

impl SimulationConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Renders the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks every parameter against its accepted range.
    ///
    /// Runs before any table is computed, so a bad configuration never
    /// touches the cache.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dim == 0 {
            return Err(ConfigError::Dimension);
        }
        if self.max_steps == 0 {
            return Err(ConfigError::MaxSteps);
        }
        let cells = self.dim.checked_mul(self.dim).ok_or(ConfigError::Dimension)?;
        if self.degree == 0 || self.degree > cells {
            return Err(ConfigError::Degree {
                degree: self.degree,
                cells,
            });
        }
        let (p_min, p_max) = SUCCESS_PROBABILITY_RANGE;
        if !(p_min..=p_max).contains(&self.p) {
            return Err(ConfigError::SuccessProbability(self.p));
        }
        if !(1..=MAX_TRIALS).contains(&self.n) {
            return Err(ConfigError::Trials(self.n));
        }
        let (m_min, m_max) = TRUST_MULTIPLIER_RANGE;
        if !(m_min..=m_max).contains(&self.m) {
            return Err(ConfigError::TrustMultiplier(self.m));
        }
        if !(1..=MAX_GRANULARITY).contains(&self.granularity) {
            return Err(ConfigError::Granularity(self.granularity));
        }
        if let Some(rows) = &self.initial_grid {
            Grid::from_rows(self.dim, rows)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.output_mode, "correct");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = SimulationConfig::from_str(
            r#"
            dim = 3
            degree = 9
            p = 0.8
            n = 50
            m = 1.0
            initial_grid = [[0.9, 0.9, 0.9], [0.9, 0.9, 0.9], [0.9, 0.9, 0.9]]
            "#,
        )
        .unwrap();

        assert_eq!(config.dim, 3);
        assert_eq!(config.n, 50);
        assert_eq!(config.max_steps, 100);
        assert_eq!(config.granularity, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = SimulationConfig {
            initial_grid: Some(vec![vec![0.25]]),
            dim: 1,
            degree: 1,
            ..SimulationConfig::default()
        };
        let text = config.to_toml().unwrap();
        assert_eq!(SimulationConfig::from_str(&text).unwrap(), config);
    }

    #[test]
    fn test_load_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "dim = 4\nmax_steps = 12\noutput_mode = \"entropy\"").unwrap();

        let config = SimulationConfig::from_file(file.path()).unwrap();
        assert_eq!(config.dim, 4);
        assert_eq!(config.max_steps, 12);
        assert_eq!(config.output_mode, "entropy");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SimulationConfig::from_file("/nonexistent/belief.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_range_checks() {
        let base = SimulationConfig::default();

        let cases = [
            SimulationConfig { dim: 0, ..base.clone() },
            SimulationConfig { max_steps: 0, ..base.clone() },
            SimulationConfig { degree: 101, ..base.clone() },
            SimulationConfig { p: 0.5, ..base.clone() },
            SimulationConfig { p: f64::NAN, ..base.clone() },
            SimulationConfig { n: 0, ..base.clone() },
            SimulationConfig { n: 101, ..base.clone() },
            SimulationConfig { m: 3.5, ..base.clone() },
            SimulationConfig { granularity: 0, ..base.clone() },
            SimulationConfig { granularity: MAX_GRANULARITY + 1, ..base.clone() },
            SimulationConfig { granularity: u32::MAX, n: 100, ..base.clone() },
            SimulationConfig { dim: usize::MAX, ..base.clone() },
            SimulationConfig {
                initial_grid: Some(vec![vec![0.5; 10]; 9]),
                ..base.clone()
            },
        ];

        for config in cases {
            assert!(config.validate().is_err(), "{:?} should be rejected", config);
        }
    }

    #[test]
    fn test_range_errors_name_the_parameter() {
        let base = SimulationConfig::default();

        let err = SimulationConfig { granularity: u32::MAX, ..base.clone() }
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Granularity(u32::MAX)));
        assert!(err.to_string().contains("[1, 500]"));

        let err = SimulationConfig { dim: usize::MAX, ..base }.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Dimension));
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let config = SimulationConfig {
            dim: 2,
            degree: 4,
            p: 0.8,
            n: 100,
            m: 3.0,
            granularity: MAX_GRANULARITY,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_ok());

        let low = SimulationConfig {
            p: 0.501,
            n: 1,
            m: 1.0,
            granularity: 1,
            ..config
        };
        assert!(low.validate().is_ok());
    }
}
