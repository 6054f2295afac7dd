//! Output Modes
//!
//! The result representations a caller can request from a finished run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which representation of the final state to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputMode {
    /// Fraction of agents whose credence favours the superior option
    #[serde(rename = "correct")]
    Correct,
    /// The final credence grid
    #[serde(rename = "map")]
    Map,
    /// Per-step entropy of the credence distribution
    #[serde(rename = "entropy")]
    Entropy,
    /// Whether the community ended all on one side
    #[serde(rename = "polarized")]
    Polarized,
    /// The probability and update tables used by the run
    #[serde(rename = "storedValues")]
    StoredValues,
}

impl OutputMode {
    pub const ALL: [OutputMode; 5] = [
        OutputMode::Correct,
        OutputMode::Map,
        OutputMode::Entropy,
        OutputMode::Polarized,
        OutputMode::StoredValues,
    ];

    /// Canonical name, as accepted by `from_str`.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Correct => "correct",
            OutputMode::Map => "map",
            OutputMode::Entropy => "entropy",
            OutputMode::Polarized => "polarized",
            OutputMode::StoredValues => "storedValues",
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when an output mode name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutputModeError(pub String);

impl fmt::Display for ParseOutputModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid output mode: '{}', expected one of correct, map, entropy, polarized, storedValues",
            self.0
        )
    }
}

impl std::error::Error for ParseOutputModeError {}

impl FromStr for OutputMode {
    type Err = ParseOutputModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutputMode::ALL
            .iter()
            .copied()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| ParseOutputModeError(s.to_string()))
    }
}
