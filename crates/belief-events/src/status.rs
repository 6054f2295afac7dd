//! Run Status
//!
//! Lifecycle states of a simulation run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of the simulation state machine.
///
/// A run starts in `Running`; every other state is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Steps are still being executed
    #[default]
    Running,
    /// Every agent settled into one of the two absorbing regions
    StableConverged,
    /// The step limit was hit before the grid settled
    MaxStepsReached,
    /// The caller raised the abort signal
    UserAborted,
}

impl RunStatus {
    /// Returns true once no further steps will be executed.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RunStatus::Running)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Running => "running",
            RunStatus::StableConverged => "stable_converged",
            RunStatus::MaxStepsReached => "max_steps_reached",
            RunStatus::UserAborted => "user_aborted",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!RunStatus::Running.is_terminal());
        assert!(RunStatus::StableConverged.is_terminal());
        assert!(RunStatus::MaxStepsReached.is_terminal());
        assert!(RunStatus::UserAborted.is_terminal());
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&RunStatus::StableConverged).unwrap();
        assert_eq!(json, "\"stable_converged\"");

        let parsed: RunStatus = serde_json::from_str("\"user_aborted\"").unwrap();
        assert_eq!(parsed, RunStatus::UserAborted);
    }
}
