//! Run Results
//!
//! Derives the requested representation of a finished run from the final
//! grid, the entropy trace and the tables the run used.

use belief_events::OutputMode;
use serde::Serialize;
use std::sync::Arc;

use crate::components::Grid;
use crate::error::SimError;
use crate::systems::{EvidenceTables, UpdateTable, CONFIDENT_THRESHOLD};

/// Credence above which an agent favours the superior option.
pub const CORRECT_THRESHOLD: f64 = 0.5;

/// Tables a run was computed with, for inspection or reuse.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredValues {
    pub evidence: Arc<EvidenceTables>,
    pub update: Arc<UpdateTable>,
}

/// The value returned to the caller for one output mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", content = "value", rename_all = "camelCase")]
pub enum RunResult {
    Correct(f64),
    Map(Vec<Vec<f64>>),
    Entropy(Vec<f64>),
    Polarized(bool),
    StoredValues(StoredValues),
}

impl RunResult {
    pub fn mode(&self) -> OutputMode {
        match self {
            RunResult::Correct(_) => OutputMode::Correct,
            RunResult::Map(_) => OutputMode::Map,
            RunResult::Entropy(_) => OutputMode::Entropy,
            RunResult::Polarized(_) => OutputMode::Polarized,
            RunResult::StoredValues(_) => OutputMode::StoredValues,
        }
    }

    pub fn as_correct(&self) -> Option<f64> {
        match self {
            RunResult::Correct(fraction) => Some(*fraction),
            _ => None,
        }
    }

    pub fn as_polarized(&self) -> Option<bool> {
        match self {
            RunResult::Polarized(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[Vec<f64>]> {
        match self {
            RunResult::Map(rows) => Some(rows),
            _ => None,
        }
    }

    pub fn as_entropy(&self) -> Option<&[f64]> {
        match self {
            RunResult::Entropy(trace) => Some(trace),
            _ => None,
        }
    }
}

/// Read-only view of end-of-run state.
#[derive(Debug, Clone, Copy)]
pub struct ResultAssembler<'a> {
    pub grid: &'a Grid,
    pub entropy: &'a [f64],
    pub evidence: &'a Arc<EvidenceTables>,
    pub update: &'a Arc<UpdateTable>,
}

impl<'a> ResultAssembler<'a> {
    pub fn assemble(&self, mode: OutputMode) -> RunResult {
        match mode {
            OutputMode::Correct => RunResult::Correct(fraction_correct(self.grid.cells())),
            OutputMode::Map => RunResult::Map(self.grid.rows()),
            OutputMode::Entropy => RunResult::Entropy(self.entropy.to_vec()),
            OutputMode::Polarized => RunResult::Polarized(is_polarized(self.grid.cells())),
            OutputMode::StoredValues => RunResult::StoredValues(StoredValues {
                evidence: Arc::clone(self.evidence),
                update: Arc::clone(self.update),
            }),
        }
    }

    /// Assembles by mode name, failing on unknown names.
    pub fn assemble_named(&self, mode: &str) -> Result<RunResult, SimError> {
        Ok(self.assemble(mode.parse()?))
    }
}

/// Fraction of agents with credence above one half.
pub fn fraction_correct(credences: &[f64]) -> f64 {
    if credences.is_empty() {
        return 0.0;
    }
    let correct = credences.iter().filter(|&&c| c > CORRECT_THRESHOLD).count();
    correct as f64 / credences.len() as f64
}

/// True when the whole community sits on one side: everyone below one
/// half, or everyone confidently above 0.99.
pub fn is_polarized(credences: &[f64]) -> bool {
    credences.iter().all(|&c| c < CORRECT_THRESHOLD)
        || credences.iter().all(|&c| c > CONFIDENT_THRESHOLD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::TableCache;

    fn assembler_fixture() -> (Grid, Vec<f64>, Arc<EvidenceTables>, Arc<UpdateTable>) {
        let cache = TableCache::new();
        let grid = Grid::new(2, vec![0.9, 0.2, 0.6, 0.5]).unwrap();
        let entropy = vec![1.5, 1.0];
        (
            grid,
            entropy,
            cache.evidence(4).unwrap(),
            cache.update_table(2.0, 4, 4).unwrap(),
        )
    }

    #[test]
    fn test_fraction_correct_is_strict() {
        assert_eq!(fraction_correct(&[0.9, 0.2, 0.6, 0.5]), 0.5);
        assert_eq!(fraction_correct(&[]), 0.0);
    }

    #[test]
    fn test_polarized_means_all_one_side() {
        assert!(is_polarized(&[0.1, 0.49, 0.0]));
        assert!(is_polarized(&[0.995, 1.0]));
        assert!(!is_polarized(&[0.995, 0.1]));
        assert!(!is_polarized(&[0.9, 0.9]));
        assert!(!is_polarized(&[0.5, 0.1]));
    }

    #[test]
    fn test_assemble_every_mode() {
        let (grid, entropy, evidence, update) = assembler_fixture();
        let assembler = ResultAssembler {
            grid: &grid,
            entropy: &entropy,
            evidence: &evidence,
            update: &update,
        };

        assert_eq!(assembler.assemble(OutputMode::Correct), RunResult::Correct(0.5));
        assert_eq!(
            assembler.assemble(OutputMode::Map).as_map().unwrap(),
            &[vec![0.9, 0.2], vec![0.6, 0.5]]
        );
        assert_eq!(
            assembler.assemble(OutputMode::Entropy).as_entropy().unwrap(),
            &[1.5, 1.0]
        );
        assert_eq!(assembler.assemble(OutputMode::Polarized).as_polarized(), Some(false));

        match assembler.assemble(OutputMode::StoredValues) {
            RunResult::StoredValues(stored) => {
                assert!(Arc::ptr_eq(&stored.update, &update));
                assert_eq!(stored.evidence.n(), 4);
            }
            other => panic!("unexpected result {:?}", other),
        }

        for mode in OutputMode::ALL {
            assert_eq!(assembler.assemble(mode).mode(), mode);
        }
    }

    #[test]
    fn test_unknown_mode_name_fails() {
        let (grid, entropy, evidence, update) = assembler_fixture();
        let assembler = ResultAssembler {
            grid: &grid,
            entropy: &entropy,
            evidence: &evidence,
            update: &update,
        };

        assert!(matches!(
            assembler.assemble_named("heatmap"),
            Err(SimError::InvalidOutputMode(_))
        ));
        assert_eq!(
            assembler.assemble_named("correct").unwrap(),
            RunResult::Correct(0.5)
        );
    }

    #[test]
    fn test_result_json_shape() {
        let json = serde_json::to_value(RunResult::Polarized(true)).unwrap();
        assert_eq!(json, serde_json::json!({ "mode": "polarized", "value": true }));

        let json = serde_json::to_value(RunResult::Correct(0.25)).unwrap();
        assert_eq!(json["mode"], "correct");
    }
}
