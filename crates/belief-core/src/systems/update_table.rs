//! Update Table
//!
//! Posterior credences for every quantized (own credence, neighbor
//! credence, evidence count) triple, so the per-step update is a lookup
//! rather than an integration.
//!
//! An agent hearing a neighbor's result trusts it less the further apart
//! their credences are. The posterior is a Jeffrey conditionalization: the
//! Bayesian update on the evidence weighted by trust, plus the update on its
//! negation weighted by distrust.

use rayon::prelude::*;
use serde::Serialize;

use crate::error::SimError;
use crate::systems::evidence::{binomial_pmf, EvidenceTables};

/// Prior weight on the hypothesis in the trusted-evidence update.
///
/// Fixed rather than taken from the agent's own credence; changing it
/// changes simulation outcomes.
pub const HYPOTHESIS_PRIOR_WEIGHT: f64 = 0.9;

/// Posterior lookup table for one (m, n, granularity) combination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateTable {
    m: f64,
    n: u32,
    granularity: u32,
    /// Flattened `[own][neighbor][evidence]`, `(G+1) x (G+1) x (n+1)`
    values: Vec<f64>,
}

impl UpdateTable {
    /// Fills the table for trust multiplier `m` at resolution `granularity`.
    pub fn precompute(
        m: f64,
        granularity: u32,
        tables: &EvidenceTables,
    ) -> Result<Self, SimError> {
        let n = tables.n();
        let g = f64::from(granularity);
        let outcomes = tables.outcomes();

        // Posterior if the evidence is taken at face value
        let trusted = (0..outcomes)
            .map(|e| {
                let p_e = tables.p_e[e];
                if p_e <= 0.0 || !p_e.is_finite() {
                    return Err(SimError::numeric("update_table", e, "marginal P(E) is zero"));
                }
                Ok(tables.p_e_given_h[e] * HYPOTHESIS_PRIOR_WEIGHT / p_e)
            })
            .collect::<Result<Vec<_>, _>>()?;

        // Posterior if the evidence is rejected, before scaling by own credence
        let distrusted = (0..outcomes)
            .map(|e| {
                let complement = 1.0 - tables.p_e[e];
                if complement <= 0.0 || !complement.is_finite() {
                    return Err(SimError::numeric("update_table", e, "marginal P(not E) is zero"));
                }
                Ok(tables.p_e_given_not_h[e] / complement)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let (side, len) = table_shape(granularity, outcomes).ok_or_else(|| {
            SimError::numeric("update_table", n as usize, "table size overflows memory")
        })?;

        let mut values = vec![0.0; len];
        values
            .par_chunks_mut(side * outcomes)
            .enumerate()
            .try_for_each(|(i, block)| -> Result<(), SimError> {
                let own = i as f64 / g;
                let predictive = (0..=n)
                    .map(|e| binomial_pmf(e, n, own))
                    .collect::<Result<Vec<_>, _>>()?;

                for (j, row) in block.chunks_mut(outcomes).enumerate() {
                    let distance = (own - j as f64 / g).abs();
                    for (e, slot) in row.iter_mut().enumerate() {
                        let p_trust = (1.0 - distance * m * (1.0 - predictive[e])).max(0.0);
                        let posterior = trusted[e] * p_trust
                            + distrusted[e] * own * (1.0 - p_trust);
                        *slot = posterior.clamp(0.0, 1.0);
                    }
                }
                Ok(())
            })?;

        tracing::debug!(m, n, granularity, entries = values.len(), "filled update table");

        Ok(Self {
            m,
            n,
            granularity,
            values,
        })
    }

    pub fn m(&self) -> f64 {
        self.m
    }

    pub fn n(&self) -> u32 {
        self.n
    }

    pub fn granularity(&self) -> u32 {
        self.granularity
    }

    /// Snaps a credence to the nearest table index.
    pub fn quantize(&self, credence: f64) -> usize {
        let g = f64::from(self.granularity);
        ((credence.clamp(0.0, 1.0) * g).round() as usize).min(self.granularity as usize)
    }

    /// Posterior at table indices (own, neighbor) for `evidence` successes.
    pub fn entry(&self, own: usize, neighbor: usize, evidence: usize) -> f64 {
        let side = self.granularity as usize + 1;
        let outcomes = self.n as usize + 1;
        self.values[(own * side + neighbor) * outcomes + evidence]
    }

    /// Posterior for an agent at `own` credence hearing `evidence`
    /// successes from a neighbor at `neighbor` credence.
    pub fn lookup(&self, own: f64, neighbor: f64, evidence: u32) -> f64 {
        self.entry(
            self.quantize(own),
            self.quantize(neighbor),
            evidence as usize,
        )
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Row width `G + 1` and total entry count, or `None` when the table could
/// not be allocated.
fn table_shape(granularity: u32, outcomes: usize) -> Option<(usize, usize)> {
    let side = usize::try_from(granularity).ok()?.checked_add(1)?;
    let len = side.checked_mul(side)?.checked_mul(outcomes)?;
    (len <= isize::MAX as usize / std::mem::size_of::<f64>()).then_some((side, len))
}
