//! Evidence Model
//!
//! Probabilities of each possible experiment outcome under a uniform prior
//! on the unknown success rate, and the per-step experiments themselves.

use rand::distributions::{Bernoulli, Distribution};
use rand::Rng;
use serde::Serialize;
use statrs::distribution::{Binomial, Discrete};
use statrs::function::beta::checked_beta_reg;

use crate::error::{ConfigError, SimError};

/// Success rate above which the hypothesis holds.
pub const HYPOTHESIS_CUTOFF: f64 = 0.5;

/// Outcome probabilities for experiments of `n` trials, indexed by success
/// count `e` in `0..=n`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvidenceTables {
    n: u32,
    /// Marginal probability of `e`: the binomial pmf integrated over x in [0, 1]
    pub p_e: Vec<f64>,
    /// Binomial pmf of `e` integrated over x in [0.5, 1]
    pub p_e_given_h: Vec<f64>,
    /// One minus the binomial pmf of `e`, integrated over x in [0.5, 1]
    pub p_e_given_not_h: Vec<f64>,
}

impl EvidenceTables {
    /// Computes all three tables for `n` trials.
    ///
    /// Integrals of the binomial pmf reduce to the regularized incomplete
    /// beta function: the integral over [a, 1] is
    /// `(1 - I_a(e + 1, n - e + 1)) / (n + 1)`.
    pub fn precompute(n: u32) -> Result<Self, SimError> {
        let outcomes = n as usize + 1;
        let marginal = 1.0 / outcomes as f64;

        let mut p_e = Vec::with_capacity(outcomes);
        let mut p_e_given_h = Vec::with_capacity(outcomes);
        let mut p_e_given_not_h = Vec::with_capacity(outcomes);

        for e in 0..=n {
            let below = checked_beta_reg(
                f64::from(e) + 1.0,
                f64::from(n - e) + 1.0,
                HYPOTHESIS_CUTOFF,
            )
            .map_err(|err| SimError::numeric("p_e_given_h", e as usize, err.to_string()))?;

            let given_h = marginal * (1.0 - below);
            let given_not_h = (1.0 - HYPOTHESIS_CUTOFF) - given_h;

            for (table, value) in [
                ("p_e", marginal),
                ("p_e_given_h", given_h),
                ("p_e_given_not_h", given_not_h),
            ] {
                if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                    return Err(SimError::numeric(
                        table,
                        e as usize,
                        format!("probability mass {} outside [0, 1]", value),
                    ));
                }
            }

            p_e.push(marginal);
            p_e_given_h.push(given_h);
            p_e_given_not_h.push(given_not_h);
        }

        Ok(Self {
            n,
            p_e,
            p_e_given_h,
            p_e_given_not_h,
        })
    }

    /// Trials per experiment.
    pub fn n(&self) -> u32 {
        self.n
    }

    /// Number of distinct outcomes, `n + 1`.
    pub fn outcomes(&self) -> usize {
        self.p_e.len()
    }
}

/// Probability of `e` successes in `n` trials at success rate `x`.
pub fn binomial_pmf(e: u32, n: u32, x: f64) -> Result<f64, SimError> {
    let binomial = Binomial::new(x, u64::from(n))
        .map_err(|err| SimError::numeric("binomial_pmf", e as usize, err.to_string()))?;
    Ok(binomial.pmf(u64::from(e)))
}

/// One agent's experiment: `n` independent trials of the uncertain option.
#[derive(Debug, Clone, Copy)]
pub struct Experiment {
    n: u32,
    trial: Bernoulli,
}

impl Experiment {
    pub fn new(n: u32, p: f64) -> Result<Self, ConfigError> {
        let trial = Bernoulli::new(p).map_err(|_| ConfigError::SuccessProbability(p))?;
        Ok(Self { n, trial })
    }

    /// Runs the experiment, returning the number of successes.
    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        (0..self.n).filter(|_| self.trial.sample(rng)).count() as u32
    }
}
