//! Stability Test
//!
//! A run stops once every agent sits in one of two absorbing regions:
//! confident belief, or a disbelief deep enough that neighbors' evidence
//! can no longer pull it back.

use crate::components::EXPERIMENT_THRESHOLD;

/// Credence above which an agent counts as settled on the hypothesis.
pub const CONFIDENT_THRESHOLD: f64 = 0.99;

/// Credence at or below which an agent counts as settled against the
/// hypothesis, for trust multiplier `m`.
pub fn negative_threshold(m: f64) -> f64 {
    (1.0 - 1.0 / m).max(0.01).min(EXPERIMENT_THRESHOLD)
}

/// True when every cell is settled, or when nobody is left experimenting.
pub fn is_stable(credences: &[f64], m: f64) -> bool {
    let floor = negative_threshold(m);
    let settled = credences
        .iter()
        .all(|&c| c > CONFIDENT_THRESHOLD || c <= floor);
    let nobody_experimenting = credences.iter().all(|&c| c < EXPERIMENT_THRESHOLD);
    settled || nobody_experimenting
}
