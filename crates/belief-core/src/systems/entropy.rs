//! Credence Entropy
//!
//! Shannon entropy of the credence distribution, recorded once per step.

/// Histogram resolution: credences are binned like 8-bit intensities.
pub const HISTOGRAM_BINS: usize = 256;

/// Entropy in bits of the 256-bin histogram of `credences`.
///
/// Credence `c` falls in bin `round(c * 255)`. Empty bins contribute
/// nothing; an empty slice has zero entropy.
pub fn credence_entropy(credences: &[f64]) -> f64 {
    if credences.is_empty() {
        return 0.0;
    }

    let mut counts = [0usize; HISTOGRAM_BINS];
    let top = (HISTOGRAM_BINS - 1) as f64;
    for &c in credences {
        let bin = (c.clamp(0.0, 1.0) * top).round() as usize;
        counts[bin] += 1;
    }

    let total = credences.len() as f64;
    counts
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum()
}
