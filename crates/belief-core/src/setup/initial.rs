//! Initial Grid
//!
//! Starting credences: the configured grid when one is supplied, otherwise
//! uniform random credences.

use rand::Rng;

use crate::components::Grid;
use crate::config::SimulationConfig;
use crate::error::ConfigError;

/// Creates the starting grid for a run.
pub fn initial_grid<R: Rng + ?Sized>(
    config: &SimulationConfig,
    rng: &mut R,
) -> Result<Grid, ConfigError> {
    match &config.initial_grid {
        Some(rows) => Grid::from_rows(config.dim, rows),
        None => Grid::random(config.dim, rng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_supplied_grid_is_used_verbatim() {
        let config = SimulationConfig {
            dim: 2,
            initial_grid: Some(vec![vec![0.9, 0.1], vec![0.2, 0.8]]),
            ..SimulationConfig::default()
        };
        let mut rng = SmallRng::seed_from_u64(1);
        let grid = initial_grid(&config, &mut rng).unwrap();
        assert_eq!(grid.cells(), &[0.9, 0.1, 0.2, 0.8]);
    }

    #[test]
    fn test_random_grid_is_seeded() {
        let config = SimulationConfig {
            dim: 4,
            ..SimulationConfig::default()
        };
        let a = initial_grid(&config, &mut SmallRng::seed_from_u64(5)).unwrap();
        let b = initial_grid(&config, &mut SmallRng::seed_from_u64(5)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
    }
}
