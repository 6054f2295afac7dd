//! Credence Grid
//!
//! The square toroidal array of agent credences.

use rand::Rng;
use serde::Serialize;

use crate::error::ConfigError;

/// Credence at or above which an agent runs its own experiment.
pub const EXPERIMENT_THRESHOLD: f64 = 0.5;

/// A dim x dim grid of credences in [0, 1], stored row-major.
///
/// Row and column indices wrap modulo `dim`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid {
    dim: usize,
    cells: Vec<f64>,
}

impl Grid {
    /// Builds a grid from row-major credences, checking shape and range.
    pub fn new(dim: usize, cells: Vec<f64>) -> Result<Self, ConfigError> {
        if dim == 0 {
            return Err(ConfigError::Dimension);
        }
        let expected = dim.checked_mul(dim).ok_or(ConfigError::Dimension)?;
        if cells.len() != expected {
            return Err(ConfigError::GridCells {
                expected,
                found: cells.len(),
            });
        }
        for (index, &value) in cells.iter().enumerate() {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Credence {
                    row: index / dim,
                    col: index % dim,
                    value,
                });
            }
        }
        Ok(Self { dim, cells })
    }

    /// Builds a grid from `dim` rows of `dim` credences.
    pub fn from_rows(dim: usize, rows: &[Vec<f64>]) -> Result<Self, ConfigError> {
        if dim == 0 {
            return Err(ConfigError::Dimension);
        }
        if rows.len() != dim {
            return Err(ConfigError::GridRows {
                expected: dim,
                found: rows.len(),
            });
        }
        if let Some((row, found)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != dim)
            .map(|(row, r)| (row, r.len()))
        {
            return Err(ConfigError::GridRowLength {
                row,
                expected: dim,
                found,
            });
        }
        Self::new(dim, rows.concat())
    }

    /// A grid where every agent holds the same credence.
    pub fn uniform(dim: usize, credence: f64) -> Result<Self, ConfigError> {
        let cells = dim.checked_mul(dim).ok_or(ConfigError::Dimension)?;
        Self::new(dim, vec![credence; cells])
    }

    /// A grid of credences drawn uniformly from [0, 1).
    pub fn random<R: Rng + ?Sized>(dim: usize, rng: &mut R) -> Result<Self, ConfigError> {
        let len = dim.checked_mul(dim).ok_or(ConfigError::Dimension)?;
        let cells = (0..len).map(|_| rng.gen::<f64>()).collect();
        Self::new(dim, cells)
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[f64] {
        &self.cells
    }

    /// Cell index of (row, col) after toroidal wrapping.
    pub fn wrap_index(&self, row: isize, col: isize) -> usize {
        wrap_index(self.dim, row, col)
    }

    pub fn get(&self, row: isize, col: isize) -> f64 {
        self.cells[self.wrap_index(row, col)]
    }

    /// The grid as `dim` rows of `dim` credences.
    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.cells.chunks(self.dim).map(|row| row.to_vec()).collect()
    }

    /// Number of agents currently running experiments.
    pub fn experimenters(&self) -> usize {
        self.cells
            .iter()
            .filter(|&&c| c >= EXPERIMENT_THRESHOLD)
            .count()
    }

    /// Exchanges the credence buffer with `buffer`, which must hold `len()` values.
    pub(crate) fn swap_cells(&mut self, buffer: &mut Vec<f64>) {
        debug_assert_eq!(buffer.len(), self.cells.len());
        std::mem::swap(&mut self.cells, buffer);
    }
}

/// Row-major index of (row, col) on a dim x dim torus.
pub fn wrap_index(dim: usize, row: isize, col: isize) -> usize {
    let d = dim as isize;
    (row.rem_euclid(d) * d + col.rem_euclid(d)) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_wrap_index() {
        assert_eq!(wrap_index(3, 0, 0), 0);
        assert_eq!(wrap_index(3, -1, -1), 8);
        assert_eq!(wrap_index(3, 3, 4), 1);
        assert_eq!(wrap_index(1, -5, 7), 0);
    }

    #[test]
    fn test_from_rows_checks_shape() {
        let ok = Grid::from_rows(2, &[vec![0.1, 0.2], vec![0.3, 0.4]]).unwrap();
        assert_eq!(ok.cells(), &[0.1, 0.2, 0.3, 0.4]);
        assert_eq!(ok.get(-1, 0), 0.3);

        let short = Grid::from_rows(2, &[vec![0.1, 0.2]]);
        assert!(matches!(short, Err(ConfigError::GridRows { expected: 2, found: 1 })));

        let ragged = Grid::from_rows(2, &[vec![0.1, 0.2], vec![0.3]]);
        assert!(matches!(
            ragged,
            Err(ConfigError::GridRowLength { row: 1, expected: 2, found: 1 })
        ));
    }

    #[test]
    fn test_rejects_out_of_range_credence() {
        let err = Grid::from_rows(2, &[vec![0.1, 1.2], vec![0.3, 0.4]]).unwrap_err();
        assert!(matches!(err, ConfigError::Credence { row: 0, col: 1, .. }));

        assert!(Grid::new(1, vec![f64::NAN]).is_err());
    }

    #[test]
    fn test_new_reports_cell_count() {
        let err = Grid::new(2, vec![0.1; 5]).unwrap_err();
        assert!(matches!(err, ConfigError::GridCells { expected: 4, found: 5 }));
        assert_eq!(err.to_string(), "initial grid has 5 cells, expected 4");

        assert!(matches!(
            Grid::new(usize::MAX, Vec::new()),
            Err(ConfigError::Dimension)
        ));
    }

    #[test]
    fn test_random_grid_in_range() {
        let mut rng = SmallRng::seed_from_u64(7);
        let grid = Grid::random(5, &mut rng).unwrap();
        assert_eq!(grid.len(), 25);
        assert!(grid.cells().iter().all(|c| (0.0..=1.0).contains(c)));
    }

    #[test]
    fn test_experimenters() {
        let grid = Grid::new(2, vec![0.5, 0.49, 0.9, 0.0]).unwrap();
        assert_eq!(grid.experimenters(), 2);

        assert_eq!(Grid::uniform(3, 0.7).unwrap().experimenters(), 9);
        assert_eq!(Grid::uniform(3, 0.2).unwrap().experimenters(), 0);
        assert!(Grid::uniform(2, 1.5).is_err());
    }
}
