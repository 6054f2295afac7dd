//! Neighborhood Construction
//!
//! Fixed-size neighbor lists on the toroidal grid. Each agent listens to a
//! square block of cells centred on itself; when `degree` is not the square
//! of an odd number the block is topped up with a random sample from the
//! next ring out.

use rand::seq::index;
use rand::Rng;
use serde::Serialize;

use crate::components::wrap_index;
use crate::error::ConfigError;

/// Neighbor lists for every cell of a dim x dim torus.
///
/// Each list holds exactly `degree` distinct cell indices and starts with
/// the cell itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NeighborhoodTable {
    dim: usize,
    degree: usize,
    neighbors: Vec<usize>,
}

impl NeighborhoodTable {
    /// Builds neighbor lists for every cell.
    ///
    /// Ring sampling draws from `rng`, so the table is reproducible for a
    /// seeded generator.
    pub fn build<R: Rng + ?Sized>(
        dim: usize,
        degree: usize,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        if dim == 0 {
            return Err(ConfigError::Dimension);
        }
        let cells = dim.checked_mul(dim).ok_or(ConfigError::Dimension)?;
        if degree == 0 || degree > cells {
            return Err(ConfigError::Degree { degree, cells });
        }

        let margin = inner_margin(degree);
        let mut neighbors = Vec::with_capacity(cells * degree);
        let mut marked = vec![false; cells];
        let mut inner = Vec::new();
        let mut ring = Vec::new();

        for cell in 0..cells {
            let (row, col) = (cell / dim, cell % dim);

            inner.clear();
            ring.clear();
            collect_block(dim, row, col, margin, &mut marked, &mut inner);
            if inner.len() < degree {
                collect_block(dim, row, col, margin + 1, &mut marked, &mut ring);
            }
            for &i in inner.iter().chain(ring.iter()) {
                marked[i] = false;
            }

            if inner.len() >= degree {
                inner.truncate(degree);
            } else {
                let needed = degree - inner.len();
                if ring.len() < needed {
                    return Err(ConfigError::Degree { degree, cells });
                }
                let picks = index::sample(rng, ring.len(), needed);
                inner.extend(picks.iter().map(|k| ring[k]));
            }

            neighbors.extend_from_slice(&inner);
        }

        tracing::debug!(dim, degree, margin, "built neighborhood table");

        Ok(Self {
            dim,
            degree,
            neighbors,
        })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Number of cells covered.
    pub fn len(&self) -> usize {
        self.dim * self.dim
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Neighbor indices of `cell`, self first.
    pub fn neighbors(&self, cell: usize) -> &[usize] {
        let start = cell * self.degree;
        &self.neighbors[start..start + self.degree]
    }

    pub fn iter(&self) -> impl Iterator<Item = &[usize]> {
        self.neighbors.chunks(self.degree)
    }
}

/// Half-width of the block that is always fully included.
///
/// The block side is the largest odd number whose square stays below the
/// smallest square covering `degree`.
pub fn inner_margin(degree: usize) -> usize {
    let side = (degree as f64).sqrt().ceil() as usize;
    (side / 2).saturating_sub(1)
}

/// Appends the unmarked cells of the (2*margin+1)^2 block around
/// (row, col) to `out`, marking each one. The centre cell comes first.
fn collect_block(
    dim: usize,
    row: usize,
    col: usize,
    margin: usize,
    marked: &mut [bool],
    out: &mut Vec<usize>,
) {
    let (row, col) = (row as isize, col as isize);
    let m = margin as isize;
    let offsets = std::iter::once((0, 0))
        .chain((-m..=m).flat_map(|dr| (-m..=m).map(move |dc| (dr, dc))));

    for (dr, dc) in offsets {
        let index = wrap_index(dim, row + dr, col + dc);
        if !marked[index] {
            marked[index] = true;
            out.push(index);
        }
    }
}
