//! Weighted cell digraph approximating a transfer operator, and its spectra.
//!
//! Weights come from random-sampled enclosures: each covered successor cell
//! receives mass proportional to the number of sample images landing in it,
//! with one unit of mass for covered cells nobody landed in.

use crate::boxmap::SampledEnclosure;
use crate::grid::CubicalGrid;
use crate::morse_error::MorseError;
use crate::topology::digraph::CellDigraph;
use nalgebra::{Complex, DMatrix};
use rand::RngCore;
use std::collections::{BTreeMap, BTreeSet};

/// Per-cell image counts and the normalising mass of one source cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointCounts {
    /// Number of points attributed to each covered cell (zero entries included).
    pub counts: BTreeMap<usize, usize>,
    /// Sum of `counts` plus one per covered cell with a zero count.
    pub total: usize,
}

/// Attribute each point to its host cell and count hits among `covered`.
///
/// Points whose host cell is not covered are ignored. Without any point the
/// total equals the number of covered cells.
pub fn point_counts(points: &[Vec<f64>], covered: &BTreeSet<usize>, grid: &CubicalGrid) -> PointCounts {
    let mut counts: BTreeMap<usize, usize> = covered.iter().map(|&v| (v, 0)).collect();
    for x in points {
        match grid.cell_containing(x) {
            Some(cell) => match counts.get_mut(&cell) {
                Some(c) => *c += 1,
                None => log::warn!("sample image {x:?} lands in cell {cell} outside the cover"),
            },
            None => log::trace!("sample image {x:?} leaves the domain"),
        }
    }
    let total = counts.values().map(|&c| c.max(1)).sum();
    PointCounts { counts, total }
}

/// Cell digraph together with its edge weights.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeightedDigraph {
    pub digraph: CellDigraph,
    /// `w(u, v) = max(count(v), 1) / total(u)` for every edge.
    pub weights: BTreeMap<(usize, usize), f64>,
}

/// Build the digraph of `map` over `grid` and weight each edge by sample mass.
///
/// # Errors
/// Propagates enclosure errors and dimension mismatches.
pub fn weighted_adjacency_matrix(
    grid: &CubicalGrid,
    map: &dyn SampledEnclosure,
    padding: bool,
    rng: &mut dyn RngCore,
) -> Result<WeightedDigraph, MorseError> {
    let mut digraph = CellDigraph::new(grid.size());
    let mut weights = BTreeMap::new();
    for u in 0..grid.size() {
        let enclosure = map.enclosure(&grid.cell_box(u), rng)?;
        let covered = grid.try_grid_cover(&enclosure.rect, padding)?;
        let PointCounts { counts, total } = point_counts(&enclosure.images, &covered, grid);
        for (v, count) in counts {
            digraph.add_edge(u, v)?;
            weights.insert((u, v), count.max(1) as f64 / total as f64);
        }
    }
    log::debug!(
        "weighted digraph: {} cells, {} weighted edges",
        grid.size(),
        weights.len()
    );
    Ok(WeightedDigraph { digraph, weights })
}

/// Leading eigenvalues of the weight matrix restricted to `cells`.
#[derive(Clone, Debug, PartialEq)]
pub struct RestrictedSpectrum {
    /// Eigenvalues sorted by decreasing modulus.
    pub eigenvalues: Vec<Complex<f64>>,
    /// Transposed restriction: entry `(i, j)` is `w(cells[j], cells[i])`.
    pub matrix: DMatrix<f64>,
}

/// Eigenvalues of the transposed restriction of `weights` to `cells`.
///
/// At most `num_evals` values are returned, largest modulus first; an empty
/// cell list yields an empty spectrum.
///
/// Only eigenvalues are computed; no eigenvectors are returned. The whole
/// restriction is always decomposed with the dense Schur solver of `nalgebra`
/// and then cut down to `num_evals`, so there is no truncated iterative path
/// for large attractors.
pub fn attractor_eigenvalues(
    weights: &BTreeMap<(usize, usize), f64>,
    cells: &[usize],
    num_evals: usize,
) -> RestrictedSpectrum {
    let n = cells.len();
    let matrix = DMatrix::from_fn(n, n, |i, j| {
        weights.get(&(cells[j], cells[i])).copied().unwrap_or(0.0)
    });
    if n == 0 {
        return RestrictedSpectrum {
            eigenvalues: Vec::new(),
            matrix,
        };
    }
    let mut eigenvalues: Vec<Complex<f64>> = matrix.complex_eigenvalues().iter().copied().collect();
    eigenvalues.sort_by(|a, b| b.norm().total_cmp(&a.norm()));
    eigenvalues.truncate(num_evals);
    RestrictedSpectrum {
        eigenvalues,
        matrix,
    }
}
