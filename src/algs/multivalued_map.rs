//! Outer approximation of a map as a cell digraph.

use crate::model::{MapKind, Model};
use crate::morse_error::MorseError;
use crate::topology::digraph::CellDigraph;
use rand::RngCore;
use std::collections::BTreeSet;

/// Successor cells of `cell` under the model's map.
///
/// # Errors
/// Propagates enclosure errors (e.g. [`MorseError::EmptyImage`]) and
/// [`MorseError::DimensionMismatch`] for enclosures of the wrong dimension.
pub fn cell_successors(
    model: &Model,
    cell: usize,
    rng: &mut dyn RngCore,
) -> Result<BTreeSet<usize>, MorseError> {
    let grid = model.grid();
    match model.map() {
        MapKind::GraphMap(table) => table
            .get(cell)
            .map(|succ| succ.iter().copied().collect())
            .ok_or(MorseError::CellOutOfRange {
                index: cell,
                num_cells: table.len(),
            }),
        MapKind::BoxMap(f) => {
            let image = f.image(&grid.cell_box(cell), rng)?;
            grid.try_grid_cover(&image, model.padding())
        }
        MapKind::MultiBoxMap(f) => {
            let mut succ = BTreeSet::new();
            for image in f.images(&grid.cell_box(cell), rng)? {
                succ.extend(grid.try_grid_cover(&image, model.padding())?);
            }
            Ok(succ)
        }
    }
}

/// Digraph on every grid cell with an edge `u -> v` for each successor `v` of `u`.
///
/// # Example
/// ```rust
/// use morse_lattice::grid::CubicalGrid;
/// use morse_lattice::model::{MapKind, Model};
/// use morse_lattice::algs::multivalued_map::compute_multivalued_map;
/// use rand::{SeedableRng, rngs::SmallRng};
/// let grid = CubicalGrid::new(vec![0.0], vec![1.0], vec![2]).unwrap();
/// let model = Model::new(grid, MapKind::GraphMap(vec![vec![1], vec![0, 1]])).unwrap();
/// let g = compute_multivalued_map(&model, &mut SmallRng::seed_from_u64(0)).unwrap();
/// assert_eq!(g.num_edges(), 3);
/// ```
pub fn compute_multivalued_map(
    model: &Model,
    rng: &mut dyn RngCore,
) -> Result<CellDigraph, MorseError> {
    let num_cells = model.grid().size();
    let mut digraph = CellDigraph::new(num_cells);
    for u in 0..num_cells {
        let succ = cell_successors(model, u, rng)?;
        log::trace!("cell {u}: {} successors", succ.len());
        for v in succ {
            digraph.add_edge(u, v)?;
        }
    }
    log::debug!(
        "multivalued map: {} cells, {} edges",
        num_cells,
        digraph.num_edges()
    );
    Ok(digraph)
}
