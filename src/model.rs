//! Dynamical model configuration: the grid plus how each cell's image is obtained.

use crate::boxmap::{BoxMap, MultiBoxMap};
use crate::grid::CubicalGrid;
use crate::morse_error::MorseError;
use std::fmt;

/// The three ways a model can describe cell images.
pub enum MapKind {
    /// Explicit successor cells per cell, used as-is.
    GraphMap(Vec<Vec<usize>>),
    /// One enclosure per cell box, covered by grid cells.
    BoxMap(Box<dyn BoxMap>),
    /// Several enclosures per cell box; successors are the union of their covers.
    MultiBoxMap(Box<dyn MultiBoxMap>),
}

impl fmt::Debug for MapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapKind::GraphMap(table) => f.debug_tuple("GraphMap").field(&table.len()).finish(),
            MapKind::BoxMap(_) => f.write_str("BoxMap"),
            MapKind::MultiBoxMap(_) => f.write_str("MultiBoxMap"),
        }
    }
}

/// Validated model: grid, map, cover padding and per-axis periodicity.
#[derive(Debug)]
pub struct Model {
    grid: CubicalGrid,
    map: MapKind,
    padding: bool,
    periodic: Vec<bool>,
}

impl Model {
    /// Combine a grid with a map description; no padding, no periodic axes.
    ///
    /// # Errors
    /// For [`MapKind::GraphMap`]: [`MorseError::GraphMapLength`] if the table
    /// does not have one row per cell, and [`MorseError::CellOutOfRange`] if
    /// it names a cell past the grid.
    pub fn new(grid: CubicalGrid, map: MapKind) -> Result<Self, MorseError> {
        if let MapKind::GraphMap(table) = &map {
            let num_cells = grid.size();
            if table.len() != num_cells {
                return Err(MorseError::GraphMapLength {
                    expected: num_cells,
                    found: table.len(),
                });
            }
            if let Some(&index) = table.iter().flatten().find(|&&v| v >= num_cells) {
                return Err(MorseError::CellOutOfRange { index, num_cells });
            }
        }
        let periodic = vec![false; grid.dimension()];
        Ok(Self {
            grid,
            map,
            padding: false,
            periodic,
        })
    }

    /// Pad every cover by one cell on each side.
    pub fn with_padding(mut self, padding: bool) -> Self {
        self.padding = padding;
        self
    }

    /// Per-axis periodicity flags handed to the Conley-index solver.
    pub fn with_periodic(mut self, periodic: Vec<bool>) -> Result<Self, MorseError> {
        if periodic.len() != self.grid.dimension() {
            return Err(MorseError::DimensionMismatch {
                expected: self.grid.dimension(),
                found: periodic.len(),
            });
        }
        self.periodic = periodic;
        Ok(self)
    }

    #[inline]
    pub fn grid(&self) -> &CubicalGrid {
        &self.grid
    }

    #[inline]
    pub fn map(&self) -> &MapKind {
        &self.map
    }

    #[inline]
    pub fn padding(&self) -> bool {
        self.padding
    }

    #[inline]
    pub fn periodic(&self) -> &[bool] {
        &self.periodic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    fn line(n: usize) -> CubicalGrid {
        CubicalGrid::new(vec![0.0], vec![1.0], vec![n]).unwrap()
    }

    #[test]
    fn graph_map_is_validated() {
        assert!(matches!(
            Model::new(line(3), MapKind::GraphMap(vec![vec![1], vec![2]])),
            Err(MorseError::GraphMapLength {
                expected: 3,
                found: 2
            })
        ));
        assert!(matches!(
            Model::new(line(2), MapKind::GraphMap(vec![vec![1], vec![5]])),
            Err(MorseError::CellOutOfRange {
                index: 5,
                num_cells: 2
            })
        ));
    }

    #[test]
    fn builder_options() {
        let f = |r: &Rect| -> Result<Rect, MorseError> { Ok(r.clone()) };
        let m = Model::new(line(4), MapKind::BoxMap(Box::new(f)))
            .unwrap()
            .with_padding(true)
            .with_periodic(vec![true])
            .unwrap();
        assert!(m.padding());
        assert_eq!(m.periodic(), &[true]);
        assert!(matches!(m.map(), MapKind::BoxMap(_)));
        let m = Model::new(line(4), MapKind::GraphMap(vec![vec![]; 4])).unwrap();
        assert!(m.with_periodic(vec![true, false]).is_err());
    }
}
