//! Uniform cubical grid over a rectangular domain.
//!
//! Cells are numbered in mixed radix with the first axis varying fastest
//! (column-major), so `index(coordinates(i)) == i` for every cell.

use crate::geometry::rect::Rect;
use crate::morse_error::MorseError;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Plain-data description of a grid, used for (de)serialization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridBounds {
    pub lower_bounds: Vec<f64>,
    pub upper_bounds: Vec<f64>,
    pub grid_size: Vec<usize>,
}

/// Immutable uniform grid of `∏ grid_size[k]` cubes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridBounds", into = "GridBounds")]
pub struct CubicalGrid {
    lower_bounds: Vec<f64>,
    upper_bounds: Vec<f64>,
    grid_size: Vec<usize>,
    cube_sizes: Vec<f64>,
    num_cells: usize,
}

impl CubicalGrid {
    /// Validate the bounds and build the grid.
    ///
    /// # Errors
    /// [`MorseError::InvalidGrid`] if the dimension is zero, a lower bound is not
    /// strictly below its upper bound, or some axis has zero cells;
    /// [`MorseError::DimensionMismatch`] if the three vectors differ in length.
    pub fn new(
        lower_bounds: Vec<f64>,
        upper_bounds: Vec<f64>,
        grid_size: Vec<usize>,
    ) -> Result<Self, MorseError> {
        let dim = lower_bounds.len();
        if dim == 0 {
            return Err(MorseError::InvalidGrid("dimension must be non-zero".into()));
        }
        for len in [upper_bounds.len(), grid_size.len()] {
            if len != dim {
                return Err(MorseError::DimensionMismatch {
                    expected: dim,
                    found: len,
                });
            }
        }
        for k in 0..dim {
            if !(lower_bounds[k] < upper_bounds[k]) {
                return Err(MorseError::InvalidGrid(format!(
                    "axis {k}: lower bound {} must be below upper bound {}",
                    lower_bounds[k], upper_bounds[k]
                )));
            }
            if grid_size[k] == 0 {
                return Err(MorseError::InvalidGrid(format!(
                    "axis {k}: grid size must be positive"
                )));
            }
        }
        let cube_sizes = (0..dim)
            .map(|k| (upper_bounds[k] - lower_bounds[k]) / grid_size[k] as f64)
            .collect();
        let num_cells = grid_size.iter().product();
        Ok(Self {
            lower_bounds,
            upper_bounds,
            grid_size,
            cube_sizes,
            num_cells,
        })
    }

    /// Space dimension.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.lower_bounds.len()
    }

    /// Number of cells.
    #[inline]
    pub fn size(&self) -> usize {
        self.num_cells
    }

    #[inline]
    pub fn lower_bounds(&self) -> &[f64] {
        &self.lower_bounds
    }

    #[inline]
    pub fn upper_bounds(&self) -> &[f64] {
        &self.upper_bounds
    }

    #[inline]
    pub fn grid_size(&self) -> &[usize] {
        &self.grid_size
    }

    #[inline]
    pub fn cube_sizes(&self) -> &[f64] {
        &self.cube_sizes
    }

    /// Integer coordinates of cell `index` (first axis fastest).
    ///
    /// Outside `[0, size())` the result is meaningless; use
    /// [`try_coordinates`](Self::try_coordinates) for checked access.
    pub fn coordinates(&self, index: usize) -> Vec<usize> {
        let mut rest = index;
        self.grid_size
            .iter()
            .map(|&n| {
                let c = rest % n;
                rest /= n;
                c
            })
            .collect()
    }

    /// Cell index of integer coordinates `coords`.
    pub fn index(&self, coords: &[usize]) -> usize {
        coords
            .iter()
            .zip(&self.grid_size)
            .rev()
            .fold(0, |acc, (&c, &n)| acc * n + c)
    }

    pub fn try_coordinates(&self, index: usize) -> Result<Vec<usize>, MorseError> {
        if index >= self.num_cells {
            return Err(MorseError::CellOutOfRange {
                index,
                num_cells: self.num_cells,
            });
        }
        Ok(self.coordinates(index))
    }

    pub fn try_index(&self, coords: &[usize]) -> Result<usize, MorseError> {
        if coords.len() != self.dimension() {
            return Err(MorseError::DimensionMismatch {
                expected: self.dimension(),
                found: coords.len(),
            });
        }
        for (axis, (&coord, &size)) in coords.iter().zip(&self.grid_size).enumerate() {
            if coord >= size {
                return Err(MorseError::CoordinateOutOfRange { axis, coord, size });
            }
        }
        Ok(self.index(coords))
    }

    /// Real coordinates of the minimum corner of a cell.
    pub fn min_vertex(&self, index: usize) -> Vec<f64> {
        self.coordinates(index)
            .iter()
            .enumerate()
            .map(|(k, &c)| self.lower_bounds[k] + c as f64 * self.cube_sizes[k])
            .collect()
    }

    /// Real coordinates of the maximum corner of a cell.
    pub fn max_vertex(&self, index: usize) -> Vec<f64> {
        self.coordinates(index)
            .iter()
            .enumerate()
            .map(|(k, &c)| self.lower_bounds[k] + (c + 1) as f64 * self.cube_sizes[k])
            .collect()
    }

    /// The cell as a closed rectangle `min_vertex ++ max_vertex`.
    pub fn cell_box(&self, index: usize) -> Rect {
        let mut bounds = self.min_vertex(index);
        bounds.extend(self.max_vertex(index));
        Rect::from_vec_unchecked(bounds)
    }

    /// Every cell whose closed cube meets `rect`, clipped to the grid.
    /// A box with a NaN bound covers nothing.
    ///
    /// Per axis the first coordinate is `ceil((lo - lower) / h) - 1` so that a
    /// box starting exactly on a grid line also picks up the cell to its left;
    /// the last coordinate is `floor((hi - lower) / h)`. With `padding` both ends
    /// move out by one cell before clipping. A box lying entirely outside the
    /// domain on any axis covers nothing, with or without padding.
    ///
    /// The box must have the grid's dimension; see [`try_grid_cover`](Self::try_grid_cover).
    pub fn grid_cover(&self, rect: &Rect, padding: bool) -> BTreeSet<usize> {
        let dim = self.dimension();
        let (lo, hi) = (rect.lower(), rect.upper());
        if rect.as_slice().iter().any(|b| b.is_nan()) {
            return BTreeSet::new();
        }
        for k in 0..dim {
            if hi[k] < self.lower_bounds[k] || lo[k] > self.upper_bounds[k] {
                return BTreeSet::new();
            }
        }
        let pad = if padding { 1.0 } else { 0.0 };
        let mut ranges = Vec::with_capacity(dim);
        for k in 0..dim {
            // clamp in floating point; far-away bounds must not overflow the cast
            let top = (self.grid_size[k] - 1) as f64;
            let first = ((lo[k] - self.lower_bounds[k]) / self.cube_sizes[k]).ceil() - 1.0 - pad;
            let last = ((hi[k] - self.lower_bounds[k]) / self.cube_sizes[k]).floor() + pad;
            let first = first.max(0.0);
            let last = last.min(top);
            if first > last {
                return BTreeSet::new();
            }
            ranges.push(first as usize..=last as usize);
        }
        ranges
            .into_iter()
            .multi_cartesian_product()
            .map(|coords| self.index(&coords))
            .collect()
    }

    /// Dimension-checked [`grid_cover`](Self::grid_cover).
    pub fn try_grid_cover(&self, rect: &Rect, padding: bool) -> Result<BTreeSet<usize>, MorseError> {
        rect.check_dim(self.dimension())?;
        Ok(self.grid_cover(rect, padding))
    }

    /// The single cell hosting point `x`, or `None` outside the closed domain.
    ///
    /// Half-open per axis, `[lo, lo + h)`, except that the upper domain face
    /// belongs to the last cell.
    pub fn cell_containing(&self, x: &[f64]) -> Option<usize> {
        if x.len() != self.dimension() {
            return None;
        }
        let mut coords = Vec::with_capacity(x.len());
        for (k, &v) in x.iter().enumerate() {
            if v < self.lower_bounds[k] || v > self.upper_bounds[k] || v.is_nan() {
                return None;
            }
            let c = ((v - self.lower_bounds[k]) / self.cube_sizes[k]).floor() as usize;
            coords.push(c.min(self.grid_size[k] - 1));
        }
        Some(self.index(&coords))
    }
}

impl TryFrom<GridBounds> for CubicalGrid {
    type Error = MorseError;

    fn try_from(b: GridBounds) -> Result<Self, Self::Error> {
        CubicalGrid::new(b.lower_bounds, b.upper_bounds, b.grid_size)
    }
}

impl From<CubicalGrid> for GridBounds {
    fn from(g: CubicalGrid) -> Self {
        GridBounds {
            lower_bounds: g.lower_bounds,
            upper_bounds: g.upper_bounds,
            grid_size: g.grid_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_line(n: usize) -> CubicalGrid {
        CubicalGrid::new(vec![0.0], vec![1.0], vec![n]).unwrap()
    }

    #[test]
    fn first_axis_varies_fastest() {
        let g = CubicalGrid::new(vec![0.0, 0.0], vec![1.0, 1.0], vec![3, 2]).unwrap();
        assert_eq!(g.size(), 6);
        assert_eq!(g.coordinates(0), vec![0, 0]);
        assert_eq!(g.coordinates(1), vec![1, 0]);
        assert_eq!(g.coordinates(3), vec![0, 1]);
        assert_eq!(g.index(&[2, 1]), 5);
    }

    #[test]
    fn vertices_of_a_cell() {
        let g = CubicalGrid::new(vec![-1.0, 0.0], vec![1.0, 4.0], vec![4, 2]).unwrap();
        assert_eq!(g.cube_sizes(), &[0.5, 2.0]);
        assert_eq!(g.min_vertex(5), vec![-0.5, 2.0]);
        assert_eq!(g.max_vertex(5), vec![0.0, 4.0]);
        assert_eq!(g.cell_box(5).as_slice(), &[-0.5, 2.0, 0.0, 4.0]);
    }

    #[test]
    fn rejects_bad_configuration() {
        assert!(matches!(
            CubicalGrid::new(vec![], vec![], vec![]),
            Err(MorseError::InvalidGrid(_))
        ));
        assert!(matches!(
            CubicalGrid::new(vec![1.0], vec![0.0], vec![2]),
            Err(MorseError::InvalidGrid(_))
        ));
        assert!(matches!(
            CubicalGrid::new(vec![0.0], vec![1.0], vec![0]),
            Err(MorseError::InvalidGrid(_))
        ));
        assert!(matches!(
            CubicalGrid::new(vec![0.0], vec![1.0, 2.0], vec![2]),
            Err(MorseError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn cover_straddling_two_cells() {
        let g = unit_line(4);
        let r = Rect::new(vec![0.2, 0.3]).unwrap();
        assert_eq!(g.grid_cover(&r, false), BTreeSet::from([0, 1]));
    }

    #[test]
    fn cover_left_edge_on_grid_line_includes_left_neighbor() {
        let g = unit_line(4);
        // lo exactly on the 0.5 line: ceil(2) - 1 = 1
        let r = Rect::new(vec![0.5, 0.6]).unwrap();
        assert_eq!(g.grid_cover(&r, false), BTreeSet::from([1, 2]));
        // hi exactly on the 0.5 line: floor(2) = 2
        let r = Rect::new(vec![0.3, 0.5]).unwrap();
        assert_eq!(g.grid_cover(&r, false), BTreeSet::from([1, 2]));
    }

    #[test]
    fn cover_interior_box_and_padding() {
        let g = unit_line(8);
        let r = Rect::new(vec![0.40, 0.45]).unwrap();
        assert_eq!(g.grid_cover(&r, false), BTreeSet::from([3]));
        assert_eq!(g.grid_cover(&r, true), BTreeSet::from([2, 3, 4]));
    }

    #[test]
    fn cover_clips_to_domain() {
        let g = unit_line(4);
        let r = Rect::new(vec![-5.0, 0.1]).unwrap();
        assert_eq!(g.grid_cover(&r, true), BTreeSet::from([0, 1]));
        let r = Rect::new(vec![0.9, 7.0]).unwrap();
        assert_eq!(g.grid_cover(&r, false), BTreeSet::from([3]));
    }

    #[test]
    fn cover_far_out_of_range_bounds() {
        let g = unit_line(4);
        let r = Rect::new(vec![-1e30, 0.3]).unwrap();
        assert_eq!(g.grid_cover(&r, false), BTreeSet::from([0, 1]));
        let r = Rect::new(vec![-1e19, 0.3]).unwrap();
        assert_eq!(g.grid_cover(&r, true), BTreeSet::from([0, 1, 2]));
        let r = Rect::new(vec![0.6, 1e30]).unwrap();
        assert_eq!(g.grid_cover(&r, false), BTreeSet::from([2, 3]));
        assert_eq!(g.grid_cover(&r, true), BTreeSet::from([1, 2, 3]));
        let r = Rect::new(vec![f64::NEG_INFINITY, f64::INFINITY]).unwrap();
        assert_eq!(g.grid_cover(&r, false), BTreeSet::from([0, 1, 2, 3]));
    }

    #[test]
    fn cover_with_nan_bound_is_empty() {
        let g = unit_line(4);
        let r = Rect::centered(&[f64::NAN], &[0.1]);
        assert!(g.grid_cover(&r, false).is_empty());
        assert!(g.grid_cover(&r, true).is_empty());
    }

    #[test]
    fn cover_outside_is_empty() {
        let g = CubicalGrid::new(vec![0.0, 0.0], vec![1.0, 1.0], vec![4, 4]).unwrap();
        let r = Rect::from_bounds(&[0.2, 1.5], &[0.4, 2.0]).unwrap();
        assert!(g.grid_cover(&r, false).is_empty());
        assert!(g.grid_cover(&r, true).is_empty());
        let r = Rect::from_bounds(&[-2.0, 0.2], &[-1.0, 0.3]).unwrap();
        assert!(g.grid_cover(&r, true).is_empty());
    }

    #[test]
    fn dimension_checked_cover() {
        let g = unit_line(4);
        let r = Rect::from_bounds(&[0.0, 0.0], &[1.0, 1.0]).unwrap();
        assert!(matches!(
            g.try_grid_cover(&r, false),
            Err(MorseError::DimensionMismatch { expected: 1, found: 2 })
        ));
    }

    #[test]
    fn point_host_cell() {
        let g = unit_line(4);
        assert_eq!(g.cell_containing(&[0.0]), Some(0));
        assert_eq!(g.cell_containing(&[0.25]), Some(1));
        assert_eq!(g.cell_containing(&[1.0]), Some(3));
        assert_eq!(g.cell_containing(&[1.5]), None);
    }

    #[test]
    fn serde_round_trip_validates() {
        let g = CubicalGrid::new(vec![0.0, -1.0], vec![2.0, 1.0], vec![4, 8]).unwrap();
        let json = serde_json::to_string(&g).unwrap();
        let back: CubicalGrid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, g);
        let bad = r#"{"lower_bounds":[1.0],"upper_bounds":[0.0],"grid_size":[2]}"#;
        assert!(serde_json::from_str::<CubicalGrid>(bad).is_err());
    }
}
