//! Cell-to-cell transition digraph over `0..num_cells`.

use crate::morse_error::MorseError;
use std::collections::{BTreeMap, BTreeSet};

/// Directed graph whose vertices are exactly the cells `0..n`.
///
/// Self loops are kept; edges are deduplicated and iterate in ascending order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CellDigraph {
    adjacency: Vec<BTreeSet<usize>>,
}

impl CellDigraph {
    /// Edgeless digraph on `num_vertices` cells.
    pub fn new(num_vertices: usize) -> Self {
        Self {
            adjacency: vec![BTreeSet::new(); num_vertices],
        }
    }

    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.adjacency.len()
    }

    pub fn num_edges(&self) -> usize {
        self.adjacency.iter().map(BTreeSet::len).sum()
    }

    /// Insert `u -> v`. Returns `false` if the edge was already present.
    ///
    /// # Errors
    /// [`MorseError::CellOutOfRange`] if either endpoint is not a cell.
    pub fn add_edge(&mut self, u: usize, v: usize) -> Result<bool, MorseError> {
        let n = self.num_vertices();
        for w in [u, v] {
            if w >= n {
                return Err(MorseError::CellOutOfRange {
                    index: w,
                    num_cells: n,
                });
            }
        }
        Ok(self.adjacency[u].insert(v))
    }

    /// Successors of `u`; empty past the last cell.
    pub fn adjacencies(&self, u: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency.get(u).into_iter().flatten().copied()
    }

    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.adjacency.get(u).is_some_and(|s| s.contains(&v))
    }

    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(u, outs)| outs.iter().map(move |&v| (u, v)))
    }

    /// Successor lists indexed by cell.
    pub fn successor_lists(&self) -> Vec<Vec<usize>> {
        self.adjacency
            .iter()
            .map(|s| s.iter().copied().collect())
            .collect()
    }

    /// The map on the cells of `x`: each cell of `x` with its full successor list.
    pub fn local_map(&self, x: &BTreeSet<usize>) -> BTreeMap<usize, Vec<usize>> {
        x.iter()
            .map(|&u| (u, self.adjacencies(u).collect()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_are_checked_and_deduplicated() {
        let mut g = CellDigraph::new(3);
        assert!(g.add_edge(0, 1).unwrap());
        assert!(!g.add_edge(0, 1).unwrap());
        assert!(g.add_edge(2, 2).unwrap());
        assert_eq!(
            g.add_edge(0, 3),
            Err(MorseError::CellOutOfRange {
                index: 3,
                num_cells: 3
            })
        );
        assert_eq!(g.num_edges(), 2);
        assert_eq!(g.edges().collect::<Vec<_>>(), vec![(0, 1), (2, 2)]);
    }

    #[test]
    fn local_map_keeps_domain_cells_only() {
        let mut g = CellDigraph::new(4);
        for (u, v) in [(0, 1), (0, 3), (1, 2), (3, 0)] {
            g.add_edge(u, v).unwrap();
        }
        let x = BTreeSet::from([0, 1]);
        let f = g.local_map(&x);
        assert_eq!(f.len(), 2);
        assert_eq!(f[&0], vec![1, 3]);
        assert_eq!(f[&1], vec![2]);
    }
}
