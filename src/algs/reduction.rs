//! Transitive reduction of a DAG with bitset reachability rows.

use crate::morse_error::MorseError;
use crate::topology::dag::DirectedAcyclicGraph;
use std::collections::HashMap;

/// Abstraction over reachability rows used in transitive algorithms.
trait ReachRow {
    /// Create a row able to track `n` bits.
    fn with_size(n: usize) -> Self;
    /// Set bit `i`.
    fn set(&mut self, i: usize);
    /// Read bit `i`.
    fn get(&self, i: usize) -> bool;
    /// Bitwise OR assignment with `other`.
    fn or_assign_from(&mut self, other: &Self);
}

/// Dense bitset implementation using `Vec<u64>` words.
#[derive(Clone)]
struct DenseRow {
    words: Vec<u64>,
}

impl ReachRow for DenseRow {
    #[inline]
    fn with_size(n: usize) -> Self {
        Self {
            words: vec![0; n.div_ceil(64)],
        }
    }
    #[inline]
    fn set(&mut self, i: usize) {
        self.words[i / 64] |= 1u64 << (i % 64);
    }
    #[inline]
    fn get(&self, i: usize) -> bool {
        (self.words[i / 64] >> (i % 64)) & 1 == 1
    }
    #[inline]
    fn or_assign_from(&mut self, other: &Self) {
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a |= *b;
        }
    }
}

/// Strict reachability rows indexed by position in `order`.
///
/// `order` must be topological: every edge goes from a lower to a higher
/// position. Row `i` then holds every position reachable from `order[i]`
/// by a path of length at least one.
fn reachability(g: &DirectedAcyclicGraph, order: &[usize], idx: &HashMap<usize, usize>) -> Vec<DenseRow> {
    let n = order.len();
    let mut reach: Vec<DenseRow> = (0..n).map(|_| DenseRow::with_size(n)).collect();
    for (ui, &u) in order.iter().enumerate().rev() {
        for v in g.adjacencies(u) {
            let vi = idx[v];
            // vi > ui in a topological order
            let (row_u, row_v) = {
                let (pre, suf) = reach.split_at_mut(vi);
                (&mut pre[ui], &suf[0])
            };
            row_u.or_assign_from(row_v);
            row_u.set(vi);
        }
    }
    reach
}

/// Remove all transitive edges in a **DAG**. Returns number of removed edges.
///
/// An edge `u -> v` is dropped when another successor `w` of `u` reaches `v`,
/// i.e. when a path of length two or more connects `u` to `v`.
///
/// # Errors
/// [`MorseError::CycleDetected`] if `g` has a cycle; the graph is left untouched.
///
/// # Complexity
/// - Time: ~`O(E + V * (V/64) + Σ_u deg(u)^2)`.
/// - Memory: `O(V * ⌈V/64⌉)` words.
pub fn transitive_reduction_dag(g: &mut DirectedAcyclicGraph) -> Result<usize, MorseError> {
    let order = g.topological_order()?.to_vec();
    let idx: HashMap<usize, usize> = order.iter().enumerate().map(|(i, &p)| (p, i)).collect();
    let reach = reachability(g, &order, &idx);
    let mut to_remove = Vec::new();
    for &u in &order {
        let neigh = g.adjacencies(u);
        for &v in neigh {
            let vi = idx[&v];
            let implied = neigh.iter().any(|&w| w != v && reach[idx[&w]].get(vi));
            if implied {
                to_remove.push((u, v));
            }
        }
    }
    for &(u, v) in &to_remove {
        g.remove_edge(u, v);
    }
    log::trace!(
        "transitive reduction removed {} of {} edges",
        to_remove.len(),
        g.num_edges() + to_remove.len()
    );
    Ok(to_remove.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_row_bits() {
        let mut a = DenseRow::with_size(130);
        let mut b = DenseRow::with_size(130);
        a.set(3);
        b.set(129);
        a.or_assign_from(&b);
        assert!(a.get(3) && a.get(129));
        assert!(!a.get(64));
    }

    #[test]
    fn diamond_with_shortcut() {
        let mut g = DirectedAcyclicGraph::from_edges([(0, 1), (1, 2), (0, 2), (2, 3), (0, 3)]);
        assert_eq!(transitive_reduction_dag(&mut g).unwrap(), 2);
        assert_eq!(g.edges().collect::<Vec<_>>(), vec![(0, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn cycle_is_rejected_without_mutation() {
        let mut g = DirectedAcyclicGraph::from_edges([(0, 1), (1, 0), (0, 2), (1, 2)]);
        let before = g.clone();
        assert_eq!(transitive_reduction_dag(&mut g), Err(MorseError::CycleDetected));
        assert_eq!(g, before);
    }
}
