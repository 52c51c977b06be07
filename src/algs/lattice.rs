//! Attractor and repeller lattices of a Morse graph.
//!
//! An edge `v -> w` of the Morse graph means `w` lies downstream of `v`. The
//! down-set of a single vertex is an *elementary attractor*; every attractor
//! is a union of elementary ones, so the lattice is the join-closure of the
//! elementary attractors together with the empty set. Repellers are the
//! attractors of the transposed graph.
//!
//! All outputs are ordered deterministically: sets by `(size, members)`,
//! lattice vertices by that order.

use crate::morse_error::MorseError;
use crate::topology::dag::DirectedAcyclicGraph;
use itertools::Itertools;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// A set of Morse-graph vertices.
pub type VertexSet = BTreeSet<usize>;

#[inline]
fn comparable(a: &VertexSet, b: &VertexSet) -> bool {
    a.is_subset(b) || b.is_subset(a)
}

fn size_then_members(a: &VertexSet, b: &VertexSet) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// `{v} ∪ reach(v)` for every vertex, in vertex order.
pub fn elementary_attractors(morse_graph: &DirectedAcyclicGraph) -> Vec<VertexSet> {
    let tc = morse_graph.transitive_closure();
    tc.vertices()
        .map(|v| {
            let mut down = tc.adjacencies(v).clone();
            down.insert(v);
            down
        })
        .collect()
}

/// Every attractor of the Morse graph, including the empty one.
///
/// Each union is generated from the antichain of its maximal elementary
/// attractors: for every `A1`, all groups of later elementary attractors
/// that are pairwise incomparable with `A1` and with each other are
/// enumerated by extending copies of existing groups.
pub fn morse_graph_attractors(morse_graph: &DirectedAcyclicGraph) -> BTreeSet<VertexSet> {
    let elementary = elementary_attractors(morse_graph);
    let mut family: BTreeSet<VertexSet> = elementary.iter().cloned().collect();
    family.insert(VertexSet::new());
    for (i, a1) in elementary.iter().enumerate() {
        let candidates: Vec<&VertexSet> = elementary[i + 1..]
            .iter()
            .filter(|a| !comparable(a1, a))
            .collect();
        let mut combos: Vec<Vec<usize>> = Vec::new();
        for (k, cand) in candidates.iter().enumerate() {
            let extended: Vec<Vec<usize>> = combos
                .iter()
                .filter(|combo| combo.iter().all(|&m| !comparable(candidates[m], cand)))
                .map(|combo| {
                    let mut c = combo.clone();
                    c.push(k);
                    c
                })
                .collect();
            combos.extend(extended);
            combos.push(vec![k]);
        }
        for combo in &combos {
            let mut union = a1.clone();
            for &m in combo {
                union.extend(candidates[m]);
            }
            family.insert(union);
        }
    }
    log::debug!(
        "{} elementary attractors closed to {} attractors",
        elementary.len(),
        family.len()
    );
    family
}

/// Every repeller of the Morse graph: the attractors of its transpose.
pub fn morse_graph_repellers(morse_graph: &DirectedAcyclicGraph) -> BTreeSet<VertexSet> {
    morse_graph_attractors(&morse_graph.transpose())
}

/// Reference closure: unions over every subset of elementary attractors.
///
/// Exponential in the number of vertices; meant for cross-checking small graphs.
pub fn attractors_brute_force(morse_graph: &DirectedAcyclicGraph) -> BTreeSet<VertexSet> {
    elementary_attractors(morse_graph)
        .iter()
        .powerset()
        .map(|subset| subset.into_iter().flatten().copied().collect())
        .collect()
}

/// Hasse diagram of a family of vertex sets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LatticeGraph {
    /// One vertex per set, labeled `"{a, b}"` (`"{ }"` when empty).
    pub graph: DirectedAcyclicGraph,
    /// `sets[i]` is the set of lattice vertex `i`, sorted by size then members.
    pub sets: Vec<VertexSet>,
}

impl LatticeGraph {
    /// Lattice vertex holding exactly `set`.
    pub fn vertex_of(&self, set: &VertexSet) -> Option<usize> {
        self.sets
            .binary_search_by(|probe| size_then_members(probe, set))
            .ok()
    }
}

/// Display form of a vertex set: `"{ }"` or `"{0, 2}"`.
pub fn set_label(set: &VertexSet) -> String {
    if set.is_empty() {
        "{ }".to_string()
    } else {
        format!("{{{}}}", set.iter().join(", "))
    }
}

fn hasse_diagram(family: BTreeSet<VertexSet>, larger_to_smaller: bool) -> Result<LatticeGraph, MorseError> {
    let mut sets: Vec<VertexSet> = family.into_iter().collect();
    sets.sort_by(size_then_members);
    let mut graph = DirectedAcyclicGraph::new();
    for (i, s) in sets.iter().enumerate() {
        graph.add_vertex_with_label(i, set_label(s));
    }
    for (i, big) in sets.iter().enumerate() {
        for (j, small) in sets[..i].iter().enumerate() {
            if small.len() < big.len() && small.is_subset(big) {
                if larger_to_smaller {
                    graph.add_edge(i, j);
                } else {
                    graph.add_edge(j, i);
                }
            }
        }
    }
    graph.reduce_transitive_edges()?;
    log::debug!(
        "lattice with {} elements and {} covering relations",
        sets.len(),
        graph.num_edges()
    );
    Ok(LatticeGraph { graph, sets })
}

/// Attractor lattice, edges pointing from each attractor to the ones it covers.
///
/// # Errors
/// [`MorseError::CycleDetected`] cannot occur for a genuine inclusion order
/// and is only propagated from the reduction step.
pub fn lattice_attractors(morse_graph: &DirectedAcyclicGraph) -> Result<LatticeGraph, MorseError> {
    hasse_diagram(morse_graph_attractors(morse_graph), true)
}

/// Repeller lattice, edges pointing from each repeller to the ones covering it.
pub fn lattice_repellers(morse_graph: &DirectedAcyclicGraph) -> Result<LatticeGraph, MorseError> {
    hasse_diagram(morse_graph_repellers(morse_graph), false)
}

/// Grid cells of the lattice element `vertex`: the union of its Morse sets.
///
/// `morse_sets[node]` lists the cells of Morse node `node`.
pub fn attractor_cells(
    lattice: &LatticeGraph,
    vertex: usize,
    morse_sets: &[Vec<usize>],
) -> Result<Vec<usize>, MorseError> {
    let set = lattice
        .sets
        .get(vertex)
        .ok_or(MorseError::MissingVertex(vertex))?;
    let mut cells = BTreeSet::new();
    for &node in set {
        let ms = morse_sets.get(node).ok_or(MorseError::MissingVertex(node))?;
        cells.extend(ms.iter().copied());
    }
    Ok(cells.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(v: &[usize]) -> VertexSet {
        v.iter().copied().collect()
    }

    #[test]
    fn chain_lattice() {
        let g = DirectedAcyclicGraph::from_edges([(0, 1), (1, 2)]);
        assert_eq!(
            elementary_attractors(&g),
            vec![set(&[0, 1, 2]), set(&[1, 2]), set(&[2])]
        );
        let lat = lattice_attractors(&g).unwrap();
        assert_eq!(lat.sets, vec![set(&[]), set(&[2]), set(&[1, 2]), set(&[0, 1, 2])]);
        assert_eq!(lat.graph.edges().collect::<Vec<_>>(), vec![(1, 0), (2, 1), (3, 2)]);
        assert_eq!(lat.graph.vertex_label(2).unwrap(), "{1, 2}");
        assert_eq!(lat.graph.vertex_label(0).unwrap(), "{ }");
    }

    #[test]
    fn independent_pair_is_a_diamond() {
        let mut g = DirectedAcyclicGraph::new();
        g.add_vertex(0);
        g.add_vertex(1);
        let lat = lattice_attractors(&g).unwrap();
        assert_eq!(lat.sets, vec![set(&[]), set(&[0]), set(&[1]), set(&[0, 1])]);
        assert_eq!(
            lat.graph.edges().collect::<Vec<_>>(),
            vec![(1, 0), (2, 0), (3, 1), (3, 2)]
        );
    }

    #[test]
    fn pairwise_joins_of_three_antichain() {
        let mut g = DirectedAcyclicGraph::new();
        for v in 0..3 {
            g.add_vertex(v);
        }
        let fam = morse_graph_attractors(&g);
        assert_eq!(fam.len(), 8);
        assert!(fam.contains(&set(&[0, 1])) && fam.contains(&set(&[1, 2])));
        assert_eq!(fam, attractors_brute_force(&g));
    }

    #[test]
    fn repellers_point_upward() {
        let g = DirectedAcyclicGraph::from_edges([(0, 1), (1, 2)]);
        let lat = lattice_repellers(&g).unwrap();
        assert_eq!(lat.sets, vec![set(&[]), set(&[0]), set(&[0, 1]), set(&[0, 1, 2])]);
        assert_eq!(lat.graph.edges().collect::<Vec<_>>(), vec![(0, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn lookup_and_cells() {
        let g = DirectedAcyclicGraph::from_edges([(0, 1), (0, 2)]);
        let lat = lattice_attractors(&g).unwrap();
        let v = lat.vertex_of(&set(&[1, 2])).unwrap();
        let morse_sets = vec![vec![7], vec![3, 4], vec![1]];
        assert_eq!(attractor_cells(&lat, v, &morse_sets).unwrap(), vec![1, 3, 4]);
        assert_eq!(lat.vertex_of(&set(&[0])), None);
        assert_eq!(
            attractor_cells(&lat, 99, &morse_sets),
            Err(MorseError::MissingVertex(99))
        );
    }
}
