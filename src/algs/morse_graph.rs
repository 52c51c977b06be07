//! Morse graphs assembled from an external Morse decomposition.
//!
//! The recurrent components of the cell digraph and their partial order are
//! computed by a [`MorseDecomposer`]; Conley indices by a [`ConleyIndexSolver`].
//! This module only wires their results into a labeled
//! [`DirectedAcyclicGraph`].

use crate::algs::multivalued_map::compute_multivalued_map;
use crate::grid::CubicalGrid;
use crate::model::{MapKind, Model};
use crate::morse_error::MorseError;
use crate::topology::dag::DirectedAcyclicGraph;
use crate::topology::digraph::CellDigraph;
use rand::RngCore;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::collections::{BTreeMap, BTreeSet};

/// Label of a node whose Conley index could not be computed.
pub const UNDEFINED_LABEL: &str = "Undefined";

/// Poset of recurrent components of a cell digraph.
pub trait MorseDecomposition {
    /// Number of Morse nodes.
    fn size(&self) -> usize;
    /// Cells of Morse node `node`.
    fn morse_set(&self, node: usize) -> Vec<usize>;
    /// Nodes covered by `node` in the poset.
    fn children(&self, node: usize) -> Vec<usize>;
}

/// Computes a [`MorseDecomposition`] of a digraph.
pub trait MorseDecomposer {
    type Output: MorseDecomposition;

    fn decompose(&self, digraph: &CellDigraph) -> Result<Self::Output, MorseError>;
}

/// Computes the Conley index of an isolated invariant set.
pub trait ConleyIndexSolver {
    /// One invariant string per homological degree, or `None` if undefined.
    ///
    /// `x` is the neighbourhood, `a` its exit set, `adjacency` the map on `x`.
    fn conley_index(
        &self,
        x: &[usize],
        a: &[usize],
        grid_size: &[usize],
        periodic: &[bool],
        adjacency: &BTreeMap<usize, Vec<usize>>,
        acyclic_check: bool,
    ) -> Option<Vec<String>>;
}

/// Morse graph together with the data it was built from.
#[derive(Clone, Debug, PartialEq)]
pub struct MorseGraphData {
    pub morse_graph: DirectedAcyclicGraph,
    /// `vertex_mapping[node]` is the Morse-graph vertex of decomposition node `node`.
    pub vertex_mapping: Vec<usize>,
    /// `morse_sets[vertex]` lists the cells of Morse-graph vertex `vertex`.
    pub morse_sets: Vec<Vec<usize>>,
    pub digraph: CellDigraph,
}

/// Vertex numbering `node -> size - 1 - node`.
fn reversed_numbering(size: usize) -> Vec<usize> {
    (0..size).map(|v| size - 1 - v).collect()
}

fn assemble<M: MorseDecomposition>(decomposition: &M, digraph: CellDigraph) -> MorseGraphData {
    let size = decomposition.size();
    let vertex_mapping = reversed_numbering(size);
    let mut morse_graph = DirectedAcyclicGraph::new();
    let mut morse_sets = vec![Vec::new(); size];
    for node in 0..size {
        morse_graph.add_vertex(vertex_mapping[node]);
        let mut cells = decomposition.morse_set(node);
        cells.sort_unstable();
        morse_sets[vertex_mapping[node]] = cells;
    }
    for u in 0..size {
        for v in decomposition.children(u) {
            if let Some(&mv) = vertex_mapping.get(v) {
                morse_graph.add_edge(vertex_mapping[u], mv);
            } else {
                log::warn!("decomposition node {u} lists unknown child {v}");
            }
        }
    }
    log::debug!(
        "Morse graph: {} nodes, {} edges",
        morse_graph.num_vertices(),
        morse_graph.num_edges()
    );
    MorseGraphData {
        morse_graph,
        vertex_mapping,
        morse_sets,
        digraph,
    }
}

/// Build the cell digraph of `model`, decompose it and return the Morse graph.
pub fn compute_morse_graph<D: MorseDecomposer>(
    model: &Model,
    decomposer: &D,
    rng: &mut dyn RngCore,
) -> Result<MorseGraphData, MorseError> {
    let digraph = compute_multivalued_map(model, rng)?;
    let decomposition = decomposer.decompose(&digraph)?;
    Ok(assemble(&decomposition, digraph))
}

/// Conley label of a node: `"(a, b, ..)"`, or [`UNDEFINED_LABEL`].
pub fn conley_label(index: Option<&[String]>) -> String {
    match index {
        Some(parts) if !parts.is_empty() => format!("({})", parts.join(", ")),
        _ => UNDEFINED_LABEL.to_string(),
    }
}

/// [`compute_morse_graph`] with every vertex labeled by its Conley index.
///
/// For a Morse set `M` the neighbourhood is `X = F(M)`, the exit set is
/// `A = X \ M`, and the solver receives the map `F` on the cells of `X`.
pub fn compute_conley_morse_graph<D, C>(
    model: &Model,
    decomposer: &D,
    conley: &C,
    acyclic_check: bool,
    rng: &mut dyn RngCore,
) -> Result<MorseGraphData, MorseError>
where
    D: MorseDecomposer,
    C: ConleyIndexSolver + ?Sized,
{
    let mut data = compute_morse_graph(model, decomposer, rng)?;
    let grid_size = model.grid().grid_size();
    for (vertex, cells) in data.morse_sets.iter().enumerate() {
        let morse_set: BTreeSet<usize> = cells.iter().copied().collect();
        let x_cells: BTreeSet<usize> = cells
            .iter()
            .flat_map(|&u| data.digraph.adjacencies(u))
            .collect();
        let adjacency = data.digraph.local_map(&x_cells);
        let a: Vec<usize> = x_cells.difference(&morse_set).copied().collect();
        let x: Vec<usize> = x_cells.into_iter().collect();
        let index = conley.conley_index(
            &x,
            &a,
            grid_size,
            model.periodic(),
            &adjacency,
            acyclic_check,
        );
        let label = conley_label(index.as_deref());
        log::trace!("Morse node {vertex}: |X| = {}, |A| = {}, index {label}", x.len(), a.len());
        data.morse_graph.set_vertex_label(vertex, label)?;
    }
    Ok(data)
}

/// Conley-Morse graph of the multivalued map given by `edges` on a grid of
/// `grid_size` cells over the unit box.
///
/// Also returns the successor table built from `edges`.
pub fn morse_graph_from_edges<D, C>(
    edges: &[(usize, usize)],
    grid_size: &[usize],
    decomposer: &D,
    conley: &C,
) -> Result<(MorseGraphData, Vec<Vec<usize>>), MorseError>
where
    D: MorseDecomposer,
    C: ConleyIndexSolver + ?Sized,
{
    let dim = grid_size.len();
    let grid = CubicalGrid::new(vec![0.0; dim], vec![1.0; dim], grid_size.to_vec())?;
    let mut table = vec![Vec::new(); grid.size()];
    for &(u, v) in edges {
        let row = table.get_mut(u).ok_or(MorseError::CellOutOfRange {
            index: u,
            num_cells: grid.size(),
        })?;
        row.push(v);
    }
    let model = Model::new(grid, MapKind::GraphMap(table.clone()))?;
    // a graph map never draws random numbers
    let mut rng = SmallRng::seed_from_u64(0);
    let data = compute_conley_morse_graph(&model, decomposer, conley, true, &mut rng)?;
    Ok((data, table))
}

/// `true` for labels of the form `(0, 0, .., 0)`.
fn is_trivial_label(label: &str) -> bool {
    label
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .is_some_and(|inner| inner.split(',').all(|part| part.trim() == "0"))
}

/// Conley-Morse graph restricted to nodes with a non-trivial Conley index.
///
/// Kept nodes are joined when one reaches the other in the full graph, then
/// transitively implied edges are removed. Vertex labels are kept.
pub fn non_trivial_cm_graph(morse_graph: &DirectedAcyclicGraph) -> Result<DirectedAcyclicGraph, MorseError> {
    let mut kept = BTreeSet::new();
    let mut graph = DirectedAcyclicGraph::new();
    for v in morse_graph.vertices() {
        let label = morse_graph.vertex_label(v)?;
        if !is_trivial_label(label) {
            kept.insert(v);
            graph.add_vertex_with_label(v, label);
        }
    }
    for &v in &kept {
        for w in morse_graph.descendants(v) {
            if w != v && kept.contains(&w) {
                graph.add_edge(v, w);
            }
        }
    }
    graph.reduce_transitive_edges()?;
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed {
        sets: Vec<Vec<usize>>,
        children: Vec<Vec<usize>>,
    }

    impl MorseDecomposition for Fixed {
        fn size(&self) -> usize {
            self.sets.len()
        }
        fn morse_set(&self, node: usize) -> Vec<usize> {
            self.sets[node].clone()
        }
        fn children(&self, node: usize) -> Vec<usize> {
            self.children[node].clone()
        }
    }

    struct FixedDecomposer;

    impl MorseDecomposer for FixedDecomposer {
        type Output = Fixed;
        fn decompose(&self, digraph: &CellDigraph) -> Result<Fixed, MorseError> {
            assert_eq!(digraph.num_vertices(), 3);
            // 0 <-> 0 and 2 <-> 2 are recurrent; 1 flows into both
            Ok(Fixed {
                sets: vec![vec![0], vec![2]],
                children: vec![vec![], vec![]],
            })
        }
    }

    struct CountingConley;

    impl ConleyIndexSolver for CountingConley {
        fn conley_index(
            &self,
            x: &[usize],
            a: &[usize],
            _grid_size: &[usize],
            _periodic: &[bool],
            adjacency: &BTreeMap<usize, Vec<usize>>,
            _acyclic_check: bool,
        ) -> Option<Vec<String>> {
            assert_eq!(adjacency.len(), x.len());
            if a.is_empty() {
                Some(vec!["1".into(), "0".into()])
            } else {
                None
            }
        }
    }

    #[test]
    fn reversed_vertex_numbering() {
        assert_eq!(reversed_numbering(3), vec![2, 1, 0]);
        assert!(reversed_numbering(0).is_empty());
    }

    #[test]
    fn labels() {
        assert_eq!(conley_label(Some(&["1".to_string(), "0".to_string()][..])), "(1, 0)");
        assert_eq!(conley_label(None), UNDEFINED_LABEL);
        assert!(is_trivial_label("(0, 0, 0)"));
        assert!(!is_trivial_label("(1, 0)"));
        assert!(!is_trivial_label(UNDEFINED_LABEL));
    }

    #[test]
    fn conley_morse_graph_from_edges() {
        let edges = [(0, 0), (1, 0), (1, 2), (2, 2)];
        let (data, table) = morse_graph_from_edges(&edges, &[3], &FixedDecomposer, &CountingConley).unwrap();
        assert_eq!(table, vec![vec![0], vec![0, 2], vec![2]]);
        assert_eq!(data.vertex_mapping, vec![1, 0]);
        assert_eq!(data.morse_sets, vec![vec![2], vec![0]]);
        assert_eq!(data.morse_graph.num_vertices(), 2);
        assert_eq!(data.morse_graph.vertex_label(0).unwrap(), "(1, 0)");
    }

    #[test]
    fn trivial_nodes_are_skipped_but_order_is_kept() {
        let mut g = DirectedAcyclicGraph::new();
        g.add_vertex_with_label(0, "(0, 1)");
        g.add_vertex_with_label(1, "(0, 0)");
        g.add_vertex_with_label(2, "(1, 0)");
        g.add_vertex_with_label(3, "(1, 0)");
        g.add_edge(0, 1);
        g.add_edge(1, 2);
        g.add_edge(0, 3);
        g.add_edge(3, 2);
        let nt = non_trivial_cm_graph(&g).unwrap();
        assert_eq!(nt.vertices().collect::<Vec<_>>(), vec![0, 2, 3]);
        assert_eq!(nt.edges().collect::<Vec<_>>(), vec![(0, 3), (3, 2)]);
        assert_eq!(nt.vertex_label(3).unwrap(), "(1, 0)");
    }
}
