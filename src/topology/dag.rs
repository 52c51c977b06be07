//! Labeled directed graph used for Morse graphs and their lattices.
//!
//! This module provides [`DirectedAcyclicGraph`], an in-memory graph over
//! `usize` vertices with optional string labels on vertices and edges. Both
//! edge directions are stored so that `adjacencies` and the reverse lookups
//! used by [`sinks`](DirectedAcyclicGraph::sinks) and
//! [`transpose`](DirectedAcyclicGraph::transpose) stay cheap.
//!
//! Acyclicity is an assumption of the transitive-reduction routines, not an
//! invariant enforced on insertion; [`topological_order`](DirectedAcyclicGraph::topological_order)
//! reports [`MorseError::CycleDetected`] when it is violated.

use crate::algs::reduction::transitive_reduction_dag;
use crate::debug_invariants::DebugInvariants;
use crate::morse_error::MorseError;
use once_cell::sync::OnceCell;
use std::collections::{BTreeMap, BTreeSet};

static NO_NEIGHBORS: BTreeSet<usize> = BTreeSet::new();

/// Directed graph with labeled vertices and edges.
///
/// Vertices and adjacency sets are kept in ordered maps so every iteration
/// (and therefore every derived lattice or text output) is deterministic.
#[derive(Clone, Debug, Default)]
pub struct DirectedAcyclicGraph {
    /// Vertex labels; the key set is the vertex set.
    vertex_labels: BTreeMap<usize, String>,
    /// Outgoing adjacency: `u -> {v}`.
    adjacency_out: BTreeMap<usize, BTreeSet<usize>>,
    /// Incoming adjacency: `v -> {u}`.
    adjacency_in: BTreeMap<usize, BTreeSet<usize>>,
    edge_labels: BTreeMap<(usize, usize), String>,
    /// Cached Kahn order, dropped on every mutation.
    topo: OnceCell<Vec<usize>>,
}

impl PartialEq for DirectedAcyclicGraph {
    fn eq(&self, other: &Self) -> bool {
        // edge_labels is keyed by the full edge set
        self.vertex_labels == other.vertex_labels && self.edge_labels == other.edge_labels
    }
}

impl Eq for DirectedAcyclicGraph {}

impl DirectedAcyclicGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from unlabeled edges.
    ///
    /// # Example
    /// ```rust
    /// use morse_lattice::topology::dag::DirectedAcyclicGraph;
    /// let g = DirectedAcyclicGraph::from_edges([(0, 1), (1, 2)]);
    /// assert_eq!(g.num_vertices(), 3);
    /// assert!(g.has_edge(1, 2));
    /// ```
    pub fn from_edges<I: IntoIterator<Item = (usize, usize)>>(edges: I) -> Self {
        let mut g = Self::new();
        for (u, v) in edges {
            g.add_edge(u, v);
        }
        g
    }

    /// Add `v` with an empty label. Re-adding an existing vertex is a no-op.
    pub fn add_vertex(&mut self, v: usize) {
        if !self.vertex_labels.contains_key(&v) {
            self.vertex_labels.insert(v, String::new());
            self.invalidate_cache();
        }
    }

    /// Add `v` with `label`. An existing vertex keeps its label and edges.
    pub fn add_vertex_with_label(&mut self, v: usize, label: impl Into<String>) {
        if !self.vertex_labels.contains_key(&v) {
            self.vertex_labels.insert(v, label.into());
            self.invalidate_cache();
        }
    }

    /// Overwrite the label of an existing vertex.
    pub fn set_vertex_label(&mut self, v: usize, label: impl Into<String>) -> Result<(), MorseError> {
        let slot = self
            .vertex_labels
            .get_mut(&v)
            .ok_or(MorseError::MissingVertex(v))?;
        *slot = label.into();
        Ok(())
    }

    /// Add `u -> v`, creating missing endpoints. An existing edge keeps its label.
    pub fn add_edge(&mut self, u: usize, v: usize) {
        self.add_vertex(u);
        self.add_vertex(v);
        if self.adjacency_out.entry(u).or_default().insert(v) {
            self.adjacency_in.entry(v).or_default().insert(u);
            self.edge_labels.insert((u, v), String::new());
            self.invalidate_cache();
        }
    }

    /// Add `u -> v` and set its label, replacing any previous one.
    pub fn add_edge_with_label(&mut self, u: usize, v: usize, label: impl Into<String>) {
        self.add_edge(u, v);
        self.edge_labels.insert((u, v), label.into());
    }

    /// Remove `u -> v`. Returns whether the edge was present.
    pub fn remove_edge(&mut self, u: usize, v: usize) -> bool {
        let removed = self
            .adjacency_out
            .get_mut(&u)
            .is_some_and(|outs| outs.remove(&v));
        if removed {
            if let Some(ins) = self.adjacency_in.get_mut(&v) {
                ins.remove(&u);
            }
            self.edge_labels.remove(&(u, v));
            self.invalidate_cache();
        }
        removed
    }

    /// Vertices in ascending order.
    pub fn vertices(&self) -> impl Iterator<Item = usize> + '_ {
        self.vertex_labels.keys().copied()
    }

    /// All `(u, v)` edges in lexicographic order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adjacency_out
            .iter()
            .flat_map(|(&u, outs)| outs.iter().map(move |&v| (u, v)))
    }

    /// Out-neighbors of `v`; empty for an unknown vertex.
    pub fn adjacencies(&self, v: usize) -> &BTreeSet<usize> {
        self.adjacency_out.get(&v).unwrap_or(&NO_NEIGHBORS)
    }

    /// In-neighbors of `v`; empty for an unknown vertex.
    pub fn predecessors(&self, v: usize) -> &BTreeSet<usize> {
        self.adjacency_in.get(&v).unwrap_or(&NO_NEIGHBORS)
    }

    #[inline]
    pub fn contains_vertex(&self, v: usize) -> bool {
        self.vertex_labels.contains_key(&v)
    }

    #[inline]
    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.adjacency_out.get(&u).is_some_and(|outs| outs.contains(&v))
    }

    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertex_labels.len()
    }

    pub fn num_edges(&self) -> usize {
        self.adjacency_out.values().map(BTreeSet::len).sum()
    }

    pub fn vertex_label(&self, v: usize) -> Result<&str, MorseError> {
        self.vertex_labels
            .get(&v)
            .map(String::as_str)
            .ok_or(MorseError::MissingVertex(v))
    }

    pub fn edge_label(&self, u: usize, v: usize) -> Result<&str, MorseError> {
        self.edge_labels
            .get(&(u, v))
            .map(String::as_str)
            .ok_or(MorseError::MissingEdge(u, v))
    }

    /// The unique vertex carrying `label`, or `None` if no vertex does.
    ///
    /// # Errors
    /// [`MorseError::NonUniqueVertexLabel`] if several vertices share the label.
    pub fn get_vertex_from_label(&self, label: &str) -> Result<Option<usize>, MorseError> {
        let mut hits = self
            .vertex_labels
            .iter()
            .filter(|(_, l)| l.as_str() == label)
            .map(|(&v, _)| v);
        let first = hits.next();
        if hits.next().is_some() {
            return Err(MorseError::NonUniqueVertexLabel(label.to_string()));
        }
        Ok(first)
    }

    /// Vertices reachable from `v`, including `v` itself.
    ///
    /// Empty if `v` is not a vertex.
    pub fn descendants(&self, v: usize) -> BTreeSet<usize> {
        let mut seen = BTreeSet::new();
        if !self.contains_vertex(v) {
            return seen;
        }
        let mut stack = vec![v];
        seen.insert(v);
        while let Some(u) = stack.pop() {
            for &w in self.adjacencies(u) {
                if seen.insert(w) {
                    stack.push(w);
                }
            }
        }
        seen
    }

    /// Vertices without outgoing edges.
    pub fn sinks(&self) -> Vec<usize> {
        self.vertices()
            .filter(|&v| self.adjacencies(v).is_empty())
            .collect()
    }

    /// Graph with every edge reversed; vertex and edge labels carry over.
    pub fn transpose(&self) -> Self {
        let mut t = Self::new();
        for (&v, label) in &self.vertex_labels {
            t.add_vertex_with_label(v, label.clone());
        }
        for ((u, v), label) in &self.edge_labels {
            t.add_edge_with_label(*v, *u, label.clone());
        }
        t
    }

    /// Same vertices with an edge `u -> v` (`u != v`) whenever `v` is reachable from `u`.
    ///
    /// Vertex labels and the labels of original edges are kept; implied
    /// edges are unlabeled.
    pub fn transitive_closure(&self) -> Self {
        let mut tc = Self::new();
        for (&v, label) in &self.vertex_labels {
            tc.add_vertex_with_label(v, label.clone());
        }
        for u in self.vertices() {
            for w in self.descendants(u) {
                if w != u {
                    tc.add_edge(u, w);
                }
            }
        }
        for ((u, v), label) in &self.edge_labels {
            if *u != *v {
                tc.edge_labels.insert((*u, *v), label.clone());
            }
        }
        tc
    }

    /// Remove every edge implied by a path of length two or more, in place.
    ///
    /// Returns the number of removed edges.
    ///
    /// # Errors
    /// [`MorseError::CycleDetected`] if the graph is not acyclic.
    pub fn reduce_transitive_edges(&mut self) -> Result<usize, MorseError> {
        let removed = transitive_reduction_dag(self)?;
        self.debug_assert_invariants();
        Ok(removed)
    }

    /// Copy of the graph with every transitively implied edge removed.
    ///
    /// # Errors
    /// [`MorseError::CycleDetected`] if the graph is not acyclic.
    pub fn transitive_reduction(&self) -> Result<Self, MorseError> {
        let mut g = self.clone();
        g.reduce_transitive_edges()?;
        Ok(g)
    }

    /// Kahn topological order (smallest ready vertex first); cached until the next mutation.
    pub fn topological_order(&self) -> Result<&[usize], MorseError> {
        self.topo
            .get_or_try_init(|| self.compute_topological_order())
            .map(Vec::as_slice)
    }

    fn compute_topological_order(&self) -> Result<Vec<usize>, MorseError> {
        let mut in_deg: BTreeMap<usize, usize> = self
            .vertices()
            .map(|v| (v, self.predecessors(v).len()))
            .collect();
        let mut ready: BTreeSet<usize> = in_deg
            .iter()
            .filter_map(|(&v, &d)| (d == 0).then_some(v))
            .collect();
        let mut order = Vec::with_capacity(in_deg.len());
        while let Some(u) = ready.pop_first() {
            order.push(u);
            for &w in self.adjacencies(u) {
                if let Some(d) = in_deg.get_mut(&w) {
                    *d -= 1;
                    if *d == 0 {
                        ready.insert(w);
                    }
                }
            }
        }
        if order.len() != self.num_vertices() {
            return Err(MorseError::CycleDetected);
        }
        Ok(order)
    }

    #[inline]
    fn invalidate_cache(&mut self) {
        self.topo.take();
    }
}

impl DebugInvariants for DirectedAcyclicGraph {
    fn validate_invariants(&self) -> Result<(), MorseError> {
        for (u, v) in self.edges() {
            if !self.contains_vertex(u) {
                return Err(MorseError::MissingVertex(u));
            }
            if !self.contains_vertex(v) {
                return Err(MorseError::MissingVertex(v));
            }
            if !self.predecessors(v).contains(&u) || !self.edge_labels.contains_key(&(u, v)) {
                return Err(MorseError::MissingEdge(u, v));
            }
        }
        for (&v, ins) in &self.adjacency_in {
            for &u in ins {
                if !self.has_edge(u, v) {
                    return Err(MorseError::MissingEdge(u, v));
                }
            }
        }
        if let Some(&(u, v)) = self.edge_labels.keys().find(|(u, v)| !self.has_edge(*u, *v)) {
            return Err(MorseError::MissingEdge(u, v));
        }
        Ok(())
    }
}
