#![cfg_attr(docsrs, feature(doc_cfg))]
//! # morse-lattice
//!
//! morse-lattice approximates the dynamics of a map on a rectangular domain
//! combinatorially. The domain is cut into a uniform cubical grid, each cell
//! is sent to an enclosure of its image, and the enclosures are covered by
//! cells to give a directed graph of cell transitions. An external solver
//! turns that digraph into a Morse graph; this crate then computes the
//! lattices of attractors and repellers of the Morse graph.
//!
//! ## Features
//! - [`grid::CubicalGrid`]: cell indexing and box covers
//! - [`boxmap`]: enclosures from sampled point maps or from datasets
//! - [`algs::multivalued_map`]: the cell digraph, plus a weighted variant in [`algs::transfer`]
//! - [`topology::DirectedAcyclicGraph`]: labeled DAG with closure and reduction
//! - [`algs::lattice`]: attractor and repeller lattices as Hasse diagrams
//! - [`io`]: Morse-set CSV files and Graphviz text
//!
//! ## Determinism
//!
//! Every sampling routine takes its random source as an argument. Tests and
//! benches use `SmallRng::seed_from_u64` so runs are reproducible.
//!
//! ## Usage
//! ```rust
//! use morse_lattice::prelude::*;
//! let g = DirectedAcyclicGraph::from_edges([(0, 1), (1, 2)]);
//! let lattice = lattice_attractors(&g).unwrap();
//! assert_eq!(lattice.sets.len(), 4);
//! ```

pub mod algs;
pub mod boxmap;
pub mod debug_invariants;
pub mod geometry;
pub mod grid;
pub mod io;
pub mod model;
pub mod morse_error;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::lattice::{
        LatticeGraph, VertexSet, attractor_cells, lattice_attractors, lattice_repellers,
        morse_graph_attractors, morse_graph_repellers,
    };
    pub use crate::algs::morse_graph::{
        ConleyIndexSolver, MorseDecomposer, MorseDecomposition, MorseGraphData,
        compute_conley_morse_graph, compute_morse_graph, morse_graph_from_edges,
        non_trivial_cm_graph,
    };
    pub use crate::algs::multivalued_map::compute_multivalued_map;
    pub use crate::algs::transfer::{attractor_eigenvalues, weighted_adjacency_matrix};
    pub use crate::boxmap::{
        BoxMap, BoxMapData, BoxMapDataOptions, BoxSize, EmptyImagePolicy, MultiBoxMap,
        SampledBoxMap, SampledEnclosure, SampledMultiBoxMap,
    };
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::geometry::{Rect, SampleMode};
    pub use crate::grid::CubicalGrid;
    pub use crate::model::{MapKind, Model};
    pub use crate::morse_error::MorseError;
    pub use crate::topology::{CellDigraph, DirectedAcyclicGraph};
}
