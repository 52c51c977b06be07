//! Graph types: the cell transition digraph and the labeled DAG used for
//! Morse graphs and lattices.

pub mod dag;
pub mod digraph;

pub use dag::DirectedAcyclicGraph;
pub use digraph::CellDigraph;
