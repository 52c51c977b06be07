//! Graph algorithms: multivalued maps, transfer operators, Morse graphs and lattices.

pub mod lattice;
pub mod morse_graph;
pub mod multivalued_map;
pub mod reduction;
pub mod transfer;

pub use lattice::{lattice_attractors, lattice_repellers};
pub use multivalued_map::compute_multivalued_map;
