//! Text formats: Morse-set CSV files and Graphviz descriptions.
//!
//! Readers take any [`std::io::Read`] and writers any [`std::io::Write`].

pub mod dot;
pub mod morse_sets;

pub use dot::{DotOptions, graph_to_dot, morse_graph_to_dot, write_dot};
pub use morse_sets::{load_morse_sets, num_morse_sets, save_morse_sets};
