//! Cubical grids: cell indexing, cell geometry and box covering.

pub mod cubical;

pub use cubical::{CubicalGrid, GridBounds};
