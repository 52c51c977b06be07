//! MorseError: Unified error type for morse-lattice public APIs
//!
//! Every fallible operation in the crate reports through this enum so callers
//! can propagate with `?` from grid construction all the way to lattice output.

use thiserror::Error;

/// Unified error type for morse-lattice operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MorseError {
    /// A box, point or rectangle does not match the configured dimension.
    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
    /// Grid bounds or sizes are unusable (empty, inverted, zero-sized).
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),
    /// A rectangle with an odd or empty bound list, or with `lo > hi` (or NaN) on some axis.
    #[error("Invalid rectangle: {0}")]
    InvalidRect(String),
    /// A dataset point or image with a NaN or infinite coordinate.
    #[error("Dataset point {index} has a non-finite coordinate")]
    NonFiniteData { index: usize },
    /// A cell index outside `[0, num_cells)`.
    #[error("Cell index {index} out of range (grid has {num_cells} cells)")]
    CellOutOfRange { index: usize, num_cells: usize },
    /// An integer coordinate outside `[0, grid_size[axis])`.
    #[error("Coordinate {coord} on axis {axis} out of range (size {size})")]
    CoordinateOutOfRange { axis: usize, coord: usize, size: usize },
    /// The `outside` empty-image policy needs the domain upper bounds.
    #[error("Domain bounds must be provided for the 'outside' empty-image policy")]
    MissingDomainBounds,
    /// Unknown empty-image policy name.
    #[error("Invalid empty-image policy `{0}`; allowed values are 'interp', 'outside' or 'terminate'")]
    InvalidEmptyImagePolicy(String),
    /// Unknown sampling mode name.
    #[error("Invalid sample mode `{0}`; allowed values are 'corners', 'center' or 'random'")]
    InvalidSampleMode(String),
    /// No data point lies in the rectangle and the policy is `terminate`.
    #[error("Rectangle {0:?} has empty image")]
    EmptyImage(Vec<f64>),
    /// A dataset map was built from an empty point cloud.
    #[error("Dataset must contain at least one point")]
    EmptyDataset,
    /// `X` and `Y` must be parallel arrays.
    #[error("Dataset shape mismatch: {x_len} points in X but {y_len} in Y")]
    DatasetShapeMismatch { x_len: usize, y_len: usize },
    /// More than one vertex carries the requested label.
    #[error("Non-unique vertex label `{0}`")]
    NonUniqueVertexLabel(String),
    /// The vertex is not part of the graph.
    #[error("Vertex {0} not found in graph")]
    MissingVertex(usize),
    /// The edge is not part of the graph.
    #[error("Edge {0} -> {1} not found in graph")]
    MissingEdge(usize, usize),
    /// A `GraphMap` successor table must list every cell.
    #[error("Graph map lists {found} cells, expected {expected}")]
    GraphMapLength { expected: usize, found: usize },
    /// Malformed Morse-set CSV content.
    #[error("Morse set parse error: {0}")]
    MorseSetParse(String),
    /// Underlying reader/writer failure.
    #[error("I/O error: {0}")]
    Io(String),
    /// The graph contains a cycle; expected a DAG.
    #[error("Topology error: cycle detected in graph (expected DAG)")]
    CycleDetected,
}

impl From<std::io::Error> for MorseError {
    fn from(err: std::io::Error) -> Self {
        MorseError::Io(err.to_string())
    }
}
