//! Geometry utilities for morse-lattice.
//!
//! This module provides the flat-layout [`Rect`] box type and the point
//! samplers used by enclosure maps.

pub mod rect;
pub mod sampling;

pub use rect::Rect;
pub use sampling::{SampleMode, center_point, corner_points, sample_points};
