//! Enclosure ("box map") computations.
//!
//! A box map sends an input rectangle to a rectangle (or a list of small
//! rectangles) that approximately contains its image under some map. Two
//! families are provided:
//! - [`sampled`]: evaluate a point map at corners, centroid or random samples.
//! - [`data`]: look up the images of a finite point cloud `X -> Y`.
//!
//! Both plug into the digraph builder through the [`BoxMap`] and
//! [`MultiBoxMap`] traits. Every call receives the random source explicitly,
//! so seeded runs are reproducible; deterministic maps simply ignore it.

pub mod data;
pub mod sampled;

pub use data::{BoxMapData, BoxMapDataOptions, DataImage, EmptyImagePolicy};
pub use sampled::{
    SampledBoxMap, SampledMultiBoxMap, box_map, box_map_sample, multi_box_map,
};

use crate::geometry::rect::Rect;
use crate::morse_error::MorseError;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Single-enclosure map: one output rectangle per input rectangle.
pub trait BoxMap {
    fn image(&self, rect: &Rect, rng: &mut dyn RngCore) -> Result<Rect, MorseError>;
}

/// Set-valued map: a list of output rectangles per input rectangle.
pub trait MultiBoxMap {
    fn images(&self, rect: &Rect, rng: &mut dyn RngCore) -> Result<Vec<Rect>, MorseError>;
}

/// Enclosure together with the points it was computed from.
///
/// `samples`/`images` are only populated for random sampling, where the
/// weighted transfer operator needs them.
#[derive(Clone, Debug, PartialEq)]
pub struct Enclosure {
    pub rect: Rect,
    pub samples: Vec<Vec<f64>>,
    pub images: Vec<Vec<f64>>,
}

/// Box map that also exposes its sample images.
pub trait SampledEnclosure {
    fn enclosure(&self, rect: &Rect, rng: &mut dyn RngCore) -> Result<Enclosure, MorseError>;
}

impl<F> BoxMap for F
where
    F: Fn(&Rect) -> Result<Rect, MorseError>,
{
    fn image(&self, rect: &Rect, _rng: &mut dyn RngCore) -> Result<Rect, MorseError> {
        self(rect)
    }
}

impl<F> MultiBoxMap for F
where
    F: Fn(&Rect) -> Result<Vec<Rect>, MorseError>,
{
    fn images(&self, rect: &Rect, _rng: &mut dyn RngCore) -> Result<Vec<Rect>, MorseError> {
        self(rect)
    }
}

/// Size of the small boxes emitted around image points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BoxSize {
    /// Same edge length on every axis.
    Uniform(f64),
    /// One edge length per axis.
    PerAxis(Vec<f64>),
}

impl BoxSize {
    /// Edge lengths for a `dim`-dimensional box.
    pub fn resolve(&self, dim: usize) -> Result<Vec<f64>, MorseError> {
        match self {
            BoxSize::Uniform(s) => Ok(vec![*s; dim]),
            BoxSize::PerAxis(v) if v.len() == dim => Ok(v.clone()),
            BoxSize::PerAxis(v) => Err(MorseError::DimensionMismatch {
                expected: dim,
                found: v.len(),
            }),
        }
    }
}

/// Boxes of `size` centered at each image point.
pub(crate) fn boxes_around(points: &[Vec<f64>], size: &[f64]) -> Vec<Rect> {
    points.iter().map(|y| Rect::centered(y, size)).collect()
}
