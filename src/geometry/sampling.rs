//! Point sampling inside a rectangle: corners, centroid, or uniform random draws.
//!
//! Random draws never touch ambient RNG state; callers hand in the generator.

use crate::geometry::rect::Rect;
use crate::morse_error::MorseError;
use itertools::Itertools;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How sample points are chosen inside an input box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SampleMode {
    /// All `2^D` corner points.
    #[default]
    Corners,
    /// The single centroid.
    Center,
    /// `num_pts` points drawn uniformly from the box.
    Random { num_pts: usize },
}

impl SampleMode {
    /// Default number of random points for enclosure maps.
    pub const DEFAULT_RANDOM_POINTS: usize = 100;

    /// Generate the sample points for `rect`.
    pub fn points<R: Rng + ?Sized>(&self, rect: &Rect, rng: &mut R) -> Vec<Vec<f64>> {
        match *self {
            SampleMode::Corners => corner_points(rect),
            SampleMode::Center => vec![center_point(rect)],
            SampleMode::Random { num_pts } => sample_points(rect, num_pts, rng),
        }
    }

    #[inline]
    pub fn is_random(&self) -> bool {
        matches!(self, SampleMode::Random { .. })
    }
}

impl FromStr for SampleMode {
    type Err = MorseError;

    /// Parses `corners`, `center` or `random`; random mode uses
    /// [`SampleMode::DEFAULT_RANDOM_POINTS`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "corners" => Ok(SampleMode::Corners),
            "center" => Ok(SampleMode::Center),
            "random" => Ok(SampleMode::Random {
                num_pts: Self::DEFAULT_RANDOM_POINTS,
            }),
            other => Err(MorseError::InvalidSampleMode(other.to_string())),
        }
    }
}

/// Corner points of a rectangle (Cartesian product of the axis intervals).
pub fn corner_points(rect: &Rect) -> Vec<Vec<f64>> {
    rect.lower()
        .iter()
        .zip(rect.upper())
        .map(|(&lo, &hi)| [lo, hi])
        .multi_cartesian_product()
        .collect()
}

/// Centroid of a rectangle.
pub fn center_point(rect: &Rect) -> Vec<f64> {
    rect.center()
}

/// `num_pts` points drawn uniformly from `rect`.
///
/// Degenerate axes (`lo == hi`) yield the fixed coordinate.
pub fn sample_points<R: Rng + ?Sized>(rect: &Rect, num_pts: usize, rng: &mut R) -> Vec<Vec<f64>> {
    (0..num_pts)
        .map(|_| {
            rect.lower()
                .iter()
                .zip(rect.upper())
                .map(|(&lo, &hi)| if lo < hi { rng.gen_range(lo..hi) } else { lo })
                .collect()
        })
        .collect()
}
