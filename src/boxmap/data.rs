//! Box maps driven by a finite dataset `X -> Y`.
//!
//! Given parallel arrays of points `X` and their images `Y`, the image of a
//! rectangle is approximated by the images of the `X` points it contains.
//! What happens when a rectangle contains no `X` point is decided by the
//! [`EmptyImagePolicy`] chosen at construction.

use super::{BoxMap, BoxSize, MultiBoxMap, boxes_around};
use crate::geometry::rect::Rect;
use crate::morse_error::MorseError;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Behaviour for rectangles that contain no dataset point.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum EmptyImagePolicy {
    /// Double the rectangle about its center until it captures a point.
    #[default]
    Interp,
    /// Map to a sentinel box beyond the domain's upper corner (`+1..+2` per axis).
    Outside { upper_bounds: Vec<f64> },
    /// Report [`MorseError::EmptyImage`].
    Terminate,
}

impl EmptyImagePolicy {
    /// Parse a policy name (`interp`, `outside`, `terminate`).
    ///
    /// # Errors
    /// [`MorseError::InvalidEmptyImagePolicy`] for unknown names and
    /// [`MorseError::MissingDomainBounds`] for `outside` without bounds.
    pub fn from_name(name: &str, upper_bounds: Option<&[f64]>) -> Result<Self, MorseError> {
        match name {
            "interp" => Ok(Self::Interp),
            "terminate" => Ok(Self::Terminate),
            "outside" => upper_bounds
                .map(|ub| Self::Outside {
                    upper_bounds: ub.to_vec(),
                })
                .ok_or(MorseError::MissingDomainBounds),
            other => Err(MorseError::InvalidEmptyImagePolicy(other.to_string())),
        }
    }
}

/// Optional behaviour of [`BoxMapData`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxMapDataOptions {
    /// Return one box per image point instead of a single enclosure.
    pub multi_box: bool,
    /// Fixed size of the per-point boxes; proportional to the input when `None`.
    pub box_size: Option<BoxSize>,
    /// Proportionality factor used when `box_size` is `None`.
    pub box_size_factor: f64,
    /// Triple the search rectangle before the first lookup.
    pub domain_padding: bool,
    /// Widen the single enclosure by the input rectangle's size on every axis.
    pub padding: bool,
}

impl Default for BoxMapDataOptions {
    fn default() -> Self {
        Self {
            multi_box: false,
            box_size: None,
            box_size_factor: 1.0,
            domain_padding: false,
            padding: false,
        }
    }
}

/// Image of a rectangle under a [`BoxMapData`].
#[derive(Clone, Debug, PartialEq)]
pub enum DataImage {
    Single(Rect),
    Multi(Vec<Rect>),
}

/// Dataset-driven box map.
#[derive(Clone, Debug)]
pub struct BoxMapData {
    x: Vec<Vec<f64>>,
    y: Vec<Vec<f64>>,
    dim: usize,
    policy: EmptyImagePolicy,
    options: BoxMapDataOptions,
}

impl BoxMapData {
    /// Build from points `x` and their images `y`.
    ///
    /// # Errors
    /// - [`MorseError::EmptyDataset`] if `x` is empty.
    /// - [`MorseError::DatasetShapeMismatch`] if `x` and `y` differ in length.
    /// - [`MorseError::NonFiniteData`] if some `X` point has a NaN or infinite coordinate.
    /// - [`MorseError::DimensionMismatch`] if points have inconsistent
    ///   dimensions, or the policy bounds or box size do not match them.
    pub fn new(
        x: Vec<Vec<f64>>,
        y: Vec<Vec<f64>>,
        policy: EmptyImagePolicy,
        options: BoxMapDataOptions,
    ) -> Result<Self, MorseError> {
        if x.len() != y.len() {
            return Err(MorseError::DatasetShapeMismatch {
                x_len: x.len(),
                y_len: y.len(),
            });
        }
        let dim = x.first().map(Vec::len).ok_or(MorseError::EmptyDataset)?;
        for p in x.iter().chain(&y) {
            if p.len() != dim {
                return Err(MorseError::DimensionMismatch {
                    expected: dim,
                    found: p.len(),
                });
            }
        }
        if let Some(index) = x.iter().position(|p| p.iter().any(|v| !v.is_finite())) {
            return Err(MorseError::NonFiniteData { index });
        }
        if let EmptyImagePolicy::Outside { upper_bounds } = &policy {
            if upper_bounds.len() != dim {
                return Err(MorseError::DimensionMismatch {
                    expected: dim,
                    found: upper_bounds.len(),
                });
            }
        }
        if let Some(size) = &options.box_size {
            size.resolve(dim)?;
        }
        Ok(Self {
            x,
            y,
            dim,
            policy,
            options,
        })
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn policy(&self) -> &EmptyImagePolicy {
        &self.policy
    }

    #[inline]
    pub fn options(&self) -> &BoxMapDataOptions {
        &self.options
    }

    /// Images of the `X` points inside the closed rectangle.
    pub fn map_points(&self, rect: &Rect) -> Vec<Vec<f64>> {
        self.x
            .iter()
            .zip(&self.y)
            .filter(|(x, _)| rect.contains_point(x))
            .map(|(_, y)| y.clone())
            .collect()
    }

    /// Grow `rect` about its center (doubling its size each step) until it
    /// holds at least one `X` point, and return that neighbourhood's images.
    ///
    /// A rectangle with a NaN bound never captures a point and yields nothing.
    pub fn interpolate(&self, rect: &Rect) -> Vec<Vec<f64>> {
        if rect.as_slice().iter().any(|b| b.is_nan()) {
            return Vec::new();
        }
        let mut current = rect.clone();
        let mut images = self.map_points(&current);
        while images.is_empty() {
            let half: Vec<f64> = current
                .lower()
                .iter()
                .zip(current.upper())
                .map(|(lo, hi)| {
                    let w = hi - lo;
                    // a flat axis would never grow
                    if w > 0.0 {
                        w / 2.0
                    } else {
                        f64::EPSILON * lo.abs().max(1.0)
                    }
                })
                .collect();
            current = current.inflate(&half);
            images = self.map_points(&current);
        }
        images
    }

    /// Image points of `rect` after applying padding and the empty-image policy.
    ///
    /// `Ok(None)` means the policy mapped the rectangle outside the domain.
    fn image_points(&self, rect: &Rect) -> Result<Option<Vec<Vec<f64>>>, MorseError> {
        rect.check_dim(self.dim)?;
        let search = if self.options.domain_padding {
            rect.inflate(&rect.widths())
        } else {
            rect.clone()
        };
        let images = self.map_points(&search);
        if !images.is_empty() {
            return Ok(Some(images));
        }
        match &self.policy {
            EmptyImagePolicy::Terminate => Err(MorseError::EmptyImage(rect.as_slice().to_vec())),
            EmptyImagePolicy::Outside { .. } => Ok(None),
            EmptyImagePolicy::Interp => {
                let images = self.interpolate(rect);
                if images.is_empty() {
                    return Err(MorseError::EmptyImage(rect.as_slice().to_vec()));
                }
                Ok(Some(images))
            }
        }
    }

    fn outside_box(&self) -> Option<Rect> {
        match &self.policy {
            EmptyImagePolicy::Outside { upper_bounds } => {
                let lower: Vec<f64> = upper_bounds.iter().map(|b| b + 1.0).collect();
                let upper: Vec<f64> = upper_bounds.iter().map(|b| b + 2.0).collect();
                Rect::from_bounds(&lower, &upper).ok()
            }
            _ => None,
        }
    }

    /// Single enclosure of the images of the points inside `rect`.
    pub fn compute_box(&self, rect: &Rect) -> Result<Rect, MorseError> {
        let Some(images) = self.image_points(rect)? else {
            return self
                .outside_box()
                .ok_or_else(|| MorseError::EmptyImage(rect.as_slice().to_vec()));
        };
        let hull = Rect::hull(images.iter().map(Vec::as_slice))
            .ok_or_else(|| MorseError::EmptyImage(rect.as_slice().to_vec()))?;
        if self.options.padding {
            Ok(hull.inflate(&rect.widths()))
        } else {
            Ok(hull)
        }
    }

    /// One box per image point of `rect`.
    pub fn compute_boxes(&self, rect: &Rect) -> Result<Vec<Rect>, MorseError> {
        let Some(images) = self.image_points(rect)? else {
            return Ok(self.outside_box().into_iter().collect());
        };
        let size = match &self.options.box_size {
            Some(s) => s.resolve(self.dim)?,
            None => rect
                .widths()
                .into_iter()
                .map(|w| self.options.box_size_factor * w)
                .collect(),
        };
        Ok(boxes_around(&images, &size))
    }

    /// Image of `rect` in the shape selected by `options.multi_box`.
    pub fn compute(&self, rect: &Rect) -> Result<DataImage, MorseError> {
        if self.options.multi_box {
            self.compute_boxes(rect).map(DataImage::Multi)
        } else {
            self.compute_box(rect).map(DataImage::Single)
        }
    }
}

impl BoxMap for BoxMapData {
    fn image(&self, rect: &Rect, _rng: &mut dyn RngCore) -> Result<Rect, MorseError> {
        self.compute_box(rect)
    }
}

impl MultiBoxMap for BoxMapData {
    fn images(&self, rect: &Rect, _rng: &mut dyn RngCore) -> Result<Vec<Rect>, MorseError> {
        self.compute_boxes(rect)
    }
}
