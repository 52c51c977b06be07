//! Sample-based enclosures of a point map `f: R^D -> R^D`.

use super::{BoxMap, BoxSize, Enclosure, MultiBoxMap, SampledEnclosure, boxes_around};
use crate::geometry::rect::Rect;
use crate::geometry::sampling::SampleMode;
use crate::morse_error::MorseError;
use rand::{Rng, RngCore};

fn evaluate<F>(f: &F, points: &[Vec<f64>], dim: usize) -> Result<Vec<Vec<f64>>, MorseError>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    points
        .iter()
        .map(|x| {
            let y = f(x);
            if y.len() != dim {
                return Err(MorseError::DimensionMismatch {
                    expected: dim,
                    found: y.len(),
                });
            }
            Ok(y)
        })
        .collect()
}

/// Bounding box of `f` evaluated at the points chosen by `mode`.
///
/// For [`SampleMode::Random`] the returned [`Enclosure`] also carries the
/// sample points and their images.
///
/// # Errors
/// [`MorseError::EmptyImage`] if the mode produced no points (random mode with
/// zero samples); [`MorseError::DimensionMismatch`] if `f` changes dimension.
pub fn box_map_sample<F, R>(
    f: &F,
    rect: &Rect,
    mode: SampleMode,
    rng: &mut R,
) -> Result<Enclosure, MorseError>
where
    F: Fn(&[f64]) -> Vec<f64>,
    R: Rng + ?Sized,
{
    let samples = mode.points(rect, rng);
    let images = evaluate(f, &samples, rect.dim())?;
    let enclosure = Rect::hull(images.iter().map(Vec::as_slice))
        .ok_or_else(|| MorseError::EmptyImage(rect.as_slice().to_vec()))?;
    if mode.is_random() {
        Ok(Enclosure {
            rect: enclosure,
            samples,
            images,
        })
    } else {
        Ok(Enclosure {
            rect: enclosure,
            samples: Vec::new(),
            images: Vec::new(),
        })
    }
}

/// [`box_map_sample`] keeping only the enclosing rectangle.
pub fn box_map<F, R>(f: &F, rect: &Rect, mode: SampleMode, rng: &mut R) -> Result<Rect, MorseError>
where
    F: Fn(&[f64]) -> Vec<f64>,
    R: Rng + ?Sized,
{
    Ok(box_map_sample(f, rect, mode, rng)?.rect)
}

/// One small box per sampled image point.
///
/// Without an explicit `box_size` the boxes are proportional to the input
/// rectangle: half its size, or its full size in center mode.
pub fn multi_box_map<F, R>(
    f: &F,
    rect: &Rect,
    mode: SampleMode,
    box_size: Option<&BoxSize>,
    rng: &mut R,
) -> Result<Vec<Rect>, MorseError>
where
    F: Fn(&[f64]) -> Vec<f64>,
    R: Rng + ?Sized,
{
    let size = match box_size {
        Some(s) => s.resolve(rect.dim())?,
        None => {
            let factor = if mode == SampleMode::Center { 1.0 } else { 0.5 };
            rect.widths().into_iter().map(|w| factor * w).collect()
        }
    };
    let samples = mode.points(rect, rng);
    let images = evaluate(f, &samples, rect.dim())?;
    Ok(boxes_around(&images, &size))
}

/// A point map wrapped as a single-enclosure [`BoxMap`].
#[derive(Clone, Debug)]
pub struct SampledBoxMap<F> {
    f: F,
    mode: SampleMode,
}

impl<F> SampledBoxMap<F>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    pub fn new(f: F, mode: SampleMode) -> Self {
        Self { f, mode }
    }

    pub fn mode(&self) -> SampleMode {
        self.mode
    }
}

impl<F> SampledEnclosure for SampledBoxMap<F>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    fn enclosure(&self, rect: &Rect, rng: &mut dyn RngCore) -> Result<Enclosure, MorseError> {
        box_map_sample(&self.f, rect, self.mode, rng)
    }
}

impl<F> BoxMap for SampledBoxMap<F>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    fn image(&self, rect: &Rect, rng: &mut dyn RngCore) -> Result<Rect, MorseError> {
        box_map(&self.f, rect, self.mode, rng)
    }
}

/// A point map wrapped as a [`MultiBoxMap`].
#[derive(Clone, Debug)]
pub struct SampledMultiBoxMap<F> {
    f: F,
    mode: SampleMode,
    box_size: Option<BoxSize>,
}

impl<F> SampledMultiBoxMap<F>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    pub fn new(f: F, mode: SampleMode) -> Self {
        Self {
            f,
            mode,
            box_size: None,
        }
    }

    /// Use a fixed image-box size instead of one proportional to the input.
    pub fn box_size(mut self, size: BoxSize) -> Self {
        self.box_size = Some(size);
        self
    }
}

impl<F> MultiBoxMap for SampledMultiBoxMap<F>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    fn images(&self, rect: &Rect, rng: &mut dyn RngCore) -> Result<Vec<Rect>, MorseError> {
        multi_box_map(&self.f, rect, self.mode, self.box_size.as_ref(), rng)
    }
}
