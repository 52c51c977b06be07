//! Axis-aligned closed rectangles in the flat `[lo_0..lo_{D-1}, hi_0..hi_{D-1}]` layout.

use crate::morse_error::MorseError;
use serde::{Deserialize, Serialize};

/// A closed axis-aligned box stored as `[lower.., upper..]`.
///
/// Degenerate boxes (`lo == hi` on some axis) are allowed; a point is the box
/// whose lower and upper corners coincide.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Rect(Vec<f64>);

impl Rect {
    /// Wrap a flat `[lo.., hi..]` vector.
    ///
    /// # Errors
    /// [`MorseError::InvalidRect`] if the length is zero or odd, or if
    /// `lo_k <= hi_k` fails on some axis (NaN bounds included).
    pub fn new(bounds: Vec<f64>) -> Result<Self, MorseError> {
        if bounds.is_empty() || bounds.len() % 2 != 0 {
            return Err(MorseError::InvalidRect(format!(
                "expected a non-empty even number of bounds, found {}",
                bounds.len()
            )));
        }
        let dim = bounds.len() / 2;
        if let Some(k) = (0..dim).find(|&k| !(bounds[k] <= bounds[dim + k])) {
            return Err(MorseError::InvalidRect(format!(
                "axis {k}: lower bound {} exceeds upper bound {}",
                bounds[k],
                bounds[dim + k]
            )));
        }
        Ok(Self(bounds))
    }

    /// Wrap bounds already known to have the `[lo.., hi..]` shape.
    pub(crate) fn from_vec_unchecked(bounds: Vec<f64>) -> Self {
        debug_assert!(!bounds.is_empty() && bounds.len() % 2 == 0);
        Self(bounds)
    }

    /// Build from separate lower and upper corners.
    pub fn from_bounds(lower: &[f64], upper: &[f64]) -> Result<Self, MorseError> {
        if lower.len() != upper.len() {
            return Err(MorseError::DimensionMismatch {
                expected: lower.len(),
                found: upper.len(),
            });
        }
        let mut bounds = Vec::with_capacity(2 * lower.len());
        bounds.extend_from_slice(lower);
        bounds.extend_from_slice(upper);
        Self::new(bounds)
    }

    /// The degenerate box `[x, x]`.
    pub fn point(x: &[f64]) -> Result<Self, MorseError> {
        Self::from_bounds(x, x)
    }

    /// Componentwise bounding box of a non-empty point set.
    ///
    /// Returns `None` for an empty input.
    pub fn hull<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a [f64]>,
    {
        let mut it = points.into_iter();
        let first = it.next()?;
        let mut lower = first.to_vec();
        let mut upper = first.to_vec();
        for p in it {
            for (k, &x) in p.iter().enumerate().take(lower.len()) {
                lower[k] = lower[k].min(x);
                upper[k] = upper[k].max(x);
            }
        }
        lower.extend(upper);
        Some(Self(lower))
    }

    /// Box of the given `size` centered at `center`.
    pub fn centered(center: &[f64], size: &[f64]) -> Self {
        let lower = center.iter().zip(size).map(|(c, s)| c - 0.5 * s);
        let upper = center.iter().zip(size).map(|(c, s)| c + 0.5 * s);
        Self(lower.chain(upper).collect())
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.0.len() / 2
    }

    #[inline]
    pub fn lower(&self) -> &[f64] {
        &self.0[..self.dim()]
    }

    #[inline]
    pub fn upper(&self) -> &[f64] {
        &self.0[self.dim()..]
    }

    /// Flat `[lo.., hi..]` view.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.0
    }

    pub fn widths(&self) -> Vec<f64> {
        self.lower()
            .iter()
            .zip(self.upper())
            .map(|(lo, hi)| hi - lo)
            .collect()
    }

    pub fn center(&self) -> Vec<f64> {
        self.lower()
            .iter()
            .zip(self.upper())
            .map(|(lo, hi)| (lo + hi) / 2.0)
            .collect()
    }

    /// `true` when every bound is a finite number.
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|b| b.is_finite())
    }

    /// Closed membership test, inclusive on both ends of every axis.
    pub fn contains_point(&self, x: &[f64]) -> bool {
        x.len() == self.dim()
            && x
                .iter()
                .zip(self.lower().iter().zip(self.upper()))
                .all(|(v, (lo, hi))| *lo <= *v && *v <= *hi)
    }

    /// Grow by `amount[k]` on both sides of axis `k`.
    pub fn inflate(&self, amount: &[f64]) -> Self {
        let lower = self.lower().iter().zip(amount).map(|(lo, a)| lo - a);
        let upper = self.upper().iter().zip(amount).map(|(hi, a)| hi + a);
        Self(lower.chain(upper).collect())
    }

    pub(crate) fn check_dim(&self, dim: usize) -> Result<(), MorseError> {
        if self.dim() != dim {
            return Err(MorseError::DimensionMismatch {
                expected: dim,
                found: self.dim(),
            });
        }
        Ok(())
    }
}

impl TryFrom<Vec<f64>> for Rect {
    type Error = MorseError;

    fn try_from(bounds: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(bounds)
    }
}

impl From<Rect> for Vec<f64> {
    fn from(rect: Rect) -> Self {
        rect.0
    }
}

impl AsRef<[f64]> for Rect {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::Rect;

    use crate::morse_error::MorseError;

    #[test]
    fn rejects_odd_layouts() {
        assert!(matches!(Rect::new(vec![0.0, 1.0, 2.0]), Err(MorseError::InvalidRect(_))));
        assert!(matches!(Rect::new(vec![]), Err(MorseError::InvalidRect(_))));
    }

    #[test]
    fn rejects_inverted_and_nan_bounds() {
        assert!(matches!(Rect::new(vec![1.0, 0.0]), Err(MorseError::InvalidRect(_))));
        assert!(matches!(
            Rect::from_bounds(&[0.0, 2.0], &[1.0, 1.5]),
            Err(MorseError::InvalidRect(_))
        ));
        assert!(matches!(Rect::new(vec![f64::NAN, 1.0]), Err(MorseError::InvalidRect(_))));
        assert!(Rect::point(&[0.5, -0.5]).is_ok());
        assert!(Rect::new(vec![f64::NEG_INFINITY, 0.0]).unwrap().lower()[0].is_infinite());
        assert!(!Rect::new(vec![f64::NEG_INFINITY, 0.0]).unwrap().is_finite());
    }

    #[test]
    fn hull_and_center() {
        let pts: Vec<Vec<f64>> = vec![vec![1.0, -1.0], vec![-2.0, 3.0], vec![0.5, 0.0]];
        let hull = Rect::hull(pts.iter().map(Vec::as_slice)).unwrap();
        assert_eq!(hull.as_slice(), &[-2.0, -1.0, 1.0, 3.0]);
        assert_eq!(hull.center(), vec![-0.5, 1.0]);
        assert_eq!(hull.widths(), vec![3.0, 4.0]);
        assert!(Rect::hull(std::iter::empty()).is_none());
    }

    #[test]
    fn closed_membership() {
        let r = Rect::from_bounds(&[0.0, 0.0], &[1.0, 2.0]).unwrap();
        assert!(r.contains_point(&[0.0, 2.0]));
        assert!(r.contains_point(&[1.0, 0.0]));
        assert!(!r.contains_point(&[1.0001, 0.5]));
        assert!(!r.contains_point(&[0.5]));
    }

    #[test]
    fn centered_box() {
        let r = Rect::centered(&[1.0, 2.0], &[0.5, 1.0]);
        assert_eq!(r.as_slice(), &[0.75, 1.5, 1.25, 2.5]);
    }
}
