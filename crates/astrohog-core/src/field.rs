use ndarray::{Array2, ArrayView2, Zip};
use serde::{Deserialize, Serialize};

use crate::error::{HogError, Result};

/// A 2D vector field: x and y components sampled on the same grid.
///
/// `x` runs along columns (axis 1) and `y` along rows (axis 0).
#[derive(Clone, Debug)]
pub struct VectorField {
    pub x: Array2<f64>,
    pub y: Array2<f64>,
}

impl VectorField {
    pub fn new(x: Array2<f64>, y: Array2<f64>) -> Result<Self> {
        ensure_same_shape("vector y component", x.shape(), y.shape())?;
        Ok(Self { x, y })
    }

    pub fn dim(&self) -> (usize, usize) {
        self.x.dim()
    }

    /// Per-cell Euclidean norm.
    pub fn magnitude(&self) -> Array2<f64> {
        Zip::from(&self.x)
            .and(&self.y)
            .map_collect(|&x, &y| (x * x + y * y).sqrt())
    }

    /// The field rotated by 90 degrees: `(y, -x)`.
    pub fn rotated(&self) -> Self {
        Self {
            x: self.y.clone(),
            y: self.x.mapv(|v| -v),
        }
    }
}

/// Inclusive range of plane indices used from a cube.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaneRange {
    pub min: usize,
    pub max: usize,
}

impl PlaneRange {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Range covering every plane of a cube with `depth` planes.
    pub fn full(depth: usize) -> Self {
        Self {
            min: 0,
            max: depth.saturating_sub(1),
        }
    }

    pub fn len(&self) -> usize {
        (self.max + 1).saturating_sub(self.min)
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> {
        self.min..=self.max
    }

    /// Check the range against a cube with `depth` planes.
    pub fn validate(&self, name: &str, depth: usize) -> Result<()> {
        if self.min > self.max {
            return Err(HogError::invalid(
                name,
                format!("min plane {} is greater than max plane {}", self.min, self.max),
            ));
        }
        if self.max >= depth {
            return Err(HogError::invalid(
                name,
                format!("max plane {} out of range (depth: {depth})", self.max),
            ));
        }
        Ok(())
    }
}

/// Compute the 2D gradient of a scalar field.
///
/// Interior cells use central differences `(f[i+1] - f[i-1]) / 2`, border
/// cells use one-sided first differences. An axis of length 1 has a zero
/// derivative. NaN cells propagate NaN into their neighbours' derivatives.
pub fn gradient(data: &ArrayView2<f64>) -> VectorField {
    let (h, w) = data.dim();
    let mut gx = Array2::<f64>::zeros((h, w));
    let mut gy = Array2::<f64>::zeros((h, w));

    if w > 1 {
        for row in 0..h {
            gx[[row, 0]] = data[[row, 1]] - data[[row, 0]];
            gx[[row, w - 1]] = data[[row, w - 1]] - data[[row, w - 2]];
            for col in 1..w - 1 {
                gx[[row, col]] = (data[[row, col + 1]] - data[[row, col - 1]]) * 0.5;
            }
        }
    }

    if h > 1 {
        for col in 0..w {
            gy[[0, col]] = data[[1, col]] - data[[0, col]];
            gy[[h - 1, col]] = data[[h - 1, col]] - data[[h - 2, col]];
            for row in 1..h - 1 {
                gy[[row, col]] = (data[[row + 1, col]] - data[[row - 1, col]]) * 0.5;
            }
        }
    }

    VectorField { x: gx, y: gy }
}

pub(crate) fn ensure_same_shape(what: &str, expected: &[usize], actual: &[usize]) -> Result<()> {
    if expected != actual {
        return Err(HogError::mismatch(what, expected, actual));
    }
    Ok(())
}
