#![allow(dead_code)]

use ndarray::{Array2, Array3};

/// Field increasing by 1 per column: gradient (1, 0) everywhere.
pub fn ramp_x(h: usize, w: usize) -> Array2<f64> {
    Array2::from_shape_fn((h, w), |(_, col)| col as f64)
}

/// Field increasing by 1 per row: gradient (0, 1) everywhere.
pub fn ramp_y(h: usize, w: usize) -> Array2<f64> {
    Array2::from_shape_fn((h, w), |(row, _)| row as f64)
}

/// Gaussian bump centred at (cy, cx) plus a gentle tilt along x.
pub fn blob(h: usize, w: usize, cy: f64, cx: f64, sigma: f64) -> Array2<f64> {
    Array2::from_shape_fn((h, w), |(row, col)| {
        let dy = row as f64 - cy;
        let dx = col as f64 - cx;
        (-(dy * dy + dx * dx) / (2.0 * sigma * sigma)).exp() + 0.01 * col as f64
    })
}

/// Cube whose plane p is `(p + 1) * ramp_x`.
pub fn ramp_cube(depth: usize, h: usize, w: usize) -> Array3<f64> {
    Array3::from_shape_fn((depth, h, w), |(p, _, col)| (p + 1) as f64 * col as f64)
}

/// Projected Rayleigh `Zx` of `n` perfectly aligned angles.
pub fn aligned_zx(n: usize) -> f64 {
    n as f64 / (n as f64 / 2.0).sqrt()
}

pub fn count_finite(data: &Array2<f64>) -> usize {
    data.iter().filter(|v| v.is_finite()).count()
}
