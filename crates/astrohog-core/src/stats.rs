//! Projected Rayleigh statistic for axial (half-circle) angle distributions.
//!
//! Relative orientations live on (-pi/2, pi/2]. Doubling them maps the
//! half-circle onto the full circle, where the usual Rayleigh machinery
//! applies. `Zx` measures the preference for parallel (positive) or
//! perpendicular (negative) relative orientation.

use crate::error::{HogError, Result};

/// Result of [`projected_rayleigh`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayleighStatistic {
    /// Projected Rayleigh statistic along the doubled-angle x axis.
    pub zx: f64,
    /// Projected Rayleigh statistic along the doubled-angle y axis.
    pub zy: f64,
    /// Dispersion computed from the sine sum and `zy`.
    ///
    /// This is the value historically reported as the uncertainty of `zx`.
    pub dispersion: f64,
    /// Dispersion computed from the cosine sum and `zx`.
    pub cos_dispersion: f64,
    /// Mean relative angle, in (-pi/2, pi/2].
    pub mean_angle: f64,
    /// Number of angles reduced.
    pub count: usize,
}

impl RayleighStatistic {
    /// `(zx, dispersion, mean_angle)`.
    pub fn as_tuple(&self) -> (f64, f64, f64) {
        (self.zx, self.dispersion, self.mean_angle)
    }
}

/// Compute the projected Rayleigh statistic of `angles`.
///
/// Callers must filter out non-finite values first. An empty input is an
/// error rather than a silent NaN.
pub fn projected_rayleigh(angles: &[f64]) -> Result<RayleighStatistic> {
    if angles.is_empty() {
        return Err(HogError::EmptyInput(
            "projected Rayleigh statistic needs at least one angle".into(),
        ));
    }

    let n = angles.len() as f64;
    let norm = (n / 2.0).sqrt();

    let mut sum_cos = 0.0f64;
    let mut sum_sin = 0.0f64;
    let mut sum_cos2 = 0.0f64;
    let mut sum_sin2 = 0.0f64;
    for &phi in angles {
        let (s, c) = (2.0 * phi).sin_cos();
        sum_cos += c;
        sum_sin += s;
        sum_cos2 += c * c;
        sum_sin2 += s * s;
    }

    let zx = sum_cos / norm;
    let zy = sum_sin / norm;
    let cos_dispersion = ((2.0 * sum_cos2 - zx * zx) / n).sqrt();
    let dispersion = ((2.0 * sum_sin2 - zy * zy) / n).sqrt();

    Ok(RayleighStatistic {
        zx,
        zy,
        dispersion,
        cos_dispersion,
        mean_angle: 0.5 * zy.atan2(zx),
        count: angles.len(),
    })
}
