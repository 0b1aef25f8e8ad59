//! Frame-level HOG correlation.
//!
//! A frame pair is reduced in four steps: gradient fields (optionally after
//! regridding and smoothing), the relative angle map between them, exclusion
//! of weak-gradient and masked cells, and a vote aggregator.

use std::f64::consts::{FRAC_PI_2, PI};

use ndarray::{Array2, ArrayView2, Zip};
use tracing::debug;

use crate::config::{AngleConvention, FrameParams, VectorParams};
use crate::consts::SAMPLES_PER_KERNEL_FWHM;
use crate::error::{HogError, Result};
use crate::field::{ensure_same_shape, gradient, VectorField};
use crate::ops::ImageOps;
use crate::votes::VoteMethod;

/// Result of correlating one frame pair.
#[derive(Clone, Debug)]
pub struct FrameCorrelation {
    /// Projected Rayleigh `Zx` (simple votes) or fraction of positive cells (block votes).
    pub correlation: f64,
    /// Per-cell alignment contribution; excluded cells are 0.
    pub map: Array2<f64>,
    /// Relative angle map; excluded cells are NaN.
    pub angles: Array2<f64>,
}

/// Correlate the gradient fields of two scalar fields.
pub fn correlate_frames(
    a: &ArrayView2<f64>,
    b: &ArrayView2<f64>,
    mask_a: Option<&ArrayView2<f64>>,
    mask_b: Option<&ArrayView2<f64>>,
    params: &FrameParams,
    ops: &dyn ImageOps,
) -> Result<FrameCorrelation> {
    ensure_same_shape("field_b", a.shape(), b.shape())?;
    check_mask("mask_a", a.shape(), mask_a)?;
    check_mask("mask_b", b.shape(), mask_b)?;
    check_positive("pixel_size", params.pixel_size)?;
    check_positive("resolution", params.resolution)?;

    let (grad_a, grad_b, mask_a, mask_b) = if params.kernel_size > params.pixel_size {
        smoothed_gradients(a, b, mask_a, mask_b, params, ops)?
    } else {
        (
            gradient(a),
            gradient(b),
            mask_a.map(|m| m.to_owned()),
            mask_b.map(|m| m.to_owned()),
        )
    };

    // Angles run from B's gradient to A's: atan2(ay*bx - ax*by, a.b).
    let mut angles = relative_angles(&grad_b, &grad_a, params.angle_convention);
    exclude_weak(&mut angles, &grad_a.magnitude(), params.gradient_threshold);
    exclude_weak(&mut angles, &grad_b.magnitude(), params.gradient_threshold);
    for mask in [mask_a, mask_b].iter().flatten() {
        exclude_masked(&mut angles, &mask.view());
    }

    vote(angles, params.window_radius)
}

/// Correlate the gradient field of a scalar field with a supplied vector field.
///
/// `mask_b` is co-registered with `vector`.
pub fn correlate_frame_and_vector(
    field: &ArrayView2<f64>,
    vector: &VectorField,
    mask_a: Option<&ArrayView2<f64>>,
    mask_b: Option<&ArrayView2<f64>>,
    params: &VectorParams,
    ops: &dyn ImageOps,
) -> Result<FrameCorrelation> {
    let (h, w) = vector.dim();
    ensure_same_shape("vector field", field.shape(), &[h, w])?;
    check_mask("mask_a", field.shape(), mask_a)?;
    check_mask("mask_b", &[h, w], mask_b)?;

    let grad = if params.kernel_size > 1.0 {
        let smoothed = ops.smooth(field, params.kernel_size, params.allow_huge_kernel)?;
        gradient(&smoothed.view())
    } else {
        gradient(field)
    };

    let mut angles = relative_angles(&grad, vector, params.angle_convention);
    exclude_weak(&mut angles, &grad.magnitude(), params.gradient_threshold);
    exclude_weak(&mut angles, &vector.magnitude(), params.vector_threshold);
    for mask in [mask_a, mask_b].into_iter().flatten() {
        exclude_masked(&mut angles, mask);
    }

    vote(angles, params.window_radius)
}

/// Signed angle from `a` to `b` at every cell:
/// `atan2(ax*by - ay*bx, ax*bx + ay*by)`.
pub fn relative_angles(
    a: &VectorField,
    b: &VectorField,
    convention: AngleConvention,
) -> Array2<f64> {
    Zip::from(&a.x)
        .and(&a.y)
        .and(&b.x)
        .and(&b.y)
        .map_collect(|&ax, &ay, &bx, &by| {
            let phi = (ax * by - ay * bx).atan2(ax * bx + ay * by);
            match convention {
                AngleConvention::Orientation => fold_orientation(phi),
                AngleConvention::Direction => phi,
            }
        })
}

/// Map an angle in (-pi, pi] onto (-pi/2, pi/2].
pub fn fold_orientation(phi: f64) -> f64 {
    if phi > FRAC_PI_2 {
        phi - PI
    } else if phi <= -FRAC_PI_2 {
        phi + PI
    } else {
        phi
    }
}

/// Smooth both fields, after regridding them if requested, and take their gradients.
#[allow(clippy::type_complexity)]
fn smoothed_gradients(
    a: &ArrayView2<f64>,
    b: &ArrayView2<f64>,
    mask_a: Option<&ArrayView2<f64>>,
    mask_b: Option<&ArrayView2<f64>>,
    params: &FrameParams,
    ops: &dyn ImageOps,
) -> Result<(
    VectorField,
    VectorField,
    Option<Array2<f64>>,
    Option<Array2<f64>>,
)> {
    let mut kernel_px = params.kernel_size / params.pixel_size;
    let resolution_px = params.resolution / params.pixel_size;

    if params.regrid {
        let (h, w) = a.dim();
        let shape = regrid_shape(h, w, resolution_px)?;
        debug!(
            from = ?(h, w),
            to = ?shape,
            "Regridding frames before smoothing"
        );

        let a = ops.regrid(a, shape)?;
        let b = ops.regrid(b, shape)?;
        let mask_a = mask_a.map(|m| ops.regrid(m, shape)).transpose()?;
        let mask_b = mask_b.map(|m| ops.regrid(m, shape)).transpose()?;
        kernel_px *= shape.0 as f64 / h as f64;

        let sa = ops.smooth(&a.view(), kernel_px, params.allow_huge_kernel)?;
        let sb = ops.smooth(&b.view(), kernel_px, params.allow_huge_kernel)?;
        Ok((gradient(&sa.view()), gradient(&sb.view()), mask_a, mask_b))
    } else {
        debug!(kernel_px, "Smoothing frames before gradient");
        let sa = ops.smooth(a, kernel_px, params.allow_huge_kernel)?;
        let sb = ops.smooth(b, kernel_px, params.allow_huge_kernel)?;
        Ok((
            gradient(&sa.view()),
            gradient(&sb.view()),
            mask_a.map(|m| m.to_owned()),
            mask_b.map(|m| m.to_owned()),
        ))
    }
}

/// Grid placing `SAMPLES_PER_KERNEL_FWHM` pixels across one resolution element.
fn regrid_shape(h: usize, w: usize, resolution_px: f64) -> Result<(usize, usize)> {
    let rows = (SAMPLES_PER_KERNEL_FWHM * h as f64 / resolution_px).round();
    let cols = (SAMPLES_PER_KERNEL_FWHM * w as f64 / resolution_px).round();
    if rows < 1.0 || cols < 1.0 {
        return Err(HogError::invalid(
            "resolution",
            format!("regridded shape {rows}x{cols} has no pixels"),
        ));
    }
    Ok((rows as usize, cols as usize))
}

fn vote(angles: Array2<f64>, window_radius: usize) -> Result<FrameCorrelation> {
    let method = VoteMethod::from_window_radius(window_radius);
    let votes = method.apply(&angles.view())?;
    debug!(
        method = %method,
        valid = angles.iter().filter(|v| v.is_finite()).count(),
        correlation = votes.correlation,
        "Frame correlated"
    );
    Ok(FrameCorrelation {
        correlation: votes.correlation,
        map: votes.map,
        angles,
    })
}

fn exclude_weak(angles: &mut Array2<f64>, norm: &Array2<f64>, threshold: f64) {
    Zip::from(angles).and(norm).for_each(|phi, &n| {
        if n <= threshold {
            *phi = f64::NAN;
        }
    });
}

fn exclude_masked(angles: &mut Array2<f64>, mask: &ArrayView2<f64>) {
    Zip::from(angles).and(mask).for_each(|phi, &m| {
        if m == 0.0 {
            *phi = f64::NAN;
        }
    });
}

fn check_mask(name: &str, shape: &[usize], mask: Option<&ArrayView2<f64>>) -> Result<()> {
    match mask {
        Some(m) => ensure_same_shape(name, shape, m.shape()),
        None => Ok(()),
    }
}

fn check_positive(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(HogError::invalid(
            name,
            format!("must be positive and finite, got {value}"),
        ));
    }
    Ok(())
}
