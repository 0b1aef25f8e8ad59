//! Cube-level HOG correlation: the frame correlator applied over plane ranges.

use ndarray::{Array1, Array2, Array3, ArrayView2, ArrayView3, Axis};
use rayon::prelude::*;
use tracing::info;

use crate::config::{FrameParams, VectorParams};
use crate::consts::PARALLEL_PLANE_THRESHOLD;
use crate::error::{HogError, Result};
use crate::field::{ensure_same_shape, PlaneRange, VectorField};
use crate::ops::ImageOps;

use super::frame::{correlate_frame_and_vector, correlate_frames};

/// Result of correlating two cubes.
#[derive(Clone, Debug)]
pub struct CubeCorrelation {
    /// `matrix[[i - range_a.min, k - range_b.min]]` is the correlation of planes i and k.
    pub matrix: Array2<f64>,
    /// One plane per plane of cube A: the correlation map of plane i averaged
    /// over every compared plane of cube B. Planes outside `range_a` are 0.
    pub maps: Array3<f64>,
}

/// Result of correlating a cube with a fixed vector field.
#[derive(Clone, Debug)]
pub struct CubeVectorCorrelation {
    /// `correlations[i - range.min]` is the correlation of plane i.
    pub correlations: Array1<f64>,
    /// Correlation map of plane i at index i. Planes outside the range are 0.
    pub maps: Array3<f64>,
}

/// Correlate every plane of `range_a` in `cube_a` with every plane of
/// `range_b` in `cube_b`.
///
/// Cube masks, when given, must have the shape of their cube and are sliced
/// per plane.
#[allow(clippy::too_many_arguments)]
pub fn correlate_cubes(
    cube_a: &ArrayView3<f64>,
    cube_b: &ArrayView3<f64>,
    range_a: PlaneRange,
    range_b: PlaneRange,
    mask_a: Option<&ArrayView3<f64>>,
    mask_b: Option<&ArrayView3<f64>>,
    params: &FrameParams,
    ops: &dyn ImageOps,
) -> Result<CubeCorrelation> {
    range_a.validate("range_a", cube_a.len_of(Axis(0)))?;
    range_b.validate("range_b", cube_b.len_of(Axis(0)))?;
    ensure_same_shape("cube_b plane", &cube_a.shape()[1..], &cube_b.shape()[1..])?;
    check_cube_mask("mask_a", cube_a.shape(), mask_a)?;
    check_cube_mask("mask_b", cube_b.shape(), mask_b)?;

    info!(
        planes_a = range_a.len(),
        planes_b = range_b.len(),
        ops = ops.name(),
        "Correlating cubes"
    );

    let rows = map_planes(range_a, |i| {
        let frame_a = cube_a.index_axis(Axis(0), i);
        let plane_mask_a = mask_a.map(|m| m.index_axis(Axis(0), i));

        let mut correlations = Vec::with_capacity(range_b.len());
        let mut sum: Option<Array2<f64>> = None;
        for k in range_b.iter() {
            let frame_b = cube_b.index_axis(Axis(0), k);
            let plane_mask_b = mask_b.map(|m| m.index_axis(Axis(0), k));
            let result = correlate_frames(
                &frame_a,
                &frame_b,
                plane_mask_a.as_ref(),
                plane_mask_b.as_ref(),
                params,
                ops,
            )?;
            correlations.push(result.correlation);
            match sum.as_mut() {
                Some(s) => *s += &result.map,
                None => sum = Some(result.map),
            }
        }

        let sum = sum.ok_or_else(|| HogError::EmptyInput("no planes in range_b".into()))?;
        Ok((correlations, sum / range_b.len() as f64))
    })?;

    let mut matrix = Array2::<f64>::zeros((range_a.len(), range_b.len()));
    let (map_h, map_w) = rows.first().map_or((0, 0), |(_, map)| map.dim());
    let mut maps = Array3::<f64>::zeros((cube_a.len_of(Axis(0)), map_h, map_w));
    for (offset, (correlations, mean_map)) in rows.into_iter().enumerate() {
        matrix
            .row_mut(offset)
            .assign(&Array1::from_vec(correlations));
        maps.index_axis_mut(Axis(0), range_a.min + offset)
            .assign(&mean_map);
    }

    info!("Cube correlation complete");
    Ok(CubeCorrelation { matrix, maps })
}

/// Correlate every plane of `range` in `cube` with one fixed vector field.
///
/// With `rotate`, the vector field is turned by 90 degrees (`(y, -x)`) first,
/// e.g. to compare polarization angles against a magnetic-field convention.
/// `mask_vector` is co-registered with `vector`.
#[allow(clippy::too_many_arguments)]
pub fn correlate_cube_and_vector(
    cube: &ArrayView3<f64>,
    vector: &VectorField,
    range: PlaneRange,
    mask_cube: Option<&ArrayView3<f64>>,
    mask_vector: Option<&ArrayView2<f64>>,
    rotate: bool,
    params: &VectorParams,
    ops: &dyn ImageOps,
) -> Result<CubeVectorCorrelation> {
    let (depth, h, w) = cube.dim();
    range.validate("range", depth)?;
    ensure_same_shape("vector field", &[h, w], &[vector.dim().0, vector.dim().1])?;
    check_cube_mask("mask_cube", cube.shape(), mask_cube)?;

    let rotated;
    let vector = if rotate {
        rotated = vector.rotated();
        &rotated
    } else {
        vector
    };

    info!(
        planes = range.len(),
        rotate,
        ops = ops.name(),
        "Correlating cube with vector field"
    );

    let results = map_planes(range, |i| {
        let frame = cube.index_axis(Axis(0), i);
        let plane_mask = mask_cube.map(|m| m.index_axis(Axis(0), i));
        correlate_frame_and_vector(
            &frame,
            vector,
            plane_mask.as_ref(),
            mask_vector,
            params,
            ops,
        )
    })?;

    let mut correlations = Array1::<f64>::zeros(range.len());
    let mut maps = Array3::<f64>::zeros((depth, h, w));
    for (offset, result) in results.into_iter().enumerate() {
        correlations[offset] = result.correlation;
        maps.index_axis_mut(Axis(0), range.min + offset)
            .assign(&result.map);
    }

    info!("Cube/vector correlation complete");
    Ok(CubeVectorCorrelation { correlations, maps })
}

/// Evaluate `f` for every plane of `range`, in range order.
///
/// Planes are independent, so large ranges run on the Rayon pool.
fn map_planes<T, F>(range: PlaneRange, f: F) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(usize) -> Result<T> + Sync,
{
    let planes: Vec<usize> = range.iter().collect();
    if planes.len() >= PARALLEL_PLANE_THRESHOLD {
        let results: Vec<Result<T>> = planes.par_iter().map(|&i| f(i)).collect();
        results.into_iter().collect()
    } else {
        planes.into_iter().map(f).collect()
    }
}

fn check_cube_mask(name: &str, shape: &[usize], mask: Option<&ArrayView3<f64>>) -> Result<()> {
    match mask {
        Some(m) => ensure_same_shape(name, shape, m.shape()),
        None => Ok(()),
    }
}
