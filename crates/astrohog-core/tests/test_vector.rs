mod common;

use std::f64::consts::{FRAC_PI_2, PI};

use approx::assert_relative_eq;
use ndarray::Array2;

use astrohog_core::correlate::correlate_frame_and_vector;
use astrohog_core::error::HogError;
use astrohog_core::field::VectorField;
use astrohog_core::ops::CpuImageOps;
use astrohog_core::{AngleConvention, VectorParams};

use common::{aligned_zx, blob, count_finite, ramp_x};

fn uniform_vector(h: usize, w: usize, x: f64, y: f64) -> VectorField {
    VectorField::new(Array2::from_elem((h, w), x), Array2::from_elem((h, w), y)).unwrap()
}

#[test]
fn test_parallel_vector_field_is_aligned() {
    let field = ramp_x(5, 5);
    let vector = uniform_vector(5, 5, 1.0, 0.0);
    let result = correlate_frame_and_vector(
        &field.view(),
        &vector,
        None,
        None,
        &VectorParams::default(),
        &CpuImageOps,
    )
    .unwrap();
    assert!(result.angles.iter().all(|&phi| phi == 0.0));
    assert_relative_eq!(result.correlation, aligned_zx(25), epsilon = 1e-12);
}

#[test]
fn test_antiparallel_vector_keeps_full_circle_by_default() {
    let field = ramp_x(4, 4);
    let vector = uniform_vector(4, 4, -1.0, 0.0);
    let result = correlate_frame_and_vector(
        &field.view(),
        &vector,
        None,
        None,
        &VectorParams::default(),
        &CpuImageOps,
    )
    .unwrap();
    assert!(result.angles.iter().all(|&phi| (phi - PI).abs() < 1e-12));
    assert!(result.map.iter().all(|&v| (v + 1.0).abs() < 1e-12));

    let folded = VectorParams {
        angle_convention: AngleConvention::Orientation,
        ..Default::default()
    };
    let result = correlate_frame_and_vector(
        &field.view(),
        &vector,
        None,
        None,
        &folded,
        &CpuImageOps,
    )
    .unwrap();
    assert!(result.map.iter().all(|&v| (v - 1.0).abs() < 1e-12));
}

#[test]
fn test_perpendicular_vector_anti_correlates() {
    let field = ramp_x(4, 4);
    let vector = uniform_vector(4, 4, 0.0, 1.0);
    let result = correlate_frame_and_vector(
        &field.view(),
        &vector,
        None,
        None,
        &VectorParams::default(),
        &CpuImageOps,
    )
    .unwrap();
    assert!(result
        .angles
        .iter()
        .all(|&phi| (phi - FRAC_PI_2).abs() < 1e-12));
    assert_relative_eq!(result.correlation, -aligned_zx(16), epsilon = 1e-9);
}

#[test]
fn test_thresholds_apply_independently() {
    let field = ramp_x(4, 4);
    let vector = uniform_vector(4, 4, 0.5, 0.0);

    let weak_vector = VectorParams {
        vector_threshold: 0.5,
        ..Default::default()
    };
    let result = correlate_frame_and_vector(
        &field.view(),
        &vector,
        None,
        None,
        &weak_vector,
        &CpuImageOps,
    )
    .unwrap();
    assert_eq!(count_finite(&result.angles), 0);
    assert!(result.correlation.is_nan());

    let weak_gradient = VectorParams {
        gradient_threshold: 1.0,
        ..Default::default()
    };
    let result = correlate_frame_and_vector(
        &field.view(),
        &vector,
        None,
        None,
        &weak_gradient,
        &CpuImageOps,
    )
    .unwrap();
    assert_eq!(count_finite(&result.angles), 0);
}

#[test]
fn test_field_and_vector_masks() {
    let field = ramp_x(5, 5);
    let vector = uniform_vector(5, 5, 1.0, 0.0);
    let mut mask_a = Array2::<f64>::ones((5, 5));
    mask_a[[0, 0]] = 0.0;
    let mut mask_b = Array2::<f64>::ones((5, 5));
    mask_b[[4, 4]] = 0.0;
    mask_b[[0, 0]] = 0.0;

    let result = correlate_frame_and_vector(
        &field.view(),
        &vector,
        Some(&mask_a.view()),
        Some(&mask_b.view()),
        &VectorParams::default(),
        &CpuImageOps,
    )
    .unwrap();
    assert_eq!(count_finite(&result.angles), 23);
    assert_eq!(result.map[[4, 4]], 0.0);
}

#[test]
fn test_block_votes_on_vector_path() {
    let field = ramp_x(6, 6);
    let vector = uniform_vector(6, 6, 1.0, 0.2);
    let params = VectorParams {
        window_radius: 2,
        ..Default::default()
    };
    let result = correlate_frame_and_vector(
        &field.view(),
        &vector,
        None,
        None,
        &params,
        &CpuImageOps,
    )
    .unwrap();
    assert_relative_eq!(result.correlation, 1.0);
    assert_relative_eq!(result.map[[0, 0]], 0.2f64.atan(), epsilon = 1e-12);
}

#[test]
fn test_smoothing_on_vector_path() {
    let field = blob(16, 16, 8.0, 8.0, 3.0);
    let vector = uniform_vector(16, 16, 1.0, 0.0);
    let params = VectorParams {
        kernel_size: 2.5,
        ..Default::default()
    };
    let result = correlate_frame_and_vector(
        &field.view(),
        &vector,
        None,
        None,
        &params,
        &CpuImageOps,
    )
    .unwrap();
    assert_eq!(result.map.dim(), (16, 16));
    assert!(count_finite(&result.angles) > 0);
    assert!(result.correlation.is_finite());
}

#[test]
fn test_vector_shape_mismatch_is_rejected() {
    let field = ramp_x(4, 4);
    let vector = uniform_vector(4, 5, 1.0, 0.0);
    let err = correlate_frame_and_vector(
        &field.view(),
        &vector,
        None,
        None,
        &VectorParams::default(),
        &CpuImageOps,
    )
    .unwrap_err();
    assert!(matches!(err, HogError::DimensionMismatch { .. }));
}

#[test]
fn test_vector_components_must_match() {
    let err = VectorField::new(Array2::zeros((3, 3)), Array2::zeros((3, 4))).unwrap_err();
    assert!(matches!(err, HogError::DimensionMismatch { .. }));
}

#[test]
fn test_vector_mask_shape_mismatch_is_rejected() {
    let field = ramp_x(4, 4);
    let vector = uniform_vector(4, 4, 1.0, 0.0);
    let mask = Array2::<f64>::ones((2, 2));
    let err = correlate_frame_and_vector(
        &field.view(),
        &vector,
        None,
        Some(&mask.view()),
        &VectorParams::default(),
        &CpuImageOps,
    )
    .unwrap_err();
    assert!(matches!(err, HogError::DimensionMismatch { .. }));
}
