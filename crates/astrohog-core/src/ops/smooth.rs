use ndarray::{Array2, ArrayView2};
use num_complex::Complex;
use rustfft::FftPlanner;
use tracing::debug;

use crate::consts::{
    FWHM_PER_SIGMA, KERNEL_TRUNCATION_SIGMAS, MAX_FFT_BUFFER_BYTES, MIN_KERNEL_WEIGHT,
};
use crate::error::{HogError, Result};

/// Smooth a 2D array with a normalized Gaussian kernel using FFT convolution.
///
/// `fwhm_px` is the kernel FWHM in pixels; the kernel is truncated at
/// `KERNEL_TRUNCATION_SIGMAS` standard deviations. The array is zero-padded
/// by the kernel radius so the convolution never wraps around.
///
/// NaN cells are interpolated: data and a finite-cell weight map are
/// convolved separately and divided, with zero weight outside the array.
/// Cells with no finite neighbour within the kernel support come out NaN.
///
/// Fails with `ResourceLimit` when the complex working buffer exceeds
/// `MAX_FFT_BUFFER_BYTES` and `allow_huge` is false.
pub fn gaussian_smooth_fft(
    data: &ArrayView2<f64>,
    fwhm_px: f64,
    allow_huge: bool,
) -> Result<Array2<f64>> {
    if !fwhm_px.is_finite() || fwhm_px <= 0.0 {
        return Err(HogError::invalid(
            "kernel_fwhm_px",
            format!("must be positive and finite, got {fwhm_px}"),
        ));
    }

    let (h, w) = data.dim();
    if h == 0 || w == 0 {
        return Ok(data.to_owned());
    }

    let sigma = fwhm_px / FWHM_PER_SIGMA;
    let radius = (KERNEL_TRUNCATION_SIGMAS * sigma).ceil().max(1.0) as usize;
    let Some((ph, pw, required_bytes)) = padded_buffer(h, w, radius) else {
        if allow_huge {
            return Err(HogError::invalid(
                "kernel_fwhm_px",
                format!("kernel of FWHM {fwhm_px} px does not fit in addressable memory"),
            ));
        }
        return Err(HogError::ResourceLimit {
            required_bytes: usize::MAX,
            limit_bytes: MAX_FFT_BUFFER_BYTES,
        });
    };
    if required_bytes > MAX_FFT_BUFFER_BYTES && !allow_huge {
        return Err(HogError::ResourceLimit {
            required_bytes,
            limit_bytes: MAX_FFT_BUFFER_BYTES,
        });
    }
    debug!(
        fwhm_px,
        sigma, radius, padded_height = ph, padded_width = pw, "FFT Gaussian smoothing"
    );

    let mut values = Array2::<Complex<f64>>::zeros((ph, pw));
    let mut weights = Array2::<Complex<f64>>::zeros((ph, pw));
    for ((row, col), &v) in data.indexed_iter() {
        if v.is_finite() {
            values[[row, col]] = Complex::new(v, 0.0);
            weights[[row, col]] = Complex::new(1.0, 0.0);
        }
    }

    let mut kernel = make_wrapped_kernel(sigma, radius, ph, pw);

    let mut planner = FftPlanner::new();
    fft2d(&mut values, &mut planner, false);
    fft2d(&mut weights, &mut planner, false);
    fft2d(&mut kernel, &mut planner, false);

    values.zip_mut_with(&kernel, |v, k| *v *= *k);
    weights.zip_mut_with(&kernel, |v, k| *v *= *k);

    fft2d(&mut values, &mut planner, true);
    fft2d(&mut weights, &mut planner, true);

    // The inverse FFT scale factor cancels in the ratio.
    let scale = (ph * pw) as f64;
    let mut result = Array2::<f64>::zeros((h, w));
    for ((row, col), out) in result.indexed_iter_mut() {
        let wt = weights[[row, col]].re;
        *out = if wt / scale > MIN_KERNEL_WEIGHT {
            values[[row, col]].re / wt
        } else {
            f64::NAN
        };
    }

    Ok(result)
}

/// Padded dimensions and working-buffer size, or `None` on overflow.
fn padded_buffer(h: usize, w: usize, radius: usize) -> Option<(usize, usize, usize)> {
    let border = radius.checked_mul(2)?;
    let ph = h.checked_add(border)?;
    let pw = w.checked_add(border)?;
    // Data, weights and kernel spectra are held at once.
    let required_bytes = ph
        .checked_mul(pw)?
        .checked_mul(3 * std::mem::size_of::<Complex<f64>>())?;
    Some((ph, pw, required_bytes))
}

/// Normalized 2D Gaussian laid out with its centre at (0, 0), wrapping
/// negative offsets to the end of each axis.
fn make_wrapped_kernel(sigma: f64, radius: usize, ph: usize, pw: usize) -> Array2<Complex<f64>> {
    let size = 2 * radius + 1;
    let s2 = 2.0 * sigma * sigma;
    let mut taps = vec![0.0f64; size];
    let mut sum = 0.0f64;
    for (i, t) in taps.iter_mut().enumerate() {
        let x = i as f64 - radius as f64;
        *t = (-x * x / s2).exp();
        sum += *t;
    }
    for t in &mut taps {
        *t /= sum;
    }

    let mut kernel = Array2::<Complex<f64>>::zeros((ph, pw));
    for (i, &ty) in taps.iter().enumerate() {
        let row = (i + ph - radius) % ph;
        for (j, &tx) in taps.iter().enumerate() {
            let col = (j + pw - radius) % pw;
            kernel[[row, col]] = Complex::new(ty * tx, 0.0);
        }
    }
    kernel
}

/// In-place 2D FFT: row-wise, then column-wise. The inverse is unnormalized.
fn fft2d(data: &mut Array2<Complex<f64>>, planner: &mut FftPlanner<f64>, inverse: bool) {
    let (h, w) = data.dim();
    let (fft_row, fft_col) = if inverse {
        (planner.plan_fft_inverse(w), planner.plan_fft_inverse(h))
    } else {
        (planner.plan_fft_forward(w), planner.plan_fft_forward(h))
    };

    let mut row_data = vec![Complex::new(0.0, 0.0); w];
    for row in 0..h {
        for col in 0..w {
            row_data[col] = data[[row, col]];
        }
        fft_row.process(&mut row_data);
        for col in 0..w {
            data[[row, col]] = row_data[col];
        }
    }

    let mut col_data = vec![Complex::new(0.0, 0.0); h];
    for col in 0..w {
        for row in 0..h {
            col_data[row] = data[[row, col]];
        }
        fft_col.process(&mut col_data);
        for row in 0..h {
            data[[row, col]] = col_data[row];
        }
    }
}
