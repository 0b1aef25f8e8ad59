use ndarray::{Array2, ArrayView2};

use crate::error::{HogError, Result};

/// Resample a 2D array to `shape` with bilinear interpolation.
///
/// Pixel centres are aligned, so the first and last output pixels map inside
/// the first and last input pixels. Samples beyond the border are clamped to
/// the nearest edge pixel. NaN inputs propagate to every output pixel that
/// interpolates from them.
pub fn regrid_bilinear(data: &ArrayView2<f64>, shape: (usize, usize)) -> Result<Array2<f64>> {
    let (h, w) = data.dim();
    let (out_h, out_w) = shape;
    if h == 0 || w == 0 {
        return Err(HogError::EmptyInput("cannot regrid an empty array".into()));
    }
    if out_h == 0 || out_w == 0 {
        return Err(HogError::invalid(
            "target_shape",
            format!("regrid target {out_h}x{out_w} has a zero dimension"),
        ));
    }

    let scale_y = h as f64 / out_h as f64;
    let scale_x = w as f64 / out_w as f64;

    let mut result = Array2::<f64>::zeros((out_h, out_w));
    for row in 0..out_h {
        let y = ((row as f64 + 0.5) * scale_y - 0.5).clamp(0.0, (h - 1) as f64);
        for col in 0..out_w {
            let x = ((col as f64 + 0.5) * scale_x - 0.5).clamp(0.0, (w - 1) as f64);
            result[[row, col]] = bilinear_sample(data, y, x);
        }
    }

    Ok(result)
}

/// Sample `data` at fractional position (y, x), which must lie inside the array.
fn bilinear_sample(data: &ArrayView2<f64>, y: f64, x: f64) -> f64 {
    let (h, w) = data.dim();

    let y0 = y.floor() as usize;
    let x0 = x.floor() as usize;
    let y1 = (y0 + 1).min(h - 1);
    let x1 = (x0 + 1).min(w - 1);

    let fy = y - y0 as f64;
    let fx = x - x0 as f64;

    let v00 = data[[y0, x0]];
    let v10 = data[[y0, x1]];
    let v01 = data[[y1, x0]];
    let v11 = data[[y1, x1]];

    // Skip zero-weight corners so a NaN neighbour only spreads where it contributes.
    let mut sum = 0.0;
    for (v, wgt) in [
        (v00, (1.0 - fx) * (1.0 - fy)),
        (v10, fx * (1.0 - fy)),
        (v01, (1.0 - fx) * fy),
        (v11, fx * fy),
    ] {
        if wgt != 0.0 {
            sum += v * wgt;
        }
    }
    sum
}
