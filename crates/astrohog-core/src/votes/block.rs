use ndarray::{Array2, ArrayView2};
use tracing::warn;

use crate::error::{HogError, Result};

use super::VoteResult;

/// Windowed aggregation of a relative angle map.
///
/// Each cell of the map is the mean of the finite angles inside the square
/// window of half-width `radius` centred on it. Windows are clipped to the
/// array bounds, so they shrink near edges and corners. Cells whose own angle
/// is not finite, or whose window holds no finite angle, are 0.
///
/// The scalar is the fraction of finite input cells whose windowed mean is
/// positive (NaN when no cell is finite).
pub fn block_votes(angles: &ArrayView2<f64>, radius: usize) -> Result<VoteResult> {
    if radius == 0 {
        return Err(HogError::invalid("window_radius", "must be positive"));
    }

    let (sums, counts) = window_sums(angles, radius);

    let mut map = Array2::<f64>::zeros(angles.dim());
    let mut n_finite = 0usize;
    let mut n_positive = 0usize;
    for ((idx, &phi), out) in angles.indexed_iter().zip(map.iter_mut()) {
        if !phi.is_finite() {
            continue;
        }
        n_finite += 1;
        let count = counts[idx];
        if count > 0 {
            *out = sums[idx] / count as f64;
            if *out > 0.0 {
                n_positive += 1;
            }
        }
    }

    let correlation = if n_finite > 0 {
        n_positive as f64 / n_finite as f64
    } else {
        warn!("No finite relative angles; block vote correlation is undefined");
        f64::NAN
    };

    Ok(VoteResult { correlation, map })
}

/// Sum and count of finite values in every clipped window, as two separable
/// passes (rows, then columns).
fn window_sums(angles: &ArrayView2<f64>, radius: usize) -> (Array2<f64>, Array2<u32>) {
    let (h, w) = angles.dim();

    let mut row_sums = Array2::<f64>::zeros((h, w));
    let mut row_counts = Array2::<u32>::zeros((h, w));
    for row in 0..h {
        for col in 0..w {
            let lo = col.saturating_sub(radius);
            let hi = col.saturating_add(radius).min(w - 1);
            let mut sum = 0.0f64;
            let mut count = 0u32;
            for c in lo..=hi {
                let v = angles[[row, c]];
                if v.is_finite() {
                    sum += v;
                    count += 1;
                }
            }
            row_sums[[row, col]] = sum;
            row_counts[[row, col]] = count;
        }
    }

    let mut sums = Array2::<f64>::zeros((h, w));
    let mut counts = Array2::<u32>::zeros((h, w));
    for row in 0..h {
        let lo = row.saturating_sub(radius);
        let hi = row.saturating_add(radius).min(h - 1);
        for col in 0..w {
            let mut sum = 0.0f64;
            let mut count = 0u32;
            for r in lo..=hi {
                sum += row_sums[[r, col]];
                count += row_counts[[r, col]];
            }
            sums[[row, col]] = sum;
            counts[[row, col]] = count;
        }
    }

    (sums, counts)
}
