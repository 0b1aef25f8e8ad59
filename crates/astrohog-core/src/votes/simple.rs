use ndarray::ArrayView2;
use tracing::{debug, warn};

use crate::stats::projected_rayleigh;

use super::VoteResult;

/// Unweighted global aggregation of a relative angle map.
///
/// The map holds `cos(phi)` per cell (0 where `phi` is NaN). The scalar is the
/// projected Rayleigh statistic `Zx` over the finite cells, or NaN when no
/// cell is finite.
pub fn simple_votes(angles: &ArrayView2<f64>) -> VoteResult {
    let map = angles.mapv(|phi| if phi.is_nan() { 0.0 } else { phi.cos() });

    let finite: Vec<f64> = angles.iter().copied().filter(|v| v.is_finite()).collect();
    let correlation = match projected_rayleigh(&finite) {
        Ok(stat) => {
            let (zx, dispersion, mean_angle) = stat.as_tuple();
            debug!(zx, dispersion, mean_angle, count = stat.count, "Simple votes");
            zx
        }
        Err(_) => {
            warn!("No finite relative angles; simple vote correlation is undefined");
            f64::NAN
        }
    };

    VoteResult { correlation, map }
}
