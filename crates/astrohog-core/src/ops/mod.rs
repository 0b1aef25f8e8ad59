pub mod regrid;
pub mod smooth;

use ndarray::{Array2, ArrayView2};

use crate::error::Result;

pub use regrid::regrid_bilinear;
pub use smooth::gaussian_smooth_fft;

/// Image operations the correlators depend on but do not define.
///
/// Implementations must be `Sync` so cube correlation can share one instance
/// across Rayon workers.
pub trait ImageOps: Sync {
    fn name(&self) -> &str;

    /// Resample `data` onto a grid of `shape` (rows, cols).
    fn regrid(&self, data: &ArrayView2<f64>, shape: (usize, usize)) -> Result<Array2<f64>>;

    /// Convolve `data` with a normalized Gaussian of the given FWHM in pixels.
    fn smooth(
        &self,
        data: &ArrayView2<f64>,
        fwhm_px: f64,
        allow_huge: bool,
    ) -> Result<Array2<f64>>;
}

/// Default CPU implementation: bilinear regridding and FFT Gaussian smoothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct CpuImageOps;

impl ImageOps for CpuImageOps {
    fn name(&self) -> &str {
        "CPU"
    }

    fn regrid(&self, data: &ArrayView2<f64>, shape: (usize, usize)) -> Result<Array2<f64>> {
        regrid_bilinear(data, shape)
    }

    fn smooth(
        &self,
        data: &ArrayView2<f64>,
        fwhm_px: f64,
        allow_huge: bool,
    ) -> Result<Array2<f64>> {
        gaussian_smooth_fft(data, fwhm_px, allow_huge)
    }
}
