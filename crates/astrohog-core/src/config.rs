use serde::{Deserialize, Serialize};

/// How the signed angle between two vectors is reported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AngleConvention {
    /// Fold onto (-pi/2, pi/2]: a vector and its opposite are the same orientation.
    #[default]
    Orientation,
    /// Keep the full (-pi, pi] range.
    Direction,
}

impl std::fmt::Display for AngleConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Orientation => write!(f, "Orientation"),
            Self::Direction => write!(f, "Direction"),
        }
    }
}

/// Parameters for correlating two scalar fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameParams {
    /// Cells where either gradient magnitude is at or below this are excluded.
    pub gradient_threshold: f64,
    /// Physical size of one pixel.
    pub pixel_size: f64,
    /// Physical FWHM of the smoothing kernel. No smoothing unless it exceeds `pixel_size`.
    pub kernel_size: f64,
    /// Physical target resolution, used to size the regridded grid.
    pub resolution: f64,
    /// Block-vote window half-width; values of 1 or less select simple votes.
    pub window_radius: usize,
    /// Permit smoothing buffers above `MAX_FFT_BUFFER_BYTES`.
    pub allow_huge_kernel: bool,
    /// Regrid both fields to a finer grid before smoothing.
    pub regrid: bool,
    pub angle_convention: AngleConvention,
}

impl Default for FrameParams {
    fn default() -> Self {
        Self {
            gradient_threshold: 0.0,
            pixel_size: 1.0,
            kernel_size: 1.0,
            resolution: 1.0,
            window_radius: 1,
            allow_huge_kernel: false,
            regrid: false,
            angle_convention: AngleConvention::Orientation,
        }
    }
}

/// Parameters for correlating a scalar field with a vector field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorParams {
    pub gradient_threshold: f64,
    /// Cells where the vector magnitude is at or below this are excluded.
    pub vector_threshold: f64,
    /// Smoothing FWHM in pixels; no smoothing unless greater than 1.
    pub kernel_size: f64,
    pub window_radius: usize,
    pub allow_huge_kernel: bool,
    pub angle_convention: AngleConvention,
}

impl Default for VectorParams {
    fn default() -> Self {
        Self {
            gradient_threshold: 0.0,
            vector_threshold: 0.0,
            kernel_size: 1.0,
            window_radius: 1,
            allow_huge_kernel: false,
            angle_convention: AngleConvention::Direction,
        }
    }
}
