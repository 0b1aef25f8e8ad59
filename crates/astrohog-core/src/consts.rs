/// Number of pixels placed across one kernel FWHM when regridding before smoothing.
pub const SAMPLES_PER_KERNEL_FWHM: f64 = 3.0;

/// Ratio between a Gaussian's FWHM and its standard deviation: 2*sqrt(2*ln 2).
pub const FWHM_PER_SIGMA: f64 = 2.354_820_045_030_949_3;

/// Gaussian kernels are truncated at this many standard deviations.
pub const KERNEL_TRUNCATION_SIGMAS: f64 = 4.0;

/// Largest complex FFT working buffer (in bytes) allowed without
/// `allow_huge_kernel`. Default: 1 GiB.
pub const MAX_FFT_BUFFER_BYTES: usize = 1_073_741_824;

/// Minimum number of cube planes to correlate in parallel with Rayon.
pub const PARALLEL_PLANE_THRESHOLD: usize = 4;

/// Convolution weight below which a smoothed cell is considered unsupported.
pub const MIN_KERNEL_WEIGHT: f64 = 1e-12;
