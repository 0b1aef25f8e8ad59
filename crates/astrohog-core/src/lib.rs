//! Histogram of Oriented Gradients (HOG) correlation of 2D fields and cubes.
//!
//! Two maps are compared through the relative orientation of their gradients:
//! the relative angle map is reduced either globally with the projected
//! Rayleigh statistic or locally with windowed votes.

pub mod config;
pub mod consts;
pub mod correlate;
pub mod error;
pub mod field;
pub mod ops;
pub mod stats;
pub mod votes;

pub use config::{AngleConvention, FrameParams, VectorParams};
pub use error::{HogError, Result};
