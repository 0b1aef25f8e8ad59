pub mod block;
pub mod simple;

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use block::block_votes;
pub use simple::simple_votes;

/// Output of a vote aggregator: one scalar plus a same-shape map.
#[derive(Clone, Debug)]
pub struct VoteResult {
    pub correlation: f64,
    pub map: Array2<f64>,
}

/// Strategy used to reduce a relative angle map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteMethod {
    /// Global projected Rayleigh statistic with a cosine map.
    #[default]
    Simple,
    /// Fraction of cells whose windowed mean angle is positive.
    Block { radius: usize },
}

impl VoteMethod {
    /// Windows wider than one pixel select block votes.
    pub fn from_window_radius(window_radius: usize) -> Self {
        if window_radius > 1 {
            Self::Block {
                radius: window_radius,
            }
        } else {
            Self::Simple
        }
    }

    pub fn apply(&self, angles: &ArrayView2<f64>) -> Result<VoteResult> {
        match *self {
            Self::Simple => Ok(simple_votes(angles)),
            Self::Block { radius } => block_votes(angles, radius),
        }
    }
}

impl std::fmt::Display for VoteMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Simple => write!(f, "Simple"),
            Self::Block { radius } => write!(f, "Block (radius {radius})"),
        }
    }
}
