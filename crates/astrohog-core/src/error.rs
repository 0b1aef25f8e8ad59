use thiserror::Error;

#[derive(Error, Debug)]
pub enum HogError {
    #[error("Dimension mismatch for {what}: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        what: String,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error(
        "Smoothing buffer of {required_bytes} bytes exceeds limit of {limit_bytes} bytes \
         (set allow_huge_kernel to override)"
    )]
    ResourceLimit {
        required_bytes: usize,
        limit_bytes: usize,
    },
}

impl HogError {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        HogError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn mismatch(what: &str, expected: &[usize], actual: &[usize]) -> Self {
        HogError::DimensionMismatch {
            what: what.to_string(),
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HogError>;
