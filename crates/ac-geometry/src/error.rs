//! Geometry and field validation errors.

use ac_core::AcError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Shape mismatch for {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("fem_origin must lie in [0, 1], got {value}")]
    InvalidWeight { value: f64 },

    #[error("Degenerate {what}: need at least 2 points, got {count}")]
    Degenerate { what: &'static str, count: usize },

    #[error("Non-finite value in {what}")]
    NonFinite { what: &'static str },
}

pub type GeometryResult<T> = Result<T, GeometryError>;

impl From<GeometryError> for AcError {
    fn from(e: GeometryError) -> Self {
        match e {
            GeometryError::ShapeMismatch {
                what,
                expected,
                actual,
            } => AcError::ShapeMismatch {
                what,
                expected,
                actual,
            },
            GeometryError::InvalidWeight { value } => AcError::InvalidWeight { value },
            GeometryError::Degenerate { what, .. } => AcError::InvalidArg { what },
            GeometryError::NonFinite { what } => AcError::NonFinite {
                what,
                value: f64::NAN,
            },
        }
    }
}
