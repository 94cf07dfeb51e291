//! Error types for circulation solves.

use ac_core::error::AcError;
use ac_geometry::GeometryError;
use thiserror::Error;

/// Errors that can occur while solving or linearizing the circulation system.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// Pivot at or below tolerance; the analysis may retry with perturbed geometry.
    #[error("Singular system: pivot {pivot:e} at row {row} (tolerance {tolerance:e})")]
    Singular {
        row: usize,
        pivot: f64,
        tolerance: f64,
    },

    #[error("Shape mismatch for {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("No factorization cached: call solve or linearize first")]
    MissingFactorization,

    #[error("Non-finite value in {what}")]
    NonFinite { what: &'static str },

    #[error("Problem setup error: {what}")]
    ProblemSetup { what: String },

    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<SolverError> for AcError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::Singular { row, pivot, .. } => AcError::SingularSystem { row, pivot },
            SolverError::ShapeMismatch {
                what,
                expected,
                actual,
            } => AcError::ShapeMismatch {
                what,
                expected,
                actual,
            },
            SolverError::MissingFactorization => AcError::Invariant {
                what: "factorization cached before linear solve",
            },
            SolverError::NonFinite { what } => AcError::NonFinite {
                what,
                value: f64::NAN,
            },
            SolverError::ProblemSetup { what } => AcError::ProblemSetup { what },
            SolverError::Geometry(g) => g.into(),
        }
    }
}
