use thiserror::Error;

pub type AcResult<T> = Result<T, AcError>;

/// Umbrella error every coupling crate converts into.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AcError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Problem setup error: {what}")]
    ProblemSetup { what: String },

    #[error("Shape mismatch for {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("fem_origin must lie in [0, 1], got {value}")]
    InvalidWeight { value: f64 },

    #[error("Singular system: pivot {pivot:e} at row {row}")]
    SingularSystem { row: usize, pivot: f64 },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}

impl AcError {
    /// Singular systems are the only failures an analysis loop may retry.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AcError::SingularSystem { .. })
    }
}
