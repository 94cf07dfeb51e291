//! Case file validation logic.

use crate::records::{linear_system, surface_records};
use crate::schema::{CaseFile, LATEST_VERSION};
use ac_geometry::GeometryError;
use std::collections::HashSet;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Shape mismatch for {field}: expected {expected}, got {actual}")]
    ShapeMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("Surface '{id}': {source}")]
    Surface { id: String, source: GeometryError },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_case(case: &CaseFile) -> Result<(), ValidationError> {
    if case.version == 0 || case.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: case.version,
        });
    }

    if case.surfaces.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "surfaces".to_string(),
            value: "[]".to_string(),
            reason: "at least one surface is required".to_string(),
        });
    }

    let mut ids = HashSet::new();
    for surface in &case.surfaces {
        if !ids.insert(&surface.id) {
            return Err(ValidationError::DuplicateId {
                id: surface.id.clone(),
                context: "surfaces".to_string(),
            });
        }
    }

    if let Some(solver) = &case.solver {
        let tol = solver.pivot_tolerance;
        if !(tol.is_finite() && tol >= 0.0) {
            return Err(ValidationError::InvalidValue {
                field: "solver.pivot_tolerance".to_string(),
                value: tol.to_string(),
                reason: "must be finite and non-negative".to_string(),
            });
        }
    }

    let records = surface_records(case)?;
    let system_size = records.iter().map(|r| r.spec.num_panels()).sum();
    linear_system(case, system_size)?;

    Ok(())
}
