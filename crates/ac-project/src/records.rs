//! Conversion of case file definitions into the typed coupling records.

use crate::schema::{CaseFile, SurfaceDef};
use crate::validate::ValidationError;
use ac_core::{SurfaceId, first_non_finite};
use ac_geometry::{
    Displacements, GeometryError, GeometryResult, SectionalForces, SurfaceMesh, SurfaceSpec,
};
use ac_solver::SolverConfig;
use nalgebra::{DMatrix, DVector};

/// Everything the transfers need for one surface.
#[derive(Debug, Clone)]
pub struct SurfaceRecord {
    pub spec: SurfaceSpec,
    pub mesh: SurfaceMesh,
    pub displacements: Displacements,
    pub sectional_forces: SectionalForces,
}

/// Build one record per surface; surface ids follow file order.
pub fn surface_records(case: &CaseFile) -> Result<Vec<SurfaceRecord>, ValidationError> {
    case.surfaces
        .iter()
        .enumerate()
        .map(|(k, def)| {
            let id = SurfaceId::nth(k).ok_or_else(|| ValidationError::InvalidValue {
                field: "surfaces".to_string(),
                value: k.to_string(),
                reason: "too many surfaces".to_string(),
            })?;
            surface_record(id, def).map_err(|source| ValidationError::Surface {
                id: def.id.clone(),
                source,
            })
        })
        .collect()
}

fn surface_record(id: SurfaceId, def: &SurfaceDef) -> GeometryResult<SurfaceRecord> {
    let (nx, ny) = (def.nx(), def.ny());
    let spec = SurfaceSpec::new(id, def.name.clone(), nx, ny, def.fem_origin)?;

    let mesh = SurfaceMesh::<f64>::from_rows(def.mesh.clone())?;
    mesh.ensure_finite()?;

    let displacements = match &def.displacements {
        Some(rows) => Displacements::new(rows.clone()),
        None => Displacements::zeros(ny),
    };
    spec.check_displacements(&displacements)?;
    if first_non_finite(&displacements.flatten()).is_some() {
        return Err(GeometryError::NonFinite {
            what: "displacements",
        });
    }

    let sectional_forces: SectionalForces = match &def.sectional_forces {
        Some(rows) => SectionalForces::from_rows(rows.clone())?,
        None => SectionalForces::zeros(nx - 1, ny - 1),
    };
    spec.check_sectional_forces(&sectional_forces)?;
    if first_non_finite(&sectional_forces.flatten()).is_some() {
        return Err(GeometryError::NonFinite {
            what: "sectional forces",
        });
    }

    Ok(SurfaceRecord {
        spec,
        mesh,
        displacements,
        sectional_forces,
    })
}

/// The case's circulation system, checked against `system_size`.
pub fn linear_system(
    case: &CaseFile,
    system_size: usize,
) -> Result<Option<(DMatrix<f64>, DVector<f64>)>, ValidationError> {
    let Some(system) = &case.system else {
        return Ok(None);
    };

    let shape_err = |field: &str, actual: usize| ValidationError::ShapeMismatch {
        field: field.to_string(),
        expected: system_size,
        actual,
    };
    if system.matrix.len() != system_size {
        return Err(shape_err("system.matrix rows", system.matrix.len()));
    }
    if let Some(row) = system.matrix.iter().find(|r| r.len() != system_size) {
        return Err(shape_err("system.matrix columns", row.len()));
    }
    if system.rhs.len() != system_size {
        return Err(shape_err("system.rhs", system.rhs.len()));
    }

    let values: Vec<f64> = system.matrix.iter().flatten().chain(&system.rhs).copied().collect();
    if let Some(bad) = first_non_finite(&values) {
        return Err(ValidationError::InvalidValue {
            field: "system".to_string(),
            value: bad.to_string(),
            reason: "entries must be finite".to_string(),
        });
    }

    let (entries, rhs) = values.split_at(system_size * system_size);
    let m = DMatrix::from_row_slice(system_size, system_size, entries);
    let b = DVector::from_column_slice(rhs);
    Ok(Some((m, b)))
}

pub fn solver_config(case: &CaseFile) -> SolverConfig {
    case.solver
        .as_ref()
        .map(|s| SolverConfig {
            pivot_tolerance: s.pivot_tolerance,
        })
        .unwrap_or_default()
}
