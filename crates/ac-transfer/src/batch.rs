//! Independent surfaces evaluated in parallel.
//!
//! Surfaces share no mutable state, so each record is transferred on its own
//! rayon task. The first failing surface fails the whole batch and no partial
//! output is returned.

use crate::displacement::DisplacementTransfer;
use crate::error::TransferResult;
use crate::loads::LoadTransfer;
use ac_geometry::{Displacements, NodalLoads, SectionalForces, SurfaceMesh, SurfaceSpec};
use rayon::prelude::*;
use tracing::debug;

/// Inputs of one surface's displacement transfer.
#[derive(Clone, Copy, Debug)]
pub struct DisplacementCase<'a> {
    pub spec: &'a SurfaceSpec,
    pub mesh: &'a SurfaceMesh,
    pub displacements: &'a Displacements,
}

/// Inputs of one surface's load transfer.
#[derive(Clone, Copy, Debug)]
pub struct LoadCase<'a> {
    pub spec: &'a SurfaceSpec,
    pub deformed_mesh: &'a SurfaceMesh,
    pub sectional_forces: &'a SectionalForces,
}

/// Deformed meshes, in the order of `cases`.
pub fn deform_surfaces(cases: &[DisplacementCase<'_>]) -> TransferResult<Vec<SurfaceMesh>> {
    debug!(surfaces = cases.len(), "deforming surfaces");
    cases
        .par_iter()
        .map(|case| {
            DisplacementTransfer::for_surface(case.spec)
                .apply(case.mesh, case.displacements)
                .map_err(|e| e.in_surface(case.spec.id))
        })
        .collect()
}

/// Nodal loads, in the order of `cases`.
pub fn transfer_surface_loads(cases: &[LoadCase<'_>]) -> TransferResult<Vec<NodalLoads>> {
    debug!(surfaces = cases.len(), "transferring surface loads");
    cases
        .par_iter()
        .map(|case| {
            LoadTransfer::for_surface(case.spec)
                .apply(case.deformed_mesh, case.sectional_forces)
                .map_err(|e| e.in_surface(case.spec.id))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransferError;
    use ac_core::SurfaceId;
    use ac_geometry::{GeometryError, Vec3};

    fn plate(nx: usize, ny: usize, z: f64) -> SurfaceMesh {
        let rows = (0..nx)
            .map(|i| (0..ny).map(|j| [i as f64, j as f64, z]).collect())
            .collect();
        SurfaceMesh::from_rows(rows).unwrap()
    }

    fn spec(index: u32, nx: usize, ny: usize) -> SurfaceSpec {
        SurfaceSpec::new(SurfaceId::from_index(index).unwrap(), "s", nx, ny, 0.35).unwrap()
    }

    #[test]
    fn batch_matches_single_surface_results() {
        let specs = [spec(0, 2, 4), spec(1, 3, 2)];
        let meshes = [plate(2, 4, 0.0), plate(3, 2, 1.0)];
        let disps = [
            Displacements::rigid_translation(4, [0.0, 0.0, 0.2]),
            Displacements::new(vec![[0.0, 0.0, 0.0, 0.0, 0.03, 0.0]; 2]),
        ];
        let cases: Vec<_> = (0..2)
            .map(|k| DisplacementCase {
                spec: &specs[k],
                mesh: &meshes[k],
                displacements: &disps[k],
            })
            .collect();

        let deformed = deform_surfaces(&cases).unwrap();
        assert_eq!(deformed.len(), 2);
        for k in 0..2 {
            let single = DisplacementTransfer::for_surface(&specs[k])
                .apply(&meshes[k], &disps[k])
                .unwrap();
            assert_eq!(deformed[k], single);
        }

        let forces = [
            SectionalForces::from_rows(vec![vec![[0.0, 0.0, 1.0]; 3]]).unwrap(),
            SectionalForces::from_rows(vec![vec![[0.0, 0.0, 2.0]]; 2]).unwrap(),
        ];
        let cases: Vec<_> = (0..2)
            .map(|k| LoadCase {
                spec: &specs[k],
                deformed_mesh: &deformed[k],
                sectional_forces: &forces[k],
            })
            .collect();
        let loads = transfer_surface_loads(&cases).unwrap();
        assert_eq!(loads[0].total_force(), Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(loads[1].total_force(), Vec3::new(0.0, 0.0, 4.0));
    }

    #[test]
    fn failing_surface_fails_batch() {
        let specs = [spec(0, 2, 3), spec(4, 2, 3)];
        let mesh = plate(2, 3, 0.0);
        let good = Displacements::zeros(3);
        let bad = Displacements::zeros(2);
        let cases = [
            DisplacementCase {
                spec: &specs[0],
                mesh: &mesh,
                displacements: &good,
            },
            DisplacementCase {
                spec: &specs[1],
                mesh: &mesh,
                displacements: &bad,
            },
        ];
        let err = deform_surfaces(&cases).unwrap_err();
        assert_eq!(
            err,
            TransferError::InSurface {
                surface: SurfaceId::from_index(4).unwrap(),
                source: GeometryError::ShapeMismatch {
                    what: "displacement rows",
                    expected: 3,
                    actual: 2,
                },
            }
        );
    }
}
