//! Exact forward-mode partials of the transfer kernels.
//!
//! The kernels are generic over `Scalar`, so evaluating them on `Dual64`
//! with a unit `eps` on one input entry yields one Jacobian column. Inputs
//! and outputs use the row-major flattenings of the geometry types:
//! mesh `(i, j, c)` at `(i * ny + j) * 3 + c`, displacements and loads
//! `(j, c)` at `j * 6 + c`, sectional forces `(i, j, c)` at
//! `(i * (ny - 1) + j) * 3 + c`.

use crate::displacement::DisplacementTransfer;
use crate::error::TransferResult;
use crate::loads::LoadTransfer;
use ac_geometry::{Displacements, GeometryError, NodalLoads, SectionalForces, SurfaceMesh};
use nalgebra::DMatrix;
use num_dual::Dual64;

/// Jacobians of the deformed mesh.
#[derive(Clone, Debug)]
pub struct DisplacementPartials {
    /// `∂ deformed / ∂ mesh`, `nx*ny*3` square
    pub wrt_mesh: DMatrix<f64>,
    /// `∂ deformed / ∂ displacements`, `nx*ny*3 x ny*6`
    pub wrt_displacements: DMatrix<f64>,
}

/// Jacobians of the nodal loads.
#[derive(Clone, Debug)]
pub struct LoadPartials {
    /// `∂ loads / ∂ deformed mesh`, `ny*6 x nx*ny*3`
    pub wrt_mesh: DMatrix<f64>,
    /// `∂ loads / ∂ sectional forces`, `ny*6 x (nx-1)*(ny-1)*3`
    pub wrt_sectional_forces: DMatrix<f64>,
}

/// One dual-valued kernel output, flattened.
type Column = TransferResult<Vec<Dual64>>;

/// Lift `values` to duals, with `eps = 1` at `seed` and `eps = 0` elsewhere.
fn seeded(values: &[f64], seed: Option<usize>) -> Vec<Dual64> {
    values
        .iter()
        .enumerate()
        .map(|(k, &v)| Dual64::new(v, if Some(k) == seed { 1.0 } else { 0.0 }))
        .collect()
}

/// Lift `values` along the direction `dot`.
fn directed(what: &'static str, values: &[f64], dot: &[f64]) -> Column {
    if dot.len() != values.len() {
        return Err(GeometryError::ShapeMismatch {
            what,
            expected: values.len(),
            actual: dot.len(),
        }
        .into());
    }
    Ok(values
        .iter()
        .zip(dot)
        .map(|(&v, &d)| Dual64::new(v, d))
        .collect())
}

fn split(values: &[Dual64]) -> (Vec<f64>, Vec<f64>) {
    values.iter().map(|d| (d.re, d.eps)).unzip()
}

/// Assemble a Jacobian one seeded evaluation per column.
fn jacobian_by_columns<F>(rows: usize, cols: usize, column: F) -> TransferResult<DMatrix<f64>>
where
    F: Fn(usize) -> Column,
{
    let mut jac = DMatrix::zeros(rows, cols);
    for k in 0..cols {
        for (r, d) in column(k)?.iter().enumerate() {
            jac[(r, k)] = d.eps;
        }
    }
    Ok(jac)
}

pub fn displacement_partials(
    transfer: &DisplacementTransfer,
    mesh: &SurfaceMesh,
    displacements: &Displacements,
) -> TransferResult<DisplacementPartials> {
    // value pass validates shapes before any seeding
    transfer.apply(mesh, displacements)?;

    let (nx, ny) = (mesh.nx(), mesh.ny());
    let mesh_flat = mesh.flatten();
    let disp_flat = displacements.flatten();
    let rows = mesh_flat.len();

    let eval = |mesh_seed: Option<usize>, disp_seed: Option<usize>| -> Column {
        let m = SurfaceMesh::from_flat(nx, ny, &seeded(&mesh_flat, mesh_seed))?;
        let d = Displacements::from_flat(ny, &seeded(&disp_flat, disp_seed))?;
        Ok(transfer.apply(&m, &d)?.flatten())
    };

    Ok(DisplacementPartials {
        wrt_mesh: jacobian_by_columns(rows, mesh_flat.len(), |k| eval(Some(k), None))?,
        wrt_displacements: jacobian_by_columns(rows, disp_flat.len(), |k| eval(None, Some(k)))?,
    })
}

/// Deformed mesh and its directional derivative along `(mesh_dot, disp_dot)`.
pub fn displacement_jvp(
    transfer: &DisplacementTransfer,
    mesh: &SurfaceMesh,
    displacements: &Displacements,
    mesh_dot: &[f64],
    disp_dot: &[f64],
) -> TransferResult<(SurfaceMesh, Vec<f64>)> {
    let (nx, ny) = (mesh.nx(), mesh.ny());
    let m = SurfaceMesh::from_flat(nx, ny, &directed("mesh tangent", &mesh.flatten(), mesh_dot)?)?;
    let d = Displacements::from_flat(
        ny,
        &directed("displacement tangent", &displacements.flatten(), disp_dot)?,
    )?;
    let (value, tangent) = split(&transfer.apply(&m, &d)?.flatten());
    Ok((SurfaceMesh::from_flat(nx, ny, &value)?, tangent))
}

pub fn load_partials(
    transfer: &LoadTransfer,
    deformed: &SurfaceMesh,
    forces: &SectionalForces,
) -> TransferResult<LoadPartials> {
    transfer.apply(deformed, forces)?;

    let (nx, ny) = (deformed.nx(), deformed.ny());
    let (chordwise, spanwise) = (forces.chordwise(), forces.spanwise());
    let mesh_flat = deformed.flatten();
    let force_flat = forces.flatten();
    let rows = ny * 6;

    let eval = |mesh_seed: Option<usize>, force_seed: Option<usize>| -> Column {
        let m = SurfaceMesh::from_flat(nx, ny, &seeded(&mesh_flat, mesh_seed))?;
        let f = SectionalForces::from_flat(chordwise, spanwise, &seeded(&force_flat, force_seed))?;
        Ok(transfer.apply(&m, &f)?.flatten())
    };

    Ok(LoadPartials {
        wrt_mesh: jacobian_by_columns(rows, mesh_flat.len(), |k| eval(Some(k), None))?,
        wrt_sectional_forces: jacobian_by_columns(rows, force_flat.len(), |k| {
            eval(None, Some(k))
        })?,
    })
}

/// Nodal loads and their directional derivative along `(mesh_dot, forces_dot)`.
pub fn load_jvp(
    transfer: &LoadTransfer,
    deformed: &SurfaceMesh,
    forces: &SectionalForces,
    mesh_dot: &[f64],
    forces_dot: &[f64],
) -> TransferResult<(NodalLoads, Vec<f64>)> {
    let (nx, ny) = (deformed.nx(), deformed.ny());
    let m = SurfaceMesh::from_flat(
        nx,
        ny,
        &directed("mesh tangent", &deformed.flatten(), mesh_dot)?,
    )?;
    let f = SectionalForces::from_flat(
        forces.chordwise(),
        forces.spanwise(),
        &directed("sectional force tangent", &forces.flatten(), forces_dot)?,
    )?;
    let loads = transfer.apply(&m, &f)?;
    let (_, tangent) = split(&loads.flatten());
    Ok((loads.map(|d| d.re), tangent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ac_geometry::FemOrigin;

    fn plate() -> SurfaceMesh {
        SurfaceMesh::from_rows(vec![
            vec![[0.0, 0.0, 0.0], [0.0, 1.0, 0.1], [0.1, 2.0, 0.2]],
            vec![[1.0, 0.0, 0.0], [1.1, 1.0, 0.1], [1.2, 2.0, 0.3]],
        ])
        .unwrap()
    }

    #[test]
    fn translation_columns_are_identity_blocks() {
        let transfer = DisplacementTransfer::new(FemOrigin::new(0.3).unwrap());
        let disp = Displacements::new(vec![[0.0, 0.0, 0.0, 0.05, -0.02, 0.01]; 3]);
        let p = displacement_partials(&transfer, &plate(), &disp).unwrap();
        assert_eq!(p.wrt_displacements.shape(), (18, 18));

        // every point of station j moves one-for-one with (dx, dy, dz) of node j
        for i in 0..2 {
            for j in 0..3 {
                for c in 0..3 {
                    let row = (i * 3 + j) * 3 + c;
                    for col in 0..18 {
                        let expected = if col == j * 6 + c { 1.0 } else { 0.0 };
                        if col % 6 < 3 {
                            assert_eq!(p.wrt_displacements[(row, col)], expected);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn zero_rotation_mesh_partials_are_identity() {
        let transfer = DisplacementTransfer::new(FemOrigin::new(0.3).unwrap());
        let p = displacement_partials(&transfer, &plate(), &Displacements::zeros(3)).unwrap();
        let eye = DMatrix::<f64>::identity(18, 18);
        assert!((p.wrt_mesh - eye).amax() < 1e-15);
    }

    #[test]
    fn load_force_partials_split_in_half() {
        let transfer = LoadTransfer::new(FemOrigin::new(0.4).unwrap());
        let forces = SectionalForces::from_rows(vec![vec![[0.0, 0.0, 1.0], [0.2, 0.0, 1.5]]]).unwrap();
        let p = load_partials(&transfer, &plate(), &forces).unwrap();
        assert_eq!(p.wrt_sectional_forces.shape(), (18, 6));

        // Fz of strip 1 feeds half into Fz of nodes 1 and 2
        let col = 3 + 2;
        assert_eq!(p.wrt_sectional_forces[(6 + 2, col)], 0.5);
        assert_eq!(p.wrt_sectional_forces[(12 + 2, col)], 0.5);
        assert_eq!(p.wrt_sectional_forces[(2, col)], 0.0);
    }

    #[test]
    fn jvp_matches_partials_column() {
        let transfer = LoadTransfer::new(FemOrigin::new(0.4).unwrap());
        let forces = SectionalForces::from_rows(vec![vec![[0.1, 0.0, 1.0], [0.2, 0.0, 1.5]]]).unwrap();
        let mesh = plate();
        let p = load_partials(&transfer, &mesh, &forces).unwrap();

        let mut mesh_dot = vec![0.0; 18];
        mesh_dot[3] = 1.0;
        let (loads, tangent) = load_jvp(&transfer, &mesh, &forces, &mesh_dot, &[0.0; 6]).unwrap();
        assert_eq!(loads, transfer.apply(&mesh, &forces).unwrap());
        for (r, t) in tangent.iter().enumerate() {
            assert!((t - p.wrt_mesh[(r, 3)]).abs() < 1e-15);
        }
    }

    #[test]
    fn jvp_rejects_wrong_tangent_length() {
        let transfer = DisplacementTransfer::new(FemOrigin::new(0.3).unwrap());
        let err = displacement_jvp(
            &transfer,
            &plate(),
            &Displacements::zeros(3),
            &[0.0; 17],
            &[0.0; 18],
        )
        .unwrap_err();
        assert!(matches!(
            err.geometry(),
            GeometryError::ShapeMismatch {
                what: "mesh tangent",
                expected: 18,
                actual: 17
            }
        ));
    }
}
