//! Structural displacements -> deformed aerodynamic mesh.

use crate::error::TransferResult;
use crate::rotation::{apply_to_row, small_rotation_transform};
use ac_core::timing::{Timer, kernel_timing};
use ac_geometry::{Displacements, FemOrigin, GeometryError, Scalar, SurfaceMesh, SurfaceSpec};

/// Applies one rigid transform per spanwise station to every chordwise point
/// of that station.
///
/// Each point is rotated about the station's reference point (at `fem_origin`
/// along the chord) with the additive small-rotation transform, translated by
/// the station's `(dx, dy, dz)`, and superposed on the undeformed mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplacementTransfer {
    fem_origin: FemOrigin,
    shape: Option<(usize, usize)>,
}

impl DisplacementTransfer {
    pub fn new(fem_origin: FemOrigin) -> Self {
        Self {
            fem_origin,
            shape: None,
        }
    }

    /// Transfer bound to `spec`'s mesh dimensions.
    pub fn for_surface(spec: &SurfaceSpec) -> Self {
        Self {
            fem_origin: spec.fem_origin(),
            shape: Some((spec.nx(), spec.ny())),
        }
    }

    pub fn fem_origin(&self) -> FemOrigin {
        self.fem_origin
    }

    pub fn apply<T: Scalar>(
        &self,
        mesh: &SurfaceMesh<T>,
        displacements: &Displacements<T>,
    ) -> TransferResult<SurfaceMesh<T>> {
        self.check(mesh, displacements)?;
        let timer = Timer::start();

        let local = mesh.local_coordinates(self.fem_origin);
        let stations: Vec<_> = (0..mesh.ny())
            .map(|j| {
                (
                    small_rotation_transform(&displacements.rotation(j)),
                    displacements.translation(j),
                )
            })
            .collect();

        let mut deformed = mesh.clone();
        for i in 0..mesh.nx() {
            for (j, (transform, translation)) in stations.iter().enumerate() {
                let rotated = apply_to_row(&local[(i, j)], transform);
                deformed[(i, j)] = rotated + translation + mesh[(i, j)];
            }
        }

        timer.stop_into(&kernel_timing::DISPLACEMENT_TRANSFER);
        Ok(deformed)
    }

    fn check<T: Scalar>(
        &self,
        mesh: &SurfaceMesh<T>,
        displacements: &Displacements<T>,
    ) -> Result<(), GeometryError> {
        if let Some((nx, ny)) = self.shape {
            if mesh.nx() != nx {
                return Err(GeometryError::ShapeMismatch {
                    what: "mesh chordwise points",
                    expected: nx,
                    actual: mesh.nx(),
                });
            }
            if mesh.ny() != ny {
                return Err(GeometryError::ShapeMismatch {
                    what: "mesh spanwise points",
                    expected: ny,
                    actual: mesh.ny(),
                });
            }
        }
        if displacements.len() != mesh.ny() {
            return Err(GeometryError::ShapeMismatch {
                what: "displacement rows",
                expected: mesh.ny(),
                actual: displacements.len(),
            });
        }
        Ok(())
    }
}

/// One-shot displacement transfer with a raw `fem_origin` weight.
pub fn transfer_displacements<T: Scalar>(
    mesh: &SurfaceMesh<T>,
    displacements: &Displacements<T>,
    fem_origin: f64,
) -> TransferResult<SurfaceMesh<T>> {
    DisplacementTransfer::new(FemOrigin::new(fem_origin)?).apply(mesh, displacements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransferError;

    fn plate() -> SurfaceMesh {
        SurfaceMesh::from_rows(vec![
            vec![[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 2.0, 0.0]],
            vec![[1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 2.0, 0.0]],
        ])
        .unwrap()
    }

    #[test]
    fn zero_displacement_is_identity() {
        let mesh = plate();
        let deformed = transfer_displacements(&mesh, &Displacements::zeros(3), 0.25).unwrap();
        assert_eq!(deformed, mesh);
    }

    #[test]
    fn translation_shifts_every_point() {
        let mesh = plate();
        let disp = Displacements::rigid_translation(3, [0.1, -0.2, 0.3]);
        let deformed = transfer_displacements(&mesh, &disp, 0.4).unwrap();
        for (p, q) in mesh.points().iter().zip(deformed.points()) {
            assert!((q[0] - p[0] - 0.1).abs() < 1e-15);
            assert!((q[1] - p[1] + 0.2).abs() < 1e-15);
            assert!((q[2] - p[2] - 0.3).abs() < 1e-15);
        }
    }

    #[test]
    fn twist_about_reference_line() {
        // nose-down twist about y at the tip station only
        let mesh = plate();
        let theta: f64 = 0.1;
        let mut rows = vec![[0.0; 6]; 3];
        rows[2][4] = theta;
        let deformed = transfer_displacements(&mesh, &Displacements::new(rows), 0.25).unwrap();

        // untouched stations stay put
        assert_eq!(deformed[(0, 0)], mesh[(0, 0)]);
        assert_eq!(deformed[(1, 1)], mesh[(1, 1)]);

        // leading edge sits 0.25 ahead of the axis: s = (-0.25, 0, 0)
        let le = deformed[(0, 2)];
        assert!((le[0] - (-0.25 * (theta.cos() - 1.0))).abs() < 1e-15);
        assert!((le[2] - (-0.25 * theta.sin())).abs() < 1e-15);

        // trailing edge on the other side moves the opposite way in z
        let te = deformed[(1, 2)];
        assert!((te[2] - 0.75 * theta.sin()).abs() < 1e-15);

        // reference point itself does not move
        let axis = deformed[(0, 2)].lerp(&deformed[(1, 2)], 0.25);
        assert!((axis[0] - 0.25).abs() < 1e-15);
        assert!(axis[2].abs() < 1e-15);
    }

    #[test]
    fn bound_transfer_checks_mesh_shape() {
        let spec = SurfaceSpec::new(ac_core::SurfaceId::from_index(0).unwrap(), "wing", 2, 4, 0.3)
            .unwrap();
        let err = DisplacementTransfer::for_surface(&spec)
            .apply(&plate(), &Displacements::zeros(3))
            .unwrap_err();
        assert!(matches!(
            err,
            TransferError::Geometry(GeometryError::ShapeMismatch {
                expected: 4,
                actual: 3,
                ..
            })
        ));
    }

    #[test]
    fn displacement_rows_must_match_stations() {
        let err = transfer_displacements(&plate(), &Displacements::zeros(2), 0.3).unwrap_err();
        assert!(matches!(
            err.geometry(),
            GeometryError::ShapeMismatch {
                what: "displacement rows",
                ..
            }
        ));
    }

    #[test]
    fn invalid_weight_rejected() {
        let err = transfer_displacements(&plate(), &Displacements::zeros(3), 1.5).unwrap_err();
        assert_eq!(err.geometry(), &GeometryError::InvalidWeight { value: 1.5 });
    }
}
