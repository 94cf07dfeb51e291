//! Panel sectional forces -> structural nodal loads.

use crate::error::TransferResult;
use ac_core::timing::{Timer, kernel_timing};
use ac_geometry::{
    FemOrigin, GeometryError, NodalLoads, Scalar, SectionalForces, SurfaceMesh, SurfaceSpec,
};
use tracing::trace;

/// Chordwise fraction where the strip force is taken to act.
pub const AERODYNAMIC_CENTER: f64 = 0.25;

/// Transfers strip forces to the two structural nodes bounding each strip.
///
/// Per spanwise strip `j` the chordwise-summed force `F` acts at the
/// quarter-chord point of the leading panel; its moment about the structural
/// axis point of the same panel is `r x F`. Force and moment are split half
/// and half between nodes `j` and `j + 1`, so the nodal forces always sum to
/// the total sectional force.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadTransfer {
    fem_origin: FemOrigin,
    shape: Option<(usize, usize)>,
}

impl LoadTransfer {
    pub fn new(fem_origin: FemOrigin) -> Self {
        Self {
            fem_origin,
            shape: None,
        }
    }

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
        deformed: &SurfaceMesh<T>,
        forces: &SectionalForces<T>,
    ) -> TransferResult<NodalLoads<T>> {
        self.check(deformed, forces)?;
        let timer = Timer::start();

        let strips = forces.chordwise_sum();
        let aero_points = deformed.leading_panel_points(AERODYNAMIC_CENTER);
        let axis_points = deformed.leading_panel_points(self.fem_origin.value());

        let mut loads = NodalLoads::zeros(deformed.ny());
        for (j, force) in strips.into_iter().enumerate() {
            let arm = aero_points[j] - axis_points[j];
            let moment = arm.cross(&force);
            loads.accumulate(j, &force, &moment, 0.5);
            loads.accumulate(j + 1, &force, &moment, 0.5);
        }

        trace!(nodes = loads.len(), "transferred sectional forces");
        timer.stop_into(&kernel_timing::LOAD_TRANSFER);
        Ok(loads)
    }

    fn check<T: Scalar>(
        &self,
        deformed: &SurfaceMesh<T>,
        forces: &SectionalForces<T>,
    ) -> Result<(), GeometryError> {
        let (nx, ny) = self.shape.unwrap_or((deformed.nx(), deformed.ny()));
        let dims = [
            ("mesh chordwise points", nx, deformed.nx()),
            ("mesh spanwise points", ny, deformed.ny()),
            ("sectional force chordwise panels", nx - 1, forces.chordwise()),
            ("sectional force spanwise panels", ny - 1, forces.spanwise()),
        ];
        for (what, expected, actual) in dims {
            if expected != actual {
                return Err(GeometryError::ShapeMismatch {
                    what,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }
}

/// One-shot load transfer with a raw `fem_origin` weight.
pub fn transfer_loads<T: Scalar>(
    deformed: &SurfaceMesh<T>,
    forces: &SectionalForces<T>,
    fem_origin: f64,
) -> TransferResult<NodalLoads<T>> {
    LoadTransfer::new(FemOrigin::new(fem_origin)?).apply(deformed, forces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ac_core::{Tolerances, nearly_equal};
    use ac_geometry::Vec3;

    fn plate() -> SurfaceMesh {
        SurfaceMesh::from_rows(vec![
            vec![[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 2.0, 0.0]],
            vec![[1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 2.0, 0.0]],
        ])
        .unwrap()
    }

    fn unit_lift() -> SectionalForces {
        SectionalForces::from_rows(vec![vec![[0.0, 0.0, 1.0], [0.0, 0.0, 1.0]]]).unwrap()
    }

    #[test]
    fn quarter_chord_axis_carries_no_moment() {
        let loads = transfer_loads(&plate(), &unit_lift(), 0.25).unwrap();
        assert_eq!(loads.total_force(), Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(loads.force(0), Vec3::new(0.0, 0.0, 0.5));
        assert_eq!(loads.force(1), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(loads.force(2), Vec3::new(0.0, 0.0, 0.5));
        for j in 0..3 {
            assert!(loads.moment(j).iter().all(|m| m.abs() < 1e-15));
        }
    }

    #[test]
    fn aft_axis_gives_pitching_moment() {
        // arm (-0.1, 0, 0) crossed with (0, 0, 1) is (0, 0.1, 0) per strip
        let loads = transfer_loads(&plate(), &unit_lift(), 0.35).unwrap();
        let tol = Tolerances { abs: 1e-15, rel: 1e-12 };
        let my: Vec<f64> = (0..3).map(|j| loads.moment(j)[1]).collect();
        assert!(nearly_equal(my[0], 0.05, tol), "{my:?}");
        assert!(nearly_equal(my[1], 0.1, tol), "{my:?}");
        assert!(nearly_equal(my[2], 0.05, tol), "{my:?}");
        assert!(loads.moment(1)[0].abs() < 1e-15);
        assert!(loads.moment(1)[2].abs() < 1e-15);
    }

    #[test]
    fn chordwise_panels_are_summed() {
        let mesh = SurfaceMesh::<f64>::from_rows(vec![
            vec![[0.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![[0.5, 0.0, 0.0], [0.5, 1.0, 0.0]],
            vec![[1.0, 0.0, 0.0], [1.0, 1.0, 0.0]],
        ])
        .unwrap();
        let forces =
            SectionalForces::from_rows(vec![vec![[1.0, 0.0, 2.0]], vec![[0.5, 0.0, 1.0]]]).unwrap();
        let loads = transfer_loads(&mesh, &forces, 0.5).unwrap();
        assert_eq!(loads.total_force(), Vec3::new(1.5, 0.0, 3.0));
        assert_eq!(loads.force(0), loads.force(1));
    }

    #[test]
    fn force_shape_checked() {
        let forces = SectionalForces::<f64>::zeros(1, 3);
        let err = transfer_loads(&plate(), &forces, 0.25).unwrap_err();
        assert_eq!(
            err.geometry(),
            &GeometryError::ShapeMismatch {
                what: "sectional force spanwise panels",
                expected: 2,
                actual: 3,
            }
        );
    }

    #[test]
    fn invalid_weight_rejected() {
        assert!(transfer_loads(&plate(), &unit_lift(), f64::NAN).is_err());
        assert!(transfer_loads(&plate(), &unit_lift(), -0.01).is_err());
    }
}
