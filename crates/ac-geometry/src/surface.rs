//! Lifting-surface definitions.

use crate::error::{GeometryError, GeometryResult};
use crate::fields::{Displacements, SectionalForces};
use crate::mesh::SurfaceMesh;
use ac_core::SurfaceId;

/// Chordwise fraction locating the structural reference line.
///
/// 0 is the leading edge, 1 the trailing edge.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct FemOrigin(f64);

impl FemOrigin {
    pub fn new(value: f64) -> GeometryResult<Self> {
        // NaN fails the range check as well
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(GeometryError::InvalidWeight { value })
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for FemOrigin {
    type Error = GeometryError;

    fn try_from(value: f64) -> GeometryResult<Self> {
        Self::new(value)
    }
}

/// One lifting surface: `nx` chordwise by `ny` spanwise corner points.
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceSpec {
    pub id: SurfaceId,
    pub name: String,
    nx: usize,
    ny: usize,
    fem_origin: FemOrigin,
}

impl SurfaceSpec {
    pub fn new(
        id: SurfaceId,
        name: impl Into<String>,
        nx: usize,
        ny: usize,
        fem_origin: f64,
    ) -> GeometryResult<Self> {
        if nx < 2 {
            return Err(GeometryError::Degenerate {
                what: "chordwise mesh",
                count: nx,
            });
        }
        if ny < 2 {
            return Err(GeometryError::Degenerate {
                what: "spanwise mesh",
                count: ny,
            });
        }
        Ok(Self {
            id,
            name: name.into(),
            nx,
            ny,
            fem_origin: FemOrigin::new(fem_origin)?,
        })
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn fem_origin(&self) -> FemOrigin {
        self.fem_origin
    }

    /// Number of panels, i.e. this surface's share of the circulation unknowns.
    pub fn num_panels(&self) -> usize {
        (self.nx - 1) * (self.ny - 1)
    }

    pub fn check_mesh<T: Copy>(&self, mesh: &SurfaceMesh<T>) -> GeometryResult<()> {
        check_dim("mesh chordwise points", self.nx, mesh.nx())?;
        check_dim("mesh spanwise points", self.ny, mesh.ny())
    }

    pub fn check_displacements<T: Copy>(&self, disp: &Displacements<T>) -> GeometryResult<()> {
        check_dim("displacement rows", self.ny, disp.len())
    }

    pub fn check_sectional_forces<T: Copy>(&self, forces: &SectionalForces<T>) -> GeometryResult<()> {
        check_dim("sectional force chordwise panels", self.nx - 1, forces.chordwise())?;
        check_dim("sectional force spanwise panels", self.ny - 1, forces.spanwise())
    }
}

fn check_dim(what: &'static str, expected: usize, actual: usize) -> GeometryResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(GeometryError::ShapeMismatch {
            what,
            expected,
            actual,
        })
    }
}
