//! ac-transfer: aero-structural field transfer along a structural reference line.
//!
//! - `DisplacementTransfer`: structural nodal displacements -> deformed
//!   aerodynamic mesh, one rigid transform per spanwise station
//! - `LoadTransfer`: panel sectional forces on the deformed mesh -> structural
//!   nodal forces and moments, conserving the force resultant
//!
//! Both kernels are generic over `ac_geometry::Scalar`, so the same code
//! evaluates on `f64` and on dual numbers; `derivatives` uses the latter for
//! exact forward-mode partials. `batch` runs independent surfaces in parallel.

pub mod batch;
pub mod derivatives;
pub mod displacement;
pub mod error;
pub mod loads;
pub mod rotation;

pub use batch::{DisplacementCase, LoadCase, deform_surfaces, transfer_surface_loads};
pub use derivatives::{
    DisplacementPartials, LoadPartials, displacement_jvp, displacement_partials, load_jvp,
    load_partials,
};
pub use displacement::{DisplacementTransfer, transfer_displacements};
pub use error::{TransferError, TransferResult};
pub use loads::{AERODYNAMIC_CENTER, LoadTransfer, transfer_loads};
pub use rotation::small_rotation_transform;
