//! ac-geometry: data model shared by the coupling kernels.
//!
//! Provides:
//! - Surface definitions (`SurfaceSpec`, validated `FemOrigin`)
//! - Corner-point meshes, generic over the scalar so the same kernels run on
//!   `f64` and on dual numbers
//! - Nodal displacement, sectional force and nodal load fields
//! - `SystemLayout`, the panel ordering across surfaces
//!
//! # Example
//!
//! ```
//! use ac_core::SurfaceId;
//! use ac_geometry::{SurfaceMesh, SurfaceSpec};
//!
//! let id = SurfaceId::from_index(0).unwrap();
//! let spec = SurfaceSpec::new(id, "wing", 2, 3, 0.35)?;
//! let mesh = SurfaceMesh::<f64>::from_rows(vec![
//!     vec![[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 2.0, 0.0]],
//!     vec![[1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 2.0, 0.0]],
//! ])?;
//!
//! spec.check_mesh(&mesh)?;
//! assert_eq!(spec.num_panels(), 2);
//! # Ok::<(), ac_geometry::GeometryError>(())
//! ```

pub mod error;
pub mod fields;
pub mod layout;
pub mod mesh;
pub mod scalar;
pub mod surface;

pub use error::{GeometryError, GeometryResult};
pub use fields::{Displacements, NodalLoads, SectionalForces};
pub use layout::SystemLayout;
pub use mesh::SurfaceMesh;
pub use surface::{FemOrigin, SurfaceSpec};
pub use scalar::{Scalar, Vec3};
