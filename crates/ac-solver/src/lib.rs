//! Circulation solver for the vortex-panel system.
//!
//! Solves `M Γ = b` for the panel circulations with a dense LU factorization
//! and exposes what an external derivative engine needs around that solve:
//! the residual `R(Γ) = M Γ - b`, its three Jacobian blocks as sparse
//! triplets, and forward/reverse linear solves that reuse the cached factors.

pub mod circulation;
pub mod error;
pub mod jacobian;
pub mod lu;

pub use circulation::{CirculationSolver, SolveMode, SolverConfig};
pub use error::{SolverError, SolverResult};
pub use jacobian::{
    FdScheme, JacobianPatterns, Partials, PartialsCheck, SparseBlock, SparsityPattern,
    check_partials, finite_difference_jacobian,
};
pub use lu::{LuCache, LuFactors};
