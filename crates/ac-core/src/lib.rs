//! ac-core: stable foundation for aerocouple.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - ids (compact surface identifiers)
//! - error (umbrella error type shared by the coupling crates)
//! - timing (opt-in instrumentation for factorizations and solves)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod timing;

// Re-exports: nice ergonomics for downstream crates
pub use error::{AcError, AcResult};
pub use ids::*;
pub use numeric::*;
