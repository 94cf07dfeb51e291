//! Floating-point conventions shared by the coupling crates.

use crate::{AcError, AcResult};

/// Floating point type used throughout the coupling crates.
pub type Real = f64;

/// Absolute/relative tolerance pair.
///
/// A difference passes when it is within `abs`, or within `rel` times the
/// magnitude it is measured against.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

impl Tolerances {
    /// `err <= abs` or `err <= rel * scale`.
    pub fn within(&self, err: Real, scale: Real) -> bool {
        err <= self.abs || err <= self.rel * scale.abs()
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    tol.within((a - b).abs(), a.abs().max(b.abs()))
}

/// First NaN or infinite entry, if any.
pub fn first_non_finite(values: &[Real]) -> Option<Real> {
    values.iter().copied().find(|v| !v.is_finite())
}

pub fn ensure_all_finite(values: &[Real], what: &'static str) -> AcResult<()> {
    match first_non_finite(values) {
        Some(value) => Err(AcError::NonFinite { what, value }),
        None => Ok(()),
    }
}

/// Largest absolute entry, 0 for an empty slice.
pub fn max_abs(values: &[Real]) -> Real {
    values.iter().fold(0.0, |acc, v| acc.max(v.abs()))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn nearly_equal_is_symmetric(a in -1e6_f64..1e6, b in -1e6_f64..1e6) {
            let tol = Tolerances::default();
            prop_assert_eq!(nearly_equal(a, b, tol), nearly_equal(b, a, tol));
        }

        #[test]
        fn max_abs_bounds_every_entry(v in prop::collection::vec(-1e3_f64..1e3, 0..20)) {
            let m = max_abs(&v);
            prop_assert!(v.iter().all(|x| x.abs() <= m));
        }
    }
}
