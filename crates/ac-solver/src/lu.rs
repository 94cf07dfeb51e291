//! Dense LU factorization with partial pivoting and its owned cache.

use crate::error::{SolverError, SolverResult};
use ac_core::first_non_finite;
use ac_core::timing::{Timer, kernel_timing};
use nalgebra::{DMatrix, DVector, Dyn, LU};
use tracing::{debug, trace, warn};

/// `P M = L U` factors of a square influence matrix.
#[derive(Clone, Debug)]
pub struct LuFactors {
    lu: LU<f64, Dyn, Dyn>,
    dim: usize,
}

impl LuFactors {
    /// Factorize a square matrix.
    ///
    /// A pivot is rejected when `|U_kk| <= pivot_tolerance * max|M_ij|`; an
    /// all-zero matrix is always singular.
    pub fn factorize(m: &DMatrix<f64>, pivot_tolerance: f64) -> SolverResult<Self> {
        let n = m.nrows();
        if m.ncols() != n {
            return Err(SolverError::ShapeMismatch {
                what: "influence matrix columns",
                expected: n,
                actual: m.ncols(),
            });
        }
        if first_non_finite(m.as_slice()).is_some() {
            return Err(SolverError::NonFinite {
                what: "influence matrix",
            });
        }

        let timer = Timer::start();
        let threshold = pivot_tolerance * m.amax();
        let lu = m.clone().lu();

        let pivots = lu.u().diagonal();
        if let Some((row, &pivot)) = pivots
            .iter()
            .enumerate()
            .find(|(_, p)| p.abs() <= threshold)
        {
            warn!(row, pivot, threshold, "LU pivot below tolerance");
            return Err(SolverError::Singular {
                row,
                pivot,
                tolerance: threshold,
            });
        }

        timer.stop_into(&kernel_timing::FACTORIZATION);
        Ok(Self { lu, dim: n })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Solve `M x = b`.
    pub fn solve(&self, b: &DVector<f64>) -> SolverResult<DVector<f64>> {
        let timer = Timer::start();
        let x = self.lu.solve(b).ok_or_else(|| self.degenerate())?;
        timer.stop_into(&kernel_timing::TRIANGULAR_SOLVE);
        Ok(x)
    }

    /// Solve `Mᵀ x = b` with the same factors: `Mᵀ = Uᵀ Lᵀ P`.
    pub fn solve_transpose(&self, b: &DVector<f64>) -> SolverResult<DVector<f64>> {
        let timer = Timer::start();
        let z = self
            .lu
            .u()
            .tr_solve_upper_triangular(b)
            .ok_or_else(|| self.degenerate())?;
        let mut x = self
            .lu
            .l()
            .tr_solve_lower_triangular(&z)
            .ok_or_else(|| self.degenerate())?;
        self.lu.p().inv_permute_rows(&mut x);
        timer.stop_into(&kernel_timing::TRIANGULAR_SOLVE);
        Ok(x)
    }

    // Factors only exist past the pivot check, so this is unreachable in practice.
    fn degenerate(&self) -> SolverError {
        let (row, pivot) = self
            .lu
            .u()
            .diagonal()
            .iter()
            .copied()
            .enumerate()
            .min_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
            .unwrap_or((0, 0.0));
        SolverError::Singular {
            row,
            pivot,
            tolerance: 0.0,
        }
    }
}

struct CachedFactors {
    source: DMatrix<f64>,
    factors: LuFactors,
}

/// Owned cache of the most recent factorization.
///
/// The factors are keyed on an exact copy of the matrix they came from, so a
/// changed matrix always refactorizes and an unchanged one never does.
#[derive(Default)]
pub struct LuCache {
    entry: Option<CachedFactors>,
    factorizations: usize,
}

impl LuCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Factors of `m`, refactorizing only when `m` differs from the cached source.
    ///
    /// A failed factorization leaves the cache empty.
    pub fn refresh(&mut self, m: &DMatrix<f64>, pivot_tolerance: f64) -> SolverResult<&LuFactors> {
        let stale = self.entry.as_ref().is_none_or(|c| c.source != *m);
        if stale {
            self.entry = None;
            debug!(system_size = m.nrows(), "factorizing influence matrix");
            let factors = LuFactors::factorize(m, pivot_tolerance)?;
            self.factorizations += 1;
            self.entry = Some(CachedFactors {
                source: m.clone(),
                factors,
            });
        } else {
            trace!("reusing cached LU factors");
        }
        self.factors().ok_or(SolverError::MissingFactorization)
    }

    pub fn factors(&self) -> Option<&LuFactors> {
        self.entry.as_ref().map(|c| &c.factors)
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Number of factorizations performed over the cache's lifetime.
    pub fn factorization_count(&self) -> usize {
        self.factorizations
    }
}
