//! Circulation solve with factorization reuse across derivative modes.

use crate::error::{SolverError, SolverResult};
use crate::jacobian::{JacobianPatterns, Partials};
use crate::lu::LuCache;
use ac_geometry::{SurfaceSpec, SystemLayout};
use nalgebra::{DMatrix, DVector};
use tracing::debug;

/// Circulation solver configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverConfig {
    /// Pivots at or below this fraction of `max|M_ij|` are treated as singular
    pub pivot_tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            pivot_tolerance: 1e-13,
        }
    }
}

/// Direction of a linear solve against the cached factors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveMode {
    /// `M x = seed`
    Forward,
    /// `Mᵀ x = seed` (adjoint)
    Reverse,
}

/// Solver for `M Γ = b` owning the only mutable state in the coupling step:
/// the LU factors of the last matrix it saw.
///
/// Writes to the cache go through `&mut self` (`solve`, `linearize`,
/// `invalidate`) and reads through `&self` (`solve_linear`), so a linear solve
/// can never observe a half-written factorization.
pub struct CirculationSolver {
    system_size: usize,
    config: SolverConfig,
    patterns: JacobianPatterns,
    cache: LuCache,
}

impl CirculationSolver {
    pub fn new(system_size: usize, config: SolverConfig) -> SolverResult<Self> {
        if system_size == 0 {
            return Err(SolverError::ProblemSetup {
                what: "system has no panels".to_string(),
            });
        }
        if !(config.pivot_tolerance >= 0.0 && config.pivot_tolerance.is_finite()) {
            return Err(SolverError::ProblemSetup {
                what: format!("invalid pivot tolerance {}", config.pivot_tolerance),
            });
        }
        Ok(Self {
            system_size,
            config,
            patterns: JacobianPatterns::declare(system_size),
            cache: LuCache::new(),
        })
    }

    /// Size the solver for the union of `surfaces`' panels.
    pub fn for_surfaces(surfaces: &[SurfaceSpec], config: SolverConfig) -> SolverResult<Self> {
        let layout = SystemLayout::from_surfaces(surfaces);
        Self::new(layout.system_size(), config)
    }

    pub fn system_size(&self) -> usize {
        self.system_size
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn patterns(&self) -> &JacobianPatterns {
        &self.patterns
    }

    pub fn factorization_count(&self) -> usize {
        self.cache.factorization_count()
    }

    pub fn has_factorization(&self) -> bool {
        self.cache.factors().is_some()
    }

    /// Drop the cached factors; the next `solve`/`linearize` refactorizes.
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    /// `R(Γ) = M Γ - b`
    pub fn residual(
        &self,
        m: &DMatrix<f64>,
        circulations: &DVector<f64>,
        rhs: &DVector<f64>,
    ) -> SolverResult<DVector<f64>> {
        self.check_matrix(m)?;
        self.check_vector("circulations", circulations)?;
        self.check_vector("rhs", rhs)?;
        Ok(m * circulations - rhs)
    }

    /// Direct solve of `M Γ = b`.
    pub fn solve(&mut self, m: &DMatrix<f64>, rhs: &DVector<f64>) -> SolverResult<DVector<f64>> {
        self.check_matrix(m)?;
        self.check_vector("rhs", rhs)?;
        let factors = self.cache.refresh(m, self.config.pivot_tolerance)?;
        let circulations = factors.solve(rhs)?;
        debug!(
            system_size = self.system_size,
            norm = circulations.norm(),
            "solved circulations"
        );
        Ok(circulations)
    }

    /// Residual partials at `(M, Γ)`; refreshes the factors if `M` changed.
    pub fn linearize(
        &mut self,
        m: &DMatrix<f64>,
        circulations: &DVector<f64>,
    ) -> SolverResult<Partials> {
        self.check_matrix(m)?;
        self.check_vector("circulations", circulations)?;
        self.cache.refresh(m, self.config.pivot_tolerance)?;
        Partials::evaluate(&self.patterns, m, circulations)
    }

    /// Solve against the cached factors without refactorizing.
    pub fn solve_linear(&self, seed: &DVector<f64>, mode: SolveMode) -> SolverResult<DVector<f64>> {
        self.check_vector("seed", seed)?;
        let factors = self
            .cache
            .factors()
            .ok_or(SolverError::MissingFactorization)?;
        match mode {
            SolveMode::Forward => factors.solve(seed),
            SolveMode::Reverse => factors.solve_transpose(seed),
        }
    }

    fn check_matrix(&self, m: &DMatrix<f64>) -> SolverResult<()> {
        let n = self.system_size;
        if m.nrows() != n {
            return Err(SolverError::ShapeMismatch {
                what: "influence matrix rows",
                expected: n,
                actual: m.nrows(),
            });
        }
        if m.ncols() != n {
            return Err(SolverError::ShapeMismatch {
                what: "influence matrix columns",
                expected: n,
                actual: m.ncols(),
            });
        }
        Ok(())
    }

    fn check_vector(&self, what: &'static str, v: &DVector<f64>) -> SolverResult<()> {
        if v.len() == self.system_size {
            Ok(())
        } else {
            Err(SolverError::ShapeMismatch {
                what,
                expected: self.system_size,
                actual: v.len(),
            })
        }
    }
}
