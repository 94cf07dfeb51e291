//! Jacobian blocks of the circulation residual and finite-difference checks.
//!
//! With `R(Γ, M, b) = M Γ - b` and `M` flattened row-major (entry `M[i, k]`
//! at column `i * n + k`):
//! - `∂R/∂Γ = M`, dense `n x n`
//! - `∂R_i/∂M[i, k] = Γ[k]`, so row `i` only touches columns `i*n .. i*n + n`
//! - `∂R/∂b = -I`

use crate::error::{SolverError, SolverResult};
use nalgebra::{DMatrix, DVector};
use std::sync::Arc;

/// Row/column coordinates of a block's structurally nonzero entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SparsityPattern {
    pub rows: Vec<usize>,
    pub cols: Vec<usize>,
    pub shape: (usize, usize),
}

impl SparsityPattern {
    /// Every entry of an `n_rows x n_cols` block, row by row.
    pub fn dense(n_rows: usize, n_cols: usize) -> Self {
        let rows = (0..n_rows).flat_map(|i| std::iter::repeat_n(i, n_cols)).collect();
        let cols = (0..n_rows).flat_map(|_| 0..n_cols).collect();
        Self {
            rows,
            cols,
            shape: (n_rows, n_cols),
        }
    }

    /// Row `i` owns the `n` consecutive columns `i*n .. i*n + n` of an `n x n²` block.
    pub fn row_blocks(n: usize) -> Self {
        Self {
            rows: (0..n).flat_map(|i| std::iter::repeat_n(i, n)).collect(),
            cols: (0..n * n).collect(),
            shape: (n, n * n),
        }
    }

    pub fn diagonal(n: usize) -> Self {
        Self {
            rows: (0..n).collect(),
            cols: (0..n).collect(),
            shape: (n, n),
        }
    }

    pub fn nnz(&self) -> usize {
        self.rows.len()
    }
}

/// Patterns of the three residual blocks, declared once per system size.
#[derive(Clone, Debug)]
pub struct JacobianPatterns {
    pub circulations: Arc<SparsityPattern>,
    pub matrix: Arc<SparsityPattern>,
    pub rhs: Arc<SparsityPattern>,
}

impl JacobianPatterns {
    pub fn declare(n: usize) -> Self {
        Self {
            circulations: Arc::new(SparsityPattern::dense(n, n)),
            matrix: Arc::new(SparsityPattern::row_blocks(n)),
            rhs: Arc::new(SparsityPattern::diagonal(n)),
        }
    }
}

/// Values laid over a shared sparsity pattern.
#[derive(Clone, Debug)]
pub struct SparseBlock {
    pattern: Arc<SparsityPattern>,
    values: Vec<f64>,
}

impl SparseBlock {
    pub fn new(pattern: Arc<SparsityPattern>, values: Vec<f64>) -> SolverResult<Self> {
        if values.len() != pattern.nnz() {
            return Err(SolverError::ShapeMismatch {
                what: "sparse block values",
                expected: pattern.nnz(),
                actual: values.len(),
            });
        }
        Ok(Self { pattern, values })
    }

    pub fn pattern(&self) -> &SparsityPattern {
        &self.pattern
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn triplets(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.pattern
            .rows
            .iter()
            .zip(&self.pattern.cols)
            .zip(&self.values)
            .map(|((&r, &c), &v)| (r, c, v))
    }

    pub fn to_dense(&self) -> DMatrix<f64> {
        let (n_rows, n_cols) = self.pattern.shape;
        let mut dense = DMatrix::zeros(n_rows, n_cols);
        for (r, c, v) in self.triplets() {
            dense[(r, c)] += v;
        }
        dense
    }
}

/// Residual partials at one `(M, Γ)` point.
#[derive(Clone, Debug)]
pub struct Partials {
    /// `∂R/∂Γ`
    pub d_circulations: SparseBlock,
    /// `∂R/∂M`, columns follow the row-major flattening of `M`
    pub d_matrix: SparseBlock,
    /// `∂R/∂b`
    pub d_rhs: SparseBlock,
}

impl Partials {
    pub fn evaluate(
        patterns: &JacobianPatterns,
        m: &DMatrix<f64>,
        circulations: &DVector<f64>,
    ) -> SolverResult<Self> {
        let n = circulations.len();
        let d_circulations = (0..n)
            .flat_map(|i| (0..n).map(move |k| m[(i, k)]))
            .collect();
        let d_matrix = (0..n)
            .flat_map(|_| circulations.iter().copied())
            .collect();

        Ok(Self {
            d_circulations: SparseBlock::new(patterns.circulations.clone(), d_circulations)?,
            d_matrix: SparseBlock::new(patterns.matrix.clone(), d_matrix)?,
            d_rhs: SparseBlock::new(patterns.rhs.clone(), vec![-1.0; n])?,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FdScheme {
    Forward,
    /// More accurate, twice the residual evaluations.
    Central,
}

/// Finite-difference Jacobian of `f` at `x`.
///
/// Column `j` perturbs `x[j]` by `step * max(|x[j]|, 1)`.
pub fn finite_difference_jacobian<F>(
    x: &DVector<f64>,
    f: F,
    step: f64,
    scheme: FdScheme,
) -> SolverResult<DMatrix<f64>>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
{
    let n = x.len();
    let f_x = f(x)?;
    let mut jac = DMatrix::zeros(f_x.len(), n);

    for j in 0..n {
        let dx = step * x[j].abs().max(1.0);

        let mut x_plus = x.clone();
        x_plus[j] += dx;
        let f_plus = f(&x_plus)?;

        let column = match scheme {
            FdScheme::Forward => (f_plus - &f_x) / dx,
            FdScheme::Central => {
                let mut x_minus = x.clone();
                x_minus[j] -= dx;
                (f_plus - f(&x_minus)?) / (2.0 * dx)
            }
        };
        jac.set_column(j, &column);
    }

    Ok(jac)
}

/// Largest absolute difference between each analytic block and its
/// finite-difference counterpart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PartialsCheck {
    pub d_circulations: f64,
    pub d_matrix: f64,
    pub d_rhs: f64,
}

impl PartialsCheck {
    pub fn max_error(&self) -> f64 {
        self.d_circulations.max(self.d_matrix).max(self.d_rhs)
    }
}

/// Compare `partials` against central differences of `R(Γ, M, b)`.
pub fn check_partials(
    m: &DMatrix<f64>,
    circulations: &DVector<f64>,
    rhs: &DVector<f64>,
    partials: &Partials,
    step: f64,
) -> SolverResult<PartialsCheck> {
    let n = circulations.len();
    for (what, actual) in [
        ("partials check matrix rows", m.nrows()),
        ("partials check matrix columns", m.ncols()),
        ("partials check rhs", rhs.len()),
    ] {
        if actual != n {
            return Err(SolverError::ShapeMismatch {
                what,
                expected: n,
                actual,
            });
        }
    }

    let fd_circ = finite_difference_jacobian(
        circulations,
        |g| Ok(m * g - rhs),
        step,
        FdScheme::Central,
    )?;

    let m_flat = DVector::from_iterator(n * n, (0..n).flat_map(|i| (0..n).map(move |k| m[(i, k)])));
    let fd_mtx = finite_difference_jacobian(
        &m_flat,
        |flat| Ok(DMatrix::from_row_slice(n, n, flat.as_slice()) * circulations - rhs),
        step,
        FdScheme::Central,
    )?;

    let fd_rhs = finite_difference_jacobian(rhs, |b| Ok(m * circulations - b), step, FdScheme::Central)?;

    Ok(PartialsCheck {
        d_circulations: (partials.d_circulations.to_dense() - fd_circ).amax(),
        d_matrix: (partials.d_matrix.to_dense() - fd_mtx).amax(),
        d_rhs: (partials.d_rhs.to_dense() - fd_rhs).amax(),
    })
}
