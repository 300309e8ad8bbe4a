//! Superposition of integrated branches into a flow solution.
//!
//! Every flow variant integrates one forced ("particular") branch and a few
//! homogeneous branches of the same linear system, then fixes the
//! combination coefficients from boundary conditions at the top of the
//! domain. The closure is a small (2x2 to 3x3) complex linear solve handled
//! by faer; a singular closure matrix is surfaced as
//! [`FlowError::LinearSystem`] instead of silently producing garbage.

use faer::{Mat, c64, linalg::solvers::Solve};
use ndarray::Array2;
use num_complex::Complex64;

use super::error::FlowError;
use super::ode::DenseOutput;

/// Relative residual above which the closure solve is declared singular.
const RESIDUAL_TOL: f64 = 1e-6;

/// Vertical profile of flow-perturbation amplitudes.
///
/// Built as `sum_j coeffs[j] * branch_j(eta)`, valid for `eta` in
/// `[0, max_z]`. Components are, in order, `[U, W, St, Sn]` for the
/// one-dimensional variants and `[U, V, W, Stx, Sty, Sn]` for the oblique
/// one.
pub struct FlowSolution {
    branches: Vec<DenseOutput>,
    coeffs: Vec<Complex64>,
    max_z: f64,
}

impl FlowSolution {
    pub(crate) fn new(
        branches: Vec<DenseOutput>,
        coeffs: Vec<Complex64>,
        max_z: f64,
    ) -> Result<Self, FlowError> {
        debug_assert_eq!(branches.len(), coeffs.len());
        if coeffs.iter().any(|c| !c.re.is_finite() || !c.im.is_finite()) {
            return Err(FlowError::LinearSystem {
                residual: f64::INFINITY,
            });
        }
        Ok(Self {
            branches,
            coeffs,
            max_z,
        })
    }

    /// Number of field components (4 for 1D variants, 6 for the oblique one).
    pub fn n_components(&self) -> usize {
        self.branches[0].dim()
    }

    /// Height at which the top boundary conditions were applied; the
    /// solution is valid on `[0, max_z]`.
    pub fn max_z(&self) -> f64 {
        self.max_z
    }

    /// Superposition coefficients of the integrated branches (the particular
    /// branch comes first).
    pub fn coeffs(&self) -> &[Complex64] {
        &self.coeffs
    }

    /// Evaluate the solution at a single height.
    pub fn eval(&self, eta: f64) -> Vec<Complex64> {
        let dim = self.n_components();
        let mut out = vec![Complex64::ZERO; dim];
        let mut tmp = vec![Complex64::ZERO; dim];
        for (branch, &c) in self.branches.iter().zip(self.coeffs.iter()) {
            branch.eval_into(eta, &mut tmp);
            for i in 0..dim {
                out[i] += c * tmp[i];
            }
        }
        out
    }

    /// Evaluate the solution on a set of heights.
    ///
    /// Returns an array of shape `(n_components, etas.len())`.
    pub fn eval_many(&self, etas: &[f64]) -> Array2<Complex64> {
        let dim = self.n_components();
        let mut out = Array2::from_elem((dim, etas.len()), Complex64::ZERO);
        for (j, &eta) in etas.iter().enumerate() {
            for (i, v) in self.eval(eta).into_iter().enumerate() {
                out[(i, j)] = v;
            }
        }
        out
    }
}

/// Solve the dense complex system `m x = b` with a residual check.
///
/// `m` is given in row-major order. Fails with
/// [`FlowError::LinearSystem`] when the system is singular or near-singular
/// for this parameter combination.
pub(crate) fn solve_closure(
    m: &[Vec<Complex64>],
    b: &[Complex64],
) -> Result<Vec<Complex64>, FlowError> {
    let n = b.len();
    debug_assert!(m.len() == n && m.iter().all(|row| row.len() == n));

    let mut a = Mat::<c64>::zeros(n, n);
    let mut rhs = Mat::<c64>::zeros(n, 1);
    for i in 0..n {
        for j in 0..n {
            a[(i, j)] = c64::new(m[i][j].re, m[i][j].im);
        }
        rhs[(i, 0)] = c64::new(b[i].re, b[i].im);
    }

    let lu = a.full_piv_lu();
    let x = lu.solve(&rhs);

    // The LU solve does not fail on a singular matrix; check the residual.
    let mut res_sq = 0.0;
    let mut rhs_sq = 0.0;
    for i in 0..n {
        let mut ax = c64::new(0.0, 0.0);
        for j in 0..n {
            ax += a[(i, j)] * x[(j, 0)];
        }
        let r = ax - rhs[(i, 0)];
        res_sq += r.re * r.re + r.im * r.im;
        rhs_sq += rhs[(i, 0)].re * rhs[(i, 0)].re + rhs[(i, 0)].im * rhs[(i, 0)].im;
    }
    let residual = (res_sq / rhs_sq.max(f64::MIN_POSITIVE)).sqrt();
    if !residual.is_finite() || residual > RESIDUAL_TOL {
        return Err(FlowError::LinearSystem { residual });
    }

    Ok((0..n)
        .map(|i| Complex64::new(x[(i, 0)].re, x[(i, 0)].im))
        .collect())
}
