//! Unbounded one-dimensional turbulent flow over a sinusoidal bed.
//!
//! The flow is capped by a rigid lid that should be placed far from the bed
//! (`eta_H` large compared to one); within that approximation the lid only
//! enters through the top boundary conditions of no vertical velocity and no
//! first-order stress.
//!
//! State vector: `[U, W, St, Sn]`: streamwise and vertical velocity
//! perturbations and the tangential and normal Reynolds-stress amplitudes,
//! all complex functions of `eta = k z`.

use num_complex::Complex64;

use super::config::SolverConfig;
use super::error::FlowError;
use super::ode::{DenseOutput, Integrator};
use super::profile::{mu, mu_prime};
use super::solution::{FlowSolution, solve_closure};

/// Linear system matrix applied to the state: `dX = P(eta) X`.
fn apply_p(eta: f64, eta_0: f64, kappa: f64, x: &[Complex64], dx: &mut [Complex64]) {
    let m = mu(eta, eta_0, kappa);
    let mp = mu_prime(eta, eta_0, kappa);
    let i = Complex64::I;
    dx[0] = -i * x[1] + 0.5 * mp * x[2];
    dx[1] = -i * x[0];
    dx[2] = (i * m + 4.0 / mp) * x[0] + mp * x[1] + i * x[3];
    dx[3] = -i * m * x[1] + i * x[2];
}

/// Forcing term of the particular branch.
fn forcing(eta: f64, eta_0: f64, kappa: f64) -> Complex64 {
    let mp = mu_prime(eta, eta_0, kappa);
    Complex64::new(kappa * mp * mp, 0.0)
}

pub(crate) fn integrate_branches(
    eta_0: f64,
    max_z: f64,
    kappa: f64,
    integrator: &Integrator,
) -> Result<Vec<DenseOutput>, FlowError> {
    let initial_conditions = [
        // Particular branch: forced, with the bed shear-stress perturbation
        // seeded through the velocity component.
        vec![
            Complex64::new(-mu_prime(0.0, eta_0, kappa), 0.0),
            Complex64::ZERO,
            Complex64::ZERO,
            Complex64::ZERO,
        ],
        vec![
            Complex64::ZERO,
            Complex64::ZERO,
            Complex64::ONE,
            Complex64::ZERO,
        ],
        vec![
            Complex64::ZERO,
            Complex64::ZERO,
            Complex64::ZERO,
            Complex64::ONE,
        ],
    ];

    let mut branches = Vec::with_capacity(initial_conditions.len());
    for (idx, x0) in initial_conditions.iter().enumerate() {
        let branch = if idx == 0 {
            integrator.integrate(
                |eta, x, dx| {
                    apply_p(eta, eta_0, kappa, x, dx);
                    dx[0] += forcing(eta, eta_0, kappa);
                },
                0.0,
                max_z,
                x0,
            )?
        } else {
            integrator.integrate(
                |eta, x, dx| apply_p(eta, eta_0, kappa, x, dx),
                0.0,
                max_z,
                x0,
            )?
        };
        branches.push(branch);
    }
    Ok(branches)
}

/// Solve the unbounded one-dimensional boundary-value problem.
///
/// Returns the vertical profile of the four perturbation amplitudes, valid
/// on `[0, max_z]` with `max_z = 0.9999 * eta_H` by default. The in-phase
/// and in-quadrature basal shear-stress coefficients are the real and
/// imaginary parts of the `St` component at `eta = 0`.
pub fn calculate_solution(
    eta_0: f64,
    eta_h: f64,
    cfg: &SolverConfig,
) -> Result<FlowSolution, FlowError> {
    cfg.validate_domain(eta_0, eta_h)?;
    let max_z = cfg.resolve_max_z(eta_h);
    let integrator = Integrator::new(cfg.atol, cfg.rtol, cfg.max_steps);

    let branches = integrate_branches(eta_0, max_z, cfg.kappa, &integrator)?;

    // Boundary conditions at the lid: no vertical velocity, no first-order
    // tangential stress. Rows are the (W, St) components of each branch.
    let top: Vec<Vec<Complex64>> = branches.iter().map(|b| b.eval(max_z)).collect();
    let m = vec![
        vec![top[1][1], top[2][1]],
        vec![top[1][2], top[2][2]],
    ];
    let b = vec![-top[0][1], -top[0][2]];
    let pars = solve_closure(&m, &b)?;

    FlowSolution::new(branches, vec![Complex64::ONE, pars[0], pars[1]], max_z)
}
