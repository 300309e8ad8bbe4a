//! Two-dimensional unbounded turbulent flow over an oblique sinusoidal bed.
//!
//! Generalizes the unbounded variant to a bed perturbation whose crests make
//! an angle `alpha` (degrees) with the perpendicular to the flow direction.
//! The state picks up a spanwise velocity and a spanwise stress component:
//! `[U, V, W, Stx, Sty, Sn]`.
//!
//! The in-phase and in-quadrature shear-stress responses in the streamwise
//! and spanwise directions are the real and imaginary parts of `Stx` and
//! `Sty` at the bed; they feed the two-dimensional bed-instability
//! evaluators either directly or through the geometrical approximation
//! fitted on them.

use num_complex::Complex64;

use crate::math::{cosd, sind};

use super::config::SolverConfig;
use super::error::FlowError;
use super::ode::Integrator;
use super::profile::{mu, mu_prime};
use super::solution::{FlowSolution, solve_closure};

fn apply_p(
    eta: f64,
    alpha: f64,
    eta_0: f64,
    kappa: f64,
    x: &[Complex64],
    dx: &mut [Complex64],
) {
    let m = mu(eta, eta_0, kappa);
    let mp = mu_prime(eta, eta_0, kappa);
    let (ca, sa) = (cosd(alpha), sind(alpha));
    let i = Complex64::I;

    dx[0] = -i * ca * x[2] + 0.5 * mp * x[3];
    dx[1] = -i * sa * x[2] + mp * x[4];
    dx[2] = -i * ca * x[0] - i * sa * x[1];
    dx[3] = ((1.0 + 3.0 * ca * ca) / mp + i * m * ca) * x[0]
        + (3.0 * sa * ca / mp) * x[1]
        + mp * x[2]
        + i * ca * x[5];
    dx[4] = (3.0 * sa * ca / mp) * x[0]
        + ((1.0 + 3.0 * sa * sa) / mp + i * m * ca) * x[1]
        + i * sa * x[5];
    dx[5] = -i * m * ca * x[2] + i * ca * x[3] + i * sa * x[4];
}

fn forcing(eta: f64, eta_0: f64, kappa: f64) -> Complex64 {
    let mp = mu_prime(eta, eta_0, kappa);
    Complex64::new(kappa * mp * mp, 0.0)
}

/// Solve the oblique (two-dimensional) boundary-value problem.
///
/// `alpha` is the crest obliquity in degrees. The closure imposes no
/// vertical velocity and no residual tangential stress in either direction
/// at the lid, a three-equation system on the three homogeneous branches.
pub fn calculate_solution(
    eta_0: f64,
    eta_h: f64,
    alpha: f64,
    cfg: &SolverConfig,
) -> Result<FlowSolution, FlowError> {
    cfg.validate_domain(eta_0, eta_h)?;
    let max_z = cfg.resolve_max_z(eta_h);
    let kappa = cfg.kappa;
    let integrator = Integrator::new(cfg.atol, cfg.rtol, cfg.max_steps);

    let dim = 6;
    let mut initial_conditions = vec![vec![Complex64::ZERO; dim]; 4];
    initial_conditions[0][0] = Complex64::new(-mu_prime(0.0, eta_0, kappa), 0.0);
    initial_conditions[1][3] = Complex64::ONE;
    initial_conditions[2][4] = Complex64::ONE;
    initial_conditions[3][5] = Complex64::ONE;

    let mut branches = Vec::with_capacity(initial_conditions.len());
    for (idx, x0) in initial_conditions.iter().enumerate() {
        let branch = if idx == 0 {
            integrator.integrate(
                |eta, x, dx| {
                    apply_p(eta, alpha, eta_0, kappa, x, dx);
                    dx[0] += forcing(eta, eta_0, kappa);
                },
                0.0,
                max_z,
                x0,
            )?
        } else {
            integrator.integrate(
                |eta, x, dx| apply_p(eta, alpha, eta_0, kappa, x, dx),
                0.0,
                max_z,
                x0,
            )?
        };
        branches.push(branch);
    }

    // Rows are the (W, Stx, Sty) components of the homogeneous branches.
    let top: Vec<Vec<Complex64>> = branches.iter().map(|br| br.eval(max_z)).collect();
    let m: Vec<Vec<Complex64>> = (2..5)
        .map(|comp| (1..4).map(|j| top[j][comp]).collect())
        .collect();
    let b: Vec<Complex64> = (2..5).map(|comp| -top[0][comp]).collect();
    let pars = solve_closure(&m, &b)?;

    FlowSolution::new(
        branches,
        vec![Complex64::ONE, pars[0], pars[1], pars[2]],
        max_z,
    )
}
