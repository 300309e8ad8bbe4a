//! One-dimensional turbulent flow capped by a free surface.
//!
//! Typical river configuration: the finite depth enters the linear system
//! through the `(1 - eta/eta_H)` base-stress factor, and the top boundary
//! condition carries the deformable surface through a Froude-number-dependent
//! slope term.
//!
//! State vector: `[U, W, St, Sn]` as in the unbounded variant.

use num_complex::Complex64;

use crate::math::{arcsind, tand};

use super::config::SolverConfig;
use super::error::FlowError;
use super::ode::Integrator;
use super::profile::{mu, mu_prime};
use super::solution::{FlowSolution, solve_closure};

fn apply_p(eta: f64, eta_h: f64, eta_0: f64, kappa: f64, x: &[Complex64], dx: &mut [Complex64]) {
    let m = mu(eta, eta_0, kappa);
    let mp = mu_prime(eta, eta_0, kappa);
    let tp = 1.0 - eta / eta_h;
    let i = Complex64::I;
    dx[0] = -i * x[1] + mp / (2.0 * tp) * x[2];
    dx[1] = -i * x[0];
    dx[2] = (i * m + 4.0 * tp / mp) * x[0] + mp * x[1] + i * x[3];
    dx[3] = -i * m * x[1] + i * x[2];
}

fn forcing(eta: f64, eta_h: f64, eta_0: f64, kappa: f64) -> Complex64 {
    let mp = mu_prime(eta, eta_0, kappa);
    Complex64::new(kappa * mp * mp - mp / (2.0 * eta_h), 0.0)
}

/// Solve the free-surface boundary-value problem for Froude number `froude`.
///
/// The closure matches the vertical velocity, tangential stress and normal
/// stress to the surface deformation; the superposition is renormalized so
/// the forced branch enters with coefficient one, fixing the bottom
/// amplitude rather than the surface one.
pub fn calculate_solution(
    eta_0: f64,
    eta_h: f64,
    froude: f64,
    cfg: &SolverConfig,
) -> Result<FlowSolution, FlowError> {
    cfg.validate_domain(eta_0, eta_h)?;
    if !(froude > 0.0) {
        return Err(FlowError::Domain {
            name: "Fr",
            value: froude,
            reason: "Froude number must be strictly positive",
        });
    }
    let max_z = cfg.resolve_max_z(eta_h);
    let kappa = cfg.kappa;
    let integrator = Integrator::new(cfg.atol, cfg.rtol, cfg.max_steps);

    let initial_conditions = [
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
                    apply_p(eta, eta_h, eta_0, kappa, x, dx);
                    dx[0] += forcing(eta, eta_h, eta_0, kappa);
                },
                0.0,
                max_z,
                x0,
            )?
        } else {
            integrator.integrate(
                |eta, x, dx| apply_p(eta, eta_h, eta_0, kappa, x, dx),
                0.0,
                max_z,
                x0,
            )?
        };
        branches.push(branch);
    }

    // Surface slope angle from the Froude-scaled log term (in degrees,
    // squared, matching the reference arithmetic).
    let theta = arcsind(kappa * froude / (1.0 + eta_h / eta_0).ln()).powi(2);
    let b = vec![
        Complex64::I * mu(max_z, eta_0, kappa),
        Complex64::new(1.0 / max_z, 0.0),
        Complex64::new(1.0 / (max_z * tand(theta)), 0.0),
    ];

    // Rows are the (W, St, Sn) components of the three branches.
    let top: Vec<Vec<Complex64>> = branches.iter().map(|br| br.eval(max_z)).collect();
    let m: Vec<Vec<Complex64>> = (1..4)
        .map(|comp| (0..3).map(|j| top[j][comp]).collect())
        .collect();
    let pars = solve_closure(&m, &b)?;

    // Renormalize so the forced branch carries unit coefficient.
    let coeffs = vec![Complex64::ONE, pars[1] / pars[0], pars[2] / pars[0]];
    FlowSolution::new(branches, coeffs, max_z)
}
