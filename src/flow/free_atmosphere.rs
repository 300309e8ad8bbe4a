//! One-dimensional turbulent boundary layer capped by a stratified free
//! atmosphere.
//!
//! Typical aeolian configuration: the log layer extends up to the boundary
//! layer depth `eta_H`, above which the flow is stratified with an inversion
//! scale `eta_B`. Perturbations in the free atmosphere reduce to a
//! streamfunction with constant vertical wavenumber, either radiating
//! (internal gravity waves) or evanescent depending on the Froude number;
//! the interior solution is impedance-matched to it at the top of the
//! boundary layer.
//!
//! State vector: `[U, W, St, Sn]` as in the unbounded variant.

use num_complex::Complex64;

use super::config::SolverConfig;
use super::error::FlowError;
use super::ode::Integrator;
use super::solution::{FlowSolution, solve_closure};
use super::unbounded::integrate_branches;

/// Streamfunction of the stratified layer above the boundary layer.
///
/// `psi(eta) = psi_h * exp(i m (eta - eta_h))` with a complex vertical
/// wavenumber `m`: real for radiating internal waves, positive imaginary for
/// an evanescent response.
pub struct StratifiedExtension {
    psi_h: Complex64,
    m: Complex64,
    eta_h: f64,
}

impl StratifiedExtension {
    /// Vertical wavenumber of the free-atmosphere response.
    pub fn vertical_wavenumber(&self) -> Complex64 {
        self.m
    }

    /// Evaluate the streamfunction at `eta >= eta_H`.
    pub fn eval(&self, eta: f64) -> Complex64 {
        let eta = eta.max(self.eta_h);
        self.psi_h * (Complex64::I * self.m * (eta - self.eta_h)).exp()
    }
}

/// Complex vertical wavenumber of the stratified layer.
///
/// `m^2 = eta_B / (Fr^2 eta_H) - 1`: supercritical stratification radiates
/// upward-propagating waves, subcritical stratification gives an evanescent
/// tail.
fn stratified_wavenumber(eta_h: f64, eta_b: f64, froude: f64) -> Complex64 {
    let m_sq = eta_b / (froude * froude * eta_h) - 1.0;
    if m_sq >= 0.0 {
        Complex64::new(m_sq.sqrt(), 0.0)
    } else {
        Complex64::new(0.0, (-m_sq).sqrt())
    }
}

/// Solve the stratified-lid boundary-value problem.
///
/// Returns the interior solution on `[0, max_z]` together with the matched
/// streamfunction valid above `eta_H`.
///
/// The closure applies two conditions at `max_z`: the turbulent tangential
/// stress vanishes at the top of the boundary layer, and the normal stress
/// matches the wave impedance of the layer above,
/// `Sn = (i m / Fr^2) W`.
pub fn calculate_solution(
    eta_0: f64,
    eta_h: f64,
    eta_b: f64,
    froude: f64,
    cfg: &SolverConfig,
) -> Result<(FlowSolution, StratifiedExtension), FlowError> {
    cfg.validate_domain(eta_0, eta_h)?;
    if !(froude > 0.0) {
        return Err(FlowError::Domain {
            name: "Fr",
            value: froude,
            reason: "Froude number must be strictly positive",
        });
    }
    if !(eta_b > 0.0) {
        return Err(FlowError::Domain {
            name: "eta_B",
            value: eta_b,
            reason: "stratification height must be strictly positive",
        });
    }
    let max_z = cfg.resolve_max_z(eta_h);
    let integrator = Integrator::new(cfg.atol, cfg.rtol, cfg.max_steps);

    // Interior system identical to the unbounded variant: the log layer
    // fills the whole boundary layer, only the top closure differs.
    let branches = integrate_branches(eta_0, max_z, cfg.kappa, &integrator)?;

    let m_wave = stratified_wavenumber(eta_h, eta_b, froude);
    let impedance = Complex64::I * m_wave / (froude * froude);

    // Rows: St = 0 and Sn - Z W = 0 for the homogeneous branches, forced
    // branch on the right-hand side.
    let top: Vec<Vec<Complex64>> = branches.iter().map(|br| br.eval(max_z)).collect();
    let row = |col: &Vec<Complex64>| [col[2], col[3] - impedance * col[1]];
    let r0 = row(&top[0]);
    let r1 = row(&top[1]);
    let r2 = row(&top[2]);
    let m = vec![vec![r1[0], r2[0]], vec![r1[1], r2[1]]];
    let b = vec![-r0[0], -r0[1]];
    let pars = solve_closure(&m, &b)?;

    let sol = FlowSolution::new(branches, vec![Complex64::ONE, pars[0], pars[1]], max_z)?;

    // Streamfunction amplitude from the matched vertical velocity,
    // w = -i k psi  =>  psi = i W.
    let w_top = sol.eval(max_z)[1];
    let extension = StratifiedExtension {
        psi_h: Complex64::I * w_top,
        m: m_wave,
        eta_h: max_z,
    };
    Ok((sol, extension))
}
