//! Turbulent-flow perturbation solver over a sinusoidal bed.
//!
//! Solves the linearized turbulent flow above a weakly perturbed bed in four
//! configurations:
//!
//! - **unbounded** (1D): flow capped by a rigid lid placed far from the bed
//! - **free surface** (1D): flow capped by a deformable free surface,
//!   typically a river configuration
//! - **free atmosphere** (1D): boundary layer capped by a stratified layer,
//!   typically an atmospheric configuration
//! - **oblique** (2D): unbounded flow over a bed perturbation at an angle to
//!   the wind
//!
//! Each variant is a boundary-value problem for a first-order linear complex
//! ODE system in the similarity coordinate `eta = k z`, solved by
//! superposing one forced and several homogeneous branches integrated with
//! an adaptive dense-output Runge-Kutta scheme, and closing the combination
//! coefficients with a small linear solve at the top of the domain.
//!
//! The solver performs poorly for very large integration domains because
//! numerical errors accumulate along the path; in practice keep
//! `eta_H = k H` below roughly 10, or loosen the tolerances.
//!
//! # Example
//! ```no_run
//! use dune_rs::flow::{FlowModel, SolverConfig, solve_turbulent_flow, TurbulentFlowSolution};
//!
//! let model = FlowModel::Unbounded { eta_0: 1e-4, eta_h: 10.0 };
//! let solution = solve_turbulent_flow(&model, &SolverConfig::default()).unwrap();
//! if let TurbulentFlowSolution::OneDim(sol) = solution {
//!     let bottom = sol.eval(0.0);
//!     let (a0, b0) = (bottom[2].re, bottom[2].im);
//!     println!("A0 = {a0:.3}, B0 = {b0:.3}");
//! }
//! ```

mod coefficients;
mod config;
mod error;
mod free_atmosphere;
mod free_surface;
mod oblique;
mod ode;
mod profile;
mod solution;
mod unbounded;

pub use coefficients::{
    GeometricalModel, HydrodynamicCoefficients, SolvedCoefficients, a0_approx, ax_geo, ay_geo,
    b0_approx, basal_shear, bx_geo, by_geo,
};
pub use config::SolverConfig;
pub use error::FlowError;
pub use free_atmosphere::StratifiedExtension;
pub use ode::{DenseOutput, Integrator};
pub use profile::{mu, mu_prime, shear_to_velocity, velocity_to_shear};
pub use solution::FlowSolution;

/// Flow configuration to solve, with its physical parameters.
///
/// All lengths are non-dimensionalized by the perturbation wavenumber:
/// `eta_0 = k z_0`, `eta_h = k H`, `eta_b = k B`.
#[derive(Debug, Clone, Copy)]
pub enum FlowModel {
    /// Unbounded 1D flow (rigid lid far from the bed).
    Unbounded {
        /// Hydrodynamic roughness `k z_0`.
        eta_0: f64,
        /// Lid height `k H`.
        eta_h: f64,
    },
    /// 1D flow capped by a free surface.
    FreeSurface {
        eta_0: f64,
        /// Flow depth `k H`.
        eta_h: f64,
        /// Froude number of the base flow.
        froude: f64,
    },
    /// 1D boundary layer capped by a stratified free atmosphere.
    FreeAtmosphere {
        eta_0: f64,
        /// Boundary-layer depth `k H`.
        eta_h: f64,
        /// Stratification (inversion) height `k B`.
        eta_b: f64,
        froude: f64,
    },
    /// 2D unbounded flow over an oblique bed perturbation.
    Oblique {
        eta_0: f64,
        eta_h: f64,
        /// Crest obliquity in degrees.
        alpha: f64,
    },
}

/// Solution of [`solve_turbulent_flow`], tagged by configuration family.
pub enum TurbulentFlowSolution {
    /// Four-component profile (unbounded or free-surface variants).
    OneDim(FlowSolution),
    /// Four-component profile plus the stratified-layer streamfunction
    /// matched above the boundary layer.
    OneDimWithAtmosphere(FlowSolution, StratifiedExtension),
    /// Six-component profile (oblique variant).
    TwoDim(FlowSolution),
}

/// Solve the turbulent-flow perturbation problem for the given
/// configuration.
///
/// Front-end dispatching to the per-variant solvers; see the module
/// documentation for the physics of each configuration and
/// [`SolverConfig`] for the numerical knobs.
pub fn solve_turbulent_flow(
    model: &FlowModel,
    cfg: &SolverConfig,
) -> Result<TurbulentFlowSolution, FlowError> {
    match *model {
        FlowModel::Unbounded { eta_0, eta_h } => unbounded::calculate_solution(eta_0, eta_h, cfg)
            .map(TurbulentFlowSolution::OneDim),
        FlowModel::FreeSurface {
            eta_0,
            eta_h,
            froude,
        } => free_surface::calculate_solution(eta_0, eta_h, froude, cfg)
            .map(TurbulentFlowSolution::OneDim),
        FlowModel::FreeAtmosphere {
            eta_0,
            eta_h,
            eta_b,
            froude,
        } => free_atmosphere::calculate_solution(eta_0, eta_h, eta_b, froude, cfg)
            .map(|(sol, ext)| TurbulentFlowSolution::OneDimWithAtmosphere(sol, ext)),
        FlowModel::Oblique {
            eta_0,
            eta_h,
            alpha,
        } => oblique::calculate_solution(eta_0, eta_h, alpha, cfg)
            .map(TurbulentFlowSolution::TwoDim),
    }
}
