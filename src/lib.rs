//! # dune-rs
//!
//! Linear stability of sand dunes under turbulent wind forcing.
//!
//! This crate provides the building blocks for dune morphodynamics:
//! - Turbulent-flow perturbation solver over a sinusoidal bed (boundary-value
//!   problem in a vertical similarity coordinate, four flow configurations)
//! - Hydrodynamic coefficient approximations (closed-form rational fits and
//!   their angular generalization)
//! - Dune bed-instability dispersion relations (1D and 2D, temporal and
//!   spatial, single / bidirectional / multidirectional wind regimes)
//! - Courrech du Pont mature-dune orientation model (elongation direction
//!   and MGBNT growth-rate orientation)
//! - Angular statistics (vector averaging, angular histograms and PDFs)
//!
//! All quantities are non-dimensional unless stated otherwise: lengths scale
//! by the sand saturation length and times by the saturation length squared
//! over the characteristic sand flux.

pub mod dune;
pub mod flow;
pub mod instability;
pub mod math;

// Re-export main types for convenience
pub use dune::{CaptureRate, elongation_direction, flux_at_crest, mgbnt_orientation};
pub use flow::{
    FlowError, FlowModel, FlowSolution, GeometricalModel, HydrodynamicCoefficients,
    SolvedCoefficients, SolverConfig, StratifiedExtension, TurbulentFlowSolution, a0_approx,
    b0_approx, basal_shear, mu, mu_prime, shear_to_velocity, solve_turbulent_flow,
    velocity_to_shear,
};
pub use instability::one_dim::{
    complex_pulsation, complex_wavenumber, spatial_growth_rate, spatial_wavenumber,
    temporal_growth_rate, temporal_pulsation, temporal_velocity,
};
pub use instability::two_dim::{InstabilityParams, MostUnstable, most_unstable};
pub use math::{
    angular_average, angular_pdf, arctan2d, arctand, cartesian_to_polar, cosd, sign, sind, tand,
    vector_average,
};
