//! Error type for the turbulent-flow boundary-value solver.

use thiserror::Error;

/// Error type for flow-solver operations.
///
/// Physically invalid input is rejected at the boundary rather than deep
/// inside the integrator, and numerical failures are surfaced loudly: the
/// solver never returns a partially-integrated profile or a solution built
/// from a degenerate closure matrix.
#[derive(Debug, Error)]
pub enum FlowError {
    /// A physical parameter is outside its valid domain.
    #[error("invalid parameter {name} = {value}: {reason}")]
    Domain {
        /// Name of the offending parameter.
        name: &'static str,
        /// Offending value.
        value: f64,
        /// Constraint that was violated.
        reason: &'static str,
    },

    /// The adaptive integrator exhausted its step budget or the step size
    /// underflowed before reaching the end of the integration interval.
    #[error("ODE integration stalled at eta = {eta:.6e} after {steps} steps: {detail}")]
    Convergence {
        /// Vertical coordinate reached when the integration stalled.
        eta: f64,
        /// Number of accepted and rejected steps taken.
        steps: usize,
        /// What went wrong.
        detail: &'static str,
    },

    /// The boundary-closure matrix is singular or near-singular for this
    /// combination of roughness and domain height.
    #[error("singular boundary-closure matrix (relative residual {residual:.3e})")]
    LinearSystem {
        /// Relative residual of the attempted solve.
        residual: f64,
    },
}
