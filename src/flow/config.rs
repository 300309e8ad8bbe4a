//! Solver configuration.

use super::error::FlowError;

/// Fraction of the domain height at which the top boundary conditions are
/// applied, avoiding the coordinate singularity exactly at the lid.
const MAX_Z_SHRINK: f64 = 0.9999;

/// Configuration for the turbulent-flow boundary-value solver.
///
/// All fields have defaults matching the reference setup: von Karman
/// constant 0.4, absolute and relative tolerances of 1e-10, and boundary
/// conditions applied at `0.9999 * eta_H`.
///
/// # Example
/// ```
/// use dune_rs::flow::SolverConfig;
///
/// let cfg = SolverConfig {
///     atol: 1e-12,
///     rtol: 1e-12,
///     ..SolverConfig::default()
/// };
/// assert_eq!(cfg.kappa, 0.4);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SolverConfig {
    /// Von Karman constant.
    pub kappa: f64,
    /// Absolute tolerance of the adaptive integrator.
    pub atol: f64,
    /// Relative tolerance of the adaptive integrator.
    pub rtol: f64,
    /// Step budget per integration; exceeding it is a convergence failure.
    pub max_steps: usize,
    /// Where the top boundary conditions are applied. `None` means
    /// `0.9999 * eta_H`. Setting this below `eta_H` is useful when only the
    /// solution close to the bed is of interest.
    pub max_z: Option<f64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            kappa: 0.4,
            atol: 1e-10,
            rtol: 1e-10,
            max_steps: 1_000_000,
            max_z: None,
        }
    }
}

impl SolverConfig {
    /// Resolve the effective top of the integration interval for a domain
    /// height `eta_h`.
    pub fn resolve_max_z(&self, eta_h: f64) -> f64 {
        self.max_z.unwrap_or(MAX_Z_SHRINK * eta_h)
    }

    /// Validate the roughness/height pair shared by every flow variant.
    ///
    /// Numerical accuracy degrades for `eta_H` much larger than ~10 because
    /// of error accumulation along the integration path; that is a documented
    /// precision boundary, not an error, so only sign and ordering
    /// constraints are enforced here.
    pub fn validate_domain(&self, eta_0: f64, eta_h: f64) -> Result<(), FlowError> {
        if !(eta_0 > 0.0) {
            return Err(FlowError::Domain {
                name: "eta_0",
                value: eta_0,
                reason: "hydrodynamic roughness must be strictly positive",
            });
        }
        if !(eta_h > eta_0) {
            return Err(FlowError::Domain {
                name: "eta_H",
                value: eta_h,
                reason: "domain height must exceed the roughness eta_0",
            });
        }
        let max_z = self.resolve_max_z(eta_h);
        if !(max_z > 0.0 && max_z <= eta_h) {
            return Err(FlowError::Domain {
                name: "max_z",
                value: max_z,
                reason: "boundary-condition height must lie in (0, eta_H]",
            });
        }
        Ok(())
    }
}
