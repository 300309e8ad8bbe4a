//! Law-of-the-wall mean-flow profile.
//!
//! The base state of every flow variant is the turbulent logarithmic
//! velocity profile, expressed in the non-dimensional similarity coordinate
//! `eta = k z` with roughness `eta_0 = k z_0`:
//!
//! ```text
//! mu(eta) = U(z)/u* = (1/kappa) ln(1 + eta/eta_0)
//! ```

/// Non-dimensional mean velocity `U(z)/u*` at height `eta`.
pub fn mu(eta: f64, eta_0: f64, kappa: f64) -> f64 {
    (1.0 / kappa) * (1.0 + eta / eta_0).ln()
}

/// Derivative of [`mu`] with respect to `eta`.
pub fn mu_prime(eta: f64, eta_0: f64, kappa: f64) -> f64 {
    1.0 / (kappa * (eta + eta_0))
}

/// Shear velocity from a wind speed measured at height `z`.
///
/// Inverts the law of the wall: `u* = kappa U / ln(z/z_0)`. Heights are
/// dimensional here; `z_0` is the hydrodynamic roughness.
pub fn velocity_to_shear(u: f64, z: f64, z_0: f64, kappa: f64) -> f64 {
    u * kappa / (z / z_0).ln()
}

/// Wind speed at height `z` from a shear velocity.
pub fn shear_to_velocity(u_star: f64, z: f64, z_0: f64, kappa: f64) -> f64 {
    u_star * (z / z_0).ln() / kappa
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mu_vanishes_at_bed() {
        assert_eq!(mu(0.0, 1e-4, 0.4), 0.0);
    }

    #[test]
    fn test_mu_prime_is_derivative_of_mu() {
        let (eta_0, kappa) = (1e-3, 0.4);
        let eta = 0.37;
        let h = 1e-6;
        let fd = (mu(eta + h, eta_0, kappa) - mu(eta - h, eta_0, kappa)) / (2.0 * h);
        assert!((fd - mu_prime(eta, eta_0, kappa)).abs() < 1e-6);
    }

    #[test]
    fn test_shear_velocity_round_trip() {
        let (z, z_0, kappa) = (10.0, 1e-3, 0.4);
        let u = 8.5;
        let u_star = velocity_to_shear(u, z, z_0, kappa);
        assert!((shear_to_velocity(u_star, z, z_0, kappa) - u).abs() < 1e-12);
    }
}
