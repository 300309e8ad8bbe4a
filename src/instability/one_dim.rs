//! Dune flat-bed instability under a unidirectional wind, without a
//! spanwise direction.
//!
//! "Temporal" functions follow a perturbation of fixed wavenumber growing in
//! time; "spatial" functions follow a perturbation of fixed pulsation
//! growing downstream. Slope effects enter through the effective
//! in-quadrature coefficient `B = B0 - 1/(mu r^2)`, where `mu` is the
//! friction coefficient of the avalanche slope and `r = u*/u_th` the
//! velocity ratio.

use num_complex::Complex64;

/// Temporal dispersion relation: `omega = k^2 (A + iB) / (1 + ik)`.
///
/// The imaginary part is the temporal growth rate, the real part the
/// pulsation.
pub fn complex_pulsation(k: f64, a: f64, b: f64) -> Complex64 {
    k * k * Complex64::new(a, b) / Complex64::new(1.0, k)
}

/// Effective in-quadrature coefficient including the stabilizing slope
/// effect.
fn slope_corrected(b0: f64, mu: f64, r: f64) -> f64 {
    b0 - 1.0 / (mu * r * r)
}

/// Temporal growth rate `sigma` at wavenumber `k`.
///
/// Positive values mean the perturbation amplifies.
pub fn temporal_growth_rate(k: f64, a0: f64, b0: f64, mu: f64, r: f64) -> f64 {
    complex_pulsation(k, a0, slope_corrected(b0, mu, r)).im
}

/// Temporal pulsation `omega_r` at wavenumber `k`.
pub fn temporal_pulsation(k: f64, a0: f64, b0: f64, mu: f64, r: f64) -> f64 {
    complex_pulsation(k, a0, slope_corrected(b0, mu, r)).re
}

/// Migration velocity (celerity) of the perturbation, `omega_r / k`.
pub fn temporal_velocity(k: f64, a0: f64, b0: f64, mu: f64, r: f64) -> f64 {
    temporal_pulsation(k, a0, b0, mu, r) / k
}

/// Spatial dispersion relation: both complex-wavenumber roots
/// `k_pm = (i w  pm  sqrt(Delta)) / (2 (A + iB))` with
/// `Delta = w (4 (A + iB) - w)`.
///
/// Only the `k_plus` branch corresponds to spatially growing waves in the
/// flow direction; the other root must be discarded, not averaged.
pub fn complex_wavenumber(w: f64, a: f64, b: f64) -> (Complex64, Complex64) {
    let ab = Complex64::new(a, b);
    let delta = w * (4.0 * ab - w);
    let sqrt_delta = delta.sqrt();
    let iw = Complex64::new(0.0, w);
    let k_plus = 0.5 * (iw + sqrt_delta) / ab;
    let k_minus = 0.5 * (iw - sqrt_delta) / ab;
    (k_plus, k_minus)
}

/// Spatial growth rate at pulsation `w`: minus the imaginary part of the
/// physical root `k_plus`.
pub fn spatial_growth_rate(w: f64, a0: f64, b0: f64, mu: f64, r: f64) -> f64 {
    -complex_wavenumber(w, a0, slope_corrected(b0, mu, r)).0.im
}

/// Spatial wavenumber at pulsation `w`: real part of the physical root
/// `k_plus`.
pub fn spatial_wavenumber(w: f64, a0: f64, b0: f64, mu: f64, r: f64) -> f64 {
    complex_wavenumber(w, a0, slope_corrected(b0, mu, r)).0.re
}
