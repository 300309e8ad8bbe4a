//! Temporal instability of a flat bed with an arbitrary crest orientation,
//! under unidirectional, bidirectional and multidirectional wind regimes.
//!
//! The crest orientation `alpha` is measured in degrees from the direction
//! perpendicular to the wind; the bidirectional and multidirectional
//! compositions fold it into `(-90, 90]` relative to each wind before
//! applying the dispersion relation. Coefficients come from any
//! [`HydrodynamicCoefficients`] provider, so the same evaluators work with
//! the geometrical projection or with the turbulent-flow solver.

use ndarray::{Array1, Array2};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::flow::HydrodynamicCoefficients;
use crate::math::{cosd, fold_orientation, sign, sind};

/// Physical parameters of the bed-instability dispersion relation.
#[derive(Debug, Clone, Copy)]
pub struct InstabilityParams {
    /// Velocity ratio `u* / u_th`.
    pub r: f64,
    /// Friction coefficient of the avalanche slope.
    pub mu: f64,
    /// Cross-stream diffusion coefficient of the transport law.
    pub delta: f64,
}

impl Default for InstabilityParams {
    fn default() -> Self {
        Self {
            r: 2.0,
            mu: 0.63,
            delta: 0.0,
        }
    }
}

/// Effective coefficients at `(k, alpha)` including slope and transport
/// corrections: `(ax, ay, bx, by)`.
fn effective_coefficients<C: HydrodynamicCoefficients + ?Sized>(
    k: f64,
    alpha: f64,
    coeffs: &C,
    p: &InstabilityParams,
) -> (f64, f64, f64, f64) {
    let r2 = p.r * p.r;
    let ax = coeffs.ax(k, alpha);
    let bx = coeffs.bx(k, alpha) - cosd(alpha) / (p.mu * r2);
    let ay = (1.0 - 1.0 / r2) * coeffs.ay(k, alpha) - p.delta * k * sind(alpha) * bx;
    let by = (1.0 - 1.0 / r2) * (coeffs.by(k, alpha) - sind(alpha) / (p.mu * p.r))
        - p.delta * k * sind(alpha) * ax;
    (ax, ay, bx, by)
}

/// Temporal growth rate of a perturbation of wavenumber `k` and crest
/// orientation `alpha` (degrees from wind-perpendicular) under a single
/// wind.
pub fn temporal_growth_rate<C: HydrodynamicCoefficients + ?Sized>(
    k: f64,
    alpha: f64,
    coeffs: &C,
    p: &InstabilityParams,
) -> f64 {
    let (ax, ay, bx, by) = effective_coefficients(k, alpha, coeffs, p);
    let (c, s) = (cosd(alpha), sind(alpha));
    k * k / (1.0 + (k * c) * (k * c))
        * (bx * c + by * s - k * c * (ax * c + ay * s))
}

/// Temporal pulsation of the perturbation under a single wind.
pub fn temporal_pulsation<C: HydrodynamicCoefficients + ?Sized>(
    k: f64,
    alpha: f64,
    coeffs: &C,
    p: &InstabilityParams,
) -> f64 {
    let (ax, ay, bx, by) = effective_coefficients(k, alpha, coeffs, p);
    let (c, s) = (cosd(alpha), sind(alpha));
    k * k / (1.0 + (k * c) * (k * c))
        * (ax * c + ay * s + k * c * (bx * c + by * s))
}

/// Migration velocity of the perturbation along its normal, under a single
/// wind.
pub fn temporal_celerity<C: HydrodynamicCoefficients + ?Sized>(
    k: f64,
    alpha: f64,
    coeffs: &C,
    p: &InstabilityParams,
) -> f64 {
    temporal_pulsation(k, alpha, coeffs, p) / k
}

/// Growth rate under a bidirectional wind regime.
///
/// The two winds are separated by `theta` degrees and carry a transport
/// mass ratio `n` (first wind over second); each contributes with weight
/// `n/(n+1)` and `1/(n+1)`, at crest orientation refolded relative to the
/// corresponding wind.
pub fn growth_rate_bidi<C: HydrodynamicCoefficients + ?Sized>(
    k: f64,
    alpha: f64,
    theta: f64,
    n: f64,
    coeffs: &C,
    p: &InstabilityParams,
) -> f64 {
    let a1 = fold_orientation(alpha + theta / 2.0);
    let a2 = fold_orientation(alpha - theta / 2.0);
    n / (n + 1.0) * temporal_growth_rate(k, a1, coeffs, p)
        + 1.0 / (n + 1.0) * temporal_growth_rate(k, a2, coeffs, p)
}

/// Celerity under a bidirectional wind regime.
///
/// For divergence angles beyond 90 degrees the second wind pushes the
/// pattern the other way along the crest normal, hence the sign flip on
/// its contribution.
pub fn celerity_bidi<C: HydrodynamicCoefficients + ?Sized>(
    k: f64,
    alpha: f64,
    theta: f64,
    n: f64,
    coeffs: &C,
    p: &InstabilityParams,
) -> f64 {
    let a1 = fold_orientation(alpha + theta / 2.0);
    let a2 = fold_orientation(alpha - theta / 2.0);
    n / (n + 1.0) * temporal_celerity(k, a1, coeffs, p)
        + sign(90.0 - theta) / (n + 1.0) * temporal_celerity(k, a2, coeffs, p)
}

/// Growth rate under a multidirectional wind regime.
///
/// `winds` lists `(theta, n)` pairs: the direction of each wind in degrees
/// and its transport weight. Contributions that evaluate to NaN (for
/// instance a failed solver query) are skipped rather than poisoning the
/// sum; if every contribution is NaN the result is NaN.
pub fn temporal_growth_rate_multi<C: HydrodynamicCoefficients + ?Sized>(
    k: f64,
    alpha: f64,
    winds: &[(f64, f64)],
    coeffs: &C,
    p: &InstabilityParams,
) -> f64 {
    nan_skipping_sum(winds.iter().map(|&(theta, n)| {
        n * temporal_growth_rate(k, fold_orientation(alpha - theta), coeffs, p)
    }))
}

/// Celerity under a multidirectional wind regime.
///
/// Each wind's contribution is signed by the alignment between the wind
/// and the crest-propagation direction, so opposing winds subtract.
pub fn temporal_celerity_multi<C: HydrodynamicCoefficients + ?Sized>(
    k: f64,
    alpha: f64,
    winds: &[(f64, f64)],
    coeffs: &C,
    p: &InstabilityParams,
) -> f64 {
    nan_skipping_sum(winds.iter().map(|&(theta, n)| {
        let aligned = sign(cosd(alpha) * cosd(theta) + sind(alpha) * sind(theta));
        aligned * n * temporal_celerity(k, fold_orientation(alpha - theta), coeffs, p)
    }))
}

fn nan_skipping_sum(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut any = false;
    for v in values {
        if !v.is_nan() {
            sum += v;
            any = true;
        }
    }
    if any { sum } else { f64::NAN }
}

/// Growth rate over an `(alpha, k)` grid under a multidirectional wind
/// regime. Rows follow `alpha`, columns follow `k`.
pub fn growth_rate_grid<C: HydrodynamicCoefficients + Sync + ?Sized>(
    alpha: &Array1<f64>,
    k: &Array1<f64>,
    winds: &[(f64, f64)],
    coeffs: &C,
    p: &InstabilityParams,
) -> Array2<f64> {
    grid_sweep(alpha, k, |kk, aa| {
        temporal_growth_rate_multi(kk, aa, winds, coeffs, p)
    })
}

/// Celerity over an `(alpha, k)` grid under a multidirectional wind
/// regime. Rows follow `alpha`, columns follow `k`.
pub fn celerity_grid<C: HydrodynamicCoefficients + Sync + ?Sized>(
    alpha: &Array1<f64>,
    k: &Array1<f64>,
    winds: &[(f64, f64)],
    coeffs: &C,
    p: &InstabilityParams,
) -> Array2<f64> {
    grid_sweep(alpha, k, |kk, aa| {
        temporal_celerity_multi(kk, aa, winds, coeffs, p)
    })
}

#[cfg(not(feature = "parallel"))]
fn grid_sweep<F>(alpha: &Array1<f64>, k: &Array1<f64>, f: F) -> Array2<f64>
where
    F: Fn(f64, f64) -> f64 + Sync,
{
    Array2::from_shape_fn((alpha.len(), k.len()), |(i, j)| f(k[j], alpha[i]))
}

#[cfg(feature = "parallel")]
fn grid_sweep<F>(alpha: &Array1<f64>, k: &Array1<f64>, f: F) -> Array2<f64>
where
    F: Fn(f64, f64) -> f64 + Sync,
{
    let alphas = alpha.to_vec();
    let flat: Vec<f64> = alphas
        .par_iter()
        .flat_map_iter(|&aa| k.iter().map(|&kk| f(kk, aa)).collect::<Vec<_>>())
        .collect();
    Array2::from_shape_vec((alpha.len(), k.len()), flat).expect("grid shape")
}

/// Location of the fastest-growing mode(s) on a growth-rate grid.
#[derive(Debug, Clone, PartialEq)]
pub struct MostUnstable {
    /// Maximum growth rate found on the grid.
    pub sigma: f64,
    /// `(alpha, k)` of every grid point attaining the maximum.
    pub modes: Vec<(f64, f64)>,
}

/// Scan a growth-rate grid (rows = `alpha`, columns = `k`) for its maximum.
///
/// NaN entries are ignored. Every grid point exactly attaining the maximum
/// is reported, so a degenerate regime (several equally unstable
/// orientations) is visible to the caller instead of silently resolved.
/// Returns `None` when the grid holds no finite value.
pub fn most_unstable(
    sigma: &Array2<f64>,
    alpha: &Array1<f64>,
    k: &Array1<f64>,
) -> Option<MostUnstable> {
    let mut max = f64::NEG_INFINITY;
    let mut found = false;
    for &v in sigma.iter() {
        if v.is_finite() && v > max {
            max = v;
            found = true;
        }
    }
    if !found {
        return None;
    }
    let mut modes = Vec::new();
    for ((i, j), &v) in sigma.indexed_iter() {
        if v == max {
            modes.push((alpha[i], k[j]));
        }
    }
    Some(MostUnstable { sigma: max, modes })
}
