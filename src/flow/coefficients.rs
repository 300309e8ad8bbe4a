//! Hydrodynamic coefficients: closed-form approximations, their angular
//! generalization, and the provider abstraction consumed by the instability
//! evaluators.
//!
//! The in-phase (`A`) and in-quadrature (`B`) coefficients relate the bed
//! topography to the basal shear-stress perturbation. In the small-roughness,
//! unbounded, unidirectional limit they are well approximated by rational
//! functions of `R = ln(2 pi / eta_0)` fitted on the boundary-value solver;
//! the geometrical model then projects those 0-incidence values onto an
//! oblique crest with `cos^2` / `sin cos` factors, an approximation valid
//! for small obliquity. The first-principles alternative samples the oblique
//! solver directly.

use std::collections::HashMap;
use std::sync::Mutex;

use num_complex::Complex64;

use crate::math::{cosd, sind};

use super::config::SolverConfig;
use super::error::FlowError;
use super::oblique;

/// Rational fit `a0 + (a1 + a2 R + a3 R^2 + a4 R^3)/(1 + a5 R^2 + a6 R^4)`.
fn rational_fit(r: f64, a: &[f64; 7]) -> f64 {
    a[0] + (a[1] + a[2] * r + a[3] * r * r + a[4] * r * r * r)
        / (1.0 + a[5] * r * r + a[6] * r * r * r * r)
}

/// In-phase coefficient `A0` in the small-roughness unbounded limit.
pub fn a0_approx(eta_0: f64) -> f64 {
    let r = (2.0 * std::f64::consts::PI / eta_0).ln();
    rational_fit(
        r,
        &[2.0, 1.0702, 0.093069, 0.10838, 0.024835, 0.041603, 0.0010625],
    )
}

/// In-quadrature coefficient `B0` in the small-roughness unbounded limit.
pub fn b0_approx(eta_0: f64) -> f64 {
    let r = (2.0 * std::f64::consts::PI / eta_0).ln();
    rational_fit(
        r,
        &[0.0, 0.036989, 0.15765, 0.11518, 0.0020249, 0.0028725, 0.00053483],
    )
}

/// Geometrical model: streamwise in-phase coefficient, `A0 cos^2(alpha)`.
pub fn ax_geo(alpha: f64, a0: f64) -> f64 {
    a0 * cosd(alpha) * cosd(alpha)
}

/// Geometrical model: spanwise in-phase coefficient,
/// `A0 cos(alpha) sin(alpha) / 2`.
pub fn ay_geo(alpha: f64, a0: f64) -> f64 {
    0.5 * a0 * cosd(alpha) * sind(alpha)
}

/// Geometrical model: streamwise in-quadrature coefficient,
/// `B0 cos^2(alpha)`.
pub fn bx_geo(alpha: f64, b0: f64) -> f64 {
    b0 * cosd(alpha) * cosd(alpha)
}

/// Geometrical model: spanwise in-quadrature coefficient,
/// `B0 cos(alpha) sin(alpha) / 2`.
pub fn by_geo(alpha: f64, b0: f64) -> f64 {
    0.5 * b0 * cosd(alpha) * sind(alpha)
}

/// Provider of the four orientation-and-wavenumber-dependent hydrodynamic
/// coefficients.
///
/// The bed-instability evaluators are written against this capability so the
/// coefficients can come either from the closed-form geometrical
/// approximation or from sampling the turbulent-flow boundary-value solver.
/// Implementations must be defined for every `(k, alpha)` the evaluators
/// sweep.
pub trait HydrodynamicCoefficients {
    /// Streamwise in-phase coefficient.
    fn ax(&self, k: f64, alpha: f64) -> f64;
    /// Spanwise in-phase coefficient.
    fn ay(&self, k: f64, alpha: f64) -> f64;
    /// Streamwise in-quadrature coefficient.
    fn bx(&self, k: f64, alpha: f64) -> f64;
    /// Spanwise in-quadrature coefficient.
    fn by(&self, k: f64, alpha: f64) -> f64;
}

/// Geometrical (angular-projection) coefficient model.
///
/// Projects fixed 0-incidence coefficients onto an arbitrary crest angle.
/// The coefficients do not depend on the wavenumber in this approximation.
#[derive(Debug, Clone, Copy)]
pub struct GeometricalModel {
    /// In-phase coefficient at zero obliquity.
    pub a0: f64,
    /// In-quadrature coefficient at zero obliquity.
    pub b0: f64,
}

impl GeometricalModel {
    pub fn new(a0: f64, b0: f64) -> Self {
        Self { a0, b0 }
    }

    /// Build from the small-roughness rational fits at roughness `eta_0`.
    pub fn from_roughness(eta_0: f64) -> Self {
        Self {
            a0: a0_approx(eta_0),
            b0: b0_approx(eta_0),
        }
    }
}

impl HydrodynamicCoefficients for GeometricalModel {
    fn ax(&self, _k: f64, alpha: f64) -> f64 {
        ax_geo(alpha, self.a0)
    }
    fn ay(&self, _k: f64, alpha: f64) -> f64 {
        ay_geo(alpha, self.a0)
    }
    fn bx(&self, _k: f64, alpha: f64) -> f64 {
        bx_geo(alpha, self.b0)
    }
    fn by(&self, _k: f64, alpha: f64) -> f64 {
        by_geo(alpha, self.b0)
    }
}

/// Coefficient provider backed by the oblique boundary-value solver.
///
/// Holds the dimensional roughness `z0` and flow depth `h` (in saturation
/// lengths); each `(k, alpha)` query solves the oblique problem with
/// `eta_0 = k z0` and `eta_H = k h` and reads the four coefficients off the
/// basal `Stx`/`Sty` amplitudes. Queries are cached so the four accessors
/// share one solve per grid point.
///
/// A query for which the solver fails yields NaN, which the multidirectional
/// aggregations treat as missing data; use [`SolvedCoefficients::solve_at`]
/// to observe the error itself.
pub struct SolvedCoefficients {
    z0: f64,
    h: f64,
    config: SolverConfig,
    cache: Mutex<HashMap<(u64, u64), [f64; 4]>>,
}

impl SolvedCoefficients {
    pub fn new(z0: f64, h: f64, config: SolverConfig) -> Self {
        Self {
            z0,
            h,
            config,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Solve the oblique problem at `(k, alpha)` and return
    /// `(ax, ay, bx, by)`.
    pub fn solve_at(&self, k: f64, alpha: f64) -> Result<(f64, f64, f64, f64), FlowError> {
        if !(k > 0.0) {
            return Err(FlowError::Domain {
                name: "k",
                value: k,
                reason: "wavenumber must be strictly positive",
            });
        }
        let sol = oblique::calculate_solution(k * self.z0, k * self.h, alpha, &self.config)?;
        let bottom = sol.eval(0.0);
        let (stx, sty): (Complex64, Complex64) = (bottom[3], bottom[4]);
        Ok((stx.re, sty.re, stx.im, sty.im))
    }

    fn cached(&self, k: f64, alpha: f64) -> [f64; 4] {
        let key = (k.to_bits(), alpha.to_bits());
        if let Some(v) = self.cache.lock().expect("coefficient cache poisoned").get(&key) {
            return *v;
        }
        let v = match self.solve_at(k, alpha) {
            Ok((ax, ay, bx, by)) => [ax, ay, bx, by],
            Err(_) => [f64::NAN; 4],
        };
        self.cache
            .lock()
            .expect("coefficient cache poisoned")
            .insert(key, v);
        v
    }
}

impl HydrodynamicCoefficients for SolvedCoefficients {
    fn ax(&self, k: f64, alpha: f64) -> f64 {
        self.cached(k, alpha)[0]
    }
    fn ay(&self, k: f64, alpha: f64) -> f64 {
        self.cached(k, alpha)[1]
    }
    fn bx(&self, k: f64, alpha: f64) -> f64 {
        self.cached(k, alpha)[2]
    }
    fn by(&self, k: f64, alpha: f64) -> f64 {
        self.cached(k, alpha)[3]
    }
}

/// Basal shear stress over a two-dimensional sinusoidal bed for a wind
/// blowing from direction `theta` (degrees, trigonometric convention).
///
/// `x` and `y` are the non-dimensional coordinates `k x`, `k y`; `ar` is the
/// bed aspect ratio `k xi`. Returns the streamwise and spanwise components
/// of the non-dimensional stress field at that point.
pub fn basal_shear(
    x: f64,
    y: f64,
    alpha: f64,
    a0: f64,
    b0: f64,
    ar: f64,
    theta: f64,
) -> (f64, f64) {
    let (ct, st) = (cosd(theta), sind(theta));
    let x_rot = x * ct + y * st;
    let y_rot = y * ct - x * st;
    let alpha_rot = (alpha - theta + 90.0).rem_euclid(180.0) - 90.0;

    let phase = Complex64::new(
        0.0,
        cosd(alpha_rot) * x_rot + sind(alpha_rot) * y_rot,
    )
    .exp();
    let tau_x =
        1.0 + (Complex64::new(ax_geo(alpha_rot, a0), bx_geo(alpha_rot, b0)) * ar * phase).re;
    let tau_y = (Complex64::new(ay_geo(alpha_rot, a0), by_geo(alpha_rot, b0)) * ar * phase).re;

    // Rotate back into the fixed frame
    (ct * tau_x - st * tau_y, st * tau_x + ct * tau_y)
}
