//! Adaptive embedded Runge-Kutta integration with dense output.
//!
//! The flow perturbation equations form a first-order linear complex ODE
//! system `dX/d(eta) = P(eta) X + S(eta)` integrated from the bed up to the
//! boundary-condition height. The coefficients stiffen like `1/(eta + eta_0)`
//! near the bed, so a fixed-step scheme is hopeless for the small roughness
//! values of interest; instead an embedded Dormand-Prince 5(4) pair adapts
//! the step to the requested tolerances and stores, for every accepted step,
//! the coefficients of the 4th-order continuous extension. The returned
//! [`DenseOutput`] can then be evaluated anywhere inside the integration
//! interval, which the boundary-closure stage and the downstream coefficient
//! sampling both rely on.
//!
//! The local error is kept below `atol + rtol * |y|` componentwise, using the
//! complex magnitude of each state component. Integration that exhausts the
//! step budget or whose step size underflows fails with
//! [`FlowError::Convergence`] rather than returning a truncated interpolant.

use num_complex::Complex64;

use super::error::FlowError;

// Dormand-Prince 5(4) tableau (Hairer, Norsett & Wanner, "Solving Ordinary
// Differential Equations I", DOPRI5).
const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;
const A71: f64 = 35.0 / 384.0;
const A73: f64 = 500.0 / 1113.0;
const A74: f64 = 125.0 / 192.0;
const A75: f64 = -2187.0 / 6784.0;
const A76: f64 = 11.0 / 84.0;

// b - bhat, the 5th-minus-4th-order error weights.
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

// Dense-output weights of the 4th-order continuous extension.
const D1: f64 = -12715105075.0 / 11282082432.0;
const D3: f64 = 87487479700.0 / 32700410799.0;
const D4: f64 = -10690763975.0 / 1880347072.0;
const D5: f64 = 701980252875.0 / 199316789632.0;
const D6: f64 = -1453857185.0 / 822651844.0;
const D7: f64 = 69997945.0 / 29380423.0;

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 10.0;

/// Adaptive Dormand-Prince 5(4) integrator over a complex state vector.
#[derive(Debug, Clone, Copy)]
pub struct Integrator {
    /// Absolute tolerance.
    pub atol: f64,
    /// Relative tolerance.
    pub rtol: f64,
    /// Bound on accepted plus rejected steps.
    pub max_steps: usize,
}

impl Integrator {
    pub fn new(atol: f64, rtol: f64, max_steps: usize) -> Self {
        Self {
            atol,
            rtol,
            max_steps,
        }
    }

    /// Integrate `dy/dt = f(t, y)` from `t0` to `t_end` (`t_end > t0`),
    /// returning a dense solution valid on the whole interval.
    ///
    /// `f` writes the derivative of `y` into its third argument.
    pub fn integrate<F>(
        &self,
        f: F,
        t0: f64,
        t_end: f64,
        y0: &[Complex64],
    ) -> Result<DenseOutput, FlowError>
    where
        F: Fn(f64, &[Complex64], &mut [Complex64]),
    {
        let dim = y0.len();
        let span = t_end - t0;
        debug_assert!(span > 0.0);

        let mut t = t0;
        let mut y = y0.to_vec();
        let mut k: Vec<Vec<Complex64>> = (0..7).map(|_| vec![Complex64::ZERO; dim]).collect();
        let mut y_stage = vec![Complex64::ZERO; dim];
        let mut y_new = vec![Complex64::ZERO; dim];

        f(t, &y, &mut k[0]);

        let mut h = self.initial_step(&y, &k[0], span);
        let mut segments: Vec<Segment> = Vec::new();
        let mut steps = 0usize;

        while t < t_end {
            if steps >= self.max_steps {
                return Err(FlowError::Convergence {
                    eta: t,
                    steps,
                    detail: "step budget exhausted",
                });
            }
            if t + h == t {
                return Err(FlowError::Convergence {
                    eta: t,
                    steps,
                    detail: "step size underflow",
                });
            }
            h = h.min(t_end - t);
            steps += 1;

            // Stage 2
            for i in 0..dim {
                y_stage[i] = y[i] + h * A21 * k[0][i];
            }
            f(t + C2 * h, &y_stage, &mut k[1]);
            // Stage 3
            for i in 0..dim {
                y_stage[i] = y[i] + h * (A31 * k[0][i] + A32 * k[1][i]);
            }
            f(t + C3 * h, &y_stage, &mut k[2]);
            // Stage 4
            for i in 0..dim {
                y_stage[i] = y[i] + h * (A41 * k[0][i] + A42 * k[1][i] + A43 * k[2][i]);
            }
            f(t + C4 * h, &y_stage, &mut k[3]);
            // Stage 5
            for i in 0..dim {
                y_stage[i] =
                    y[i] + h * (A51 * k[0][i] + A52 * k[1][i] + A53 * k[2][i] + A54 * k[3][i]);
            }
            f(t + C5 * h, &y_stage, &mut k[4]);
            // Stage 6
            for i in 0..dim {
                y_stage[i] = y[i]
                    + h * (A61 * k[0][i]
                        + A62 * k[1][i]
                        + A63 * k[2][i]
                        + A64 * k[3][i]
                        + A65 * k[4][i]);
            }
            f(t + h, &y_stage, &mut k[5]);
            // 5th-order solution, also the argument of the FSAL stage
            for i in 0..dim {
                y_new[i] = y[i]
                    + h * (A71 * k[0][i]
                        + A73 * k[2][i]
                        + A74 * k[3][i]
                        + A75 * k[4][i]
                        + A76 * k[5][i]);
            }
            f(t + h, &y_new, &mut k[6]);

            // Scaled error norm
            let mut err_sq = 0.0;
            for i in 0..dim {
                let e = h * (E1 * k[0][i]
                    + E3 * k[2][i]
                    + E4 * k[3][i]
                    + E5 * k[4][i]
                    + E6 * k[5][i]
                    + E7 * k[6][i]);
                let scale = self.atol + self.rtol * y[i].norm().max(y_new[i].norm());
                let ratio = e.norm() / scale;
                err_sq += ratio * ratio;
            }
            let err = (err_sq / dim as f64).sqrt();

            if !err.is_finite() {
                return Err(FlowError::Convergence {
                    eta: t,
                    steps,
                    detail: "non-finite error estimate",
                });
            }

            if err <= 1.0 {
                // Accept: store the continuous extension of this step.
                let mut rcont = [
                    vec![Complex64::ZERO; dim],
                    vec![Complex64::ZERO; dim],
                    vec![Complex64::ZERO; dim],
                    vec![Complex64::ZERO; dim],
                    vec![Complex64::ZERO; dim],
                ];
                for i in 0..dim {
                    let dy = y_new[i] - y[i];
                    let bspl = h * k[0][i] - dy;
                    rcont[0][i] = y[i];
                    rcont[1][i] = dy;
                    rcont[2][i] = bspl;
                    rcont[3][i] = dy - h * k[6][i] - bspl;
                    rcont[4][i] = h * (D1 * k[0][i]
                        + D3 * k[2][i]
                        + D4 * k[3][i]
                        + D5 * k[4][i]
                        + D6 * k[5][i]
                        + D7 * k[6][i]);
                }
                segments.push(Segment { t, h, rcont });

                t += h;
                std::mem::swap(&mut y, &mut y_new);
                k.swap(0, 6); // FSAL

                let factor = if err == 0.0 {
                    MAX_FACTOR
                } else {
                    (SAFETY * err.powf(-0.2)).clamp(MIN_FACTOR, MAX_FACTOR)
                };
                h *= factor;
            } else {
                h *= (SAFETY * err.powf(-0.2)).max(MIN_FACTOR);
            }
        }

        Ok(DenseOutput {
            dim,
            t0,
            t_end,
            segments,
        })
    }

    /// Conservative initial step from the magnitudes of the state and its
    /// derivative.
    fn initial_step(&self, y: &[Complex64], f0: &[Complex64], span: f64) -> f64 {
        let dim = y.len() as f64;
        let mut d0 = 0.0;
        let mut d1 = 0.0;
        for (yi, fi) in y.iter().zip(f0.iter()) {
            let scale = self.atol + self.rtol * yi.norm();
            d0 += (yi.norm() / scale).powi(2);
            d1 += (fi.norm() / scale).powi(2);
        }
        let d0 = (d0 / dim).sqrt();
        let d1 = (d1 / dim).sqrt();
        let h0 = if d0 < 1e-5 || d1 < 1e-5 {
            1e-6
        } else {
            0.01 * d0 / d1
        };
        h0.min(span)
    }
}

struct Segment {
    t: f64,
    h: f64,
    rcont: [Vec<Complex64>; 5],
}

/// Continuously interpolatable ODE solution over `[t0, t_end]`.
pub struct DenseOutput {
    dim: usize,
    t0: f64,
    t_end: f64,
    segments: Vec<Segment>,
}

impl DenseOutput {
    /// Dimension of the state vector.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Start of the valid interval.
    pub fn t0(&self) -> f64 {
        self.t0
    }

    /// End of the valid interval.
    pub fn t_end(&self) -> f64 {
        self.t_end
    }

    /// Evaluate the interpolant at `t`, writing the state into `out`.
    ///
    /// `t` is clamped to the valid interval; the solution is only meaningful
    /// inside it.
    pub fn eval_into(&self, t: f64, out: &mut [Complex64]) {
        debug_assert_eq!(out.len(), self.dim);
        let t = t.clamp(self.t0, self.t_end);
        // Last segment whose start does not exceed t.
        let idx = self
            .segments
            .partition_point(|s| s.t <= t)
            .saturating_sub(1);
        let seg = &self.segments[idx];
        let theta = ((t - seg.t) / seg.h).clamp(0.0, 1.0);
        let theta1 = 1.0 - theta;
        for i in 0..self.dim {
            let r = &seg.rcont;
            out[i] = r[0][i]
                + theta
                    * (r[1][i] + theta1 * (r[2][i] + theta * (r[3][i] + theta1 * r[4][i])));
        }
    }

    /// Evaluate the interpolant at `t`.
    pub fn eval(&self, t: f64) -> Vec<Complex64> {
        let mut out = vec![Complex64::ZERO; self.dim];
        self.eval_into(t, &mut out);
        out
    }
}
