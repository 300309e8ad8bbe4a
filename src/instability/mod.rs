//! Dune flat-bed instability evaluators.
//!
//! Linear dispersion relations for the growth of incipient bedforms on a
//! flat sand bed, assuming a quadratic transport law
//! `q_sat/Q = 1 - (u_th/u*)^2`.
//!
//! All quantities are non-dimensional: lengths scale by the saturation
//! length `L_sat` and times by `L_sat^2 / Q`, where `Q` is the
//! characteristic sand flux.
//!
//! - [`one_dim`]: unidirectional wind, no spanwise direction; temporal and
//!   spatial versions of the instability.
//! - [`two_dim`]: arbitrary crest orientation under unidirectional,
//!   bidirectional and multidirectional wind regimes; temporal instability
//!   only.

pub mod one_dim;
pub mod two_dim;

pub use two_dim::{InstabilityParams, MostUnstable, most_unstable};
