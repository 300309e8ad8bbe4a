//! Mature-dune growth and orientation models.
//!
//! Currently a single model, the two-mode orientation theory of Courrech du
//! Pont, Narteau & Gao (2014): see [`courrech_du_pont`].

pub mod courrech_du_pont;

pub use courrech_du_pont::{
    CaptureRate, DEFAULT_GAMMA, default_orientation_bins, elongation_direction, flux_at_crest,
    growth_rate, mgbnt_orientation, resultant_flux_aligned_crest_at_crest,
    resultant_flux_at_crest, resultant_flux_perp_crest_at_crest,
};
