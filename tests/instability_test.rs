//! Integration tests of the bed-instability evaluators against both
//! coefficient providers.

use dune_rs::flow::{
    GeometricalModel, HydrodynamicCoefficients, SolvedCoefficients, SolverConfig, a0_approx,
};
use dune_rs::instability::one_dim;
use dune_rs::instability::two_dim::{
    self, InstabilityParams, celerity_grid, growth_rate_grid, most_unstable,
};
use ndarray::Array1;

#[test]
fn test_solver_backed_coefficients_match_fit_at_transverse() {
    // The first-principles provider queries the oblique solver; at zero
    // obliquity its in-phase coefficient approaches the closed-form fit
    let sc = SolvedCoefficients::new(1e-4, 10.0, SolverConfig::default());
    let k = 1.0;
    let ax = sc.ax(k, 0.0);
    let fit = a0_approx(k * 1e-4);
    assert!(
        (ax - fit).abs() / fit < 0.15,
        "ax = {ax} vs closed-form {fit}"
    );
    // Spanwise response vanishes for a transverse crest
    assert!(sc.ay(k, 0.0).abs() < 1e-5);
}

#[test]
fn test_grid_maximum_matches_one_dim_scan() {
    // Under a single wind the fastest-growing mode is transverse, so the 2D
    // grid maximum must sit at alpha = 0 and at the same wavenumber as a 1D
    // scan of the dispersion relation
    let gm = GeometricalModel::from_roughness(1e-4);
    let p = InstabilityParams::default();
    let alpha = Array1::linspace(-60.0, 60.0, 25);
    let k = Array1::linspace(0.02, 1.0, 200);
    let sigma = growth_rate_grid(&alpha, &k, &[(0.0, 1.0)], &gm, &p);
    let best = most_unstable(&sigma, &alpha, &k).unwrap();
    assert_eq!(best.modes.len(), 1);
    let (alpha_star, k_star) = best.modes[0];
    assert!(alpha_star.abs() < 1e-10);

    let k_star_1d = k
        .iter()
        .copied()
        .max_by(|&ka, &kb| {
            one_dim::temporal_growth_rate(ka, gm.a0, gm.b0, p.mu, p.r)
                .total_cmp(&one_dim::temporal_growth_rate(kb, gm.a0, gm.b0, p.mu, p.r))
        })
        .unwrap();
    assert_eq!(k_star, k_star_1d);
    assert!(
        (best.sigma - one_dim::temporal_growth_rate(k_star, gm.a0, gm.b0, p.mu, p.r)).abs()
            < 1e-12
    );
}

#[test]
fn test_opposing_winds_cancel_migration() {
    // Two equal opposing winds grow the pattern but do not move it
    let gm = GeometricalModel::from_roughness(1e-4);
    let p = InstabilityParams::default();
    let winds = [(0.0, 1.0), (180.0, 1.0)];
    let alpha = Array1::from(vec![0.0]);
    let k = Array1::linspace(0.05, 0.8, 16);
    let c = celerity_grid(&alpha, &k, &winds, &gm, &p);
    for &v in c.iter() {
        assert!(v.abs() < 1e-12, "residual migration {v}");
    }
    let sigma = growth_rate_grid(&alpha, &k, &winds, &gm, &p);
    assert!(sigma.iter().any(|&s| s > 0.0));
}

#[test]
fn test_bidirectional_regime_tilts_most_unstable_orientation() {
    // An asymmetric bidirectional regime breaks the transverse symmetry:
    // the fastest-growing crest rotates toward perpendicular to the
    // transport-weighted mean wind
    let gm = GeometricalModel::from_roughness(1e-4);
    let p = InstabilityParams::default();
    let alpha = Array1::linspace(-89.0, 90.0, 180);
    let k = Array1::linspace(0.05, 1.0, 60);
    let sweep = |theta: f64, n: f64| {
        let sigma = growth_rate_grid(
            &alpha,
            &k,
            &[(theta / 2.0, n), (-theta / 2.0, 1.0)],
            &gm,
            &p,
        );
        most_unstable(&sigma, &alpha, &k).unwrap().modes[0].0
    };
    // Symmetric regime keeps the crest on the bisector normal
    assert!(sweep(40.0, 1.0).abs() < 1.5);
    // Dominant first wind pulls the crest orientation its way
    let tilted = sweep(40.0, 4.0);
    assert!(tilted > 1.5, "expected a tilt, got {tilted}");
}

#[test]
fn test_solver_backed_growth_rate_is_finite_on_valid_window() {
    // End-to-end: dispersion relation on top of the boundary-value solver
    let sc = SolvedCoefficients::new(1e-4, 8.0, SolverConfig::default());
    let p = InstabilityParams::default();
    let sigma = two_dim::temporal_growth_rate(0.4, 10.0, &sc, &p);
    assert!(sigma.is_finite());
    // Same query again comes from the cache and must be identical
    assert_eq!(sigma, two_dim::temporal_growth_rate(0.4, 10.0, &sc, &p));
}
