//! Benchmarks for the bed-instability growth-rate evaluation.
//!
//! Run with: `cargo bench --bench growth_rate_bench`
//!
//! Measures the scalar dispersion relation, the grid sweep used for
//! most-unstable-mode searches, and the full turbulent-flow solve behind the
//! first-principles coefficient provider.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use dune_rs::flow::{FlowModel, GeometricalModel, SolverConfig, solve_turbulent_flow};
use dune_rs::instability::two_dim::{InstabilityParams, growth_rate_grid, temporal_growth_rate};
use ndarray::Array1;

fn bench_dispersion_relation(c: &mut Criterion) {
    let gm = GeometricalModel::from_roughness(1e-4);
    let p = InstabilityParams::default();
    c.bench_function("temporal_growth_rate", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for i in 0..1000 {
                let k = 0.02 + 0.001 * i as f64;
                acc += temporal_growth_rate(black_box(k), black_box(12.0), &gm, &p);
            }
            acc
        })
    });
}

fn bench_grid_sweep(c: &mut Criterion) {
    let gm = GeometricalModel::from_roughness(1e-4);
    let p = InstabilityParams::default();
    let winds = [(10.0, 3.0), (130.0, 1.0)];

    let mut group = c.benchmark_group("growth_rate_grid");
    for &n in &[32usize, 128] {
        let alpha = Array1::linspace(-89.0, 90.0, n);
        let k = Array1::linspace(0.02, 1.5, n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| growth_rate_grid(black_box(&alpha), black_box(&k), &winds, &gm, &p))
        });
    }
    group.finish();
}

fn bench_flow_solver(c: &mut Criterion) {
    let cfg = SolverConfig::default();
    c.bench_function("solve_turbulent_flow_unbounded", |b| {
        b.iter(|| {
            solve_turbulent_flow(
                &FlowModel::Unbounded {
                    eta_0: black_box(1e-4),
                    eta_h: 5.0,
                },
                &cfg,
            )
            .unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_dispersion_relation,
    bench_grid_sweep,
    bench_flow_solver
);
criterion_main!(benches);
