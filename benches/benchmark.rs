use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use g25map::geo::SampleRecord;
use g25map::{compare_all, plot, project};
use rand::prelude::*;
use rand_distr::{Distribution, Normal};
use serde_json::json;

const SEED: u64 = 42;
const DIMENSIONS: usize = 25;
const NUM_TARGETS: usize = 10;

fn configure_criterion() -> Criterion {
    Criterion::default()
        .sample_size(10)
        .measurement_time(std::time::Duration::from_secs(10))
        .warm_up_time(std::time::Duration::from_secs(2))
        .configure_from_args()
}

fn synthetic_panel(rng: &mut StdRng, prefix: &str, rows: usize) -> String {
    let normal = Normal::new(0.0, 0.05).unwrap();
    (0..rows)
        .map(|i| {
            let coordinates: Vec<String> = (0..DIMENSIONS)
                .map(|_| format!("{:.6}", normal.sample(rng)))
                .collect();
            format!("{}_{},{}\n", prefix, i, coordinates.join(","))
        })
        .collect()
}

fn compare_panels(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(SEED);
    let targets = synthetic_panel(&mut rng, "Target", NUM_TARGETS);

    let mut group = c.benchmark_group("compare_all");
    for sources in [100, 1_000, 10_000] {
        let panel = synthetic_panel(&mut rng, "Pop", sources);
        group.bench_with_input(BenchmarkId::from_parameter(sources), &panel, |b, panel| {
            b.iter(|| compare_all(panel, &targets, 20))
        });
    }
    group.finish();

    let panel = synthetic_panel(&mut rng, "Pop", 10_000);
    c.bench_function("plot_10000_sources", |b| b.iter(|| plot(&panel, &targets)));
}

fn project_samples(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(SEED);
    // Few distinct sites so most samples land on the jitter spiral.
    let sites: Vec<(f64, f64)> = (0..50)
        .map(|_| (rng.gen_range(30.0..60.0), rng.gen_range(-10.0..50.0)))
        .collect();
    let records: Vec<SampleRecord> = (0..10_000)
        .map(|i| {
            let (lat, lng) = sites[rng.gen_range(0..sites.len())];
            serde_json::from_value(json!({
                "id": format!("I{:05}", i),
                "latitude": format!("{:.4}", lat).replace('.', ","),
                "longitude": lng,
            }))
            .unwrap()
        })
        .collect();

    c.bench_function("project_10000_samples", |b| b.iter(|| project(&records)));
}

criterion_group! {
    name = benches;
    config = configure_criterion();
    targets = compare_panels, project_samples
}
criterion_main!(benches);
