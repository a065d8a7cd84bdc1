mod common;

use std::hint::black_box;

use chaos_game::prelude::{pick_vertex, Shape, WeightedSelector};
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn make_shapes(count: usize, seed: u64) -> Vec<Shape> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let x = (i % 64) as f64 * 40.0;
            let y = (i / 64) as f64 * 40.0;
            Shape::from_vertices([(x, y), (x + 20.0, y), (x + 10.0, y + 20.0)])
                .with_weight(0.01 + rng.random::<f64>() * 0.99)
        })
        .collect()
}

fn selection_sample_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection/sample");

    for &n in &[1usize, 2, 8, 64, 256, 1024, 4096] {
        let shapes = make_shapes(n, 0xC0FFEE);
        let selector = WeightedSelector::new(&shapes).expect("valid weights");
        group.throughput(common::elements_throughput(n));

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            let mut rng = StdRng::seed_from_u64(0xDEADBEEF);
            b.iter(|| {
                let idx = selector.sample(&mut rng);
                black_box(idx);
            });
        });
    }

    group.finish();
}

fn selection_vertex_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection/vertex");
    let shape = Shape::from_vertices((0..32).map(|i| (i as f64 * 20.0, (i % 2) as f64 * 50.0)));

    group.bench_function("uniform_32", |b| {
        let mut rng = StdRng::seed_from_u64(0xBADC0DE);
        b.iter(|| {
            let idx = pick_vertex(&shape, &mut rng);
            black_box(idx);
        });
    });

    group.finish();
}

fn selection_setup_overhead_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection/setup_overhead");

    for &n in &[8usize, 256, 4096] {
        group.throughput(common::elements_throughput(n));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter_batched(
                || make_shapes(n, 0xCAFEBABE),
                |shapes| {
                    let selector = WeightedSelector::new(&shapes).expect("valid weights");
                    black_box(selector);
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = selection_sample_benches,
              selection_vertex_benches,
              selection_setup_overhead_benches
}
criterion_main!(benches);
