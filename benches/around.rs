use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use geo_nearest::geo::{around_with_queue, distance, AroundQuery, NeighborQueue};
use geo_nearest::kdtree::{KDTreeBuilder, KDTreeIndex, OwnedKDTree};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const NUM_POINTS: usize = 150_000;

fn generate_points(n: usize) -> Vec<(f64, f64)> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..n)
        .map(|_| (rng.gen_range(-180.0..180.0), rng.gen_range(-60.0..80.0)))
        .collect()
}

fn build_tree(points: &[(f64, f64)]) -> OwnedKDTree<f64> {
    let mut builder = KDTreeBuilder::new(points.len() as u32);
    for (lon, lat) in points {
        builder.add(*lon, *lat).unwrap();
    }
    builder.finish()
}

fn benchmark_construction(c: &mut Criterion) {
    let points = generate_points(NUM_POINTS);
    c.bench_function("build kdtree", |b| b.iter(|| build_tree(&points)));
}

fn benchmark_around(c: &mut Criterion) {
    let points = generate_points(NUM_POINTS);
    let tree = build_tree(&points);

    let mut group = c.benchmark_group("around");
    for max_results in [1000, 50_000, NUM_POINTS] {
        group.bench_with_input(
            BenchmarkId::new("closest", max_results),
            &max_results,
            |b, &max_results| {
                b.iter(|| {
                    tree.around(-119.7051, 34.4363, Some(max_results), None)
                        .unwrap()
                })
            },
        );
    }

    let mut rng = StdRng::seed_from_u64(7);
    let queries: Vec<AroundQuery> = (0..1000)
        .map(|_| {
            AroundQuery::new(rng.gen_range(-180.0..180.0), rng.gen_range(-60.0..80.0))
                .with_max_results(1)
        })
        .collect();

    group.bench_function("1000 random queries of 1 closest", |b| {
        b.iter(|| {
            for query in &queries {
                tree.around(query.lon, query.lat, query.max_results, None)
                    .unwrap();
            }
        })
    });

    let view = tree.as_ref();
    group.bench_function("1000 random queries of 1 closest, reused queue", |b| {
        let mut queue = NeighborQueue::new();
        b.iter(|| {
            for query in &queries {
                around_with_queue(&view, query, &mut queue, |_| true).unwrap();
            }
        })
    });

    group.finish();
}

fn benchmark_distance(c: &mut Criterion) {
    c.bench_function("haversine distance", |b| {
        b.iter(|| distance(-74.0, 40.7, -0.1, 51.5))
    });
}

criterion_group!(
    benches,
    benchmark_construction,
    benchmark_around,
    benchmark_distance
);
criterion_main!(benches);
