//! Benchmarks for [`SkipMap`].

use arena_skiplist::SkipMap;
use criterion::{AxisScale, BenchmarkId, Criterion, PlotConfiguration, black_box};
use rand::prelude::*;

/// Benchmarking sizes
const SIZES: [usize; 6] = [1, 10, 100, 1000, 10_000, 100_000];

fn seeded_map(rng: &mut StdRng, size: usize) -> SkipMap<usize, usize> {
    let mut map = SkipMap::builder()
        .seed(0x1234_abcd)
        .build()
        .expect("valid configuration");
    map.extend((0..size).map(|k| (k, rng.random())));
    map
}

/// Benchmarking insertion
pub fn insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("SkipMap Insert");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES {
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            let mut rng = StdRng::seed_from_u64(0x1234_abcd);
            let mut map: SkipMap<usize, usize> = std::iter::repeat_with(|| (rng.random(), rng.random()))
                .take(size)
                .collect();

            b.iter(|| {
                map.insert(rng.random(), rng.random());
            });
        });
    }
}

/// Benchmarking random access
pub fn rand_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("SkipMap Random Access");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES {
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            let mut rng = StdRng::seed_from_u64(0x1234_abcd);
            let map = seeded_map(&mut rng, size);
            let keys: Vec<usize> = std::iter::repeat_with(|| rng.random_range(0..size))
                .take(10)
                .collect();

            b.iter(|| {
                for k in &keys {
                    black_box(map.get(k));
                }
            });
        });
    }
}

/// Benchmarking removal followed by re-insertion of the same key
pub fn remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("SkipMap Remove");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES {
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            let mut rng = StdRng::seed_from_u64(0x1234_abcd);
            let mut map = seeded_map(&mut rng, size);

            b.iter(|| {
                let k = rng.random_range(0..size);
                if let Some(v) = map.remove(&k) {
                    map.insert(k, v);
                }
            });
        });
    }
}

/// Benchmarking iteration
pub fn iter(c: &mut Criterion) {
    c.bench_function("SkipMap Iter", |b| {
        let mut rng = StdRng::seed_from_u64(0x1234_abcd);
        let map: SkipMap<usize, usize> = std::iter::repeat_with(|| (rng.random(), rng.random()))
            .take(100_000)
            .collect();

        b.iter(|| {
            for el in &map {
                black_box(el);
            }
        });
    });
}

/// Benchmarking the cursor over the same data as [`iter`]
pub fn cursor(c: &mut Criterion) {
    c.bench_function("SkipMap Cursor", |b| {
        let mut rng = StdRng::seed_from_u64(0x1234_abcd);
        let map = seeded_map(&mut rng, 100_000);

        b.iter(|| {
            let mut cursor = map.cursor();
            while cursor.advance() {
                black_box(cursor.entry());
            }
        });
    });
}
