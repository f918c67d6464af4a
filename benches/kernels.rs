use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use lanemath::half::{Half, SimdHalf, SimdWiden};
use lanemath::linalg::vec3;
use lanemath::noise::{Grid, Perlin};
use lanemath::simd::{Columns, Float4Kernel, Lanes, Native, ScalarKernel};

fn random_lanes(rng: &mut StdRng) -> Lanes {
    std::array::from_fn(|_| rng.random_range(-10.0f32..10.0))
}

fn random_columns(rng: &mut StdRng) -> Columns {
    std::array::from_fn(|_| random_lanes(rng))
}

fn bench_lane_kernels(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let (a, b) = (random_lanes(&mut rng), random_lanes(&mut rng));
    let (ma, mb) = (random_columns(&mut rng), random_columns(&mut rng));

    let mut group = c.benchmark_group("lanes");
    group.bench_function("dot/scalar", |bench| {
        bench.iter(|| ScalarKernel::dot(black_box(&a), black_box(&b)))
    });
    group.bench_function(format!("dot/{}", Native::NAME), |bench| {
        bench.iter(|| Native::dot(black_box(&a), black_box(&b)))
    });
    group.bench_function("normalize/scalar", |bench| {
        bench.iter(|| ScalarKernel::normalize(black_box(&a)))
    });
    group.bench_function(format!("normalize/{}", Native::NAME), |bench| {
        bench.iter(|| Native::normalize(black_box(&a)))
    });
    group.bench_function("exp/scalar", |bench| {
        bench.iter(|| ScalarKernel::store(ScalarKernel::exp(ScalarKernel::load(black_box(&a)))))
    });
    group.bench_function(format!("exp/{}", Native::NAME), |bench| {
        bench.iter(|| Native::store(Native::exp(Native::load(black_box(&a)))))
    });
    group.finish();

    let mut group = c.benchmark_group("mat4");
    group.bench_function("mat_mul/scalar", |bench| {
        bench.iter(|| ScalarKernel::mat_mul(black_box(&ma), black_box(&mb)))
    });
    group.bench_function(format!("mat_mul/{}", Native::NAME), |bench| {
        bench.iter(|| Native::mat_mul(black_box(&ma), black_box(&mb)))
    });
    group.bench_function("inverse/scalar", |bench| {
        bench.iter(|| ScalarKernel::inverse(black_box(&ma)))
    });
    group.bench_function(format!("inverse/{}", Native::NAME), |bench| {
        bench.iter(|| Native::inverse(black_box(&ma)))
    });
    group.finish();
}

fn bench_half_slices(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let mut group = c.benchmark_group("half");

    for size in [4_096usize, 65_536, 1_048_576] {
        let values: Vec<f32> = (0..size).map(|_| rng.random_range(-1.0e4..1.0e4)).collect();
        let halves: Vec<Half> = values.as_slice().simd_to_half();
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("narrow/scalar", size), &values, |bench, v| {
            bench.iter(|| black_box(v.as_slice()).scalar_to_half())
        });
        group.bench_with_input(BenchmarkId::new("narrow/simd", size), &values, |bench, v| {
            bench.iter(|| black_box(v.as_slice()).simd_to_half())
        });
        group.bench_with_input(BenchmarkId::new("narrow/par_simd", size), &values, |bench, v| {
            bench.iter(|| black_box(v.as_slice()).par_simd_to_half())
        });
        group.bench_with_input(BenchmarkId::new("widen/simd", size), &halves, |bench, h| {
            bench.iter(|| black_box(h.as_slice()).simd_to_f32())
        });
    }
    group.finish();
}

fn bench_noise_grid(c: &mut Criterion) {
    let perlin = Perlin::with_seed(1);
    let mut group = c.benchmark_group("perlin");

    for side in [16usize, 64] {
        let grid = Grid::new(vec3(0.0, 0.0, 0.0), 0.05, [side, side, side]);
        group.throughput(Throughput::Elements(grid.len() as u64));
        group.bench_with_input(BenchmarkId::new("sample_grid", side), &grid, |bench, g| {
            bench.iter(|| perlin.sample_grid(black_box(g)))
        });
        group.bench_with_input(BenchmarkId::new("par_sample_grid", side), &grid, |bench, g| {
            bench.iter(|| perlin.par_sample_grid(black_box(g)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_lane_kernels, bench_half_slices, bench_noise_grid);
criterion_main!(benches);
