//! Benchmarks for the distance field fill and Marching Cubes extraction

use cloudmesh_core::{Point3f, PointCloud3f};
use cloudmesh_reconstruction::{
    marching_cubes, BoundingBox, DistanceFieldSampler, NearestSearch, WorkerPoolConfig,
    DEFAULT_PAD_FRACTION,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn generate_sphere_cloud(num_points: usize) -> PointCloud3f {
    let golden_angle = std::f32::consts::PI * (3.0 - 5.0_f32.sqrt());
    (0..num_points)
        .map(|i| {
            let y = 1.0 - 2.0 * (i as f32 + 0.5) / num_points as f32;
            let ring = (1.0 - y * y).sqrt();
            let theta = golden_angle * i as f32;
            Point3f::new(ring * theta.cos(), y, ring * theta.sin())
        })
        .collect()
}

fn bench_field_fill(c: &mut Criterion) {
    let cloud = generate_sphere_cloud(2000);
    let bounds = BoundingBox::from_cloud(&cloud, DEFAULT_PAD_FRACTION).unwrap();
    let max_threads = num_cpus::get().max(1);

    let mut group = c.benchmark_group("distance_field");
    group.sample_size(10);

    for search in [NearestSearch::BruteForce, NearestSearch::RTree] {
        for threads in [1, max_threads] {
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", search), format!("r32_t{}", threads)),
                &threads,
                |b, &threads| {
                    let sampler = DistanceFieldSampler::new(32)
                        .with_search(search)
                        .with_workers(WorkerPoolConfig::default().with_threads(threads));
                    b.iter(|| {
                        let grid = sampler.sample(black_box(&cloud), &bounds).unwrap();
                        black_box(grid);
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_polygonize(c: &mut Criterion) {
    let cloud = generate_sphere_cloud(2000);
    let bounds = BoundingBox::from_cloud(&cloud, DEFAULT_PAD_FRACTION).unwrap();

    let mut group = c.benchmark_group("marching_cubes");

    for resolution in [32, 64] {
        let grid = DistanceFieldSampler::new(resolution)
            .with_search(NearestSearch::RTree)
            .sample(&cloud, &bounds)
            .unwrap();

        group.bench_with_input(
            BenchmarkId::new("extract", resolution),
            &grid,
            |b, grid| {
                b.iter(|| {
                    let soup = marching_cubes(black_box(grid), 0.08).unwrap();
                    black_box(soup);
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_field_fill, bench_polygonize);
criterion_main!(benches);
