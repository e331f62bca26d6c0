// Benchmark suite for the generation pipeline
//
// Measures subdivision alone and the full grid-to-raster run at a few
// surface sizes.
//
// Run with: cargo bench --bench weave_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use triangle_weave::subdivision::subdivide;
use triangle_weave::{init_canvas, Options, Point, RasterSurface, SurfaceRegistry};

/// Subdivision cost grows linearly with fill density
fn benchmark_subdivision(c: &mut Criterion) {
    let mut group = c.benchmark_group("subdivision");
    let corners = [
        Point::new(0.0, 0.0),
        Point::new(200.0, 10.0),
        Point::new(90.0, 180.0),
    ];

    for density in [3, 90, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(density), density, |b, &density| {
            b.iter(|| subdivide(black_box(corners), density, 10))
        });
    }

    group.finish();
}

/// Whole pipeline, drawing onto an in-memory raster with a virtual clock
fn benchmark_full_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("init_canvas");
    group.sample_size(10);

    // 400x300, 1000x600 (defaults), 1920x1080
    for (width, height) in [(400, 300), (1000, 600), (1920, 1080)].iter() {
        let options = Options {
            selector: Some("#canvas".to_string()),
            width: Some(*width),
            height: Some(*height),
            seed: Some(1),
            ..Options::default()
        };

        group.bench_with_input(
            BenchmarkId::new("raster", format!("{}x{}", width, height)),
            &options,
            |b, options| {
                b.iter(|| {
                    let mut registry = SurfaceRegistry::new();
                    registry.insert("#canvas", RasterSurface::new(*width, *height));
                    init_canvas(&mut registry, black_box(options))
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_subdivision, benchmark_full_run);
criterion_main!(benches);
