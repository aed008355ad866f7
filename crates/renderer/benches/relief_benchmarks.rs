//! Benchmarks for color ramp lookup and the color relief sweep.
//!
//! Run with: cargo bench --package renderer --bench relief_benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use relief_common::{Grid, GridSpec, MemorySink};
use renderer::png::create_png_rgb_auto;
use renderer::{interleave_rgb, ColorRamp, ColorReliefSweep};

const HYPSOMETRIC: &str = "\
0 46 154 88
500 251 255 128
1000 224 108 31
2000 200 55 55
3000 215 244 244
";

fn generate_dem(size: usize) -> Grid {
    let mut data = vec![0.0f32; size * size];
    for y in 0..size {
        for x in 0..size {
            let fx = x as f32 / size as f32;
            let fy = y as f32 / size as f32;
            data[y * size + x] = 1500.0 + (fx * 9.0).sin() * 1200.0 + (fy * 7.0).cos() * 400.0;
        }
    }
    Grid::new(GridSpec::new(size, size, 30.0, -30.0, -9999.0), data).unwrap()
}

fn bench_color_at(c: &mut Criterion) {
    let ramp = ColorRamp::parse(HYPSOMETRIC).unwrap();
    c.bench_function("color_at", |b| {
        b.iter(|| {
            let mut acc = 0u32;
            for z in (-200..3200).step_by(7) {
                acc += ramp.color_at(black_box(z as f64)).r as u32;
            }
            acc
        })
    });
}

fn bench_relief_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("color_relief");
    let ramp = ColorRamp::parse(HYPSOMETRIC).unwrap();
    let grid = generate_dem(512);
    group.throughput(Throughput::Elements((512 * 512) as u64));

    group.bench_function("sequential", |b| {
        b.iter(|| {
            let mut sink = MemorySink::new(512, 512, 3);
            ColorReliefSweep::new(&ramp).run(black_box(&grid), &mut sink).unwrap()
        })
    });

    group.bench_function("parallel", |b| {
        b.iter(|| {
            let mut sink = MemorySink::new(512, 512, 3);
            ColorReliefSweep::new(&ramp)
                .with_parallel(64)
                .run(black_box(&grid), &mut sink)
                .unwrap()
        })
    });

    let mut sink = MemorySink::new(512, 512, 3);
    ColorReliefSweep::new(&ramp).run(&grid, &mut sink).unwrap();
    let pixels = interleave_rgb(sink.band(0), sink.band(1), sink.band(2));
    group.bench_function("encode_png", |b| {
        b.iter(|| create_png_rgb_auto(black_box(&pixels), 512, 512).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_color_at, bench_relief_sweep);
criterion_main!(benches);
