//! Full-frame rendering benchmarks for iris-core.
//!
//! Run with: cargo bench -p iris-core

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use iris_core::preset::{BuiltinPreset, builtin};
use iris_core::{
    CvdFilter, Engine, Frame, PipelineConfig, Point, SimulationAlgorithm, SimulationConfig,
    SplitGeometry, ZoneMode,
};

/// Synthetic frame with smooth gradients across all three channels.
fn generate_frame(width: u32, height: u32) -> Frame {
    let pixels = (0..width * height)
        .map(|i| {
            let x = (i % width) as f32 / width as f32;
            let y = (i / width) as f32 / height as f32;
            [x, y, (x + y) * 0.5, 1.0]
        })
        .collect();
    Frame {
        width,
        height,
        pixels,
    }
}

fn deutan_correction() -> ZoneMode {
    let (correction, _) = builtin(BuiltinPreset::Deutan).to_correction();
    ZoneMode::Correction(correction)
}

fn configs() -> Vec<(&'static str, PipelineConfig)> {
    let fullscreen_correction = PipelineConfig::fullscreen(deutan_correction());

    let mut split_sim = PipelineConfig::default();
    split_sim.geometry = SplitGeometry::SplitVertical { position: 0.5 };
    split_sim.zones[0] = ZoneMode::Simulation(SimulationConfig {
        algorithm: SimulationAlgorithm::Strict,
        filter: CvdFilter::Deuteranopia,
        intensity: 1.0,
    });
    split_sim.zones[1] = deutan_correction();

    let mut circle = PipelineConfig::default();
    circle.geometry = SplitGeometry::Circle {
        radius: 200.0,
        edge_softness: 0.2,
    };
    circle.zones[0] = deutan_correction();

    vec![
        ("fullscreen_correction", fullscreen_correction),
        ("split_strict_vs_correction", split_sim),
        ("circle_correction", circle),
    ]
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    for (name, config) in configs() {
        let (engine, _) = Engine::with_config(&config);
        for size in [256u32, 1024] {
            let frame = generate_frame(size, size);
            group.throughput(Throughput::Elements(u64::from(size) * u64::from(size)));
            group.bench_with_input(
                BenchmarkId::new(name, format!("{size}x{size}")),
                &frame,
                |b, frame| {
                    let cursor = Point::new(size as f32 * 0.5, size as f32 * 0.5);
                    b.iter(|| engine.render(black_box(frame), cursor));
                },
            );
        }
    }

    group.finish();
}

fn bench_compile(c: &mut Criterion) {
    let config = PipelineConfig::fullscreen(deutan_correction());
    c.bench_function("compile_cold_cache", |b| {
        b.iter(|| {
            let engine = Engine::new();
            engine.update(black_box(&config))
        });
    });
}

criterion_group!(benches, bench_render, bench_compile);
criterion_main!(benches);
