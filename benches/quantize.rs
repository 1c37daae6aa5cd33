//! Benchmarks for palette quantization and container encoding.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use doki_sprite::{
    Frame, SpriteContainer,
    quantize::quantize,
    schema::{PatternKind, TestPattern},
    source::{FrameSource, PatternSource},
};

fn pattern_frames(size: u32) -> Vec<Frame> {
    PatternSource::new(TestPattern {
        kind: PatternKind::Spinner,
        width: size,
        height: size,
        frames: 20,
    })
    .into_frames()
    .expect("pattern renders")
}

/// Frames with far more than 256 distinct colors, forcing median cut.
fn gradient_frames(size: u32, count: u32) -> Vec<Frame> {
    (0..count)
        .map(|n| {
            let pixels: Vec<[u8; 3]> = (0..size * size)
                .map(|i| {
                    let (x, y) = (i % size, i / size);
                    [
                        (x * 255 / size) as u8,
                        (y * 255 / size) as u8,
                        ((x + y + n * 7) % 256) as u8,
                    ]
                })
                .collect();
            Frame::from_pixels(size, size, &pixels).expect("valid frame")
        })
        .collect()
}

fn bench_quantize_pattern(c: &mut Criterion) {
    let mut group = c.benchmark_group("quantize_pattern");

    for size in [32, 64, 128] {
        let frames = pattern_frames(size);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", size, size)),
            &frames,
            |b, frames| {
                b.iter(|| quantize(black_box(frames.clone())).expect("quantize"));
            },
        );
    }

    group.finish();
}

fn bench_quantize_median_cut(c: &mut Criterion) {
    let mut group = c.benchmark_group("quantize_median_cut");
    group.sample_size(20);

    for size in [64, 128, 256] {
        let frames = gradient_frames(size, 4);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", size, size)),
            &frames,
            |b, frames| {
                b.iter(|| quantize(black_box(frames.clone())).expect("quantize"));
            },
        );
    }

    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let quantized = quantize(pattern_frames(128)).expect("quantize");
    let container = SpriteContainer::from_quantized(quantized, 30).expect("container");

    c.bench_function("encode_128x128x20", |b| {
        b.iter(|| black_box(&container).to_bytes());
    });
}

criterion_group!(
    benches,
    bench_quantize_pattern,
    bench_quantize_median_cut,
    bench_encode
);
criterion_main!(benches);
