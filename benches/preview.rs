use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use iqtar::preview::{
    HistogramPreview, PreviewConfig, PreviewEngine, Reducer, SpectrumPreview,
    TraceDecimationPreview,
};
use rustfft::num_complex::Complex32;

/// Two-tone channel-interleaved block
fn tone_block(samples: usize, channels: usize) -> Vec<Complex32> {
    (0..samples * channels)
        .map(|n| {
            let s = (n / channels) as f32;
            Complex32::from_polar(1.0, 0.05 * s) + Complex32::from_polar(0.1, -0.31 * s)
        })
        .collect()
}

/// Benchmark the full engine on one block
fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_feed");

    for channels in [1, 4] {
        let block = tone_block(65_536, channels);
        group.throughput(Throughput::Elements(block.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}ch", channels)),
            &channels,
            |b, &channels| {
                b.iter(|| {
                    let mut engine = PreviewEngine::new(PreviewConfig::default(), channels).unwrap();
                    engine.feed(black_box(&block)).unwrap();
                    black_box(engine.snapshot().unwrap());
                });
            },
        );
    }

    group.finish();
}

/// Benchmark each estimator alone
fn bench_estimators(c: &mut Criterion) {
    let mut group = c.benchmark_group("estimators");
    let block = tone_block(65_536, 1);
    let power: Vec<f32> = block.iter().map(|c| c.norm_sqr()).collect();
    group.throughput(Throughput::Elements(block.len() as u64));

    group.bench_function("histogram", |b| {
        b.iter(|| {
            let mut histogram = HistogramPreview::new(32, 1).unwrap();
            histogram.feed(black_box(&block)).unwrap();
            black_box(histogram.total(0).unwrap());
        });
    });

    group.bench_function("trace_max", |b| {
        b.iter(|| {
            let mut trace = TraceDecimationPreview::new(256, Reducer::Max, 1).unwrap();
            trace.feed(black_box(&power)).unwrap();
            black_box(trace.get_trace(0).unwrap());
        });
    });

    for order in [8, 12] {
        group.bench_with_input(BenchmarkId::new("spectrum", order), &order, |b, &order| {
            b.iter(|| {
                let mut spectrum = SpectrumPreview::new(order, 1).unwrap();
                spectrum.feed(black_box(&block)).unwrap();
                black_box(spectrum.spectrum(0).unwrap());
            });
        });
    }

    group.finish();
}

/// Benchmark many small feeds, as produced by short appends
fn bench_small_blocks(c: &mut Criterion) {
    let mut group = c.benchmark_group("small_blocks");
    let block = tone_block(100, 2);
    group.throughput(Throughput::Elements((block.len() * 1000) as u64));

    group.bench_function("1000x100_samples", |b| {
        b.iter(|| {
            let mut engine = PreviewEngine::new(PreviewConfig::default(), 2).unwrap();
            for _ in 0..1000 {
                engine.feed(black_box(&block)).unwrap();
            }
            black_box(engine.samples());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_engine, bench_estimators, bench_small_blocks);
criterion_main!(benches);
