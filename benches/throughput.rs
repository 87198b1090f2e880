use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use iqtar::metadata::{ChannelInfo, IqDataFormat, IqDataType};
use iqtar::reader::IqTarReader;
use iqtar::writer::{ContainerDescription, IqTarWriter, WriterConfig};
use tempfile::TempDir;

const BLOCK: usize = 16_384;

fn description(channels: usize) -> ContainerDescription {
    let channels = (0..channels)
        .map(|c| ChannelInfo::new(format!("Channel{}", c + 1), 10e6, 1e9))
        .collect();
    ContainerDescription::new(IqDataFormat::Complex, channels)
}

/// I and Q arrays for every channel
fn block(channels: usize) -> Vec<Vec<f32>> {
    (0..2 * channels)
        .map(|k| (0..BLOCK).map(|s| ((s * 31 + k * 17) % 1000) as f32 / 1000.0).collect())
        .collect()
}

fn write_container(path: &std::path::Path, config: WriterConfig, channels: usize, blocks: usize, direct: bool) {
    let mut writer = IqTarWriter::new(path, config);
    if direct {
        writer
            .declare_exact_size(
                (blocks * BLOCK) as u64,
                channels,
                IqDataFormat::Complex,
                IqDataType::Float32,
            )
            .unwrap();
    }
    writer.open(description(channels)).unwrap();
    let data = block(channels);
    for _ in 0..blocks {
        writer.append_arrays(&data).unwrap();
    }
    writer.close().unwrap();
}

/// Benchmark staged and direct writes without preview
fn bench_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("write");
    group.sample_size(20);

    let channels = 2;
    for blocks in [8, 64] {
        let bytes = (blocks * BLOCK * channels * 2 * 4) as u64;
        group.throughput(Throughput::Bytes(bytes));

        for (label, direct) in [("staged", false), ("direct", true)] {
            group.bench_with_input(
                BenchmarkId::new(label, format!("{}blocks", blocks)),
                &blocks,
                |b, &blocks| {
                    let temp_dir = TempDir::new().unwrap();
                    let path = temp_dir.path().join("bench.iq.tar");
                    b.iter(|| {
                        write_container(&path, WriterConfig::without_preview(), channels, blocks, direct);
                    });
                },
            );
        }
    }

    group.finish();
}

/// Benchmark the cost of computing previews while writing
fn bench_write_with_preview(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_preview");
    group.sample_size(20);

    let blocks = 16;
    group.throughput(Throughput::Elements((blocks * BLOCK) as u64));
    group.bench_function("staged_default_preview", |b| {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bench.iq.tar");
        b.iter(|| write_container(&path, WriterConfig::default(), 1, blocks, false));
    });

    group.finish();
}

/// Benchmark strided reads of one array out of many channels
fn bench_read_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_array");

    for channels in [1, 4, 8] {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bench.iq.tar");
        write_container(&path, WriterConfig::without_preview(), channels, 16, false);
        let reader = IqTarReader::open(&path).unwrap();
        let count = 8 * BLOCK;

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}ch", channels)),
            &channels,
            |b, &channels| {
                let name = format!("Channel{}_Q", channels);
                b.iter(|| {
                    let values: Vec<f32> = reader
                        .read_array(black_box(&name), count, black_box(1000))
                        .unwrap();
                    black_box(values);
                });
            },
        );
    }

    group.finish();
}

/// Benchmark opening a container (entry scan and metadata parse)
fn bench_open(c: &mut Criterion) {
    let mut group = c.benchmark_group("open");

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bench.iq.tar");
    write_container(&path, WriterConfig::default(), 2, 32, false);

    group.bench_function("open_and_parse", |b| {
        b.iter(|| {
            let reader = IqTarReader::open(&path).unwrap();
            black_box(reader.array_names());
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_write,
    bench_write_with_preview,
    bench_read_array,
    bench_open
);
criterion_main!(benches);
