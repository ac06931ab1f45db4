//! Encoding and decoding performance for `.dan` files
//!
//! Worlds of increasing size are built once up front, then encoded at
//! several gzip levels and decoded back.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dan_benchmarks::{criterion_config, square_selection, terrain_block};
use dan_config::Settings;
use dan_core::types::Dimension;
use dan_export::Exporter;
use dan_format::{Compression, DanWorld, Extra};

fn build_world(chunks: i32) -> DanWorld {
    let mut settings = Settings::default();
    settings.export.parallel = true;
    let extras = vec![("motd".to_string(), Extra::text("benchmark world"))];
    let (world, _) = Exporter::new(&settings)
        .export(
            &square_selection(chunks),
            Dimension::Overworld,
            &terrain_block,
            extras,
        )
        .unwrap();
    world
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    group.measurement_time(std::time::Duration::from_secs(5));

    for chunks in [1, 4, 8].iter() {
        let world = build_world(*chunks);
        group.throughput(Throughput::Elements(world.block_count() as u64));

        for level in [1u32, 6, 9].iter() {
            group.bench_with_input(
                BenchmarkId::new(format!("level_{}", level), chunks * chunks),
                &world,
                |b, world| {
                    b.iter(|| black_box(world.encode(Compression::new(*level)).unwrap()));
                },
            );
        }
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    group.measurement_time(std::time::Duration::from_secs(5));

    for chunks in [1, 4, 8].iter() {
        let world = build_world(*chunks);
        let bytes = world.encode(Compression::default()).unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));

        group.bench_with_input(
            BenchmarkId::new("chunks", chunks * chunks),
            &bytes,
            |b, bytes| {
                b.iter(|| black_box(DanWorld::decode(bytes).unwrap()));
            },
        );
    }

    group.finish();
}

fn bench_histogram(c: &mut Criterion) {
    let world = build_world(4);
    c.bench_function("material_histogram_16_chunks", |b| {
        b.iter(|| black_box(world.material_histogram()));
    });
}

criterion_group! {
    name = benches;
    config = criterion_config();
    targets = bench_encode, bench_decode, bench_histogram
}
criterion_main!(benches);
