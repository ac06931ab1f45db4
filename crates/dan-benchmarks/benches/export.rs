//! Export performance
//!
//! Compares sequential and parallel chunk building and measures the cost
//! of loading a JSON block dump.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dan_benchmarks::{
    block_dump_json, criterion_config, scattered_source, square_selection, terrain_block,
};
use dan_config::Settings;
use dan_core::types::Dimension;
use dan_export::{Exporter, SparseSource};

fn exporter(parallel: bool) -> Exporter {
    let mut settings = Settings::default();
    settings.export.parallel = parallel;
    Exporter::new(&settings)
}

fn bench_sequential_vs_parallel(c: &mut Criterion) {
    let mut group = c.benchmark_group("export_terrain");
    group.measurement_time(std::time::Duration::from_secs(8));

    for chunks in [2, 4, 8].iter() {
        let selection = square_selection(*chunks);
        let (w, h, d) = selection.block_extent();
        group.throughput(Throughput::Elements(w as u64 * h as u64 * d as u64));

        for parallel in [false, true] {
            let label = if parallel { "parallel" } else { "sequential" };
            let exporter = exporter(parallel);
            group.bench_with_input(
                BenchmarkId::new(label, chunks * chunks),
                &selection,
                |b, selection| {
                    b.iter(|| {
                        black_box(
                            exporter
                                .export(selection, Dimension::Overworld, &terrain_block, Vec::new())
                                .unwrap(),
                        )
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_sparse_source(c: &mut Criterion) {
    let mut group = c.benchmark_group("export_sparse");
    let selection = square_selection(4);
    let exporter = exporter(true);

    for count in [100, 1_000, 10_000].iter() {
        let source = scattered_source(&selection, *count);
        group.bench_with_input(BenchmarkId::new("blocks", count), &source, |b, source| {
            b.iter(|| {
                black_box(
                    exporter
                        .export(&selection, Dimension::Overworld, source, Vec::new())
                        .unwrap(),
                )
            });
        });
    }

    group.finish();
}

fn bench_dump_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("block_dump_parsing");

    for count in [1_000, 10_000, 50_000].iter() {
        let json = block_dump_json(*count);
        group.throughput(Throughput::Bytes(json.len() as u64));
        group.bench_with_input(BenchmarkId::new("blocks", count), &json, |b, json| {
            b.iter(|| black_box(SparseSource::from_json(json).unwrap()));
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = criterion_config();
    targets = bench_sequential_vs_parallel, bench_sparse_source, bench_dump_parsing
}
criterion_main!(benches);
