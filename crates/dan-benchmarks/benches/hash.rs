//! Checksum performance for written world files
//!
//! `danworld inspect` reports a blake3 checksum of the file; this measures
//! hashing single files and a directory of exports in parallel.

use camino::Utf8PathBuf;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dan_benchmarks::{criterion_config, square_selection, terrain_block};
use dan_config::Settings;
use dan_core::types::Dimension;
use dan_core::utils::{blake3_hash, blake3_hash_file};
use dan_export::Exporter;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_worlds(count: usize, chunks: i32) -> (TempDir, Vec<PathBuf>) {
    let temp_dir = TempDir::new().unwrap();
    let exporter = Exporter::new(&Settings::default());
    let selection = square_selection(chunks);

    let paths = (0..count)
        .map(|i| {
            let path = Utf8PathBuf::try_from(temp_dir.path().join(format!("world_{}.dan", i)))
                .unwrap();
            exporter
                .export_to_file(&path, &selection, Dimension::Overworld, &terrain_block, Vec::new())
                .unwrap();
            path.into_std_path_buf()
        })
        .collect();

    (temp_dir, paths)
}

fn bench_file_hashing(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_file_hashing");

    for chunks in [1, 4, 8].iter() {
        let (_temp_dir, paths) = write_worlds(1, *chunks);
        let size = std::fs::metadata(&paths[0]).unwrap().len();
        group.throughput(Throughput::Bytes(size));

        group.bench_with_input(BenchmarkId::new("chunks", chunks * chunks), &paths[0], |b, path| {
            b.iter(|| black_box(blake3_hash_file(path).unwrap()));
        });
    }

    group.finish();
}

fn bench_memory_hashing(c: &mut Criterion) {
    let mut group = c.benchmark_group("memory_hashing");

    for size in [1024usize, 64 * 1024, 1024 * 1024].iter() {
        let data = vec![0x44u8; *size];
        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::new("bytes", size), &data, |b, data| {
            b.iter(|| black_box(blake3_hash(data)));
        });
    }

    group.finish();
}

fn bench_parallel_directory_hashing(c: &mut Criterion) {
    use rayon::prelude::*;

    let mut group = c.benchmark_group("export_directory_hashing");
    group.sample_size(20);

    let (_temp_dir, paths) = write_worlds(16, 2);

    group.bench_function("sequential", |b| {
        b.iter(|| {
            let hashes: Vec<String> = paths.iter().map(|p| blake3_hash_file(p).unwrap()).collect();
            black_box(hashes)
        });
    });

    group.bench_function("parallel", |b| {
        b.iter(|| {
            let hashes: Vec<String> = paths
                .par_iter()
                .map(|p| blake3_hash_file(p).unwrap())
                .collect();
            black_box(hashes)
        });
    });

    group.finish();
}

criterion_group! {
    name = benches;
    config = criterion_config();
    targets = bench_file_hashing, bench_memory_hashing, bench_parallel_directory_hashing
}
criterion_main!(benches);
