//! Boundary scanning and end-to-end split benchmarks.
//!
//! Run with:
//! ```bash
//! cargo bench --bench scan
//! ```

#![allow(clippy::expect_used)]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use pgnsplit::{BoundaryScanner, RunConfig, split};
use std::hint::black_box;
use std::io::Write;
use tempfile::NamedTempFile;

/// Write a synthetic archive of `games` games
fn create_archive(games: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temporary benchmark archive");
    for i in 0..games {
        write!(
            file,
            "[Event \"Bench {i}\"]\n[Site \"?\"]\n[Result \"*\"]\n\n\
             1. e4 e5 2. Nf3 Nc6 3. Bb5 {{ Ruy Lopez }} a6 4. Ba4 Nf6 5. O-O Be7\n\
             6. Re1 b5 7. Bb3 d6 8. c3 O-O 9. h3 Nb8 10. d4 Nbd7 *\n\n"
        )
        .expect("Failed to write benchmark game");
    }
    file.flush().expect("Failed to flush benchmark archive");
    file
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");

    for games in [100, 1_000, 10_000] {
        let archive = create_archive(games);
        let len = archive
            .as_file()
            .metadata()
            .expect("Failed to stat benchmark archive")
            .len();
        group.throughput(Throughput::Bytes(len));

        group.bench_with_input(BenchmarkId::new("boundaries", games), &archive, |b, file| {
            b.iter(|| {
                let scanner =
                    BoundaryScanner::open(file.path()).expect("Failed to open benchmark archive");
                black_box(scanner.filter_map(Result::ok).count())
            });
        });
    }

    group.finish();
}

fn bench_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("split");
    let archive = create_archive(1_000);

    for chunk in [1, 100] {
        group.bench_with_input(BenchmarkId::new("dry_run", chunk), &chunk, |b, &chunk| {
            let output = tempfile::tempdir().expect("Failed to create benchmark output folder");
            let config = RunConfig::default()
                .with_chunk_size(chunk)
                .with_dry_run(true);
            b.iter(|| {
                black_box(
                    split(archive.path(), output.path(), config.clone())
                        .expect("Benchmark split failed"),
                )
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_scan, bench_split);
criterion_main!(benches);
