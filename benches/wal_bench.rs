//! Benchmarks for pagewal append and replay

use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use pagewal::{WalConfig, WalReader, WalWriter};
use tempfile::TempDir;

const RECORDS: usize = 1000;
const PAYLOAD: &[u8] = &[0x5A; 100];

fn config(sync: bool) -> WalConfig {
    WalConfig::builder()
        .page_size(32 * 1024)
        .max_record_size(1024)
        .sync_on_flush(sync)
        .build()
}

fn append_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("append");
    group.throughput(Throughput::Elements(RECORDS as u64));

    for sync in [false, true] {
        let name = if sync { "sync" } else { "no_sync" };
        group.bench_function(name, |b| {
            b.iter_batched(
                || TempDir::new().unwrap(),
                |dir| {
                    let mut writer =
                        WalWriter::open(dir.path().join("bench.wal"), &config(sync)).unwrap();
                    for _ in 0..RECORDS {
                        writer.add_record(PAYLOAD).unwrap();
                    }
                    writer.close().unwrap();
                    dir
                },
                BatchSize::PerIteration,
            )
        });
    }

    group.finish();
}

fn replay_benchmarks(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bench.wal");
    let mut writer = WalWriter::open(&path, &config(false)).unwrap();
    for _ in 0..RECORDS {
        writer.add_record(PAYLOAD).unwrap();
    }
    writer.close().unwrap();

    let mut group = c.benchmark_group("replay");
    group.throughput(Throughput::Elements(RECORDS as u64));
    group.bench_function("records", |b| {
        b.iter(|| {
            let reader = WalReader::open(&path, &config(false)).unwrap();
            reader.records().map(|r| r.unwrap().len()).sum::<usize>()
        })
    });
    group.finish();
}

criterion_group!(benches, append_benchmarks, replay_benchmarks);
criterion_main!(benches);
