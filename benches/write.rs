//! Write-path benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use termgrid::{Emulator, Scanner};

fn bench_scan_plain_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("scanner");

    let plain_text = "Hello, World! ".repeat(1000);
    group.throughput(Throughput::Bytes(plain_text.len() as u64));

    group.bench_function("plain_text", |b| {
        b.iter(|| {
            let mut scanner = Scanner::new();
            let tokens = scanner.scan(black_box(plain_text.as_bytes()));
            black_box(tokens)
        })
    });

    group.finish();
}

fn bench_scan_csi_sequences(c: &mut Criterion) {
    let mut group = c.benchmark_group("scanner");

    let csi_heavy = "\x1b[1;31mRed\x1b[0m \x1b[5;10H\x1b[2J".repeat(100);
    group.throughput(Throughput::Bytes(csi_heavy.len() as u64));

    group.bench_function("csi_sequences", |b| {
        b.iter(|| {
            let mut scanner = Scanner::new();
            let tokens = scanner.scan(black_box(csi_heavy.as_bytes()));
            black_box(tokens)
        })
    });

    group.finish();
}

fn bench_emulator_mixed(c: &mut Criterion) {
    let mut group = c.benchmark_group("emulator");

    // Typical terminal output
    let mixed = "Line 1: \x1b[32mOK\x1b[0m\r\nLine 2: \x1b[31mERROR\x1b[0m\r\n".repeat(500);
    group.throughput(Throughput::Bytes(mixed.len() as u64));

    group.bench_function("mixed_content", |b| {
        b.iter(|| {
            let emulator = Emulator::with_defaults();
            emulator.write(black_box(mixed.as_bytes()));
            black_box(emulator.line_count())
        })
    });

    group.finish();
}

fn bench_emulator_scrolling(c: &mut Criterion) {
    let mut group = c.benchmark_group("emulator");

    // Long output that keeps the auto-scroll heuristic busy
    let scrolling: String = (0..2000).map(|i| format!("log line {}\n", i)).collect();
    group.throughput(Throughput::Bytes(scrolling.len() as u64));

    group.bench_function("scrolling_output", |b| {
        b.iter(|| {
            let emulator = Emulator::with_defaults();
            emulator.write(black_box(scrolling.as_bytes()));
            black_box(emulator.scroll_offset())
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_scan_plain_text,
    bench_scan_csi_sequences,
    bench_emulator_mixed,
    bench_emulator_scrolling
);

criterion_main!(benches);
