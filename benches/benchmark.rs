//! Benchmarks for Enigma machine operations.
//!
//! Measures configuration parsing, single-symbol conversion, and message
//! throughput across different message lengths.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use enigma::config::{read_config, SetupLine};
use enigma::Machine;

/// Configuration used consistently across all benchmarks.
const BENCH_CONFIG: &str = include_str!("../tests/data/default.conf");

/// Setup line used consistently across all benchmarks.
const BENCH_SETUP: &str = "* B Beta III IV I AXLE (HQ) (EX) (IP) (TR) (BY)";

fn bench_machine() -> Machine {
    let mut machine = read_config(BENCH_CONFIG).unwrap();
    let setup = SetupLine::parse(BENCH_SETUP, machine.num_rotors()).unwrap();
    machine.apply_setup(&setup).unwrap();
    machine
}

/// Benchmarks `read_config()` on the twelve-rotor configuration.
fn bench_read_config(c: &mut Criterion) {
    c.bench_function("read_config", |b| {
        b.iter(|| read_config(black_box(BENCH_CONFIG)).unwrap());
    });
}

/// Benchmarks `convert_index()` for one symbol.
///
/// The machine is set up once and rotors advance naturally between
/// iterations, so stepping across notches is included.
fn bench_convert_symbol(c: &mut Criterion) {
    let mut machine = bench_machine();

    let mut group = c.benchmark_group("convert_symbol");
    group.throughput(Throughput::Elements(1));
    group.bench_function("5_slots", |b| {
        b.iter(|| machine.convert_index(black_box(7)).unwrap());
    });
    group.finish();
}

/// Benchmarks `convert()` throughput across message lengths.
fn bench_convert_message(c: &mut Criterion) {
    let lengths: &[usize] = &[16, 256, 4096];

    let mut group = c.benchmark_group("convert_message");
    for &len in lengths {
        let mut machine = bench_machine();
        let msg: String = "THEQUICKBROWNFOXJUMPSOVERTHELAZYDOG"
            .chars()
            .cycle()
            .take(len)
            .collect();

        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &msg, |b, msg| {
            b.iter(|| machine.convert(black_box(msg)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_read_config,
    bench_convert_symbol,
    bench_convert_message,
);
criterion_main!(benches);
