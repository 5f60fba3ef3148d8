//! Benchmarks for qmoment circuit construction
//!
//! Run with: cargo bench -p qmoment-ir

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qmoment_ir::{Bindings, Circuit, InsertStrategy, Operation, Qubit, StandardGate};

fn layered_ops(n: u32, layers: usize) -> Vec<Operation> {
    let qubits = Qubit::line_range(n);
    let mut ops = Vec::new();
    for layer in 0..layers {
        for q in &qubits {
            ops.push(StandardGate::h().on([*q]).unwrap());
        }
        for pair in qubits.chunks(2).filter(|p| p.len() == 2) {
            let (a, b) = if layer % 2 == 0 { (pair[0], pair[1]) } else { (pair[1], pair[0]) };
            ops.push(StandardGate::cz().on([a, b]).unwrap());
        }
    }
    ops
}

/// Benchmark appending gates with each insert strategy
fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("append");

    for num_qubits in &[4, 16, 64] {
        let ops = layered_ops(*num_qubits, 20);
        group.bench_with_input(BenchmarkId::new("earliest", num_qubits), &ops, |b, ops| {
            b.iter(|| {
                let mut circuit = Circuit::new();
                circuit
                    .append(black_box(ops.clone()), InsertStrategy::Earliest)
                    .unwrap();
                circuit
            });
        });
        group.bench_with_input(BenchmarkId::new("new_moment", num_qubits), &ops, |b, ops| {
            b.iter(|| {
                let mut circuit = Circuit::new();
                circuit
                    .append(black_box(ops.clone()), InsertStrategy::NewMoment)
                    .unwrap();
                circuit
            });
        });
    }

    group.finish();
}

/// Benchmark GHZ state circuit creation
fn bench_ghz_circuit(c: &mut Criterion) {
    let mut group = c.benchmark_group("ghz_circuit");

    for num_qubits in &[3, 10, 50, 100] {
        group.bench_with_input(
            BenchmarkId::new("create", num_qubits),
            num_qubits,
            |b, &n| {
                b.iter(|| {
                    let qubits = Qubit::line_range(n);
                    let mut circuit = Circuit::new();
                    circuit.h(qubits[0]).unwrap();
                    for pair in qubits.windows(2) {
                        circuit.cx(pair[0], pair[1]).unwrap();
                    }
                    circuit.measure(qubits.iter().copied(), "ghz").unwrap();
                    circuit
                });
            },
        );
    }

    group.finish();
}

/// Benchmark resolving a parameterized circuit
fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");

    for num_qubits in &[4, 16, 64] {
        let mut circuit = Circuit::new();
        for q in Qubit::line_range(*num_qubits) {
            for _ in 0..10 {
                circuit
                    .push(StandardGate::x_pow("t").on([q]).unwrap())
                    .unwrap();
            }
        }
        let bindings = Bindings::new().with("t", 0.25);
        group.bench_with_input(BenchmarkId::new("x_pow", num_qubits), &circuit, |b, circuit| {
            b.iter(|| circuit.resolve(black_box(&bindings)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_append, bench_ghz_circuit, bench_resolve);
criterion_main!(benches);
