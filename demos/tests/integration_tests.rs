//! Integration tests for the demo suite.
//!
//! These run the demo circuits end to end through the compiler and the
//! simulator with fixed seeds.

use std::sync::Arc;

use qmoment_compile::{DeviceGraph, GateSet, PassManagerBuilder, circuit_unitary};
use qmoment_demos::circuits::{Secret, deutsch_circuit, expected_excitation, rabi_circuit};
use qmoment_demos::format_matrix;
use qmoment_ir::{Bindings, Circuit, Device, Qubit};
use qmoment_sim::{Simulator, SimulatorConfig, Sweep};

fn simulator() -> Simulator {
    Simulator::new(SimulatorConfig::default().with_seed(2026))
}

/// Every secret is classified by a single run.
#[test]
fn test_deutsch_all_secrets() {
    for (f0, f1) in [(false, false), (false, true), (true, false), (true, true)] {
        let secret = Secret::new(f0, f1);
        let circuit = deutsch_circuit(secret).unwrap();
        let result = simulator().run(&circuit, 20).unwrap();
        let histogram = result.histogram("result").unwrap();
        let expected = u64::from(secret.parity());
        assert_eq!(histogram.get(expected), 20, "secret {secret}");
    }
}

/// The Deutsch circuit survives compilation to CZ and rotations.
#[test]
fn test_deutsch_compiled() {
    let secret = Secret::new(false, true);
    let mut circuit = deutsch_circuit(secret).unwrap();
    let (pm, mut props) = PassManagerBuilder::new()
        .with_target(GateSet::cz_rotations())
        .build();
    pm.run(&mut circuit, &mut props).unwrap();

    let target = GateSet::cz_rotations();
    assert!(circuit.all_operations().all(|op| target.contains(op.gate())));
    let result = simulator().run(&circuit, 20).unwrap();
    assert_eq!(result.histogram("result").unwrap().get(1), 20);
}

/// The Deutsch circuit runs on a two-qubit line device.
#[test]
fn test_deutsch_on_device() {
    let device = Arc::new(DeviceGraph::line(2, GateSet::cz_rotations()));
    let source = deutsch_circuit(Secret::new(true, false)).unwrap();
    let mut circuit = Circuit::with_device(device.clone());
    for op in source.all_operations() {
        circuit.push(op.clone()).unwrap();
    }
    assert!(circuit.all_operations().all(|op| device.is_supported(op)));
    let result = simulator().run(&circuit, 10).unwrap();
    assert_eq!(result.histogram("result").unwrap().get(1), 10);
}

/// Sweep results track `sin²(πt/2)`.
#[test]
fn test_rabi_sweep() {
    let circuit = rabi_circuit(Qubit::line(0), "t", "m").unwrap();
    let sweep = Sweep::linspace("t", 0.0, 2.0, 21);
    let results = simulator().run_sweep(&circuit, &sweep, 1000).unwrap();
    for result in results {
        let t = result.params().get("t").unwrap();
        let observed = result.fraction_of_ones("m").unwrap();
        assert!((observed - expected_excitation(t)).abs() < 0.08, "t = {t}");
    }
}

/// Sweep results serialize for `--json` output.
#[test]
fn test_sweep_json() {
    let circuit = rabi_circuit(Qubit::line(0), "t", "m").unwrap();
    let results = simulator()
        .run_sweep(&circuit, &Sweep::points("t", [1.0]), 3)
        .unwrap();
    let json: serde_json::Value = serde_json::to_value(&results).unwrap();
    assert_eq!(json[0]["repetitions"], 3);
    assert_eq!(json[0]["measurements"]["m"][0][0], true);
}

#[test]
fn test_bell_unitary_rendering() {
    let [a, b] = [Qubit::line(0), Qubit::line(1)];
    let mut bell = Circuit::new();
    bell.h(a).unwrap().cx(a, b).unwrap();
    let u = circuit_unitary(&bell, &Bindings::new()).unwrap();
    let rendered = format_matrix(&u, 3);
    assert_eq!(rendered.lines().count(), 4);
    assert!(rendered.lines().all(|row| row.matches("0.707").count() == 2));
    assert!(rendered.contains("-0.707"));
}
