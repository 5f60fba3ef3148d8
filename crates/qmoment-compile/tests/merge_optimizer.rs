//! Single-qubit merging preserves the circuit unitary up to global phase.

use proptest::prelude::*;

use qmoment_compile::{
    GateSet, MergeSingleQubitGates, OneQubitBasis, PassManagerBuilder, allclose_up_to_global_phase,
    circuit_unitary,
};
use qmoment_ir::{Bindings, Circuit, Operation, Qubit, StandardGate};

fn assert_equivalent(a: &Circuit, b: &Circuit) {
    let empty = Bindings::new();
    let ua = circuit_unitary(a, &empty).unwrap();
    let ub = circuit_unitary(b, &empty).unwrap();
    assert!(allclose_up_to_global_phase(&ua, &ub, 1e-9));
}

#[test]
fn test_quarter_turns_merge() {
    let q = Qubit::line(0);
    let circuit = Circuit::from_operations([
        StandardGate::x_pow(0.25).on([q]).unwrap(),
        StandardGate::y_pow(0.25).on([q]).unwrap(),
        StandardGate::z_pow(0.25).on([q]).unwrap(),
    ])
    .unwrap();
    assert_eq!(circuit.len(), 3);

    for basis in [OneQubitBasis::U3, OneQubitBasis::ZYZ] {
        let merged = MergeSingleQubitGates::with_basis(basis)
            .optimize(&circuit)
            .unwrap();
        match basis {
            OneQubitBasis::U3 => assert_eq!(merged.num_operations(), 1),
            OneQubitBasis::ZYZ => assert!(merged.num_operations() <= 3),
        }
        assert_equivalent(&circuit, &merged);
    }
}

#[test]
fn test_optimize_in_place_keeps_device() {
    use qmoment_compile::DeviceGraph;
    use std::sync::Arc;

    let device = Arc::new(DeviceGraph::line(2, GateSet::cz_rotations()));
    let mut circuit = Circuit::with_device(device);
    circuit.x(Qubit::line(0)).unwrap();
    circuit.x(Qubit::line(0)).unwrap();
    circuit.cz(Qubit::line(0), Qubit::line(1)).unwrap();

    MergeSingleQubitGates::new()
        .optimize_in_place(&mut circuit)
        .unwrap();
    assert_eq!(circuit.num_operations(), 1);
    assert_eq!(circuit.device().map(|d| d.name()), Some("line-2"));
}

#[test]
fn test_pipeline_decompose_then_merge() {
    let [a, b, c] = [Qubit::line(0), Qubit::line(1), Qubit::line(2)];
    let mut circuit = Circuit::new();
    circuit
        .append(
            [
                StandardGate::h().on([a]).unwrap(),
                StandardGate::ccx().on([a, b, c]).unwrap(),
                StandardGate::swap().on([b, c]).unwrap(),
            ],
            Default::default(),
        )
        .unwrap();
    let original = circuit.clone();

    let (pm, mut props) = PassManagerBuilder::new()
        .with_optimization_level(1)
        .with_target(GateSet::cz_rotations())
        .build();
    pm.run(&mut circuit, &mut props).unwrap();

    let target = GateSet::cz_rotations();
    assert!(circuit.all_operations().all(|op| target.contains(op.gate())));
    assert_equivalent(&original, &circuit);
}

fn arb_operation(num_qubits: u32) -> impl Strategy<Value = Operation> {
    let single = (0..num_qubits, 0_usize..7, -2.0_f64..2.0).prop_map(|(q, kind, t)| {
        let gate = match kind {
            0 => StandardGate::x_pow(t),
            1 => StandardGate::y_pow(t),
            2 => StandardGate::z_pow(t),
            3 => StandardGate::h(),
            4 => StandardGate::Rx(t.into()),
            5 => StandardGate::U(t.into(), (t * 0.7).into(), (-t).into()),
            _ => StandardGate::t(),
        };
        gate.on([Qubit::line(q)]).unwrap()
    });
    let pair = (0..num_qubits, 0..num_qubits)
        .prop_filter("Qubits must differ", |(a, b)| a != b)
        .prop_map(|(a, b)| StandardGate::cx().on([Qubit::line(a), Qubit::line(b)]).unwrap());

    prop_oneof![4 => single, 1 => pair]
}

fn arb_circuit() -> impl Strategy<Value = Circuit> {
    (1_u32..=3)
        .prop_flat_map(|n| prop::collection::vec(arb_operation(n), 1..=20))
        .prop_map(|ops| Circuit::from_operations(ops).unwrap())
}

proptest! {
    /// Merging never changes the unitary beyond a global phase.
    #[test]
    fn test_merge_preserves_unitary(circuit in arb_circuit(), zyz in any::<bool>()) {
        let basis = if zyz { OneQubitBasis::ZYZ } else { OneQubitBasis::U3 };
        let merged = MergeSingleQubitGates::with_basis(basis).optimize(&circuit).unwrap();

        let empty = Bindings::new();
        let before = circuit_unitary(&circuit, &empty).unwrap();
        // Qubits whose gates all cancel drop out of the merged circuit.
        let order: Vec<Qubit> = circuit.all_qubits().into_iter().collect();
        let after = qmoment_compile::circuit_unitary_with_order(&merged, &order, &empty).unwrap();
        prop_assert!(allclose_up_to_global_phase(&before, &after, 1e-8));
        prop_assert!(merged.num_operations() <= circuit.num_operations() * 3);
    }

    /// Two-qubit gates are never merged away or reordered.
    #[test]
    fn test_merge_keeps_entanglers(circuit in arb_circuit()) {
        let merged = MergeSingleQubitGates::new().optimize(&circuit).unwrap();
        let pairs = |c: &Circuit| -> Vec<String> {
            c.all_operations().filter(|o| o.num_qubits() == 2).map(ToString::to_string).collect()
        };
        prop_assert_eq!(pairs(&circuit), pairs(&merged));
    }
}

#[test]
fn test_merge_on_xy_device_keeps_native_gates() {
    use qmoment_compile::DeviceGraph;
    use qmoment_ir::Device;
    use std::sync::Arc;

    let device = Arc::new(DeviceGraph::line(1, GateSet::xy()));
    let q = Qubit::line(0);
    let mut circuit = Circuit::with_device(device);
    circuit
        .push(StandardGate::x_pow(0.5).on([q]).unwrap())
        .unwrap()
        .push(StandardGate::y_pow(0.5).on([q]).unwrap())
        .unwrap();

    let merged = MergeSingleQubitGates::new().optimize(&circuit).unwrap();
    assert!(merged.num_operations() <= circuit.num_operations());
    let bound = merged.device().unwrap();
    assert!(merged.all_operations().all(|op| bound.is_supported(op)));
    assert_equivalent(&circuit, &merged);
}

#[test]
fn test_merge_on_rotation_device_falls_back_to_zyz() {
    use qmoment_compile::DeviceGraph;
    use qmoment_ir::Device;
    use std::sync::Arc;

    let native = GateSet::cz_rotations().without("u");
    let device = Arc::new(DeviceGraph::line(1, native));
    let q = Qubit::line(0);
    let mut circuit = Circuit::with_device(device);
    for _ in 0..4 {
        circuit.push(StandardGate::x_pow(0.3).on([q]).unwrap()).unwrap();
    }

    let merged = MergeSingleQubitGates::new().optimize(&circuit).unwrap();
    assert!(merged.num_operations() <= 3);
    let bound = merged.device().unwrap();
    assert!(merged.all_operations().all(|op| bound.is_supported(op)));
    assert!(merged.all_operations().all(|op| op.name() != "u"));
    assert_equivalent(&circuit, &merged);
}
