//! Unitary composition over moments and circuits.

use num_complex::Complex64;

use qmoment_compile::unitary::{dagger, identity, is_unitary, kron};
use qmoment_compile::{
    allclose_up_to_global_phase, circuit_unitary, circuit_unitary_with_order, moment_unitary,
};
use qmoment_ir::matrix;
use qmoment_ir::{Bindings, Circuit, InsertStrategy, IrError, Moment, Operation, Qubit, StandardGate};

fn close(a: &qmoment_ir::Matrix, b: &qmoment_ir::Matrix) -> bool {
    a.dim() == b.dim() && a.iter().zip(b.iter()).all(|(x, y)| (x - y).norm() < 1e-9)
}

#[test]
fn test_x_then_swap_is_product_of_moments() {
    let [a, b] = [Qubit::line(0), Qubit::line(1)];
    let mut circuit = Circuit::new();
    circuit
        .append(
            [
                StandardGate::x().on([a]).unwrap(),
                StandardGate::swap().on([a, b]).unwrap(),
            ],
            InsertStrategy::Earliest,
        )
        .unwrap();
    assert_eq!(circuit.len(), 2);

    let empty = Bindings::new();
    let order = [a, b];
    let m0 = moment_unitary(&circuit.moments()[0], &order, &empty).unwrap();
    let m1 = moment_unitary(&circuit.moments()[1], &order, &empty).unwrap();
    let u = circuit_unitary(&circuit, &empty).unwrap();

    assert!(close(&u, &m1.dot(&m0)));
    assert!(close(&u, &matrix::swap().dot(&kron(&matrix::pauli_x(), &identity(2)))));
    // |00> ends in |01>.
    assert!((u[[1, 0]] - Complex64::new(1.0, 0.0)).norm() < 1e-12);
}

#[test]
fn test_moment_is_tensor_product() {
    let [a, b, c] = [Qubit::line(0), Qubit::line(1), Qubit::line(2)];
    let moment = Moment::from_operations([
        StandardGate::h().on([a]).unwrap(),
        StandardGate::z().on([c]).unwrap(),
    ])
    .unwrap();
    let u = moment_unitary(&moment, &[a, b, c], &Bindings::new()).unwrap();
    let expected = kron(&kron(&matrix::hadamard(), &identity(2)), &matrix::pauli_z());
    assert!(close(&u, &expected));
}

#[test]
fn test_explicit_order_reverses_axes() {
    let [a, b] = [Qubit::line(0), Qubit::line(1)];
    let circuit = Circuit::from_operations([StandardGate::cx().on([a, b]).unwrap()]).unwrap();
    let empty = Bindings::new();
    let forward = circuit_unitary_with_order(&circuit, &[a, b], &empty).unwrap();
    let backward = circuit_unitary_with_order(&circuit, &[b, a], &empty).unwrap();
    assert!(close(&forward, &StandardGate::cx().matrix().unwrap()));
    assert!(close(&backward, &matrix::swap().dot(&forward).dot(&matrix::swap())));
}

#[test]
fn test_order_may_include_idle_qubits() {
    let a = Qubit::line(0);
    let idle = Qubit::line(5);
    let circuit = Circuit::from_operations([StandardGate::x().on([a]).unwrap()]).unwrap();
    let u = circuit_unitary_with_order(&circuit, &[a, idle], &Bindings::new()).unwrap();
    assert!(close(&u, &kron(&matrix::pauli_x(), &identity(2))));
}

#[test]
fn test_missing_qubit_in_order() {
    let [a, b] = [Qubit::line(0), Qubit::line(1)];
    let circuit = Circuit::from_operations([StandardGate::cz().on([a, b]).unwrap()]).unwrap();
    let err = circuit_unitary_with_order(&circuit, &[a], &Bindings::new()).unwrap_err();
    assert_eq!(err, IrError::UnknownQubit(b));
}

#[test]
fn test_measurement_is_not_unitary() {
    let mut circuit = Circuit::new();
    circuit.h(Qubit::line(0)).unwrap();
    circuit.measure([Qubit::line(0)], "m").unwrap();
    let err = circuit_unitary(&circuit, &Bindings::new()).unwrap_err();
    assert!(matches!(err, IrError::NonUnitary { .. }));
}

#[test]
fn test_symbolic_circuit_needs_bindings() {
    let q = Qubit::line(0);
    let circuit = Circuit::from_operations([StandardGate::x_pow("t").on([q]).unwrap()]).unwrap();
    assert_eq!(
        circuit_unitary(&circuit, &Bindings::new()).unwrap_err(),
        IrError::UnresolvedParameter("t".into())
    );
    let u = circuit_unitary(&circuit, &Bindings::new().with("t", 1.0)).unwrap();
    assert!(close(&u, &matrix::pauli_x()));
}

#[test]
fn test_quarter_powers_compose_to_half() {
    let q = Qubit::line(0);
    let families = [
        StandardGate::x_pow(0.25),
        StandardGate::y_pow(0.25),
        StandardGate::z_pow(0.25),
        StandardGate::h_pow(0.25),
    ];
    for quarter in families {
        let half = quarter.pow(&2.0.into()).unwrap();
        let twice = Circuit::from_operations([
            quarter.on([q]).unwrap(),
            quarter.on([q]).unwrap(),
        ])
        .unwrap();
        let once = Circuit::from_operations([half.on([q]).unwrap()]).unwrap();
        let empty = Bindings::new();
        assert!(allclose_up_to_global_phase(
            &circuit_unitary(&twice, &empty).unwrap(),
            &circuit_unitary(&once, &empty).unwrap(),
            1e-9
        ));
    }
}

#[test]
fn test_circuit_and_inverse_give_identity() {
    let [a, b] = [Qubit::line(0), Qubit::line(1)];
    let circuit = Circuit::from_operations([
        StandardGate::h().on([a]).unwrap(),
        StandardGate::ISwap(0.5.into()).on([a, b]).unwrap(),
        StandardGate::Ry(0.3.into()).on([b]).unwrap(),
    ])
    .unwrap();
    let u = circuit_unitary(&circuit, &Bindings::new()).unwrap();
    assert!(is_unitary(&u, 1e-9));
    assert!(close(&u.dot(&dagger(&u)), &identity(4)));

    let ops: Vec<Operation> = circuit.all_operations().cloned().collect();
    let inverse: Vec<Operation> = ops.iter().rev().map(|op| op.pow(-1.0).unwrap()).collect();
    let round_trip = Circuit::from_operations(ops.into_iter().chain(inverse)).unwrap();
    assert!(allclose_up_to_global_phase(
        &circuit_unitary(&round_trip, &Bindings::new()).unwrap(),
        &identity(4),
        1e-9
    ));
}
