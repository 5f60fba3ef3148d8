//! Rabi oscillation: `X^t` followed by a measurement.

use qmoment_ir::{Circuit, InsertStrategy, IrResult, Qubit, StandardGate};
use std::f64::consts::PI;

/// `X^t` on `qubit`, then measure it under `key`.
pub fn rabi_circuit(qubit: Qubit, exponent: &str, key: &str) -> IrResult<Circuit> {
    let mut circuit = Circuit::new();
    circuit.append(
        [StandardGate::x_pow(exponent).on([qubit])?],
        InsertStrategy::Earliest,
    )?;
    circuit.measure([qubit], key)?;
    Ok(circuit)
}

/// Probability of reading 1 after `X^t`: `sin²(πt/2)`.
pub fn expected_excitation(t: f64) -> f64 {
    (PI * t / 2.0).sin().powi(2)
}
