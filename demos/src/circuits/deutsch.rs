//! Deutsch's algorithm.
//!
//! A one-bit function `f` is given by its two outputs `(f(0), f(1))`. One
//! oracle query followed by a measurement of the input qubit reveals
//! `f(0) ⊕ f(1)`: 0 when `f` is constant, 1 when it is balanced.

use qmoment_ir::{Circuit, IrResult, Operation, Qubit, StandardGate};
use rand::Rng;
use std::fmt;

/// The hidden function, as its outputs on 0 and 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Secret {
    /// `f(0)`.
    pub f0: bool,
    /// `f(1)`.
    pub f1: bool,
}

impl Secret {
    /// Create a secret from its outputs.
    pub fn new(f0: bool, f1: bool) -> Self {
        Self { f0, f1 }
    }

    /// A uniformly random secret.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(rng.r#gen(), rng.r#gen())
    }

    /// `f(0) ⊕ f(1)`, the bit the algorithm measures.
    pub fn parity(&self) -> bool {
        self.f0 ^ self.f1
    }

    /// Whether `f` is balanced.
    pub fn is_balanced(&self) -> bool {
        self.parity()
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f(0)={}, f(1)={}", u8::from(self.f0), u8::from(self.f1))
    }
}

/// Operations computing `|x, y⟩ → |x, y ⊕ f(x)⟩`.
pub fn oracle(secret: Secret, input: Qubit, ancilla: Qubit) -> IrResult<Vec<Operation>> {
    let mut ops = Vec::new();
    if secret.f0 {
        ops.push(StandardGate::x().on([ancilla])?);
    }
    if secret.parity() {
        ops.push(StandardGate::cx().on([input, ancilla])?);
    }
    Ok(ops)
}

/// Deutsch's circuit for `secret`, measuring the input under `"result"`.
pub fn deutsch_circuit(secret: Secret) -> IrResult<Circuit> {
    let [input, ancilla] = [Qubit::line(0), Qubit::line(1)];
    let mut circuit = Circuit::new();
    circuit.x(ancilla)?;
    circuit.h(input)?.h(ancilla)?;
    for op in oracle(secret, input, ancilla)? {
        circuit.push(op)?;
    }
    circuit.h(input)?;
    circuit.measure([input], "result")?;
    Ok(circuit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oracle_shapes() {
        let [a, b] = [Qubit::line(0), Qubit::line(1)];
        assert!(oracle(Secret::new(false, false), a, b).unwrap().is_empty());
        let names: Vec<String> = oracle(Secret::new(true, false), a, b)
            .unwrap()
            .iter()
            .map(|op| op.name().to_string())
            .collect();
        assert_eq!(names, vec!["x", "cx"]);
    }

    #[test]
    fn test_circuit_measures_last() {
        let circuit = deutsch_circuit(Secret::new(true, true)).unwrap();
        assert!(circuit.are_all_measurements_terminal());
        assert_eq!(circuit.measurement_keys(), vec!["result"]);
    }
}
