//! Operations: a gate applied to an ordered tuple of qubits.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::gate::{Gate, MeasurementGate};
use crate::matrix::Matrix;
use crate::parameter::{Bindings, ParameterExpression};
use crate::qubit::Qubit;

/// A gate applied to specific qubits.
///
/// The qubit tuple is ordered: for `CX` the first qubit is the control, and
/// in the operation's matrix the first qubit is the most significant bit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "OperationRepr")]
pub struct Operation {
    gate: Gate,
    qubits: Vec<Qubit>,
}

/// Unchecked wire form of [`Operation`].
#[derive(Deserialize)]
struct OperationRepr {
    gate: Gate,
    qubits: Vec<Qubit>,
}

impl TryFrom<OperationRepr> for Operation {
    type Error = IrError;

    fn try_from(repr: OperationRepr) -> IrResult<Self> {
        Self::new(repr.gate, repr.qubits)
    }
}

impl Operation {
    /// Create an operation, checking arity and qubit distinctness.
    pub fn new(gate: impl Into<Gate>, qubits: impl IntoIterator<Item = Qubit>) -> IrResult<Self> {
        let gate = gate.into();
        let qubits: Vec<Qubit> = qubits.into_iter().collect();

        if qubits.len() != gate.num_qubits() as usize {
            return Err(IrError::ArityMismatch {
                gate: gate.name().to_string(),
                expected: gate.num_qubits(),
                got: qubits.len(),
            });
        }
        for (i, q) in qubits.iter().enumerate() {
            if qubits[..i].contains(q) {
                return Err(IrError::DuplicateQubit {
                    qubit: *q,
                    gate: gate.name().to_string(),
                });
            }
        }

        Ok(Self { gate, qubits })
    }

    /// Measure `qubits` under `key`.
    pub fn measure(qubits: impl IntoIterator<Item = Qubit>, key: impl Into<String>) -> IrResult<Self> {
        let qubits: Vec<Qubit> = qubits.into_iter().collect();
        if qubits.is_empty() {
            return Err(IrError::ArityMismatch {
                gate: "measure".to_string(),
                expected: 1,
                got: 0,
            });
        }
        let arity = u32::try_from(qubits.len()).unwrap_or(u32::MAX);
        Self::new(MeasurementGate::new(key, arity), qubits)
    }

    /// The gate.
    #[inline]
    pub fn gate(&self) -> &Gate {
        &self.gate
    }

    /// The qubits, in operand order.
    #[inline]
    pub fn qubits(&self) -> &[Qubit] {
        &self.qubits
    }

    /// Number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Name of the gate.
    pub fn name(&self) -> &str {
        self.gate.name()
    }

    /// Whether this operation is a measurement.
    pub fn is_measurement(&self) -> bool {
        self.gate.is_measurement()
    }

    /// Result key, for measurements.
    pub fn measurement_key(&self) -> Option<&str> {
        self.gate.measurement_key()
    }

    /// Whether the gate has a symbolic parameter.
    pub fn is_parameterized(&self) -> bool {
        self.gate.is_parameterized()
    }

    /// Whether this operation acts on `qubit`.
    pub fn touches(&self, qubit: &Qubit) -> bool {
        self.qubits.contains(qubit)
    }

    /// Whether the two operations share a qubit.
    pub fn conflicts_with(&self, other: &Operation) -> bool {
        self.qubits.iter().any(|q| other.touches(q))
    }

    /// The same operation with every parameter resolved.
    pub fn with_bindings(&self, bindings: &Bindings) -> IrResult<Operation> {
        Ok(Self {
            gate: self.gate.resolve(bindings)?,
            qubits: self.qubits.clone(),
        })
    }

    /// The operation raised to `exponent`, on the same qubits.
    pub fn pow(&self, exponent: impl Into<ParameterExpression>) -> IrResult<Operation> {
        Ok(Self {
            gate: self.gate.pow(exponent)?,
            qubits: self.qubits.clone(),
        })
    }

    /// The gate's unitary, in this operation's qubit order.
    pub fn unitary(&self, bindings: &Bindings) -> IrResult<Matrix> {
        self.gate.unitary(bindings)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.gate)?;
        for (i, q) in self.qubits.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{q}")?;
        }
        write!(f, ")")
    }
}
