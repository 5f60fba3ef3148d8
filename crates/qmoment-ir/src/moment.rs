//! Moments: sets of operations that act on disjoint qubits.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::operation::Operation;
use crate::qubit::Qubit;

/// One time slice of a circuit.
///
/// No two operations in a moment share a qubit. Operations keep their
/// insertion order so iteration is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MomentRepr")]
pub struct Moment {
    operations: Vec<Operation>,
}

#[derive(Deserialize)]
struct MomentRepr {
    operations: Vec<Operation>,
}

impl TryFrom<MomentRepr> for Moment {
    type Error = IrError;

    fn try_from(repr: MomentRepr) -> IrResult<Self> {
        Self::from_operations(repr.operations)
    }
}

impl Moment {
    /// Create an empty moment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a moment, rejecting operations that share qubits.
    pub fn from_operations(ops: impl IntoIterator<Item = Operation>) -> IrResult<Self> {
        let mut moment = Self::new();
        for op in ops {
            moment.add(op)?;
        }
        Ok(moment)
    }

    /// Add an operation.
    ///
    /// Fails with [`IrError::QubitConflict`] if the moment already acts on
    /// one of its qubits; the moment is unchanged in that case.
    pub fn add(&mut self, op: Operation) -> IrResult<()> {
        for q in op.qubits() {
            if let Some(existing) = self.operation_at(q) {
                return Err(IrError::QubitConflict {
                    qubit: *q,
                    existing: existing.to_string(),
                });
            }
        }
        self.operations.push(op);
        Ok(())
    }

    /// Add an operation, builder style.
    pub fn with_operation(mut self, op: Operation) -> IrResult<Self> {
        self.add(op)?;
        Ok(self)
    }

    /// The operations, in insertion order.
    #[inline]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Consume the moment, returning its operations.
    pub fn into_operations(self) -> Vec<Operation> {
        self.operations
    }

    /// The operation acting on `qubit`, if any.
    pub fn operation_at(&self, qubit: &Qubit) -> Option<&Operation> {
        self.operations.iter().find(|op| op.touches(qubit))
    }

    /// Whether any operation acts on one of `qubits`.
    pub fn operates_on(&self, qubits: &[Qubit]) -> bool {
        qubits.iter().any(|q| self.operation_at(q).is_some())
    }

    /// All qubits acted on, in operation order.
    pub fn qubits(&self) -> impl Iterator<Item = &Qubit> {
        self.operations.iter().flat_map(|op| op.qubits())
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Whether the moment is empty.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl fmt::Display for Moment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, op) in self.operations.iter().enumerate() {
            if i > 0 {
                write!(f, " and ")?;
            }
            write!(f, "{op}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::StandardGate;

    #[test]
    fn test_disjoint_operations() {
        let [a, b] = [Qubit::line(0), Qubit::line(1)];
        let moment = Moment::from_operations([
            StandardGate::x().on([a]).unwrap(),
            StandardGate::y().on([b]).unwrap(),
        ])
        .unwrap();
        assert_eq!(moment.len(), 2);
        assert!(moment.operates_on(&[b]));
        assert_eq!(moment.to_string(), "X(q0) and Y(q1)");
    }

    #[test]
    fn test_conflict_rejected_and_moment_unchanged() {
        let [a, b] = [Qubit::line(0), Qubit::line(1)];
        let mut moment = Moment::new();
        moment.add(StandardGate::cz().on([a, b]).unwrap()).unwrap();

        let err = moment.add(StandardGate::h().on([b]).unwrap()).unwrap_err();
        assert_eq!(
            err,
            IrError::QubitConflict {
                qubit: b,
                existing: "CZ(q0, q1)".into()
            }
        );
        assert_eq!(moment.len(), 1);
    }

    #[test]
    fn test_deserialize_rejects_shared_qubit() {
        let [a, b] = [Qubit::line(0), Qubit::line(1)];
        let moment = Moment::from_operations([
            StandardGate::x().on([a]).unwrap(),
            StandardGate::y().on([b]).unwrap(),
        ])
        .unwrap();
        let mut json = serde_json::to_value(&moment).unwrap();
        assert_eq!(serde_json::from_value::<Moment>(json.clone()).unwrap(), moment);

        let first = json["operations"][0].clone();
        json["operations"][1] = first;
        assert!(serde_json::from_value::<Moment>(json).is_err());
    }
}
