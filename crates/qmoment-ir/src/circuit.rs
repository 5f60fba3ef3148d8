//! Circuits: ordered sequences of moments.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::ops::RangeBounds;
use std::sync::Arc;

use crate::device::Device;
use crate::error::IrResult;
use crate::gate::StandardGate;
use crate::moment::Moment;
use crate::operation::Operation;
use crate::parameter::Bindings;
use crate::qubit::Qubit;

/// Where [`Circuit::append`] places each operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsertStrategy {
    /// Into the moment right after the last moment touching any of the
    /// operation's qubits, or moment 0 if none does. This may fill gaps left
    /// of the circuit's end; a new moment is pushed when the index equals
    /// the circuit length.
    #[default]
    Earliest,
    /// Into a fresh moment at the end of the circuit.
    NewMoment,
}

/// A quantum circuit.
///
/// A circuit is a list of [`Moment`]s, optionally bound to a [`Device`].
/// Moments are kept even when empty; [`Circuit::len`] counts them all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Circuit {
    moments: Vec<Moment>,
    #[serde(skip)]
    device: Option<Arc<dyn Device>>,
}

impl Circuit {
    /// Create an empty, unconstrained circuit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty circuit bound to `device`.
    pub fn with_device(device: Arc<dyn Device>) -> Self {
        Self {
            moments: Vec::new(),
            device: Some(device),
        }
    }

    /// Create a circuit from explicit moments.
    pub fn from_moments(moments: impl IntoIterator<Item = Moment>) -> Self {
        Self {
            moments: moments.into_iter().collect(),
            device: None,
        }
    }

    /// Create a circuit by appending `ops` with [`InsertStrategy::Earliest`].
    pub fn from_operations(ops: impl IntoIterator<Item = Operation>) -> IrResult<Self> {
        let mut circuit = Self::new();
        circuit.append(ops, InsertStrategy::Earliest)?;
        Ok(circuit)
    }

    /// The bound device, if any.
    pub fn device(&self) -> Option<&Arc<dyn Device>> {
        self.device.as_ref()
    }

    // =========================================================================
    // Construction
    // =========================================================================

    /// Append operations one at a time.
    ///
    /// Operations are processed in iteration order, and where each one lands
    /// depends only on the operations placed before it. With a device bound,
    /// an unsupported operation is first rewritten by
    /// [`Device::decompose_operation`] and the rewritten operations are placed
    /// instead. On error, operations already placed stay in the circuit.
    pub fn append(
        &mut self,
        ops: impl IntoIterator<Item = Operation>,
        strategy: InsertStrategy,
    ) -> IrResult<()> {
        for op in ops {
            for lowered in self.lower_for_device(op)? {
                self.place(lowered, strategy)?;
            }
        }
        Ok(())
    }

    /// Append `moment` as a single new moment.
    ///
    /// With a device bound and some operation unsupported, the bundle cannot
    /// be kept intact; its operations are rewritten and placed with
    /// [`InsertStrategy::Earliest`] instead.
    pub fn append_moment(&mut self, moment: Moment) -> IrResult<()> {
        let needs_rewrite = match &self.device {
            Some(device) => moment.operations().iter().any(|op| !device.is_supported(op)),
            None => false,
        };
        if needs_rewrite {
            self.append(moment.into_operations(), InsertStrategy::Earliest)
        } else {
            self.moments.push(moment);
            Ok(())
        }
    }

    /// Append a single operation with [`InsertStrategy::Earliest`].
    pub fn push(&mut self, op: Operation) -> IrResult<&mut Self> {
        self.append([op], InsertStrategy::Earliest)?;
        Ok(self)
    }

    fn lower_for_device(&self, op: Operation) -> IrResult<Vec<Operation>> {
        match &self.device {
            Some(device) if !device.is_supported(&op) => device.decompose_operation(&op),
            _ => Ok(vec![op]),
        }
    }

    fn place(&mut self, op: Operation, strategy: InsertStrategy) -> IrResult<()> {
        let index = match strategy {
            InsertStrategy::Earliest => self.earliest_index(op.qubits()),
            InsertStrategy::NewMoment => self.moments.len(),
        };
        if index == self.moments.len() {
            self.moments.push(Moment::new());
        }
        self.moments[index].add(op)
    }

    fn earliest_index(&self, qubits: &[Qubit]) -> usize {
        self.moments
            .iter()
            .rposition(|m| m.operates_on(qubits))
            .map_or(0, |i| i + 1)
    }

    /// Replace the moments in `range` with `moments`.
    ///
    /// # Panics
    ///
    /// Panics if `range` is out of bounds.
    pub fn replace_moments(
        &mut self,
        range: impl RangeBounds<usize>,
        moments: impl IntoIterator<Item = Moment>,
    ) {
        self.moments.splice(range, moments);
    }

    // =========================================================================
    // Gate shorthands
    // =========================================================================

    /// Apply Hadamard.
    pub fn h(&mut self, qubit: Qubit) -> IrResult<&mut Self> {
        self.push(StandardGate::h().on([qubit])?)
    }

    /// Apply Pauli-X.
    pub fn x(&mut self, qubit: Qubit) -> IrResult<&mut Self> {
        self.push(StandardGate::x().on([qubit])?)
    }

    /// Apply CNOT.
    pub fn cx(&mut self, control: Qubit, target: Qubit) -> IrResult<&mut Self> {
        self.push(StandardGate::cx().on([control, target])?)
    }

    /// Apply controlled-Z.
    pub fn cz(&mut self, a: Qubit, b: Qubit) -> IrResult<&mut Self> {
        self.push(StandardGate::cz().on([a, b])?)
    }

    /// Measure `qubits` under `key`.
    pub fn measure(
        &mut self,
        qubits: impl IntoIterator<Item = Qubit>,
        key: impl Into<String>,
    ) -> IrResult<&mut Self> {
        self.push(Operation::measure(qubits, key)?)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The moments.
    #[inline]
    pub fn moments(&self) -> &[Moment] {
        &self.moments
    }

    /// Number of moments, including empty ones.
    #[inline]
    pub fn len(&self) -> usize {
        self.moments.len()
    }

    /// Whether the circuit has no moments.
    pub fn is_empty(&self) -> bool {
        self.moments.is_empty()
    }

    /// Every qubit acted on, in qubit order.
    pub fn all_qubits(&self) -> BTreeSet<Qubit> {
        self.moments.iter().flat_map(Moment::qubits).copied().collect()
    }

    /// Every operation, moment by moment.
    pub fn all_operations(&self) -> impl Iterator<Item = &Operation> {
        self.moments.iter().flat_map(Moment::operations)
    }

    /// Total number of operations.
    pub fn num_operations(&self) -> usize {
        self.moments.iter().map(Moment::len).sum()
    }

    /// Measurement keys in order of first appearance.
    pub fn measurement_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for key in self.all_operations().filter_map(Operation::measurement_key) {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    /// Whether any operation is a measurement.
    pub fn has_measurements(&self) -> bool {
        self.all_operations().any(Operation::is_measurement)
    }

    /// Whether no operation follows a measurement on any measured qubit.
    pub fn are_all_measurements_terminal(&self) -> bool {
        let mut touched_later: FxHashSet<Qubit> = FxHashSet::default();
        for moment in self.moments.iter().rev() {
            let blocked = moment.operations().iter().any(|op| {
                op.is_measurement() && op.qubits().iter().any(|q| touched_later.contains(q))
            });
            if blocked {
                return false;
            }
            touched_later.extend(moment.qubits().copied());
        }
        true
    }

    /// Names of all symbolic parameters, sorted.
    pub fn parameter_names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        for op in self.all_operations() {
            for p in op.gate().parameters() {
                p.collect_symbols(&mut names);
            }
        }
        names
    }

    /// Whether any operation has a symbolic parameter.
    pub fn is_parameterized(&self) -> bool {
        self.all_operations().any(Operation::is_parameterized)
    }

    /// A copy with every parameter resolved against `bindings`.
    ///
    /// Moment structure and the device binding are preserved.
    pub fn resolve(&self, bindings: &Bindings) -> IrResult<Circuit> {
        let moments = self
            .moments
            .iter()
            .map(|m| {
                Moment::from_operations(
                    m.operations()
                        .iter()
                        .map(|op| op.with_bindings(bindings))
                        .collect::<IrResult<Vec<_>>>()?,
                )
            })
            .collect::<IrResult<Vec<_>>>()?;
        Ok(Self {
            moments,
            device: self.device.clone(),
        })
    }
}

impl PartialEq for Circuit {
    fn eq(&self, other: &Self) -> bool {
        let device_name = |c: &Circuit| c.device.as_ref().map(|d| d.name().to_string());
        self.moments == other.moments && device_name(self) == device_name(other)
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, moment) in self.moments.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{i}: {moment}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IrError;
    use crate::gate::StandardGate;

    fn q(i: u32) -> Qubit {
        Qubit::line(i)
    }

    #[test]
    fn test_earliest_packs_parallel_ops() {
        let mut circuit = Circuit::new();
        circuit
            .append(
                Qubit::line_range(3)
                    .into_iter()
                    .map(|qb| StandardGate::h().on([qb]).unwrap()),
                InsertStrategy::Earliest,
            )
            .unwrap();
        assert_eq!(circuit.len(), 1);
        assert_eq!(circuit.moments()[0].len(), 3);
    }

    #[test]
    fn test_earliest_fills_gaps() {
        let mut circuit = Circuit::new();
        circuit.cx(q(0), q(1)).unwrap();
        circuit.h(q(0)).unwrap();
        circuit.h(q(0)).unwrap();
        // q2 was never touched, so X lands in moment 0.
        circuit.x(q(2)).unwrap();
        // q1 was last touched in moment 0.
        circuit.x(q(1)).unwrap();

        assert_eq!(circuit.len(), 3);
        assert_eq!(circuit.moments()[0].len(), 2);
        assert_eq!(circuit.moments()[1].len(), 2);
        assert!(circuit.moments()[1].operates_on(&[q(1)]));
    }

    #[test]
    fn test_new_moment_strategy() {
        let mut circuit = Circuit::new();
        let ops = [
            StandardGate::x().on([q(0)]).unwrap(),
            StandardGate::y().on([q(1)]).unwrap(),
        ];
        circuit.append(ops, InsertStrategy::NewMoment).unwrap();
        assert_eq!(circuit.len(), 2);
        assert_eq!(circuit.num_operations(), 2);
    }

    #[test]
    fn test_append_moment_keeps_bundle() {
        let mut circuit = Circuit::new();
        circuit.h(q(0)).unwrap();
        let bundle = Moment::from_operations([StandardGate::x().on([q(1)]).unwrap()]).unwrap();
        circuit.append_moment(bundle).unwrap();
        assert_eq!(circuit.len(), 2);
        assert_eq!(circuit.moments()[1].operations()[0].name(), "x");
    }

    #[test]
    fn test_accessors() {
        let mut circuit = Circuit::new();
        circuit
            .push(StandardGate::Rx("a".into()).on([q(2)]).unwrap())
            .unwrap()
            .push(StandardGate::x_pow("b").on([q(0)]).unwrap())
            .unwrap()
            .measure([q(0), q(2)], "m")
            .unwrap()
            .measure([q(1)], "n")
            .unwrap();

        assert_eq!(circuit.all_qubits().into_iter().collect::<Vec<_>>(), vec![q(0), q(1), q(2)]);
        assert_eq!(circuit.measurement_keys(), vec!["m", "n"]);
        assert_eq!(
            circuit.parameter_names().into_iter().collect::<Vec<_>>(),
            vec!["a".to_string(), "b".to_string()]
        );
        assert!(circuit.is_parameterized());
        assert!(circuit.are_all_measurements_terminal());

        let resolved = circuit
            .resolve(&Bindings::new().with("a", 0.1).with("b", 0.2))
            .unwrap();
        assert!(!resolved.is_parameterized());
        assert_eq!(resolved.len(), circuit.len());
    }

    #[test]
    fn test_resolve_reports_missing_symbol() {
        let mut circuit = Circuit::new();
        circuit.push(StandardGate::z_pow("t").on([q(0)]).unwrap()).unwrap();
        let err = circuit.resolve(&Bindings::new()).unwrap_err();
        assert_eq!(err, IrError::UnresolvedParameter("t".into()));
    }

    #[test]
    fn test_mid_circuit_measurement_detected() {
        let mut circuit = Circuit::new();
        circuit.measure([q(0)], "m").unwrap().x(q(0)).unwrap();
        assert!(!circuit.are_all_measurements_terminal());
    }

    #[test]
    fn test_replace_moments() {
        let mut circuit = Circuit::new();
        circuit.h(q(0)).unwrap().h(q(0)).unwrap().h(q(0)).unwrap();
        circuit.replace_moments(0..2, [Moment::new()]);
        assert_eq!(circuit.len(), 2);
        assert!(circuit.moments()[0].is_empty());
    }

    #[test]
    fn test_display() {
        let mut circuit = Circuit::new();
        circuit.h(q(0)).unwrap().cx(q(0), q(1)).unwrap();
        assert_eq!(circuit.to_string(), "0: H(q0)\n1: CX(q0, q1)");
    }

    #[test]
    fn test_deserialize_checks_every_moment() {
        let mut circuit = Circuit::new();
        circuit.h(q(0)).unwrap().cx(q(0), q(1)).unwrap();
        let mut json = serde_json::to_value(&circuit).unwrap();
        let back: Circuit = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(back, circuit);

        let extra = serde_json::to_value(StandardGate::x().on([q(1)]).unwrap()).unwrap();
        json["moments"][1]["operations"]
            .as_array_mut()
            .unwrap()
            .push(extra);
        assert!(serde_json::from_value::<Circuit>(json).is_err());
    }
}
