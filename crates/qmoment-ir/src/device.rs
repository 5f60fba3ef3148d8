//! Device constraints a circuit can be bound to.

use std::collections::VecDeque;
use std::fmt;

use rustc_hash::FxHashMap;

use crate::error::IrResult;
use crate::operation::Operation;
use crate::qubit::Qubit;

/// Hardware constraints checked while a circuit is being built.
///
/// A circuit bound to a device passes every appended operation through
/// [`Device::is_supported`]; operations the device rejects are replaced by
/// the output of [`Device::decompose_operation`] before placement.
pub trait Device: Send + Sync + fmt::Debug {
    /// Human-readable device name.
    fn name(&self) -> &str;

    /// The device's qubits, sorted.
    fn qubits(&self) -> Vec<Qubit>;

    /// Whether the device can execute `op` as is.
    fn is_supported(&self, op: &Operation) -> bool;

    /// Whether a two-qubit gate may act on `a` and `b` directly.
    fn qubits_adjacent(&self, a: &Qubit, b: &Qubit) -> bool;

    /// Rewrite `op` into operations the device supports.
    fn decompose_operation(&self, op: &Operation) -> IrResult<Vec<Operation>>;

    /// A shortest chain of adjacent qubits from `from` to `to`, both included.
    ///
    /// The default is a breadth-first search over [`Device::qubits`] using
    /// [`Device::qubits_adjacent`].
    fn path(&self, from: &Qubit, to: &Qubit) -> Option<Vec<Qubit>> {
        let qubits = self.qubits();
        if !qubits.contains(from) || !qubits.contains(to) {
            return None;
        }
        if from == to {
            return Some(vec![*from]);
        }

        let mut previous: FxHashMap<Qubit, Option<Qubit>> = FxHashMap::default();
        let mut queue = VecDeque::new();
        previous.insert(*from, None);
        queue.push_back(*from);

        while let Some(current) = queue.pop_front() {
            for next in qubits.iter().filter(|q| self.qubits_adjacent(&current, q)) {
                if previous.contains_key(next) {
                    continue;
                }
                previous.insert(*next, Some(current));
                if next == to {
                    let mut path = vec![*to];
                    let mut node = *to;
                    while let Some(Some(prev)) = previous.get(&node) {
                        path.push(*prev);
                        node = *prev;
                    }
                    path.reverse();
                    return Some(path);
                }
                queue.push_back(*next);
            }
        }
        None
    }
}
