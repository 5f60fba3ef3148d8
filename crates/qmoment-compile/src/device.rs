//! A minimal device: qubits on a connectivity graph with a native gate set.

use petgraph::graph::{NodeIndex, UnGraph};
use rustc_hash::FxHashMap;
use std::sync::Arc;

use qmoment_ir::{Device, IrResult, Operation, Qubit};

use crate::decompose::Decomposer;
use crate::property::GateSet;
use crate::rules::RuleRegistry;

/// Device constraints over an undirected coupling graph.
///
/// An operation is supported when its family is native, all of its qubits
/// are on the device, and a two-qubit operation acts on coupled qubits.
/// Measurements only need their qubits on the device. Operations on three
/// or more qubits are never native. Unsupported operations are lowered by a
/// [`Decomposer`] targeting the native set.
///
/// ```
/// use qmoment_compile::{DeviceGraph, GateSet};
/// use qmoment_ir::{Device, Qubit};
///
/// let device = DeviceGraph::line(4, GateSet::cz_rotations());
/// assert!(device.qubits_adjacent(&Qubit::line(1), &Qubit::line(2)));
/// assert!(!device.qubits_adjacent(&Qubit::line(0), &Qubit::line(2)));
/// ```
#[derive(Debug, Clone)]
pub struct DeviceGraph {
    name: String,
    graph: UnGraph<Qubit, ()>,
    nodes: FxHashMap<Qubit, NodeIndex>,
    native: GateSet,
    decomposer: Decomposer,
}

impl DeviceGraph {
    /// Create a device from qubits and couplings.
    ///
    /// Qubits named only in `edges` are added too.
    pub fn new(
        name: impl Into<String>,
        qubits: impl IntoIterator<Item = Qubit>,
        edges: impl IntoIterator<Item = (Qubit, Qubit)>,
        native: GateSet,
    ) -> Self {
        let mut graph = UnGraph::new_undirected();
        let mut nodes = FxHashMap::default();
        let mut node = |graph: &mut UnGraph<Qubit, ()>, q: Qubit| {
            *nodes.entry(q).or_insert_with(|| graph.add_node(q))
        };

        for q in qubits {
            node(&mut graph, q);
        }
        for (a, b) in edges {
            let (na, nb) = (node(&mut graph, a), node(&mut graph, b));
            if na != nb && graph.find_edge(na, nb).is_none() {
                graph.add_edge(na, nb, ());
            }
        }

        let decomposer = Decomposer::new(Arc::new(RuleRegistry::standard()), native.clone());
        Self {
            name: name.into(),
            graph,
            nodes,
            native,
            decomposer,
        }
    }

    /// `n` line qubits coupled in a chain.
    pub fn line(n: u32, native: GateSet) -> Self {
        let qubits = Qubit::line_range(n);
        let edges: Vec<_> = qubits.windows(2).map(|w| (w[0], w[1])).collect();
        Self::new(format!("line-{n}"), qubits, edges, native)
    }

    /// A `rows × cols` grid with nearest-neighbour couplings.
    pub fn grid(rows: i32, cols: i32, native: GateSet) -> Self {
        let qubits = Qubit::grid_rect(rows, cols);
        let mut edges = Vec::new();
        for (i, a) in qubits.iter().enumerate() {
            for b in &qubits[i + 1..] {
                if a.is_neighbor(b) {
                    edges.push((*a, *b));
                }
            }
        }
        Self::new(format!("grid-{rows}x{cols}"), qubits, edges, native)
    }

    /// Replace the rule registry used for lowering.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<RuleRegistry>) -> Self {
        self.decomposer = Decomposer::new(registry, self.native.clone());
        self
    }

    /// Set the rewrite depth limit used for lowering.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.decomposer = self.decomposer.with_max_depth(max_depth);
        self
    }

    /// The native gate set.
    pub fn native(&self) -> &GateSet {
        &self.native
    }

    /// Number of couplings.
    pub fn num_edges(&self) -> usize {
        self.graph.edge_count()
    }

    fn contains(&self, q: &Qubit) -> bool {
        self.nodes.contains_key(q)
    }
}

impl Device for DeviceGraph {
    fn name(&self) -> &str {
        &self.name
    }

    fn qubits(&self) -> Vec<Qubit> {
        let mut qubits: Vec<Qubit> = self.nodes.keys().copied().collect();
        qubits.sort_unstable();
        qubits
    }

    fn is_supported(&self, op: &Operation) -> bool {
        if !op.qubits().iter().all(|q| self.contains(q)) {
            return false;
        }
        if op.is_measurement() {
            return true;
        }
        if !self.native.contains(op.gate()) {
            return false;
        }
        match op.qubits() {
            [_] => true,
            [a, b] => self.qubits_adjacent(a, b),
            _ => false,
        }
    }

    fn qubits_adjacent(&self, a: &Qubit, b: &Qubit) -> bool {
        match (self.nodes.get(a), self.nodes.get(b)) {
            (Some(&na), Some(&nb)) => self.graph.contains_edge(na, nb),
            _ => false,
        }
    }

    fn decompose_operation(&self, op: &Operation) -> IrResult<Vec<Operation>> {
        self.decomposer.decompose(op, Some(self))
    }

    fn path(&self, from: &Qubit, to: &Qubit) -> Option<Vec<Qubit>> {
        let start = *self.nodes.get(from)?;
        let goal = *self.nodes.get(to)?;
        let (_cost, nodes) =
            petgraph::algo::astar(&self.graph, start, |n| n == goal, |_| 1usize, |_| 0usize)?;
        Some(nodes.into_iter().map(|n| self.graph[n]).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qmoment_ir::StandardGate;

    #[test]
    fn test_line_topology() {
        let device = DeviceGraph::line(5, GateSet::cx_rotations());
        assert_eq!(device.qubits(), Qubit::line_range(5));
        assert_eq!(device.num_edges(), 4);
        assert_eq!(device.name(), "line-5");
    }

    #[test]
    fn test_grid_topology() {
        let device = DeviceGraph::grid(2, 3, GateSet::cz_rotations());
        assert_eq!(device.qubits().len(), 6);
        // 2 rows × 2 horizontal + 3 vertical.
        assert_eq!(device.num_edges(), 7);
        assert!(device.qubits_adjacent(&Qubit::grid(0, 0), &Qubit::grid(1, 0)));
        assert!(!device.qubits_adjacent(&Qubit::grid(0, 0), &Qubit::grid(1, 1)));
    }

    #[test]
    fn test_is_supported() {
        let device = DeviceGraph::line(3, GateSet::cz_rotations());
        let [a, b, c] = [Qubit::line(0), Qubit::line(1), Qubit::line(2)];
        assert!(device.is_supported(&StandardGate::cz().on([a, b]).unwrap()));
        assert!(!device.is_supported(&StandardGate::cz().on([a, c]).unwrap()));
        assert!(!device.is_supported(&StandardGate::cx().on([a, b]).unwrap()));
        assert!(!device.is_supported(&StandardGate::x().on([Qubit::line(7)]).unwrap()));
        assert!(device.is_supported(&Operation::measure([a, c], "m").unwrap()));
    }

    #[test]
    fn test_path_is_shortest() {
        let device = DeviceGraph::grid(3, 3, GateSet::cz_rotations());
        let path = device.path(&Qubit::grid(0, 0), &Qubit::grid(2, 2)).unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(path[0], Qubit::grid(0, 0));
        assert_eq!(path[4], Qubit::grid(2, 2));
        assert!(path.windows(2).all(|w| device.qubits_adjacent(&w[0], &w[1])));
    }

    #[test]
    fn test_disconnected_has_no_path() {
        let qubits = Qubit::line_range(4);
        let device = DeviceGraph::new(
            "split",
            qubits.clone(),
            [(qubits[0], qubits[1]), (qubits[2], qubits[3])],
            GateSet::cx_rotations(),
        );
        assert!(device.path(&qubits[0], &qubits[3]).is_none());
        let op = StandardGate::cx().on([qubits[0], qubits[3]]).unwrap();
        assert!(device.decompose_operation(&op).is_err());
    }
}
