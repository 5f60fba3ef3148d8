//! Worklist decomposition into a target gate set.

use std::sync::Arc;

use tracing::{debug, instrument, trace};

use qmoment_ir::{Circuit, Device, InsertStrategy, IrError, IrResult, Operation};

use crate::property::GateSet;
use crate::rules::{RuleContext, RuleRegistry};

/// Default rewrite depth limit.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Rewrites operations until every one is a fixed point.
///
/// An operation is a fixed point when its gate family is in the target set
/// and, if a device is given, the device supports it. Anything else is
/// handed to the first matching rule of the registry and the rule's output
/// is processed in turn, depth first, so the emitted sequence keeps the
/// order of the rewrites.
#[derive(Debug, Clone)]
pub struct Decomposer {
    registry: Arc<RuleRegistry>,
    target: GateSet,
    max_depth: usize,
}

impl Decomposer {
    /// Create a decomposer for `target` using `registry`.
    pub fn new(registry: Arc<RuleRegistry>, target: GateSet) -> Self {
        Self {
            registry,
            target,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set the rewrite depth limit.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// The target gate set.
    pub fn target(&self) -> &GateSet {
        &self.target
    }

    /// The rule registry.
    pub fn registry(&self) -> &Arc<RuleRegistry> {
        &self.registry
    }

    /// Whether `op` needs no rewriting.
    pub fn is_fixed_point(&self, op: &Operation, device: Option<&dyn Device>) -> bool {
        self.target.contains(op.gate()) && device.is_none_or(|d| d.is_supported(op))
    }

    /// Decompose a single operation.
    ///
    /// # Errors
    ///
    /// [`IrError::NoDecompositionRule`] if some operation is not a fixed
    /// point and no rule matches it, [`IrError::DecompositionDivergence`] if
    /// a chain of rewrites gets deeper than the limit, and any error a rule
    /// returns.
    pub fn decompose(&self, op: &Operation, device: Option<&dyn Device>) -> IrResult<Vec<Operation>> {
        let ctx = RuleContext::new(&self.target, device);
        let mut output = Vec::new();
        let mut stack = vec![(op.clone(), 0usize)];

        while let Some((current, depth)) = stack.pop() {
            if self.is_fixed_point(&current, device) {
                output.push(current);
                continue;
            }
            if depth >= self.max_depth {
                return Err(IrError::DecompositionDivergence {
                    gate: op.name().to_string(),
                    max_depth: self.max_depth,
                });
            }
            let Some((rule, replacement)) = self.registry.apply(&current, &ctx)? else {
                return Err(IrError::NoDecompositionRule {
                    gate: current.name().to_string(),
                    qubits: current.qubits().to_vec(),
                });
            };
            trace!(rule, depth, op = %current, out = replacement.len(), "rewrite");
            stack.extend(replacement.into_iter().rev().map(|o| (o, depth + 1)));
        }

        Ok(output)
    }

    /// Decompose every operation of `circuit` against its own device.
    pub fn decompose_circuit(&self, circuit: &Circuit) -> IrResult<Circuit> {
        let device = circuit.device().cloned();
        self.decompose_circuit_on(circuit, device)
    }

    /// Decompose every operation of `circuit` against `device`.
    ///
    /// Operations are visited moment by moment and the result is repacked
    /// with [`InsertStrategy::Earliest`]. The output is bound to `device`.
    #[instrument(skip(self, circuit, device), fields(moments = circuit.len()))]
    pub fn decompose_circuit_on(
        &self,
        circuit: &Circuit,
        device: Option<Arc<dyn Device>>,
    ) -> IrResult<Circuit> {
        let mut ops = Vec::with_capacity(circuit.num_operations());
        for op in circuit.all_operations() {
            ops.extend(self.decompose(op, device.as_deref())?);
        }
        debug!(
            before = circuit.num_operations(),
            after = ops.len(),
            target = %self.target,
            "decomposed circuit"
        );

        // Every emitted operation is already supported, so the device hook
        // never fires while repacking.
        let mut out = match device {
            Some(device) => Circuit::with_device(device),
            None => Circuit::new(),
        };
        out.append(ops, InsertStrategy::Earliest)?;
        Ok(out)
    }
}
