//! Single-qubit gate merging.

use rustc_hash::FxHashMap;
use tracing::{debug, instrument};

use qmoment_ir::{
    Bindings, Circuit, Device, InsertStrategy, IrError, IrResult, Operation, ParameterExpression,
    Qubit, StandardGate,
};

use crate::error::CompileResult;
use crate::pass::Pass;
use crate::property::PropertySet;
use crate::unitary::{EPSILON, Unitary2x2};

/// Target form for merged single-qubit gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OneQubitBasis {
    /// One `U(θ, φ, λ)` per merged run.
    #[default]
    U3,
    /// Up to three rotations `Rz(γ) Ry(β) Rz(α)`, skipping zero angles.
    ZYZ,
}

/// Counts recorded by [`MergeSingleQubitGates`] in the property set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeStats {
    /// Operations before merging.
    pub ops_before: usize,
    /// Operations after merging.
    pub ops_after: usize,
}

/// Merges runs of single-qubit gates into one canonical gate per run.
///
/// Each qubit keeps a pending 2×2 unitary. A constant single-qubit gate is
/// folded into it (`pending = gate · pending`). Anything else touching the
/// qubit (multi-qubit gates, measurements, symbolic or opaque gates) first
/// flushes the pending unitaries of its qubits and is then kept as is.
/// Whatever is still pending at the end is flushed in qubit order. A pending
/// unitary equal to the identity up to phase emits nothing.
///
/// The result equals the input up to a global phase.
#[derive(Debug, Clone, Default)]
pub struct MergeSingleQubitGates {
    basis: OneQubitBasis,
}

impl MergeSingleQubitGates {
    /// Create a merger emitting `U` gates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a merger emitting the given form.
    pub fn with_basis(basis: OneQubitBasis) -> Self {
        Self { basis }
    }

    /// The emitted form.
    pub fn basis(&self) -> OneQubitBasis {
        self.basis
    }

    /// Return a merged copy of `circuit`.
    ///
    /// With a device bound, a merged run is emitted in whichever form the
    /// device executes natively: the configured basis first, then the other
    /// one. When the device supports neither, the run is kept as written.
    #[instrument(skip(self, circuit), fields(ops = circuit.num_operations()))]
    pub fn optimize(&self, circuit: &Circuit) -> IrResult<Circuit> {
        let empty = Bindings::new();
        let device = circuit.device().map(|d| &**d);
        let mut pending: FxHashMap<Qubit, PendingRun> = FxHashMap::default();
        let mut out: Vec<Operation> = Vec::with_capacity(circuit.num_operations());

        for op in circuit.all_operations() {
            if let Some(u) = Self::single_qubit_unitary(op, &empty)? {
                let run = pending.entry(op.qubits()[0]).or_default();
                run.unitary = u * run.unitary;
                run.ops.push(op.clone());
                continue;
            }
            for q in op.qubits() {
                if let Some(run) = pending.remove(q) {
                    self.flush(*q, run, device, &mut out)?;
                }
            }
            out.push(op.clone());
        }

        let mut rest: Vec<(Qubit, PendingRun)> = pending.into_iter().collect();
        rest.sort_unstable_by_key(|(q, _)| *q);
        for (q, run) in rest {
            self.flush(q, run, device, &mut out)?;
        }

        debug!(
            before = circuit.num_operations(),
            after = out.len(),
            "merged single-qubit runs"
        );

        // Every emitted operation is already native, so appending does not lower.
        let mut merged = match circuit.device() {
            Some(device) => Circuit::with_device(device.clone()),
            None => Circuit::new(),
        };
        merged.append(out, InsertStrategy::Earliest)?;
        Ok(merged)
    }

    /// Replace `circuit` by its merged form.
    pub fn optimize_in_place(&self, circuit: &mut Circuit) -> IrResult<()> {
        *circuit = self.optimize(circuit)?;
        Ok(())
    }

    /// The 2×2 unitary of a mergeable operation, `None` for anything else.
    fn single_qubit_unitary(op: &Operation, empty: &Bindings) -> IrResult<Option<Unitary2x2>> {
        if op.num_qubits() != 1 || op.is_measurement() || op.is_parameterized() {
            return Ok(None);
        }
        match op.unitary(empty) {
            Ok(m) => Ok(Unitary2x2::from_matrix(&m)),
            Err(IrError::NonUnitary { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn flush(
        &self,
        qubit: Qubit,
        run: PendingRun,
        device: Option<&dyn Device>,
        out: &mut Vec<Operation>,
    ) -> IrResult<()> {
        let other = match self.basis {
            OneQubitBasis::U3 => OneQubitBasis::ZYZ,
            OneQubitBasis::ZYZ => OneQubitBasis::U3,
        };
        for basis in [self.basis, other] {
            let ops = Self::emit(basis, qubit, &run.unitary)?;
            let native = device.is_none_or(|d| ops.iter().all(|op| d.is_supported(op)));
            if native {
                out.extend(ops);
                return Ok(());
            }
        }
        debug!(%qubit, ops = run.ops.len(), "device lacks a merged form, keeping run");
        out.extend(run.ops);
        Ok(())
    }

    fn emit(basis: OneQubitBasis, qubit: Qubit, acc: &Unitary2x2) -> IrResult<Vec<Operation>> {
        let mut out = Vec::new();
        if acc.is_identity() {
            return Ok(out);
        }
        let (alpha, beta, gamma, _phase) = acc.zyz_decomposition();
        let alpha = Unitary2x2::normalize_angle(alpha);
        let beta = Unitary2x2::normalize_angle(beta);
        let gamma = Unitary2x2::normalize_angle(gamma);

        match basis {
            OneQubitBasis::U3 => {
                out.push(
                    StandardGate::U(
                        ParameterExpression::constant(beta),
                        ParameterExpression::constant(alpha),
                        ParameterExpression::constant(gamma),
                    )
                    .on([qubit])?,
                );
            }
            OneQubitBasis::ZYZ if beta.abs() <= EPSILON => {
                let angle = Unitary2x2::normalize_angle(alpha + gamma);
                if angle.abs() > EPSILON {
                    out.push(StandardGate::Rz(ParameterExpression::constant(angle)).on([qubit])?);
                }
            }
            OneQubitBasis::ZYZ => {
                if gamma.abs() > EPSILON {
                    out.push(StandardGate::Rz(ParameterExpression::constant(gamma)).on([qubit])?);
                }
                if beta.abs() > EPSILON {
                    out.push(StandardGate::Ry(ParameterExpression::constant(beta)).on([qubit])?);
                }
                if alpha.abs() > EPSILON {
                    out.push(StandardGate::Rz(ParameterExpression::constant(alpha)).on([qubit])?);
                }
            }
        }
        Ok(out)
    }
}

/// A qubit's accumulated unitary and the operations folded into it.
#[derive(Debug, Default)]
struct PendingRun {
    unitary: Unitary2x2,
    ops: Vec<Operation>,
}

impl Pass for MergeSingleQubitGates {
    fn name(&self) -> &'static str {
        "merge_single_qubit_gates"
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        let ops_before = circuit.num_operations();
        self.optimize_in_place(circuit)?;
        properties.insert(MergeStats {
            ops_before,
            ops_after: circuit.num_operations(),
        });
        Ok(())
    }
}
