//! Error types for the IR crate.

use crate::qubit::Qubit;
use thiserror::Error;

/// Errors that can occur while building, transforming or evaluating circuits.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Gate applied to the wrong number of qubits.
    #[error("Gate '{gate}' acts on {expected} qubits, got {got}")]
    ArityMismatch {
        /// Name of the gate.
        gate: String,
        /// Arity declared by the gate.
        expected: u32,
        /// Number of qubits supplied.
        got: usize,
    },

    /// The same qubit appears twice in one operation.
    #[error("Duplicate qubit {qubit} in operation (gate: {gate})")]
    DuplicateQubit {
        /// The repeated qubit.
        qubit: Qubit,
        /// Name of the gate.
        gate: String,
    },

    /// An operation was added to a moment that already acts on one of its qubits.
    #[error("Qubit {qubit} is already used by '{existing}' in this moment")]
    QubitConflict {
        /// The shared qubit.
        qubit: Qubit,
        /// Rendering of the operation already occupying the qubit.
        existing: String,
    },

    /// A qubit is missing from an explicit qubit order.
    #[error("Qubit {0} is not in the qubit order")]
    UnknownQubit(Qubit),

    /// A symbol has no value in the supplied bindings.
    #[error("Parameter '{0}' is unresolved")]
    UnresolvedParameter(String),

    /// A parameter evaluated to NaN or an infinity.
    #[error("Parameter expression '{0}' does not evaluate to a finite value")]
    NonFiniteParameter(String),

    /// The gate has no power.
    #[error("Gate '{gate}' cannot be raised to a power")]
    UnsupportedPower {
        /// Name of the gate.
        gate: String,
    },

    /// The gate has no unitary matrix: a measurement, an opaque custom gate,
    /// or a custom gate whose attached matrix is not unitary.
    #[error("Gate '{gate}' has no unitary matrix")]
    NonUnitary {
        /// Name of the gate.
        gate: String,
    },

    /// No registered rule rewrites an unsupported operation.
    #[error("No decomposition rule for '{gate}' on {}", format_qubits(.qubits))]
    NoDecompositionRule {
        /// Name of the gate.
        gate: String,
        /// Qubits the operation acts on.
        qubits: Vec<Qubit>,
    },

    /// Rewriting did not reach the target gate set within the depth limit.
    #[error("Decomposition of '{gate}' exceeded depth {max_depth}")]
    DecompositionDivergence {
        /// Name of the gate whose rewrite exceeded the limit.
        gate: String,
        /// The configured depth limit.
        max_depth: usize,
    },
}

fn format_qubits(qubits: &[Qubit]) -> String {
    let parts: Vec<String> = qubits.iter().map(ToString::to_string).collect();
    format!("[{}]", parts.join(", "))
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
