//! Error types for the sim crate.

use qmoment_ir::IrError;
use thiserror::Error;

/// Errors produced while building sweeps or running simulations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// Repetitions must be at least 1.
    #[error("repetitions must be at least 1, got {0}")]
    InvalidRepetitions(i64),

    /// The circuit is wider than the configured limit.
    #[error("circuit has {requested} qubits but the simulator supports at most {max}")]
    TooManyQubits {
        /// Qubits in the circuit.
        requested: usize,
        /// Configured limit.
        max: usize,
    },

    /// No measurement in the circuit uses this key.
    #[error("unknown measurement key '{0}'")]
    UnknownMeasurementKey(String),

    /// Two combined sweeps assign the same parameter.
    #[error("parameter '{0}' is swept more than once")]
    DuplicateSweepKey(String),

    /// Two measurements in one circuit share a key.
    #[error("measurement key '{0}' is used more than once")]
    DuplicateMeasurementKey(String),

    /// A sweep is malformed.
    #[error("invalid sweep: {0}")]
    InvalidSweep(String),

    /// Configuration could not be parsed.
    #[error("invalid simulator configuration: {0}")]
    Config(String),

    /// Circuit IR error.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] IrError),
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
