//! Error types for the compilation crate.

use qmoment_ir::IrError;
use thiserror::Error;

/// Errors raised by the pass framework.
///
/// Engine failures (decomposition, unitary composition) surface unchanged
/// as [`CompileError::Ir`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// Error from the IR layer.
    #[error(transparent)]
    Ir(#[from] IrError),

    /// A pass needs a target gate set but none was configured.
    #[error("Target gate set not specified")]
    MissingTargetGateSet,
}

/// Result type for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;
