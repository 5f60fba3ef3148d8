//! Pass trait for compilation passes.

use qmoment_ir::Circuit;

use crate::error::CompileResult;
use crate::property::PropertySet;

/// A compilation pass that operates on a circuit.
///
/// Passes rewrite the circuit in place and may read from or write to the
/// shared [`PropertySet`].
pub trait Pass: Send + Sync {
    /// Get the name of this pass.
    fn name(&self) -> &str;

    /// Run the pass on the given circuit.
    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()>;

    /// Check if this pass should run based on current state.
    ///
    /// This can be overridden to skip passes that are not needed.
    fn should_run(&self, _circuit: &Circuit, _properties: &PropertySet) -> bool {
        true
    }
}
