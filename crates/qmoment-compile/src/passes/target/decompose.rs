//! Decomposition into the target gate set.

use std::sync::Arc;

use qmoment_ir::Circuit;

use crate::decompose::Decomposer;
use crate::error::{CompileError, CompileResult};
use crate::pass::Pass;
use crate::property::PropertySet;
use crate::rules::RuleRegistry;

/// Rewrites every operation into the target gate set.
///
/// Reads the target from [`PropertySet::target`], the rules from
/// [`PropertySet::registry`] (standard rules if unset) and the device from
/// [`PropertySet::device`], falling back to the circuit's own device.
pub struct DecompositionPass;

impl Pass for DecompositionPass {
    fn name(&self) -> &'static str {
        "decompose"
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        let target = properties
            .target
            .clone()
            .ok_or(CompileError::MissingTargetGateSet)?;
        let registry = properties
            .registry
            .clone()
            .unwrap_or_else(|| Arc::new(RuleRegistry::standard()));
        let device = properties
            .device
            .clone()
            .or_else(|| circuit.device().cloned());

        let decomposer = Decomposer::new(registry, target);
        *circuit = decomposer.decompose_circuit_on(circuit, device)?;
        Ok(())
    }

    fn should_run(&self, _circuit: &Circuit, properties: &PropertySet) -> bool {
        properties.target.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::GateSet;
    use qmoment_ir::Qubit;

    #[test]
    fn test_missing_target() {
        let mut circuit = Circuit::new();
        circuit.h(Qubit::line(0)).unwrap();
        let mut props = PropertySet::new();
        assert!(!DecompositionPass.should_run(&circuit, &props));
        assert!(matches!(
            DecompositionPass.run(&mut circuit, &mut props),
            Err(CompileError::MissingTargetGateSet)
        ));
    }

    #[test]
    fn test_lowers_to_target() {
        let mut circuit = Circuit::new();
        circuit.h(Qubit::line(0)).unwrap();
        circuit.cx(Qubit::line(0), Qubit::line(1)).unwrap();
        let mut props = PropertySet::new().with_target(GateSet::cz_rotations());
        DecompositionPass.run(&mut circuit, &mut props).unwrap();

        let target = GateSet::cz_rotations();
        assert!(circuit.all_operations().all(|op| target.contains(op.gate())));
    }
}
