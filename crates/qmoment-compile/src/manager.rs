//! Pass manager for orchestrating compilation.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use qmoment_ir::{Circuit, Device};

use crate::error::CompileResult;
use crate::pass::Pass;
use crate::passes::{DecompositionPass, MergeSingleQubitGates, OneQubitBasis};
use crate::property::{GateSet, PropertySet};
use crate::rules::RuleRegistry;

/// Manages and executes a sequence of compilation passes.
pub struct PassManager {
    /// The passes to execute, in order.
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    /// Create a new empty pass manager.
    pub fn new() -> Self {
        Self { passes: vec![] }
    }

    /// Add a pass to the manager.
    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Names of the passes, in execution order.
    pub fn pass_names(&self) -> Vec<&str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Run all passes on the given circuit.
    #[instrument(skip(self, circuit, properties))]
    pub fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        info!(
            "Running pass manager with {} passes on circuit with {} moments",
            self.passes.len(),
            circuit.len()
        );

        for pass in &self.passes {
            if pass.should_run(circuit, properties) {
                debug!("Running pass: {}", pass.name());
                pass.run(circuit, properties)?;
                debug!(
                    "Pass {} completed, ops: {}",
                    pass.name(),
                    circuit.num_operations()
                );
            } else {
                debug!("Skipping pass: {}", pass.name());
            }
        }

        info!(
            "Pass manager completed, final depth: {}, ops: {}",
            circuit.len(),
            circuit.num_operations()
        );

        Ok(())
    }

    /// Get the number of passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Check if the manager has no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating pass managers with preset configurations.
pub struct PassManagerBuilder {
    /// Optimization level (0-3).
    optimization_level: u8,
    /// Target properties.
    properties: PropertySet,
}

impl PassManagerBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            optimization_level: 1,
            properties: PropertySet::new(),
        }
    }

    /// Set the optimization level.
    ///
    /// - Level 0: decomposition only
    /// - Level 1 and above: decomposition, then single-qubit merging
    #[must_use]
    pub fn with_optimization_level(mut self, level: u8) -> Self {
        self.optimization_level = level.min(3);
        self
    }

    /// Set the target properties.
    #[must_use]
    pub fn with_properties(mut self, properties: PropertySet) -> Self {
        self.properties = properties;
        self
    }

    /// Set the target gate set.
    #[must_use]
    pub fn with_target(mut self, target: GateSet) -> Self {
        self.properties.target = Some(target);
        self
    }

    /// Set the device.
    #[must_use]
    pub fn with_device(mut self, device: Arc<dyn Device>) -> Self {
        self.properties.device = Some(device);
        self
    }

    /// Set the rule registry.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<RuleRegistry>) -> Self {
        self.properties.registry = Some(registry);
        self
    }

    /// Build the pass manager and return it with the properties.
    pub fn build(self) -> (PassManager, PropertySet) {
        let mut pm = PassManager::new();

        if self.properties.target.is_some() {
            pm.add_pass(DecompositionPass);
        }

        // Merged gates must stay inside the target, so pick the form it allows.
        if self.optimization_level >= 1 {
            let basis = match &self.properties.target {
                None => Some(OneQubitBasis::U3),
                Some(t) if t.contains_name("u") => Some(OneQubitBasis::U3),
                Some(t) if t.contains_name("rz") && t.contains_name("ry") => {
                    Some(OneQubitBasis::ZYZ)
                }
                Some(_) => None,
            };
            if let Some(basis) = basis {
                pm.add_pass(MergeSingleQubitGates::with_basis(basis));
            }
        }

        (pm, self.properties)
    }
}

impl Default for PassManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
