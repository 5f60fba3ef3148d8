//! qmoment compilation: unitaries, decomposition and optimization.
//!
//! This crate turns `qmoment-ir` circuits into equivalent circuits that fit a
//! target gate set and device, and checks the result by composing unitaries.
//!
//! # Overview
//!
//! - [`unitary`]: matrices of operations, moments and whole circuits
//! - [`Decomposer`]: worklist rewriting with a [`RuleRegistry`] until every
//!   operation is in the target [`GateSet`] and supported by the device
//! - [`DeviceGraph`]: a [`Device`](qmoment_ir::Device) over a coupling graph
//!   that lowers unsupported operations as they are appended
//! - [`MergeSingleQubitGates`]: collapses single-qubit runs into one gate
//! - [`PassManager`]: runs passes in order over a shared [`PropertySet`]
//!
//! ```text
//! Input Circuit
//!       |
//!       v
//! +-------------+
//! | PassManager | <-- PropertySet (target, device, rule registry)
//! +-------------+
//!       |
//!       |-- DecompositionPass
//!       '-- MergeSingleQubitGates
//!       |
//!       v
//! Output Circuit (target gates only)
//! ```
//!
//! # Example: Compiling to CZ and rotations
//!
//! ```rust
//! use qmoment_compile::{GateSet, PassManagerBuilder, circuit_unitary, allclose_up_to_global_phase};
//! use qmoment_ir::{Bindings, Circuit, Qubit};
//!
//! let [a, b] = [Qubit::line(0), Qubit::line(1)];
//! let mut circuit = Circuit::new();
//! circuit.h(a)?.cx(a, b)?;
//! let original = circuit.clone();
//!
//! let (pm, mut props) = PassManagerBuilder::new()
//!     .with_target(GateSet::cz_rotations())
//!     .build();
//! pm.run(&mut circuit, &mut props)?;
//!
//! let target = GateSet::cz_rotations();
//! assert!(circuit.all_operations().all(|op| target.contains(op.gate())));
//!
//! let empty = Bindings::new();
//! assert!(allclose_up_to_global_phase(
//!     &circuit_unitary(&original, &empty)?,
//!     &circuit_unitary(&circuit, &empty)?,
//!     1e-9,
//! ));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Custom Passes
//!
//! Implement the [`Pass`] trait to create custom compilation passes:
//!
//! ```rust
//! use qmoment_compile::{CompileResult, Pass, PropertySet};
//! use qmoment_ir::Circuit;
//!
//! struct MyCustomPass;
//!
//! impl Pass for MyCustomPass {
//!     fn name(&self) -> &str { "my_custom_pass" }
//!
//!     fn run(&self, circuit: &mut Circuit, props: &mut PropertySet) -> CompileResult<()> {
//!         Ok(())
//!     }
//! }
//! ```

pub mod decompose;
pub mod device;
pub mod error;
pub mod manager;
pub mod pass;
pub mod property;
pub mod rules;
pub mod unitary;

// Built-in passes
pub mod passes;

pub use decompose::{DEFAULT_MAX_DEPTH, Decomposer};
pub use device::DeviceGraph;
pub use error::{CompileError, CompileResult};
pub use manager::{PassManager, PassManagerBuilder};
pub use pass::Pass;
pub use passes::{DecompositionPass, MergeSingleQubitGates, MergeStats, OneQubitBasis};
pub use property::{GateSet, PropertySet};
pub use rules::{FnRule, RewriteRule, RuleContext, RuleRegistry};
pub use unitary::{
    Unitary2x2, allclose_up_to_global_phase, circuit_unitary, circuit_unitary_with_order,
    moment_unitary, operation_unitary,
};
