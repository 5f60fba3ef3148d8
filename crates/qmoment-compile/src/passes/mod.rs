//! Built-in compilation passes.
//!
//! Passes are organized into two categories:
//! - [`agnostic`]: passes that only look at the circuit itself
//! - [`target`]: passes that need a target gate set or device

pub mod agnostic;
pub mod target;

pub use agnostic::{MergeSingleQubitGates, MergeStats, OneQubitBasis};
pub use target::DecompositionPass;
