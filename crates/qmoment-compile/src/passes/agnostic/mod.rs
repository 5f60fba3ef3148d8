//! Target-agnostic compilation passes.
//!
//! These passes never consult the target gate set or device, so they are
//! safe to run on any circuit.

pub mod merge;

pub use merge::{MergeSingleQubitGates, MergeStats, OneQubitBasis};
