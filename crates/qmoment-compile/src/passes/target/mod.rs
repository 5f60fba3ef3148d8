//! Target-specific compilation passes.

pub mod decompose;

pub use decompose::DecompositionPass;
