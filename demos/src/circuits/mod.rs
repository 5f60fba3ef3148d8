//! Circuit builders shared by the demo binaries.

pub mod deutsch;
pub mod rabi;

pub use deutsch::{Secret, deutsch_circuit, oracle};
pub use rabi::{expected_excitation, rabi_circuit};
