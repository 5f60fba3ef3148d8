//! `qmoment-sim`: state-vector simulation over parameter sweeps.
//!
//! Runs a (possibly parameterized) `qmoment_ir::Circuit` at every point of a
//! [`Sweep`] and records measurement outcomes per key:
//!
//! - **Sweeps**: points, linspaces, explicit lists, and their products and zips
//! - **Sampling**: circuits whose measurements are all terminal are evolved
//!   once and sampled; others are re-run per repetition with collapse
//! - **Seeding**: a fixed [`SimulatorConfig::seed`] makes every sweep point
//!   reproducible, sequential or parallel
//!
//! # Quick start
//!
//! ```rust
//! use qmoment_ir::{Circuit, InsertStrategy, Qubit, StandardGate};
//! use qmoment_sim::{Simulator, SimulatorConfig, Sweep};
//!
//! let q = Qubit::line(0);
//! let mut circuit = Circuit::new();
//! circuit.append([StandardGate::x_pow("t").on([q])?], InsertStrategy::Earliest)?;
//! circuit.measure([q], "m")?;
//!
//! let sim = Simulator::new(SimulatorConfig::default().with_seed(7));
//! let sweep = Sweep::linspace("t", 0.0, 1.0, 3);
//! let results = sim.run_sweep(&circuit, &sweep, 100)?;
//!
//! assert_eq!(results.len(), 3);
//! assert_eq!(results[0].fraction_of_ones("m")?, 0.0);
//! assert_eq!(results[2].fraction_of_ones("m")?, 1.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod error;
pub mod result;
pub mod simulator;
pub mod statevector;
pub mod sweep;

pub use config::SimulatorConfig;
pub use error::{SimError, SimResult};
pub use result::{Histogram, TrialResult};
pub use simulator::{CancelToken, Simulator, SweepRun};
pub use statevector::{MAX_SUPPORTED_QUBITS, Statevector};
pub use sweep::Sweep;
