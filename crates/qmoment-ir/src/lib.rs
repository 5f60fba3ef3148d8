//! qmoment Circuit Intermediate Representation
//!
//! This crate provides the core data structures for representing quantum
//! circuits as time-ordered moments. It is the foundation for the unitary,
//! decomposition and optimization engines in `qmoment-compile` and for the
//! sweep simulator in `qmoment-sim`.
//!
//! # Core Components
//!
//! - **Qubits**: [`Qubit`], line and grid qubits with a total order
//! - **Parameters**: [`ParameterExpression`] for symbolic gate parameters and
//!   [`Bindings`] for resolving them
//! - **Gates**: [`Gate`], a closed set of [`StandardGate`] families plus
//!   [`CustomGate`] and [`MeasurementGate`]
//! - **Operations**: [`Operation`], a gate applied to an ordered qubit tuple
//! - **Moments**: [`Moment`], operations on pairwise-disjoint qubits
//! - **Circuits**: [`Circuit`], an ordered list of moments with an optional
//!   [`Device`] constraint
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use qmoment_ir::{Circuit, Qubit};
//!
//! let (a, b) = (Qubit::line(0), Qubit::line(1));
//! let mut circuit = Circuit::new();
//! circuit.h(a)?.cx(a, b)?.measure([a, b], "bell")?;
//!
//! assert_eq!(circuit.len(), 3); // H, CX, measurement
//! assert_eq!(circuit.measurement_keys(), vec!["bell"]);
//! # Ok::<(), qmoment_ir::IrError>(())
//! ```
//!
//! # Example: Parameterized Circuit
//!
//! ```rust
//! use qmoment_ir::{Bindings, Circuit, Gate, InsertStrategy, Qubit, StandardGate};
//!
//! let q = Qubit::grid(0, 0);
//! let half_turn = Gate::from(StandardGate::x()).pow("t")?;
//!
//! let mut circuit = Circuit::new();
//! circuit.append([half_turn.on([q])?], InsertStrategy::Earliest)?;
//! assert!(circuit.is_parameterized());
//!
//! let resolved = circuit.resolve(&Bindings::new().with("t", 0.5))?;
//! assert!(!resolved.is_parameterized());
//! # Ok::<(), qmoment_ir::IrError>(())
//! ```

pub mod circuit;
pub mod device;
pub mod error;
pub mod gate;
pub mod matrix;
pub mod moment;
pub mod operation;
pub mod parameter;
pub mod qubit;

pub use circuit::{Circuit, InsertStrategy};
pub use device::Device;
pub use error::{IrError, IrResult};
pub use gate::{CustomGate, Gate, MeasurementGate, StandardGate, UNITARY_TOLERANCE};
pub use matrix::Matrix;
pub use moment::Moment;
pub use operation::Operation;
pub use parameter::{Bindings, ParameterExpression};
pub use qubit::Qubit;
