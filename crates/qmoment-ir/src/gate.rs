//! Quantum gate types.
//!
//! Gates are a closed set of variants. Exponent families (`X`, `CZ`, `ISwap`, …)
//! carry a power `t` so that `X(1.0)` is Pauli X and `X(0.5)` its square root;
//! rotation families carry an angle. Parameters may be symbolic until they are
//! resolved against [`Bindings`].

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::matrix::{self, Matrix};
use crate::operation::Operation;
use crate::parameter::{Bindings, ParameterExpression};
use crate::qubit::Qubit;

/// Largest deviation of `M·M†` from the identity accepted for a custom matrix.
pub const UNITARY_TOLERANCE: f64 = 1e-8;

/// Standard gates with known semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    /// Identity gate.
    I,

    // Exponent families
    /// Pauli-X raised to a power.
    X(ParameterExpression),
    /// Pauli-Y raised to a power.
    Y(ParameterExpression),
    /// Pauli-Z raised to a power.
    Z(ParameterExpression),
    /// Hadamard raised to a power.
    H(ParameterExpression),
    /// Controlled X^t.
    CX(ParameterExpression),
    /// Controlled Z^t.
    CZ(ParameterExpression),
    /// SWAP raised to a power.
    Swap(ParameterExpression),
    /// iSWAP raised to a power.
    ISwap(ParameterExpression),
    /// Doubly-controlled X^t (Toffoli at t = 1).
    CCX(ParameterExpression),

    // Rotation families
    /// Rotation around X axis.
    Rx(ParameterExpression),
    /// Rotation around Y axis.
    Ry(ParameterExpression),
    /// Rotation around Z axis.
    Rz(ParameterExpression),

    /// Universal single-qubit gate U(θ, φ, λ).
    U(
        ParameterExpression,
        ParameterExpression,
        ParameterExpression,
    ),

    /// Fredkin gate (controlled SWAP).
    CSwap,
}

impl StandardGate {
    /// Pauli X.
    pub fn x() -> Self {
        StandardGate::X(1.0.into())
    }

    /// Pauli Y.
    pub fn y() -> Self {
        StandardGate::Y(1.0.into())
    }

    /// Pauli Z.
    pub fn z() -> Self {
        StandardGate::Z(1.0.into())
    }

    /// Hadamard.
    pub fn h() -> Self {
        StandardGate::H(1.0.into())
    }

    /// S gate, `Z^0.5`.
    pub fn s() -> Self {
        StandardGate::Z(0.5.into())
    }

    /// T gate, `Z^0.25`.
    pub fn t() -> Self {
        StandardGate::Z(0.25.into())
    }

    /// T-dagger gate, `Z^-0.25`.
    pub fn tdg() -> Self {
        StandardGate::Z((-0.25).into())
    }

    /// CNOT.
    pub fn cx() -> Self {
        StandardGate::CX(1.0.into())
    }

    /// Controlled Z.
    pub fn cz() -> Self {
        StandardGate::CZ(1.0.into())
    }

    /// SWAP.
    pub fn swap() -> Self {
        StandardGate::Swap(1.0.into())
    }

    /// iSWAP.
    pub fn iswap() -> Self {
        StandardGate::ISwap(1.0.into())
    }

    /// Toffoli.
    pub fn ccx() -> Self {
        StandardGate::CCX(1.0.into())
    }

    /// `X^t`.
    pub fn x_pow(t: impl Into<ParameterExpression>) -> Self {
        StandardGate::X(t.into())
    }

    /// `Y^t`.
    pub fn y_pow(t: impl Into<ParameterExpression>) -> Self {
        StandardGate::Y(t.into())
    }

    /// `Z^t`.
    pub fn z_pow(t: impl Into<ParameterExpression>) -> Self {
        StandardGate::Z(t.into())
    }

    /// `H^t`.
    pub fn h_pow(t: impl Into<ParameterExpression>) -> Self {
        StandardGate::H(t.into())
    }

    /// Get the family name of this gate, as used by gate sets.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "i",
            StandardGate::X(_) => "x",
            StandardGate::Y(_) => "y",
            StandardGate::Z(_) => "z",
            StandardGate::H(_) => "h",
            StandardGate::CX(_) => "cx",
            StandardGate::CZ(_) => "cz",
            StandardGate::Swap(_) => "swap",
            StandardGate::ISwap(_) => "iswap",
            StandardGate::CCX(_) => "ccx",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::U(_, _, _) => "u",
            StandardGate::CSwap => "cswap",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::I
            | StandardGate::X(_)
            | StandardGate::Y(_)
            | StandardGate::Z(_)
            | StandardGate::H(_)
            | StandardGate::Rx(_)
            | StandardGate::Ry(_)
            | StandardGate::Rz(_)
            | StandardGate::U(_, _, _) => 1,

            StandardGate::CX(_)
            | StandardGate::CZ(_)
            | StandardGate::Swap(_)
            | StandardGate::ISwap(_) => 2,

            StandardGate::CCX(_) | StandardGate::CSwap => 3,
        }
    }

    /// The exponent of an exponent-family gate.
    pub fn exponent(&self) -> Option<&ParameterExpression> {
        match self {
            StandardGate::X(t)
            | StandardGate::Y(t)
            | StandardGate::Z(t)
            | StandardGate::H(t)
            | StandardGate::CX(t)
            | StandardGate::CZ(t)
            | StandardGate::Swap(t)
            | StandardGate::ISwap(t)
            | StandardGate::CCX(t) => Some(t),
            _ => None,
        }
    }

    /// Get parameters of this gate.
    pub fn parameters(&self) -> Vec<&ParameterExpression> {
        match self {
            StandardGate::U(a, b, c) => vec![a, b, c],
            StandardGate::Rx(p) | StandardGate::Ry(p) | StandardGate::Rz(p) => vec![p],
            other => other.exponent().into_iter().collect(),
        }
    }

    /// Check if any parameter is symbolic.
    pub fn is_parameterized(&self) -> bool {
        self.parameters().iter().any(|p| p.is_symbolic())
    }

    fn map_parameters(
        &self,
        mut f: impl FnMut(&ParameterExpression) -> IrResult<ParameterExpression>,
    ) -> IrResult<StandardGate> {
        Ok(match self {
            StandardGate::I => StandardGate::I,
            StandardGate::CSwap => StandardGate::CSwap,
            StandardGate::X(t) => StandardGate::X(f(t)?),
            StandardGate::Y(t) => StandardGate::Y(f(t)?),
            StandardGate::Z(t) => StandardGate::Z(f(t)?),
            StandardGate::H(t) => StandardGate::H(f(t)?),
            StandardGate::CX(t) => StandardGate::CX(f(t)?),
            StandardGate::CZ(t) => StandardGate::CZ(f(t)?),
            StandardGate::Swap(t) => StandardGate::Swap(f(t)?),
            StandardGate::ISwap(t) => StandardGate::ISwap(f(t)?),
            StandardGate::CCX(t) => StandardGate::CCX(f(t)?),
            StandardGate::Rx(p) => StandardGate::Rx(f(p)?),
            StandardGate::Ry(p) => StandardGate::Ry(f(p)?),
            StandardGate::Rz(p) => StandardGate::Rz(f(p)?),
            StandardGate::U(a, b, c) => StandardGate::U(f(a)?, f(b)?, f(c)?),
        })
    }

    /// Replace every parameter by its value under `bindings`.
    pub fn resolve(&self, bindings: &Bindings) -> IrResult<StandardGate> {
        self.map_parameters(|p| p.evaluate(bindings).map(ParameterExpression::Constant))
    }

    /// Raise the gate to `exponent`, which may be symbolic.
    ///
    /// Exponent families multiply their power and rotations their angle.
    /// `U` and `CSwap` fail with [`IrError::UnsupportedPower`].
    pub fn pow(&self, exponent: &ParameterExpression) -> IrResult<StandardGate> {
        match self {
            StandardGate::U(..) | StandardGate::CSwap => Err(IrError::UnsupportedPower {
                gate: self.name().to_string(),
            }),
            _ => self.map_parameters(|p| Ok((p.clone() * exponent.clone()).simplify())),
        }
    }

    /// The gate's matrix. Every parameter must already be a constant.
    pub fn matrix(&self) -> IrResult<Matrix> {
        let values = self
            .parameters()
            .into_iter()
            .map(|p| {
                p.as_f64().filter(|v| v.is_finite()).ok_or_else(|| {
                    match p.symbols().into_iter().next() {
                        Some(symbol) => IrError::UnresolvedParameter(symbol),
                        None => IrError::NonFiniteParameter(p.to_string()),
                    }
                })
            })
            .collect::<IrResult<Vec<f64>>>()?;
        let v = |i: usize| values[i];

        Ok(match self {
            StandardGate::I => matrix::identity(2),
            StandardGate::X(_) => matrix::involution_pow(&matrix::pauli_x(), v(0)),
            StandardGate::Y(_) => matrix::involution_pow(&matrix::pauli_y(), v(0)),
            StandardGate::Z(_) => matrix::z_pow(v(0)),
            StandardGate::H(_) => matrix::involution_pow(&matrix::hadamard(), v(0)),
            StandardGate::CX(_) => {
                matrix::controlled(&matrix::involution_pow(&matrix::pauli_x(), v(0)), 1)
            }
            StandardGate::CZ(_) => matrix::controlled(&matrix::z_pow(v(0)), 1),
            StandardGate::Swap(_) => matrix::involution_pow(&matrix::swap(), v(0)),
            StandardGate::ISwap(_) => matrix::iswap_pow(v(0)),
            StandardGate::CCX(_) => {
                matrix::controlled(&matrix::involution_pow(&matrix::pauli_x(), v(0)), 2)
            }
            StandardGate::Rx(_) => matrix::rx(v(0)),
            StandardGate::Ry(_) => matrix::ry(v(0)),
            StandardGate::Rz(_) => matrix::rz(v(0)),
            StandardGate::U(..) => matrix::u(v(0), v(1), v(2)),
            StandardGate::CSwap => matrix::controlled(&matrix::swap(), 1),
        })
    }
}

impl fmt::Display for StandardGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.name().to_uppercase();
        match self {
            StandardGate::I | StandardGate::CSwap => write!(f, "{label}"),
            StandardGate::Rx(p) | StandardGate::Ry(p) | StandardGate::Rz(p) => {
                write!(f, "{label}({p})")
            }
            StandardGate::U(a, b, c) => write!(f, "U({a}, {b}, {c})"),
            other => match other.exponent() {
                Some(t) if t.is_constant(1.0) => write!(f, "{label}"),
                Some(t) => write!(f, "{label}^{t}"),
                None => write!(f, "{label}"),
            },
        }
    }
}

/// A user-defined gate with an optional explicit unitary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomGate {
    /// The name of the gate.
    pub name: String,
    /// The number of qubits it operates on.
    pub num_qubits: u32,
    /// Optional unitary matrix (row-major, 2^n × 2^n).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matrix: Option<Vec<Complex64>>,
}

impl CustomGate {
    /// Create a new custom gate without a matrix.
    pub fn new(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            matrix: None,
        }
    }

    /// Add a unitary matrix to the gate.
    ///
    /// # Panics
    ///
    /// Panics if `matrix.len()` does not equal `(2^num_qubits)^2`.
    #[must_use]
    pub fn with_matrix(mut self, matrix: Vec<Complex64>) -> Self {
        let dim = 1usize << self.num_qubits;
        assert_eq!(
            matrix.len(),
            dim * dim,
            "Matrix length {} does not match expected {} for {}-qubit gate",
            matrix.len(),
            dim * dim,
            self.num_qubits,
        );
        self.matrix = Some(matrix);
        self
    }

    /// The attached matrix, or `None` when the gate is opaque.
    ///
    /// A matrix whose length does not fit the qubit count or which is not
    /// unitary within [`UNITARY_TOLERANCE`] counts as absent.
    pub fn to_matrix(&self) -> Option<Matrix> {
        let dim = 1usize.checked_shl(self.num_qubits)?;
        let data = self.matrix.as_ref()?;
        if data.len() != dim.checked_mul(dim)? {
            return None;
        }
        let m = Matrix::from_shape_fn((dim, dim), |(i, j)| data[i * dim + j]);
        matrix::is_unitary(&m, UNITARY_TOLERANCE).then_some(m)
    }
}

/// A measurement of one or more qubits, recorded under `key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementGate {
    /// Result key.
    pub key: String,
    /// Number of measured qubits.
    pub num_qubits: u32,
}

impl MeasurementGate {
    /// Create a measurement gate.
    pub fn new(key: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            key: key.into(),
            num_qubits,
        }
    }
}

/// A quantum gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    /// A standard gate with known semantics.
    Standard(StandardGate),
    /// A custom user-defined gate.
    Custom(CustomGate),
    /// A measurement.
    Measure(MeasurementGate),
}

impl Gate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            Gate::Standard(g) => g.name(),
            Gate::Custom(g) => &g.name,
            Gate::Measure(_) => "measure",
        }
    }

    /// Get the number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            Gate::Standard(g) => g.num_qubits(),
            Gate::Custom(g) => g.num_qubits,
            Gate::Measure(m) => m.num_qubits,
        }
    }

    /// Get parameters of this gate.
    pub fn parameters(&self) -> Vec<&ParameterExpression> {
        match self {
            Gate::Standard(g) => g.parameters(),
            Gate::Custom(_) | Gate::Measure(_) => vec![],
        }
    }

    /// Check if any parameter is symbolic.
    pub fn is_parameterized(&self) -> bool {
        matches!(self, Gate::Standard(g) if g.is_parameterized())
    }

    /// Whether this is a measurement.
    pub fn is_measurement(&self) -> bool {
        matches!(self, Gate::Measure(_))
    }

    /// The result key of a measurement.
    pub fn measurement_key(&self) -> Option<&str> {
        match self {
            Gate::Measure(m) => Some(&m.key),
            _ => None,
        }
    }

    /// The standard gate, if this is one.
    pub fn as_standard(&self) -> Option<&StandardGate> {
        match self {
            Gate::Standard(g) => Some(g),
            _ => None,
        }
    }

    /// Replace every parameter by its value under `bindings`.
    pub fn resolve(&self, bindings: &Bindings) -> IrResult<Gate> {
        match self {
            Gate::Standard(g) => Ok(Gate::Standard(g.resolve(bindings)?)),
            other => Ok(other.clone()),
        }
    }

    /// Raise the gate to `exponent`.
    pub fn pow(&self, exponent: impl Into<ParameterExpression>) -> IrResult<Gate> {
        match self {
            Gate::Standard(g) => Ok(Gate::Standard(g.pow(&exponent.into())?)),
            other => Err(IrError::UnsupportedPower {
                gate: other.name().to_string(),
            }),
        }
    }

    /// The gate's matrix after resolving its parameters against `bindings`.
    pub fn unitary(&self, bindings: &Bindings) -> IrResult<Matrix> {
        match self {
            Gate::Standard(g) => g.resolve(bindings)?.matrix(),
            Gate::Custom(g) => g.to_matrix().ok_or_else(|| IrError::NonUnitary {
                gate: g.name.clone(),
            }),
            Gate::Measure(_) => Err(IrError::NonUnitary {
                gate: self.name().to_string(),
            }),
        }
    }

    /// Apply the gate to `qubits`.
    pub fn on(&self, qubits: impl IntoIterator<Item = Qubit>) -> IrResult<Operation> {
        Operation::new(self.clone(), qubits)
    }
}

impl StandardGate {
    /// Apply the gate to `qubits`.
    pub fn on(&self, qubits: impl IntoIterator<Item = Qubit>) -> IrResult<Operation> {
        Operation::new(self.clone(), qubits)
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gate::Standard(g) => write!(f, "{g}"),
            Gate::Custom(g) => write!(f, "{}", g.name),
            Gate::Measure(m) => write!(f, "M('{}')", m.key),
        }
    }
}

impl From<StandardGate> for Gate {
    fn from(gate: StandardGate) -> Self {
        Gate::Standard(gate)
    }
}

impl From<CustomGate> for Gate {
    fn from(gate: CustomGate) -> Self {
        Gate::Custom(gate)
    }
}

impl From<MeasurementGate> for Gate {
    fn from(gate: MeasurementGate) -> Self {
        Gate::Measure(gate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{dagger, identity, is_unitary};
    use std::f64::consts::PI;

    fn all_constant_gates() -> Vec<StandardGate> {
        vec![
            StandardGate::I,
            StandardGate::x_pow(0.3),
            StandardGate::y_pow(0.25),
            StandardGate::z_pow(-0.7),
            StandardGate::h_pow(0.5),
            StandardGate::CX(0.4.into()),
            StandardGate::CZ(1.5.into()),
            StandardGate::Swap(0.5.into()),
            StandardGate::ISwap(0.5.into()),
            StandardGate::CCX(0.9.into()),
            StandardGate::Rx(1.1.into()),
            StandardGate::Ry((-0.2).into()),
            StandardGate::Rz(PI.into()),
            StandardGate::U(0.3.into(), 1.2.into(), (-2.0).into()),
            StandardGate::CSwap,
        ]
    }

    fn equal_up_to_phase(a: &Matrix, b: &Matrix) -> bool {
        let (i, j) = a
            .indexed_iter()
            .max_by(|x, y| x.1.norm().total_cmp(&y.1.norm()))
            .map(|(idx, _)| idx)
            .unwrap();
        let phase = b[[i, j]] / a[[i, j]];
        a.iter().zip(b.iter()).all(|(x, y)| (x * phase - y).norm() < 1e-9)
    }

    #[test]
    fn test_every_family_is_unitary() {
        for gate in all_constant_gates() {
            let m = gate.matrix().unwrap();
            let dim = 1usize << gate.num_qubits();
            assert_eq!(m.dim(), (dim, dim), "{gate}");
            assert!(is_unitary(&m, 1e-9), "{gate} is not unitary");
        }
    }

    #[test]
    fn test_quarter_powers_compose() {
        for gate in [
            StandardGate::x(),
            StandardGate::y(),
            StandardGate::z(),
            StandardGate::h(),
            StandardGate::Rx(0.8.into()),
            StandardGate::Ry(0.8.into()),
            StandardGate::Rz(0.8.into()),
        ] {
            let quarter = gate.pow(&0.25.into()).unwrap().matrix().unwrap();
            let half = gate.pow(&0.5.into()).unwrap().matrix().unwrap();
            assert!(equal_up_to_phase(&quarter.dot(&quarter), &half), "{gate}");
        }
    }

    #[test]
    fn test_pow_is_exact_for_exponent_families() {
        let a = StandardGate::ISwap(0.5.into());
        let twice = a.matrix().unwrap().dot(&a.matrix().unwrap());
        let full = StandardGate::iswap().matrix().unwrap();
        for (x, y) in twice.iter().zip(full.iter()) {
            assert!((x - y).norm() < 1e-12);
        }
    }

    #[test]
    fn test_s_and_t() {
        let s = StandardGate::s().matrix().unwrap();
        assert!((s[[1, 1]] - Complex64::new(0.0, 1.0)).norm() < 1e-12);
        let t = StandardGate::t().matrix().unwrap();
        let tdg = StandardGate::tdg().matrix().unwrap();
        let product = t.dot(&tdg);
        for (x, y) in product.iter().zip(identity(2).iter()) {
            assert!((x - y).norm() < 1e-12);
        }
        for (x, y) in dagger(&t).iter().zip(tdg.iter()) {
            assert!((x - y).norm() < 1e-12);
        }
    }

    #[test]
    fn test_symbolic_pow_then_resolve() {
        let gate = Gate::from(StandardGate::x()).pow("t").unwrap();
        assert!(gate.is_parameterized());
        assert_eq!(gate.to_string(), "X^t");

        let bindings = Bindings::new().with("t", 0.5);
        let resolved = gate.resolve(&bindings).unwrap();
        assert!(!resolved.is_parameterized());
        let direct = StandardGate::x_pow(0.5).matrix().unwrap();
        assert_eq!(resolved.unitary(&Bindings::new()).unwrap(), direct);
        assert_eq!(gate.unitary(&bindings).unwrap(), direct);
    }

    #[test]
    fn test_unresolved_parameter_is_reported() {
        let gate = Gate::from(StandardGate::Rz(ParameterExpression::symbol("theta")));
        let err = gate.unitary(&Bindings::new()).unwrap_err();
        assert_eq!(err, IrError::UnresolvedParameter("theta".into()));
    }

    #[test]
    fn test_unsupported_powers() {
        let u = Gate::from(StandardGate::U(0.1.into(), 0.2.into(), 0.3.into()));
        assert!(matches!(u.pow(0.5), Err(IrError::UnsupportedPower { .. })));
        let m = Gate::from(MeasurementGate::new("m", 1));
        assert!(matches!(m.pow(2.0), Err(IrError::UnsupportedPower { .. })));
        assert_eq!(Gate::from(StandardGate::I).pow(0.3).unwrap(), StandardGate::I.into());
    }

    #[test]
    fn test_non_unitary_gates() {
        let m = Gate::from(MeasurementGate::new("m", 2));
        assert!(matches!(m.unitary(&Bindings::new()), Err(IrError::NonUnitary { .. })));
        let opaque = Gate::from(CustomGate::new("oracle", 1));
        assert!(matches!(
            opaque.unitary(&Bindings::new()),
            Err(IrError::NonUnitary { .. })
        ));
    }

    #[test]
    fn test_custom_gate_matrix() {
        let one = Complex64::new(1.0, 0.0);
        let zero = Complex64::new(0.0, 0.0);
        let gate = Gate::from(CustomGate::new("flip", 1).with_matrix(vec![zero, one, one, zero]));
        let m = gate.unitary(&Bindings::new()).unwrap();
        assert_eq!(m, crate::matrix::pauli_x());
    }

    #[test]
    fn test_custom_matrix_must_be_unitary() {
        let one = Complex64::new(1.0, 0.0);
        let ones = Gate::from(CustomGate::new("ones", 1).with_matrix(vec![one; 4]));
        assert_eq!(
            ones.unitary(&Bindings::new()),
            Err(IrError::NonUnitary {
                gate: "ones".into()
            })
        );

        let scaled = CustomGate::new("scaled", 1).with_matrix(vec![
            Complex64::new(2.0, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(2.0, 0.0),
        ]);
        assert!(scaled.to_matrix().is_none());
    }

    #[test]
    fn test_custom_matrix_with_wrong_length_is_opaque() {
        let json = r#"{"name":"short","num_qubits":1,"matrix":[[1.0,0.0],[0.0,0.0]]}"#;
        let gate: CustomGate = serde_json::from_str(json).unwrap();
        assert!(gate.to_matrix().is_none());
        assert!(matches!(
            Gate::from(gate).unitary(&Bindings::new()),
            Err(IrError::NonUnitary { .. })
        ));
    }

    #[test]
    fn test_names_and_arity() {
        assert_eq!(StandardGate::h().name(), "h");
        assert_eq!(StandardGate::cx().num_qubits(), 2);
        assert_eq!(StandardGate::ccx().num_qubits(), 3);
        assert_eq!(Gate::from(MeasurementGate::new("k", 3)).num_qubits(), 3);
        assert_eq!(StandardGate::y_pow(0.25).to_string(), "Y^0.25");
        assert_eq!(StandardGate::swap().to_string(), "SWAP");
    }
}
