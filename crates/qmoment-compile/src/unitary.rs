//! Unitary composition.
//!
//! Builds the matrix of an operation, a moment or a whole circuit by
//! embedding each operation's matrix into the full Hilbert space. Axis `k`
//! of the full space is the `k`-th qubit of the qubit order, most
//! significant first. Also provides [`Unitary2x2`], the fixed-size algebra
//! the single-qubit optimizer works in.

use ndarray::Array2;
use num_complex::Complex64;
use std::f64::consts::PI;

use qmoment_ir::{Bindings, Circuit, IrError, IrResult, Matrix, Moment, Operation, Qubit};

pub use qmoment_ir::matrix::{dagger, identity, is_unitary, kron};

/// Tolerance for floating point comparisons.
pub(crate) const EPSILON: f64 = 1e-10;

// =========================================================================
// Composition
// =========================================================================

/// The unitary of a single operation, in its own qubit order.
pub fn operation_unitary(op: &Operation, bindings: &Bindings) -> IrResult<Matrix> {
    op.unitary(bindings)
}

/// Positions of `qubits` within `order`.
fn axes_of(qubits: &[Qubit], order: &[Qubit]) -> IrResult<Vec<usize>> {
    qubits
        .iter()
        .map(|q| {
            order
                .iter()
                .position(|o| o == q)
                .ok_or(IrError::UnknownQubit(*q))
        })
        .collect()
}

/// Embed a `2^k × 2^k` matrix acting on `axes` into an `n`-qubit space.
///
/// The `i`-th axis receives the `i`-th most significant bit of the small
/// matrix's index. Qubits outside `axes` carry identity.
pub fn embed(matrix: &Matrix, axes: &[usize], num_qubits: usize) -> Matrix {
    let k = axes.len();
    let dim = 1usize << num_qubits;
    let masks: Vec<usize> = axes.iter().map(|a| 1usize << (num_qubits - 1 - a)).collect();
    let all = masks.iter().fold(0, |acc, m| acc | m);
    let offsets: Vec<usize> = (0..1usize << k)
        .map(|j| {
            (0..k)
                .filter(|i| (j >> (k - 1 - i)) & 1 == 1)
                .fold(0, |acc, i| acc | masks[i])
        })
        .collect();

    let mut full = Array2::from_elem((dim, dim), Complex64::new(0.0, 0.0));
    for base in (0..dim).filter(|b| b & all == 0) {
        for (row, r_off) in offsets.iter().enumerate() {
            for (col, c_off) in offsets.iter().enumerate() {
                full[[base | r_off, base | c_off]] = matrix[[row, col]];
            }
        }
    }
    full
}

/// The unitary of one moment over `qubit_order`.
///
/// Operations in a moment act on disjoint qubits, so their embedded factors
/// commute and the product equals the ordered tensor product of the factors.
pub fn moment_unitary(
    moment: &Moment,
    qubit_order: &[Qubit],
    bindings: &Bindings,
) -> IrResult<Matrix> {
    let n = qubit_order.len();
    let mut result = identity(1 << n);
    for op in moment.operations() {
        let axes = axes_of(op.qubits(), qubit_order)?;
        let factor = embed(&op.unitary(bindings)?, &axes, n);
        result = factor.dot(&result);
    }
    Ok(result)
}

/// The unitary of `circuit` over its own qubits in qubit order.
///
/// `U = U_last · … · U_first`. Fails with [`IrError::NonUnitary`] if the
/// circuit contains a measurement or an opaque gate.
pub fn circuit_unitary(circuit: &Circuit, bindings: &Bindings) -> IrResult<Matrix> {
    let order: Vec<Qubit> = circuit.all_qubits().into_iter().collect();
    circuit_unitary_with_order(circuit, &order, bindings)
}

/// The unitary of `circuit` over an explicit qubit order.
///
/// The order may include qubits the circuit never touches; every qubit the
/// circuit does touch must be present.
pub fn circuit_unitary_with_order(
    circuit: &Circuit,
    qubit_order: &[Qubit],
    bindings: &Bindings,
) -> IrResult<Matrix> {
    let mut result = identity(1 << qubit_order.len());
    for moment in circuit.moments() {
        result = moment_unitary(moment, qubit_order, bindings)?.dot(&result);
    }
    Ok(result)
}

/// Whether `a = e^{iφ} b` for some global phase `φ`, entrywise within `atol`.
pub fn allclose_up_to_global_phase(a: &Matrix, b: &Matrix, atol: f64) -> bool {
    if a.dim() != b.dim() {
        return false;
    }
    let Some((idx, pivot)) = a
        .indexed_iter()
        .max_by(|x, y| x.1.norm().total_cmp(&y.1.norm()))
    else {
        return true;
    };
    if pivot.norm() <= atol {
        return b.iter().all(|z| z.norm() <= atol);
    }
    let ratio = b[idx] / pivot;
    if ratio.norm() <= EPSILON {
        return false;
    }
    let phase = ratio / ratio.norm();
    a.iter()
        .zip(b.iter())
        .all(|(x, y)| (x * phase - y).norm() <= atol)
}

// =========================================================================
// 2×2 algebra
// =========================================================================

/// A 2x2 unitary matrix in row-major order.
#[derive(Debug, Clone, Copy)]
pub struct Unitary2x2 {
    /// The matrix elements in row-major order: [[a, b], [c, d]].
    pub data: [Complex64; 4],
}

impl Unitary2x2 {
    /// Create a new 2x2 unitary matrix.
    pub fn new(a: Complex64, b: Complex64, c: Complex64, d: Complex64) -> Self {
        Self { data: [a, b, c, d] }
    }

    /// Create the identity matrix.
    pub fn identity() -> Self {
        let one = Complex64::new(1.0, 0.0);
        let zero = Complex64::new(0.0, 0.0);
        Self::new(one, zero, zero, one)
    }

    /// Take a dense 2×2 matrix; `None` for any other shape.
    pub fn from_matrix(m: &Matrix) -> Option<Self> {
        (m.dim() == (2, 2)).then(|| Self::new(m[[0, 0]], m[[0, 1]], m[[1, 0]], m[[1, 1]]))
    }

    /// The dense form.
    pub fn to_matrix(&self) -> Matrix {
        let [a, b, c, d] = self.data;
        ndarray::arr2(&[[a, b], [c, d]])
    }

    /// Create an RY rotation matrix.
    pub fn ry(theta: f64) -> Self {
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        Self::new(
            Complex64::new(c, 0.0),
            Complex64::new(-s, 0.0),
            Complex64::new(s, 0.0),
            Complex64::new(c, 0.0),
        )
    }

    /// Create an RZ rotation matrix.
    pub fn rz(theta: f64) -> Self {
        Self::new(
            Complex64::from_polar(1.0, -theta / 2.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::from_polar(1.0, theta / 2.0),
        )
    }

    /// Multiply this matrix by another: self * other.
    #[allow(clippy::many_single_char_names)]
    pub fn mul(&self, other: &Self) -> Self {
        let [a, b, c, d] = self.data;
        let [e, f, g, h] = other.data;
        Self::new(a * e + b * g, a * f + b * h, c * e + d * g, c * f + d * h)
    }

    /// Get the conjugate transpose (dagger).
    pub fn dagger(&self) -> Self {
        Self::new(
            self.data[0].conj(),
            self.data[2].conj(),
            self.data[1].conj(),
            self.data[3].conj(),
        )
    }

    /// Check if this is approximately identity (up to global phase).
    pub fn is_identity(&self) -> bool {
        let [a, b, c, d] = self.data;
        if b.norm() > EPSILON || c.norm() > EPSILON {
            return false;
        }
        (a - d).norm() < EPSILON
    }

    /// Decompose into RZ(alpha) * RY(beta) * RZ(gamma) * `global_phase`.
    ///
    /// Returns (alpha, beta, gamma, `global_phase`) with `beta` in `[0, π]`.
    pub fn zyz_decomposition(&self) -> (f64, f64, f64, f64) {
        let [a, b, c, d] = self.data;

        let det = a * d - b * c;
        let global_phase = det.arg() / 2.0;

        // Remove global phase to get an SU(2) matrix:
        // [[cos(β/2) e^{-i(α+γ)/2}, -sin(β/2) e^{-i(α-γ)/2}],
        //  [sin(β/2) e^{ i(α-γ)/2},  cos(β/2) e^{ i(α+γ)/2}]]
        let phase_factor = Complex64::from_polar(1.0, -global_phase);
        let a = a * phase_factor;
        let b = b * phase_factor;
        let c = c * phase_factor;

        // atan2 stays finite where acos(|a|) would see |a| > 1 from rounding.
        let beta = 2.0 * c.norm().atan2(a.norm());

        if beta.abs() < EPSILON {
            let alpha_plus_gamma = -2.0 * a.arg();
            return (
                alpha_plus_gamma / 2.0,
                0.0,
                alpha_plus_gamma / 2.0,
                global_phase,
            );
        }

        if (beta - PI).abs() < EPSILON {
            let alpha_minus_gamma = -2.0 * (-b).arg();
            return (
                alpha_minus_gamma / 2.0,
                PI,
                -alpha_minus_gamma / 2.0,
                global_phase,
            );
        }

        let alpha_plus_gamma = -2.0 * a.arg();
        let alpha_minus_gamma = 2.0 * c.arg();

        let alpha = f64::midpoint(alpha_plus_gamma, alpha_minus_gamma);
        let gamma = (alpha_plus_gamma - alpha_minus_gamma) / 2.0;

        (alpha, beta, gamma, global_phase)
    }

    /// Normalize angles to [-pi, pi].
    pub fn normalize_angle(angle: f64) -> f64 {
        if angle.is_nan() || angle.is_infinite() {
            return 0.0;
        }
        let mut a = angle.rem_euclid(2.0 * PI);
        if a > PI {
            a -= 2.0 * PI;
        }
        a
    }
}

impl Default for Unitary2x2 {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::ops::Mul for Unitary2x2 {
    type Output = Self;

    #[allow(clippy::needless_pass_by_value)]
    fn mul(self, rhs: Self) -> Self::Output {
        Unitary2x2::mul(&self, &rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qmoment_ir::{StandardGate, matrix};

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    fn u2(gate: StandardGate) -> Unitary2x2 {
        Unitary2x2::from_matrix(&gate.matrix().unwrap()).unwrap()
    }

    fn assert_reconstructs(u: Unitary2x2) {
        let (alpha, beta, gamma, phase) = u.zyz_decomposition();
        let reconstructed = Unitary2x2::rz(alpha) * Unitary2x2::ry(beta) * Unitary2x2::rz(gamma);
        let global = Complex64::from_polar(1.0, phase);

        for i in 0..4 {
            let expected = u.data[i];
            let got = reconstructed.data[i] * global;
            assert!(
                (expected - got).norm() < 1e-6,
                "Mismatch at {i}: expected {expected:?}, got {got:?}"
            );
        }
    }

    #[test]
    fn test_identity() {
        assert!(Unitary2x2::identity().is_identity());
    }

    #[test]
    fn test_hadamard_squared() {
        let h = u2(StandardGate::h());
        assert!((h * h).is_identity());
    }

    #[test]
    fn test_dagger_inverts() {
        let v = u2(StandardGate::y_pow(0.3));
        assert!((v * v.dagger()).is_identity());
    }

    #[test]
    fn test_zyz_identity() {
        let (_alpha, beta, _gamma, _phase) = Unitary2x2::identity().zyz_decomposition();
        assert!(approx_eq(beta, 0.0));
    }

    #[test]
    fn test_zyz_reconstructs() {
        for gate in [
            StandardGate::h(),
            StandardGate::x(),
            StandardGate::y(),
            StandardGate::s(),
            StandardGate::x_pow(0.5),
            StandardGate::U(0.4.into(), (-1.3).into(), 2.2.into()),
        ] {
            assert_reconstructs(u2(gate));
        }
    }

    #[test]
    fn test_zyz_near_identity_stays_finite() {
        // A product that drifts slightly outside the unit disc.
        let mut u = Unitary2x2::identity();
        let step = u2(StandardGate::Rz((1e-3).into()));
        for _ in 0..10_000 {
            u = step * u;
        }
        let (alpha, beta, gamma, phase) = u.zyz_decomposition();
        assert!(alpha.is_finite() && beta.is_finite() && gamma.is_finite() && phase.is_finite());
        assert_reconstructs(u);
    }

    #[test]
    fn test_normalize_angle() {
        assert!(approx_eq(Unitary2x2::normalize_angle(3.0 * PI), PI));
        assert!(approx_eq(Unitary2x2::normalize_angle(-PI / 2.0), -PI / 2.0));
        assert_eq!(Unitary2x2::normalize_angle(f64::NAN), 0.0);
    }

    #[test]
    fn test_embed_matches_kron() {
        let x = matrix::pauli_x();
        let z = matrix::pauli_z();
        // X on axis 0, identity on axis 1.
        assert_eq!(embed(&x, &[0], 2), kron(&x, &identity(2)));
        assert_eq!(embed(&z, &[1], 2), kron(&identity(2), &z));
    }

    #[test]
    fn test_embed_reversed_axes() {
        // CX with control on axis 1 and target on axis 0.
        let cx = StandardGate::cx().matrix().unwrap();
        let full = embed(&cx, &[1, 0], 2);
        // |01> (axis 1 set) maps to |11>.
        assert!((full[[3, 1]] - Complex64::new(1.0, 0.0)).norm() < 1e-12);
        assert!(full[[1, 1]].norm() < 1e-12);
    }

    #[test]
    fn test_allclose_up_to_global_phase() {
        let h = matrix::hadamard();
        let phased = h.mapv(|z| z * Complex64::from_polar(1.0, 0.7));
        assert!(allclose_up_to_global_phase(&h, &phased, 1e-9));
        assert!(!allclose_up_to_global_phase(&h, &matrix::pauli_x(), 1e-9));
        assert!(!allclose_up_to_global_phase(&h, &identity(4), 1e-9));
    }
}
