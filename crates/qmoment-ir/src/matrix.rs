//! Dense complex matrices for gate unitaries.
//!
//! Every matrix here uses big-endian qubit order: the first qubit an
//! operation acts on is the most significant bit of the row/column index.

use ndarray::{Array2, arr2};
use num_complex::Complex64;
use std::f64::consts::PI;

/// A dense complex matrix.
pub type Matrix = Array2<Complex64>;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

/// The `dim × dim` identity.
pub fn identity(dim: usize) -> Matrix {
    Array2::from_shape_fn((dim, dim), |(i, j)| if i == j { ONE } else { ZERO })
}

/// Kronecker (tensor) product `a ⊗ b`; `a` occupies the high bits.
pub fn kron(a: &Matrix, b: &Matrix) -> Matrix {
    let (ar, ac) = a.dim();
    let (br, bc) = b.dim();
    Array2::from_shape_fn((ar * br, ac * bc), |(i, j)| {
        a[[i / br, j / bc]] * b[[i % br, j % bc]]
    })
}

/// Conjugate transpose.
pub fn dagger(m: &Matrix) -> Matrix {
    m.t().mapv(|z| z.conj())
}

/// Whether `m · m† ≈ I` entrywise within `tolerance`.
pub fn is_unitary(m: &Matrix, tolerance: f64) -> bool {
    let (rows, cols) = m.dim();
    if rows != cols {
        return false;
    }
    let product = m.dot(&dagger(m));
    product
        .indexed_iter()
        .all(|((i, j), z)| (z - if i == j { ONE } else { ZERO }).norm() <= tolerance)
}

/// `ca · a + cb · b`.
fn combine(ca: Complex64, a: &Matrix, cb: Complex64, b: &Matrix) -> Matrix {
    Array2::from_shape_fn(a.dim(), |idx| ca * a[idx] + cb * b[idx])
}

/// `e^{iπt}`, exact when `2t` is an integer.
fn half_turn_phase(t: f64) -> Complex64 {
    let quarters = 2.0 * t;
    if quarters.fract() != 0.0 {
        return Complex64::from_polar(1.0, PI * t);
    }
    match quarters.rem_euclid(4.0) as u8 {
        0 => ONE,
        1 => I,
        2 => -ONE,
        _ => -I,
    }
}

/// `P^t = (I + P)/2 + e^{iπt} (I − P)/2` for an involution `P`.
///
/// Exponents add under multiplication: `P^a · P^b = P^{a+b}`.
pub fn involution_pow(p: &Matrix, t: f64) -> Matrix {
    let eye = identity(p.nrows());
    let half = Complex64::new(0.5, 0.0);
    let phase = half_turn_phase(t) * half;
    let plus = combine(ONE, &eye, ONE, p);
    let minus = combine(ONE, &eye, -ONE, p);
    combine(half, &plus, phase, &minus)
}

/// The matrix acting as `target` when all `num_controls` leading qubits are 1.
pub fn controlled(target: &Matrix, num_controls: u32) -> Matrix {
    let inner = target.nrows();
    let dim = inner << num_controls;
    let offset = dim - inner;
    let mut m = identity(dim);
    for ((i, j), z) in target.indexed_iter() {
        m[[offset + i, offset + j]] = *z;
    }
    m
}

/// Pauli X.
pub fn pauli_x() -> Matrix {
    arr2(&[[ZERO, ONE], [ONE, ZERO]])
}

/// Pauli Y.
pub fn pauli_y() -> Matrix {
    arr2(&[[ZERO, -I], [I, ZERO]])
}

/// Pauli Z.
pub fn pauli_z() -> Matrix {
    arr2(&[[ONE, ZERO], [ZERO, -ONE]])
}

/// Hadamard.
pub fn hadamard() -> Matrix {
    let s = Complex64::new(std::f64::consts::FRAC_1_SQRT_2, 0.0);
    arr2(&[[s, s], [s, -s]])
}

/// Two-qubit SWAP.
pub fn swap() -> Matrix {
    let mut m = Array2::from_elem((4, 4), ZERO);
    m[[0, 0]] = ONE;
    m[[1, 2]] = ONE;
    m[[2, 1]] = ONE;
    m[[3, 3]] = ONE;
    m
}

/// `diag(1, e^{iπt})`.
pub fn z_pow(t: f64) -> Matrix {
    arr2(&[[ONE, ZERO], [ZERO, half_turn_phase(t)]])
}

/// `ISWAP^t`: rotates the `|01>, |10>` subspace.
pub fn iswap_pow(t: f64) -> Matrix {
    let c = Complex64::new((PI * t / 2.0).cos(), 0.0);
    let s = I * (PI * t / 2.0).sin();
    let mut m = identity(4);
    m[[1, 1]] = c;
    m[[1, 2]] = s;
    m[[2, 1]] = s;
    m[[2, 2]] = c;
    m
}

/// Rotation about X.
pub fn rx(theta: f64) -> Matrix {
    let c = Complex64::new((theta / 2.0).cos(), 0.0);
    let s = Complex64::new(0.0, -(theta / 2.0).sin());
    arr2(&[[c, s], [s, c]])
}

/// Rotation about Y.
pub fn ry(theta: f64) -> Matrix {
    let c = Complex64::new((theta / 2.0).cos(), 0.0);
    let s = Complex64::new((theta / 2.0).sin(), 0.0);
    arr2(&[[c, -s], [s, c]])
}

/// Rotation about Z.
pub fn rz(theta: f64) -> Matrix {
    arr2(&[
        [Complex64::from_polar(1.0, -theta / 2.0), ZERO],
        [ZERO, Complex64::from_polar(1.0, theta / 2.0)],
    ])
}

/// Universal single-qubit gate `U(θ, φ, λ)`.
pub fn u(theta: f64, phi: f64, lambda: f64) -> Matrix {
    let c = (theta / 2.0).cos();
    let s = (theta / 2.0).sin();
    arr2(&[
        [Complex64::new(c, 0.0), -Complex64::from_polar(s, lambda)],
        [
            Complex64::from_polar(s, phi),
            Complex64::from_polar(c, phi + lambda),
        ],
    ])
}
