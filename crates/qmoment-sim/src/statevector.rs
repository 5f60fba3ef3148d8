//! Statevector simulation engine.

use num_complex::Complex64;
use rand::Rng;
use std::fmt;

use qmoment_ir::{Bindings, IrError, Matrix, Operation, Qubit};

use crate::error::{SimError, SimResult};

/// Widest register a statevector can hold; `2^30` amplitudes take 16 GiB.
pub const MAX_SUPPORTED_QUBITS: usize = 30;

/// A pure state over an ordered list of qubits.
///
/// Qubit `k` of the order is axis `k`, stored as bit `n - 1 - k` of the
/// amplitude index, so the first qubit is the most significant bit. This is
/// the same convention as the unitary composition in `qmoment-compile`.
#[derive(Debug, Clone, PartialEq)]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Qubit order.
    qubits: Vec<Qubit>,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    ///
    /// Fails with [`SimError::TooManyQubits`] above [`MAX_SUPPORTED_QUBITS`].
    pub fn new(qubits: Vec<Qubit>) -> SimResult<Self> {
        if qubits.len() > MAX_SUPPORTED_QUBITS {
            return Err(SimError::TooManyQubits {
                requested: qubits.len(),
                max: MAX_SUPPORTED_QUBITS,
            });
        }
        let size = 1usize << qubits.len();
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Ok(Self { amplitudes, qubits })
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// The qubit order.
    pub fn qubits(&self) -> &[Qubit] {
        &self.qubits
    }

    /// The amplitudes in index order.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Squared norm; 1 up to rounding.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(Complex64::norm_sqr).sum()
    }

    /// Born-rule probability of every basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Axes of `qubits` in this state's order.
    pub fn axes(&self, qubits: &[Qubit]) -> SimResult<Vec<usize>> {
        qubits
            .iter()
            .map(|q| {
                self.qubits
                    .iter()
                    .position(|o| o == q)
                    .ok_or_else(|| IrError::UnknownQubit(*q).into())
            })
            .collect()
    }

    /// Apply a resolved unitary operation.
    pub fn apply_operation(&mut self, op: &Operation) -> SimResult<()> {
        let matrix = op.unitary(&Bindings::new())?;
        let axes = self.axes(op.qubits())?;
        self.apply_matrix(&matrix, &axes);
        Ok(())
    }

    /// Apply a `2^k × 2^k` matrix to the given axes.
    ///
    /// The first axis receives the most significant bit of the matrix index.
    pub fn apply_matrix(&mut self, matrix: &Matrix, axes: &[usize]) {
        let n = self.num_qubits();
        let k = axes.len();
        let masks: Vec<usize> = axes.iter().map(|a| 1 << (n - 1 - a)).collect();
        let all = masks.iter().fold(0, |acc, m| acc | m);
        let offsets: Vec<usize> = (0..1usize << k)
            .map(|j| {
                (0..k)
                    .filter(|i| (j >> (k - 1 - i)) & 1 == 1)
                    .fold(0, |acc, i| acc | masks[i])
            })
            .collect();

        let mut local = vec![Complex64::new(0.0, 0.0); offsets.len()];
        for base in (0..self.amplitudes.len()).filter(|b| b & all == 0) {
            for (slot, off) in local.iter_mut().zip(&offsets) {
                *slot = self.amplitudes[base | off];
            }
            for (row, off) in offsets.iter().enumerate() {
                self.amplitudes[base | off] = local
                    .iter()
                    .enumerate()
                    .map(|(col, amp)| matrix[[row, col]] * amp)
                    .sum();
            }
        }
    }

    /// The bits of basis state `index` on `axes`, in axis order.
    pub fn bits_of(&self, index: usize, axes: &[usize]) -> Vec<bool> {
        let n = self.num_qubits();
        axes.iter().map(|a| (index >> (n - 1 - a)) & 1 == 1).collect()
    }

    /// Draw one basis state index.
    pub fn sample_index<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let cdf = self.cumulative();
        draw(&cdf, rng)
    }

    /// Draw `repetitions` basis state indices from one distribution.
    pub fn sample_indices<R: Rng + ?Sized>(&self, rng: &mut R, repetitions: usize) -> Vec<usize> {
        let cdf = self.cumulative();
        (0..repetitions).map(|_| draw(&cdf, rng)).collect()
    }

    /// Measure `axes` projectively, collapsing the state.
    ///
    /// Returns the observed bits in axis order.
    pub fn measure<R: Rng + ?Sized>(&mut self, axes: &[usize], rng: &mut R) -> Vec<bool> {
        let outcome = self.sample_index(rng);
        let bits = self.bits_of(outcome, axes);

        let n = self.num_qubits();
        let mut norm_sq = 0.0;
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            let matches = axes
                .iter()
                .zip(&bits)
                .all(|(a, b)| ((i >> (n - 1 - a)) & 1 == 1) == *b);
            if matches {
                norm_sq += amp.norm_sqr();
            } else {
                *amp = Complex64::new(0.0, 0.0);
            }
        }
        let norm = norm_sq.sqrt();
        if norm > 0.0 {
            for amp in &mut self.amplitudes {
                *amp /= norm;
            }
        }
        bits
    }

    fn cumulative(&self) -> Vec<f64> {
        self.amplitudes
            .iter()
            .scan(0.0, |acc, amp| {
                *acc += amp.norm_sqr();
                Some(*acc)
            })
            .collect()
    }
}

fn draw<R: Rng + ?Sized>(cdf: &[f64], rng: &mut R) -> usize {
    let total = cdf.last().copied().unwrap_or(1.0);
    let r: f64 = rng.r#gen::<f64>() * total;
    cdf.partition_point(|&c| c <= r).min(cdf.len() - 1)
}

impl fmt::Display for Statevector {
    /// Nonzero amplitudes in ket notation, e.g. `0.707|00⟩ + 0.707|11⟩`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.num_qubits();
        let mut first = true;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            if amp.norm() < 1e-10 {
                continue;
            }
            if !first {
                write!(f, " + ")?;
            }
            first = false;
            if amp.im.abs() < 1e-10 {
                write!(f, "{:.3}", amp.re)?;
            } else {
                write!(f, "({:.3}{:+.3}i)", amp.re, amp.im)?;
            }
            write!(f, "|{i:0n$b}⟩")?;
        }
        if first {
            write!(f, "0")?;
        }
        Ok(())
    }
}
