//! Qubit identities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An addressable qubit.
///
/// Qubits are plain identities: two qubits are equal iff they name the same
/// position. Line qubits order by index and grid qubits by `(row, col)`; every
/// line qubit orders before every grid qubit. That total order is the default
/// axis order when a circuit's unitary or state vector is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Qubit {
    /// A qubit on a line, identified by its index.
    Line(u32),
    /// A qubit on a 2D grid.
    Grid {
        /// Row coordinate.
        row: i32,
        /// Column coordinate.
        col: i32,
    },
}

impl Qubit {
    /// Create a line qubit.
    #[inline]
    pub const fn line(index: u32) -> Self {
        Qubit::Line(index)
    }

    /// Create a grid qubit.
    #[inline]
    pub const fn grid(row: i32, col: i32) -> Self {
        Qubit::Grid { row, col }
    }

    /// The line qubits `0..n`.
    pub fn line_range(n: u32) -> Vec<Qubit> {
        (0..n).map(Qubit::Line).collect()
    }

    /// All grid qubits of a `rows × cols` rectangle in row-major order.
    pub fn grid_rect(rows: i32, cols: i32) -> Vec<Qubit> {
        (0..rows)
            .flat_map(|row| (0..cols).map(move |col| Qubit::Grid { row, col }))
            .collect()
    }

    /// Whether `other` is a nearest neighbour of this qubit.
    ///
    /// Line qubits neighbour at index distance 1, grid qubits at Manhattan
    /// distance 1. Qubits of different kinds are never neighbours.
    pub fn is_neighbor(&self, other: &Qubit) -> bool {
        match (self, other) {
            (Qubit::Line(a), Qubit::Line(b)) => a.abs_diff(*b) == 1,
            (Qubit::Grid { row: r1, col: c1 }, Qubit::Grid { row: r2, col: c2 }) => {
                r1.abs_diff(*r2) + c1.abs_diff(*c2) == 1
            }
            _ => false,
        }
    }
}

impl fmt::Display for Qubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Qubit::Line(index) => write!(f, "q{index}"),
            Qubit::Grid { row, col } => write!(f, "q({row}, {col})"),
        }
    }
}

impl From<u32> for Qubit {
    fn from(index: u32) -> Self {
        Qubit::Line(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(Qubit::line(0) < Qubit::line(1));
        assert!(Qubit::line(1_000) < Qubit::grid(-5, -5));
        assert!(Qubit::grid(0, 3) < Qubit::grid(1, 0));
        assert!(Qubit::grid(1, 0) < Qubit::grid(1, 1));
    }

    #[test]
    fn test_line_range() {
        let qubits = Qubit::line_range(3);
        assert_eq!(qubits, vec![Qubit::line(0), Qubit::line(1), Qubit::line(2)]);
        assert!(Qubit::line_range(0).is_empty());
    }

    #[test]
    fn test_grid_rect_is_sorted() {
        let qubits = Qubit::grid_rect(2, 3);
        assert_eq!(qubits.len(), 6);
        assert!(qubits.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(qubits[4], Qubit::grid(1, 1));
    }

    #[test]
    fn test_neighbors() {
        assert!(Qubit::line(3).is_neighbor(&Qubit::line(4)));
        assert!(!Qubit::line(3).is_neighbor(&Qubit::line(5)));
        assert!(Qubit::grid(1, 1).is_neighbor(&Qubit::grid(0, 1)));
        assert!(!Qubit::grid(1, 1).is_neighbor(&Qubit::grid(0, 0)));
        assert!(!Qubit::line(0).is_neighbor(&Qubit::grid(0, 1)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Qubit::line(2).to_string(), "q2");
        assert_eq!(Qubit::grid(1, -1).to_string(), "q(1, -1)");
    }
}
