//! Single-qubit Pauli symbols and their algebra.

use std::fmt;

use num_complex::Complex;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};

/// Exact phase picked up when multiplying Pauli symbols: one of `±1`, `±i`.
pub type Coefficient = Complex<i32>;

/// The phase `1`.
pub const PHASE_ONE: Coefficient = Complex::new(1, 0);

/// The phase `i`.
pub const PHASE_I: Coefficient = Complex::new(0, 1);

/// A single-qubit Pauli symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PauliOperator {
    /// Identity.
    #[default]
    I,
    /// Pauli X.
    X,
    /// Pauli Y.
    Y,
    /// Pauli Z.
    Z,
}

impl PauliOperator {
    /// All four symbols, identity first.
    pub const ALL: [PauliOperator; 4] = [Self::I, Self::X, Self::Y, Self::Z];

    /// Parse a symbol from its letter.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(Self::I),
            'X' => Some(Self::X),
            'Y' => Some(Self::Y),
            'Z' => Some(Self::Z),
            _ => None,
        }
    }

    /// Parse an operator string such as `"XIZY"`, one symbol per qubit.
    pub fn parse_string(ops: &str) -> IrResult<Vec<PauliOperator>> {
        ops.chars()
            .map(|c| Self::from_char(c).ok_or(IrError::InvalidPauliSymbol(c)))
            .collect()
    }

    /// The letter of this symbol.
    pub fn as_char(self) -> char {
        match self {
            Self::I => 'I',
            Self::X => 'X',
            Self::Y => 'Y',
            Self::Z => 'Z',
        }
    }

    /// Check if this is the identity.
    #[inline]
    pub fn is_identity(self) -> bool {
        self == Self::I
    }

    /// Check if two symbols commute.
    ///
    /// The identity commutes with everything and every symbol commutes with
    /// itself. Distinct non-identity symbols anti-commute.
    #[inline]
    pub fn commutes_with(self, other: Self) -> bool {
        self == other || self.is_identity() || other.is_identity()
    }

    /// Multiply two symbols, returning the phase and the resulting symbol.
    ///
    /// | lhs · rhs | result |
    /// |-----------|--------|
    /// | Z · X | +iY |
    /// | X · Z | −iY |
    /// | X · Y | +iZ |
    /// | Y · X | −iZ |
    /// | Y · Z | +iX |
    /// | Z · Y | −iX |
    pub fn multiply(self, rhs: Self) -> (Coefficient, Self) {
        use PauliOperator::{I, X, Y, Z};
        match (self, rhs) {
            (I, op) | (op, I) => (PHASE_ONE, op),
            (X, X) | (Y, Y) | (Z, Z) => (PHASE_ONE, I),
            (Z, X) => (PHASE_I, Y),
            (X, Z) => (-PHASE_I, Y),
            (X, Y) => (PHASE_I, Z),
            (Y, X) => (-PHASE_I, Z),
            (Y, Z) => (PHASE_I, X),
            (Z, Y) => (-PHASE_I, X),
        }
    }
}

impl fmt::Display for PauliOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Count the positions where two operator strings anti-commute.
///
/// Both slices are assumed to have the same length; extra positions are ignored.
pub(crate) fn anticommuting_positions(lhs: &[PauliOperator], rhs: &[PauliOperator]) -> usize {
    lhs.iter()
        .zip(rhs)
        .filter(|(a, b)| !a.commutes_with(**b))
        .count()
}

/// Multiply two operator strings position by position.
///
/// Returns the accumulated phase and the product string.
pub(crate) fn multiply_strings(
    lhs: &[PauliOperator],
    rhs: &[PauliOperator],
) -> (Coefficient, Vec<PauliOperator>) {
    let mut coefficient = PHASE_ONE;
    let ops = lhs
        .iter()
        .zip(rhs)
        .map(|(a, b)| {
            let (phase, op) = a.multiply(*b);
            coefficient *= phase;
            op
        })
        .collect();
    (coefficient, ops)
}
