//! Clifford+T approximations for rotations outside the basic set.
//!
//! Rotations by angles that do not split into `π/2`, `π/4` and `π/8` terms are
//! replaced by a gate sequence from an external approximation source. Each
//! gate maps to basic rotations on the rotation's own axis:
//!
//! | Gate | Rotations (Z axis) |
//! |------|--------------------|
//! | `S` | `Z(1/4)` |
//! | `T` | `Z(1/8)` |
//! | `X` | `X(1/2)` |
//! | `H` | `X(1/4) Z(1/4) X(1/4)` |
//!
//! For an X-axis rotation the roles of X and Z are exchanged.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::angle::Angle;
use crate::error::{IrError, IrResult};
use crate::pauli::PauliOperator;

/// A gate in an approximation sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApproxGate {
    /// Hadamard.
    H,
    /// Phase gate.
    S,
    /// T gate.
    T,
    /// Pauli X.
    X,
}

impl ApproxGate {
    /// Parse a gate sequence such as `"HSTHX"`. Whitespace is ignored.
    pub fn parse_sequence(sequence: &str) -> IrResult<Vec<ApproxGate>> {
        sequence
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| match c {
                'H' => Ok(ApproxGate::H),
                'S' => Ok(ApproxGate::S),
                'T' => Ok(ApproxGate::T),
                'X' => Ok(ApproxGate::X),
                other => Err(IrError::InvalidApproximationGate(other)),
            })
            .collect()
    }

    /// The basic rotations implementing this gate on a Z-axis frame.
    ///
    /// `axis` is the symbol playing the role of Z; the returned pairs are
    /// `(symbol, angle)` in time order.
    pub(crate) fn rotations(self, axis: PauliOperator) -> Vec<(PauliOperator, Angle)> {
        let conjugate = match axis {
            PauliOperator::X => PauliOperator::Z,
            _ => PauliOperator::X,
        };
        match self {
            ApproxGate::S => vec![(axis, Angle::pi_over(4))],
            ApproxGate::T => vec![(axis, Angle::pi_over(8))],
            ApproxGate::X => vec![(conjugate, Angle::pi_over(2))],
            ApproxGate::H => vec![
                (conjugate, Angle::pi_over(4)),
                (axis, Angle::pi_over(4)),
                (conjugate, Angle::pi_over(4)),
            ],
        }
    }
}

/// Source of Clifford+T sequences approximating single-axis rotations.
pub trait RotationApproximator: Send + Sync {
    /// Approximate `exp(-i·angle·π·Z)` as a gate sequence in time order.
    ///
    /// Returns `None` when no approximation is available for this angle.
    fn approximate(&self, angle: Angle) -> Option<Vec<ApproxGate>>;
}

/// An approximator with no entries; every non-basic angle is rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoApproximation;

impl RotationApproximator for NoApproximation {
    fn approximate(&self, _angle: Angle) -> Option<Vec<ApproxGate>> {
        None
    }
}

/// A lookup table of precomputed approximations at a fixed precision.
#[derive(Debug, Clone, Default)]
pub struct ApproximationTable {
    /// Precision the entries were computed at, as a negative power of ten.
    pub precision: u32,
    entries: FxHashMap<Angle, Vec<ApproxGate>>,
}

impl ApproximationTable {
    /// Create an empty table.
    pub fn new(precision: u32) -> Self {
        Self {
            precision,
            entries: FxHashMap::default(),
        }
    }

    /// Add an entry, replacing any previous one for the same angle.
    pub fn insert(&mut self, angle: Angle, sequence: Vec<ApproxGate>) {
        self.entries.insert(angle.normalized(), sequence);
    }

    /// Add an entry from a textual gate sequence.
    pub fn insert_str(&mut self, angle: Angle, sequence: &str) -> IrResult<()> {
        let gates = ApproxGate::parse_sequence(sequence)?;
        self.insert(angle, gates);
        Ok(())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RotationApproximator for ApproximationTable {
    fn approximate(&self, angle: Angle) -> Option<Vec<ApproxGate>> {
        self.entries.get(&angle.normalized()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sequence() {
        let gates = ApproxGate::parse_sequence("HS TX").unwrap();
        assert_eq!(
            gates,
            vec![ApproxGate::H, ApproxGate::S, ApproxGate::T, ApproxGate::X]
        );
        assert!(matches!(
            ApproxGate::parse_sequence("HQ"),
            Err(IrError::InvalidApproximationGate('Q'))
        ));
    }

    #[test]
    fn test_gate_rotations_z_axis() {
        let h = ApproxGate::H.rotations(PauliOperator::Z);
        assert_eq!(h.len(), 3);
        assert_eq!(h[0].0, PauliOperator::X);
        assert_eq!(h[1].0, PauliOperator::Z);
        assert_eq!(
            ApproxGate::X.rotations(PauliOperator::Z),
            vec![(PauliOperator::X, Angle::pi_over(2))]
        );
    }

    #[test]
    fn test_gate_rotations_x_axis() {
        assert_eq!(
            ApproxGate::T.rotations(PauliOperator::X),
            vec![(PauliOperator::X, Angle::pi_over(8))]
        );
        assert_eq!(
            ApproxGate::X.rotations(PauliOperator::X),
            vec![(PauliOperator::Z, Angle::pi_over(2))]
        );
    }

    #[test]
    fn test_table_lookup_normalizes() {
        let mut table = ApproximationTable::new(10);
        table.insert_str(Angle::pi_over(16), "HTHT").unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.approximate(Angle::new(33, 16)).is_some());
        assert!(table.approximate(Angle::pi_over(32)).is_none());
        assert!(NoApproximation.approximate(Angle::pi_over(16)).is_none());
    }
}
