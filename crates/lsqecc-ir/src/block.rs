//! Pauli product rotations and measurements.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::angle::Angle;
use crate::approximation::RotationApproximator;
use crate::error::{IrError, IrResult};
use crate::pauli::{PHASE_I, PHASE_ONE, PauliOperator, anticommuting_positions, multiply_strings};

/// Largest denominator that still belongs to the basic rotation set.
const MAX_BASIC_DENOMINATOR: i64 = 8;

/// What a Pauli block does with its operator string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    /// Rotation `exp(-i·aπ·P)` by the given angle.
    Rotation(Angle),
    /// Measurement of `±P`.
    Measurement {
        /// Whether the measured operator is `-P`.
        is_negative: bool,
    },
}

/// A Pauli product rotation or measurement over a fixed number of qubits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PauliBlock {
    ops: Vec<PauliOperator>,
    kind: BlockKind,
}

impl PauliBlock {
    /// Create an identity rotation over `num_qubits` qubits.
    pub fn rotation(num_qubits: usize, angle: Angle) -> Self {
        Self::rotation_from_ops(vec![PauliOperator::I; num_qubits], angle)
    }

    /// Create an identity measurement over `num_qubits` qubits.
    pub fn measurement(num_qubits: usize, is_negative: bool) -> Self {
        Self::measurement_from_ops(vec![PauliOperator::I; num_qubits], is_negative)
    }

    /// Create a rotation from an operator string.
    pub fn rotation_from_ops(ops: Vec<PauliOperator>, angle: Angle) -> Self {
        Self {
            ops,
            kind: BlockKind::Rotation(angle),
        }
    }

    /// Create a measurement from an operator string.
    pub fn measurement_from_ops(ops: Vec<PauliOperator>, is_negative: bool) -> Self {
        Self {
            ops,
            kind: BlockKind::Measurement { is_negative },
        }
    }

    /// Parse a rotation from a string such as `"XIZ"`.
    pub fn parse_rotation(ops: &str, angle: Angle) -> IrResult<Self> {
        Ok(Self::rotation_from_ops(PauliOperator::parse_string(ops)?, angle))
    }

    /// Parse a measurement from a string such as `"ZZ"`.
    pub fn parse_measurement(ops: &str, is_negative: bool) -> IrResult<Self> {
        Ok(Self::measurement_from_ops(
            PauliOperator::parse_string(ops)?,
            is_negative,
        ))
    }

    /// Number of qubits the block spans.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.ops.len()
    }

    /// The operator string, one symbol per qubit.
    #[inline]
    pub fn ops(&self) -> &[PauliOperator] {
        &self.ops
    }

    /// The symbol on one qubit.
    pub fn op(&self, qubit: usize) -> Option<PauliOperator> {
        self.ops.get(qubit).copied()
    }

    /// Set the symbol on one qubit.
    pub fn set_op(&mut self, qubit: usize, op: PauliOperator) -> IrResult<()> {
        let num_qubits = self.num_qubits();
        let slot = self
            .ops
            .get_mut(qubit)
            .ok_or(IrError::QubitOutOfRange { qubit, num_qubits })?;
        *slot = op;
        Ok(())
    }

    /// Non-identity positions with their symbols, in qubit order.
    pub fn ops_map(&self) -> Vec<(usize, PauliOperator)> {
        self.ops
            .iter()
            .enumerate()
            .filter(|(_, op)| !op.is_identity())
            .map(|(q, op)| (q, *op))
            .collect()
    }

    /// Check if every symbol is the identity.
    pub fn is_identity(&self) -> bool {
        self.ops.iter().all(|op| op.is_identity())
    }

    /// Check if any position holds Y.
    pub fn contains_y(&self) -> bool {
        self.ops.contains(&PauliOperator::Y)
    }

    /// The kind of the block.
    #[inline]
    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    /// Check if this is a rotation.
    #[inline]
    pub fn is_rotation(&self) -> bool {
        matches!(self.kind, BlockKind::Rotation(_))
    }

    /// Check if this is a measurement.
    #[inline]
    pub fn is_measurement(&self) -> bool {
        matches!(self.kind, BlockKind::Measurement { .. })
    }

    /// The rotation angle, if this is a rotation.
    pub fn angle(&self) -> Option<Angle> {
        match self.kind {
            BlockKind::Rotation(angle) => Some(angle),
            BlockKind::Measurement { .. } => None,
        }
    }

    /// Whether a measurement measures `-P`. Always false for rotations.
    pub fn is_negative(&self) -> bool {
        matches!(self.kind, BlockKind::Measurement { is_negative: true })
    }

    /// Check if this is a `±π/4` rotation.
    pub fn is_quarter_rotation(&self) -> bool {
        self.angle().is_some_and(|angle| angle.is_quarter())
    }

    /// Negate the rotation angle or the measurement sign.
    pub fn flip_sign(&mut self) {
        self.kind = match self.kind {
            BlockKind::Rotation(angle) => BlockKind::Rotation(-angle),
            BlockKind::Measurement { is_negative } => BlockKind::Measurement {
                is_negative: !is_negative,
            },
        };
    }

    /// Same kind, new operator string.
    pub(crate) fn with_ops(&self, ops: Vec<PauliOperator>) -> Self {
        Self {
            ops,
            kind: self.kind,
        }
    }

    /// Check if two blocks commute as Pauli products.
    ///
    /// Two products commute iff they anti-commute on an even number of qubits.
    pub fn commutes_with(&self, other: &PauliBlock) -> IrResult<bool> {
        if self.num_qubits() != other.num_qubits() {
            return Err(IrError::QubitCountMismatch {
                expected: self.num_qubits(),
                got: other.num_qubits(),
                context: Some("commutation"),
            });
        }
        Ok(self.commutes_with_unchecked(other))
    }

    /// Commutation test for blocks already known to have equal width.
    pub(crate) fn commutes_with_unchecked(&self, other: &PauliBlock) -> bool {
        anticommuting_positions(&self.ops, &other.ops) % 2 == 0
    }

    /// Rewrite this block as an equivalent sequence free of Y symbols.
    ///
    /// Every Y becomes X in a central block `P''`, which is wrapped in
    /// conjugations by Z-type `π/4` rotations that restore the original
    /// operator exactly. A single conjugation covers an odd number of Y
    /// positions, so an odd count of Y's costs one conjugation and an even
    /// count costs two (the last Y is conjugated on its own). Blocks without
    /// Y are returned unchanged.
    pub fn y_free_equivalent(&self) -> Vec<PauliBlock> {
        let y_positions: Vec<usize> = self
            .ops
            .iter()
            .enumerate()
            .filter(|(_, op)| **op == PauliOperator::Y)
            .map(|(q, _)| q)
            .collect();
        if y_positions.is_empty() {
            return vec![self.clone()];
        }

        let mut core = self.clone();
        for &q in &y_positions {
            core.ops[q] = PauliOperator::X;
        }

        let groups: Vec<&[usize]> = if y_positions.len() % 2 == 1 {
            vec![y_positions.as_slice()]
        } else {
            let (head, tail) = y_positions.split_at(y_positions.len() - 1);
            vec![head, tail]
        };

        // Conjugate from the inside out. With V = exp(-i·aπ·Q) and a = ±1/4,
        // V·T·V† = ∓i·Q·T; the sign of `a` is chosen so the phase is exactly +1.
        let mut current = core.ops.clone();
        let mut left = Vec::with_capacity(groups.len());
        let mut right = Vec::with_capacity(groups.len());
        for group in groups.iter().rev() {
            let mut conjugator = vec![PauliOperator::I; self.num_qubits()];
            for &q in *group {
                conjugator[q] = PauliOperator::Z;
            }
            let (phase, product) = multiply_strings(&conjugator, &current);
            let angle = if -PHASE_I * phase == PHASE_ONE {
                Angle::pi_over(4)
            } else {
                -Angle::pi_over(4)
            };
            left.push(PauliBlock::rotation_from_ops(conjugator.clone(), -angle));
            right.push(PauliBlock::rotation_from_ops(conjugator, angle));
            current = product;
        }
        debug_assert_eq!(current, self.ops);

        let mut blocks: Vec<PauliBlock> = left.into_iter().rev().collect();
        blocks.push(core);
        blocks.extend(right);
        blocks
    }

    /// Decompose into rotations from the basic set `±1/2`, `±1/4`, `±1/8`.
    ///
    /// Measurements and basic rotations are returned unchanged. Zero
    /// rotations and rotations by π (global phases) vanish. Other dyadic
    /// angles split into a sum of powers of two; terms finer than `1/8`, and
    /// non-dyadic angles, are delegated to `approximator`, which is only
    /// applicable to single-qubit X or Z rotations.
    pub fn basic_form(&self, approximator: &dyn RotationApproximator) -> IrResult<Vec<PauliBlock>> {
        let Some(angle) = self.angle() else {
            return Ok(vec![self.clone()]);
        };
        if angle.is_basic() {
            return Ok(vec![self.clone()]);
        }

        let Some(terms) = angle.dyadic_terms() else {
            return self.approximate(angle, approximator);
        };
        let mut blocks = Vec::with_capacity(terms.len());
        for term in terms {
            if term.denom() <= MAX_BASIC_DENOMINATOR {
                blocks.push(self.with_kind(BlockKind::Rotation(term)));
            } else {
                blocks.extend(self.approximate(term, approximator)?);
            }
        }
        Ok(blocks)
    }

    fn with_kind(&self, kind: BlockKind) -> Self {
        Self {
            ops: self.ops.clone(),
            kind,
        }
    }

    fn approximate(
        &self,
        angle: Angle,
        approximator: &dyn RotationApproximator,
    ) -> IrResult<Vec<PauliBlock>> {
        let (qubit, axis) = match self.ops_map().as_slice() {
            [(qubit, axis @ (PauliOperator::X | PauliOperator::Z))] => (*qubit, *axis),
            _ => {
                return Err(IrError::UnsupportedAngle {
                    angle,
                    context: Some("approximation needs a single-qubit X or Z rotation"),
                });
            }
        };
        let gates = approximator
            .approximate(angle)
            .ok_or(IrError::UnsupportedAngle {
                angle,
                context: Some("no approximation available"),
            })?;

        let mut blocks = Vec::new();
        for gate in gates {
            for (symbol, amount) in gate.rotations(axis) {
                let mut block = PauliBlock::rotation(self.num_qubits(), amount);
                block.ops[qubit] = symbol;
                blocks.push(block);
            }
        }
        Ok(blocks)
    }
}

impl fmt::Display for PauliBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ops: String = self.ops.iter().map(|op| op.as_char()).collect();
        match self.kind {
            BlockKind::Rotation(angle) => write!(f, "{ops}({angle})"),
            BlockKind::Measurement { is_negative } => {
                write!(f, "M({}{ops})", if is_negative { "-" } else { "" })
            }
        }
    }
}
