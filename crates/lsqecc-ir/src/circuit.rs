//! Ordered sequences of Pauli blocks and the circuit-level rewrites.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::angle::Angle;
use crate::approximation::RotationApproximator;
use crate::block::{BlockKind, PauliBlock};
use crate::error::{IrError, IrResult};
use crate::pauli::{PHASE_I, PauliOperator, multiply_strings};

/// A Pauli-product circuit: an ordered list of rotations and measurements
/// that all span the same number of qubits.
///
/// Blocks are applied in list order. The circuit owns its blocks; rewrites
/// either mutate in place ([`PauliCircuit::litinski_transform`]) or build a
/// fresh circuit ([`PauliCircuit::y_free_equivalent`],
/// [`PauliCircuit::basic_form`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauliCircuit {
    num_qubits: usize,
    blocks: Vec<PauliBlock>,
}

impl PauliCircuit {
    /// Create an empty circuit over `num_qubits` qubits.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            blocks: vec![],
        }
    }

    /// Create a circuit from existing blocks, checking their widths.
    pub fn from_blocks(num_qubits: usize, blocks: Vec<PauliBlock>) -> IrResult<Self> {
        let mut circuit = Self::new(num_qubits);
        for block in blocks {
            circuit.add_block(block)?;
        }
        Ok(circuit)
    }

    /// Concatenate circuits over the same qubits, in order.
    pub fn join(circuits: &[PauliCircuit]) -> IrResult<Self> {
        let first = circuits.first().ok_or(IrError::EmptyCircuitList)?;
        let mut joined = Self::new(first.num_qubits);
        for circuit in circuits {
            if circuit.num_qubits != joined.num_qubits {
                return Err(IrError::QubitCountMismatch {
                    expected: joined.num_qubits,
                    got: circuit.num_qubits,
                    context: Some("join"),
                });
            }
            joined.blocks.extend(circuit.blocks.iter().cloned());
        }
        Ok(joined)
    }

    /// Number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of blocks.
    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if the circuit has no blocks.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The blocks, in application order.
    #[inline]
    pub fn blocks(&self) -> &[PauliBlock] {
        &self.blocks
    }

    /// Get a block by index.
    pub fn block(&self, index: usize) -> Option<&PauliBlock> {
        self.blocks.get(index)
    }

    /// Iterate over the blocks.
    pub fn iter(&self) -> std::slice::Iter<'_, PauliBlock> {
        self.blocks.iter()
    }

    /// Append a block.
    pub fn add_block(&mut self, block: PauliBlock) -> IrResult<()> {
        self.check_width(&block, "add_block")?;
        self.blocks.push(block);
        Ok(())
    }

    /// Insert a block before position `index`.
    pub fn insert_block(&mut self, index: usize, block: PauliBlock) -> IrResult<()> {
        self.check_width(&block, "insert_block")?;
        if index > self.blocks.len() {
            return Err(IrError::BlockOutOfRange {
                index,
                len: self.blocks.len(),
            });
        }
        self.blocks.insert(index, block);
        Ok(())
    }

    /// Append a single-qubit rotation.
    pub fn add_single_operator(
        &mut self,
        qubit: usize,
        op: PauliOperator,
        angle: Angle,
    ) -> IrResult<()> {
        let mut block = PauliBlock::rotation(self.num_qubits, angle);
        block.set_op(qubit, op)?;
        self.blocks.push(block);
        Ok(())
    }

    fn check_width(&self, block: &PauliBlock, context: &'static str) -> IrResult<()> {
        if block.num_qubits() != self.num_qubits {
            return Err(IrError::QubitCountMismatch {
                expected: self.num_qubits,
                got: block.num_qubits(),
                context: Some(context),
            });
        }
        Ok(())
    }

    fn block_checked(&self, index: usize) -> IrResult<&PauliBlock> {
        self.blocks.get(index).ok_or(IrError::BlockOutOfRange {
            index,
            len: self.blocks.len(),
        })
    }

    /// Check if the blocks at `i` and `j` commute.
    pub fn are_commuting(&self, i: usize, j: usize) -> IrResult<bool> {
        let lhs = self.block_checked(i)?;
        let rhs = self.block_checked(j)?;
        Ok(lhs.commutes_with_unchecked(rhs))
    }

    /// Check if the circuit contains at least one measurement.
    pub fn has_measurements(&self) -> bool {
        self.blocks.iter().any(PauliBlock::is_measurement)
    }

    /// Count rotations by exactly `angle`.
    pub fn count_rotations_by(&self, angle: Angle) -> usize {
        self.blocks
            .iter()
            .filter(|block| block.angle() == Some(angle))
            .count()
    }

    /// Count measurements.
    pub fn count_measurements(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_measurement()).count()
    }

    /// Move the `±π/4` rotation at `index` one step later in the circuit.
    ///
    /// If the rotation `P` commutes with the following block `Q`, the two are
    /// swapped. Otherwise `Q` is rewritten as `Q' = (±i)·P·Q`, where the sign
    /// follows the rotation angle: the symbols become the per-qubit products
    /// of `P` and `Q`, and a resulting `-1` phase flips `Q'`'s sign.
    pub fn swap_adjacent_blocks(&mut self, index: usize) -> IrResult<()> {
        let quarter = self.block_checked(index)?;
        let Some(angle) = quarter.angle().filter(Angle::is_quarter) else {
            return Err(IrError::NotQuarterRotation { index });
        };
        let next = self.block_checked(index + 1)?;

        if !quarter.commutes_with_unchecked(next) {
            let (coefficient, product) = multiply_strings(quarter.ops(), next.ops());
            let rotation_phase = if angle.is_negative() { -PHASE_I } else { PHASE_I };
            let phase = coefficient * rotation_phase;
            debug_assert!(phase.im == 0 && phase.re.abs() == 1);

            let mut rewritten = next.with_ops(product);
            if phase.re < 0 {
                rewritten.flip_sign();
            }
            self.blocks[index + 1] = rewritten;
        }
        self.blocks.swap(index, index + 1);
        Ok(())
    }

    /// Remove every `±π/4` rotation by commuting it past the end of the
    /// circuit (the Litinski transform).
    ///
    /// Clifford rotations are processed last-first. Each one is moved to the
    /// end with [`swap_adjacent_blocks`](Self::swap_adjacent_blocks) and then
    /// absorbed into the final measurements, so the circuit must contain at
    /// least one measurement whenever it contains a `±π/4` rotation.
    /// Measurement count is preserved. Applying the transform twice is the
    /// same as applying it once.
    pub fn litinski_transform(&mut self) -> IrResult<()> {
        let quarters: Vec<usize> = self
            .blocks
            .iter()
            .enumerate()
            .filter(|(_, block)| block.is_quarter_rotation())
            .map(|(index, _)| index)
            .collect();
        if quarters.is_empty() {
            return Ok(());
        }
        if !self.has_measurements() {
            return Err(IrError::MissingMeasurement);
        }

        for &start in quarters.iter().rev() {
            for index in start..self.blocks.len() - 1 {
                self.swap_adjacent_blocks(index)?;
            }
            self.blocks.pop();
        }
        Ok(())
    }

    /// An equivalent circuit with no Y symbols.
    ///
    /// Each block is replaced by [`PauliBlock::y_free_equivalent`]; blocks
    /// without Y pass through unchanged, so the rewrite is idempotent.
    pub fn y_free_equivalent(&self) -> Self {
        Self {
            num_qubits: self.num_qubits,
            blocks: self
                .blocks
                .iter()
                .flat_map(PauliBlock::y_free_equivalent)
                .collect(),
        }
    }

    /// An equivalent circuit whose rotations all lie in the basic set
    /// `±1/2`, `±1/4`, `±1/8`.
    ///
    /// See [`PauliBlock::basic_form`] for the per-block decomposition.
    pub fn basic_form(&self, approximator: &dyn RotationApproximator) -> IrResult<Self> {
        let mut blocks = Vec::with_capacity(self.blocks.len());
        for block in &self.blocks {
            blocks.extend(block.basic_form(approximator)?);
        }
        Ok(Self {
            num_qubits: self.num_qubits,
            blocks,
        })
    }

    /// Render the circuit as a text diagram, one column per block.
    ///
    /// ```text
    /// q0 |  X  | Z |
    /// q1 |  Z  | I |
    ///    | 1/4 | M |
    /// ```
    pub fn render_ascii(&self) -> String {
        let labels: Vec<String> = self
            .blocks
            .iter()
            .map(|block| match block.kind() {
                BlockKind::Rotation(angle) => angle.to_string(),
                BlockKind::Measurement { is_negative: true } => "-M".to_string(),
                BlockKind::Measurement { is_negative: false } => "M".to_string(),
            })
            .collect();
        let prefix = format!("q{}", self.num_qubits.saturating_sub(1)).len();

        let mut out = String::new();
        for qubit in 0..self.num_qubits {
            out.push_str(&format!("{:<prefix$} |", format!("q{qubit}")));
            for (block, label) in self.blocks.iter().zip(&labels) {
                let width = label.chars().count();
                out.push_str(&format!(" {:^width$} |", block.ops()[qubit].as_char()));
            }
            out.push('\n');
        }
        out.push_str(&format!("{:<prefix$} |", ""));
        for label in &labels {
            out.push_str(&format!(" {label} |"));
        }
        out.push('\n');
        out
    }
}

impl fmt::Display for PauliCircuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_ascii())
    }
}

impl<'a> IntoIterator for &'a PauliCircuit {
    type Item = &'a PauliBlock;
    type IntoIter = std::slice::Iter<'a, PauliBlock>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::approximation::NoApproximation;

    fn rot(ops: &str, numer: i64, denom: i64) -> PauliBlock {
        PauliBlock::parse_rotation(ops, Angle::new(numer, denom)).unwrap()
    }

    fn meas(ops: &str) -> PauliBlock {
        PauliBlock::parse_measurement(ops, false).unwrap()
    }

    #[test]
    fn test_add_block_checks_width() {
        let mut circuit = PauliCircuit::new(2);
        circuit.add_block(rot("XZ", 1, 8)).unwrap();
        let err = circuit.add_block(rot("X", 1, 8)).unwrap_err();
        assert!(matches!(
            err,
            IrError::QubitCountMismatch {
                expected: 2,
                got: 1,
                ..
            }
        ));
        assert_eq!(circuit.len(), 1);
    }

    #[test]
    fn test_add_single_operator() {
        let mut circuit = PauliCircuit::new(3);
        circuit
            .add_single_operator(1, PauliOperator::Z, Angle::pi_over(8))
            .unwrap();
        assert_eq!(circuit.blocks()[0], rot("IZI", 1, 8));
        assert!(
            circuit
                .add_single_operator(3, PauliOperator::Z, Angle::pi_over(8))
                .is_err()
        );
    }

    #[test]
    fn test_are_commuting() {
        let circuit =
            PauliCircuit::from_blocks(2, vec![rot("XX", 1, 4), rot("ZZ", 1, 8), rot("ZI", 1, 8)])
                .unwrap();
        assert!(circuit.are_commuting(0, 1).unwrap());
        assert!(!circuit.are_commuting(0, 2).unwrap());
        assert!(circuit.are_commuting(0, 3).is_err());
    }

    #[test]
    fn test_swap_commuting_blocks() {
        let mut circuit =
            PauliCircuit::from_blocks(2, vec![rot("ZZ", 1, 4), rot("ZI", 1, 8)]).unwrap();
        circuit.swap_adjacent_blocks(0).unwrap();
        assert_eq!(circuit.blocks(), &[rot("ZI", 1, 8), rot("ZZ", 1, 4)]);
    }

    #[test]
    fn test_swap_anticommuting_blocks() {
        // Z(1/4) then X(1/8): X' = i·Z·X = i·(iY) = -Y
        let mut circuit = PauliCircuit::from_blocks(1, vec![rot("Z", 1, 4), rot("X", 1, 8)]).unwrap();
        circuit.swap_adjacent_blocks(0).unwrap();
        assert_eq!(circuit.blocks(), &[rot("Y", -1, 8), rot("Z", 1, 4)]);

        // a negative quarter rotation picks up the opposite phase
        let mut circuit =
            PauliCircuit::from_blocks(1, vec![rot("Z", -1, 4), rot("X", 1, 8)]).unwrap();
        circuit.swap_adjacent_blocks(0).unwrap();
        assert_eq!(circuit.blocks()[0], rot("Y", 1, 8));
    }

    #[test]
    fn test_swap_rejects_non_quarter() {
        let mut circuit =
            PauliCircuit::from_blocks(1, vec![rot("Z", 1, 8), rot("X", 1, 8)]).unwrap();
        assert!(matches!(
            circuit.swap_adjacent_blocks(0),
            Err(IrError::NotQuarterRotation { index: 0 })
        ));
        let mut circuit = PauliCircuit::from_blocks(1, vec![rot("Z", 1, 4)]).unwrap();
        assert!(matches!(
            circuit.swap_adjacent_blocks(0),
            Err(IrError::BlockOutOfRange { .. })
        ));
    }

    #[test]
    fn test_litinski_removes_quarters() {
        let mut circuit = PauliCircuit::from_blocks(
            2,
            vec![
                rot("ZI", 1, 4),
                rot("XZ", 1, 8),
                rot("IX", 1, 4),
                meas("ZZ"),
            ],
        )
        .unwrap();
        circuit.litinski_transform().unwrap();

        assert_eq!(circuit.count_rotations_by(Angle::pi_over(4)), 0);
        assert_eq!(circuit.count_rotations_by(Angle::new(-1, 4)), 0);
        assert_eq!(circuit.count_measurements(), 1);
        assert_eq!(circuit.len(), 2);

        let snapshot = circuit.clone();
        circuit.litinski_transform().unwrap();
        assert_eq!(circuit, snapshot);
    }

    #[test]
    fn test_litinski_without_quarters_is_noop() {
        let mut circuit =
            PauliCircuit::from_blocks(1, vec![rot("X", 1, 2), rot("Z", 1, 2)]).unwrap();
        circuit.litinski_transform().unwrap();
        assert_eq!(circuit.len(), 2);
    }

    #[test]
    fn test_litinski_requires_measurement() {
        let mut circuit =
            PauliCircuit::from_blocks(1, vec![rot("X", 1, 4), rot("Z", 1, 8)]).unwrap();
        assert!(matches!(
            circuit.litinski_transform(),
            Err(IrError::MissingMeasurement)
        ));
        assert_eq!(circuit.len(), 2);
    }

    #[test]
    fn test_y_free_circuit() {
        let circuit =
            PauliCircuit::from_blocks(2, vec![rot("YI", 1, 8), meas("ZY")]).unwrap();
        let y_free = circuit.y_free_equivalent();
        assert!(y_free.iter().all(|b| !b.contains_y()));
        assert_eq!(y_free.len(), 6);
        assert_eq!(y_free.y_free_equivalent(), y_free);
    }

    #[test]
    fn test_basic_form_circuit() {
        let circuit =
            PauliCircuit::from_blocks(1, vec![rot("Z", 3, 4), rot("X", 1, 1), meas("Z")]).unwrap();
        let basic = circuit.basic_form(&NoApproximation).unwrap();
        assert_eq!(basic.blocks(), &[rot("Z", 1, 2), rot("Z", 1, 4), meas("Z")]);
    }

    #[test]
    fn test_join() {
        let a = PauliCircuit::from_blocks(2, vec![rot("XI", 1, 8)]).unwrap();
        let b = PauliCircuit::from_blocks(2, vec![meas("ZZ")]).unwrap();
        let joined = PauliCircuit::join(&[a.clone(), b]).unwrap();
        assert_eq!(joined.len(), 2);
        assert!(PauliCircuit::join(&[a, PauliCircuit::new(3)]).is_err());
        assert!(PauliCircuit::join(&[]).is_err());
    }

    #[test]
    fn test_render_ascii() {
        let circuit = PauliCircuit::from_blocks(2, vec![rot("XZ", 1, 4), meas("ZI")]).unwrap();
        let expected = "q0 |  X  | Z |\nq1 |  Z  | I |\n   | 1/4 | M |\n";
        assert_eq!(circuit.render_ascii(), expected);
        assert_eq!(circuit.to_string(), expected);
    }
}
