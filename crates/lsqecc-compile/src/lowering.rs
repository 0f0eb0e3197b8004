//! Lowering of Pauli circuits to logical lattice operations.
//!
//! Each block of a basic-form, Y-free circuit becomes a short gadget:
//!
//! | Block | Operations |
//! |-------|------------|
//! | Measurement of one qubit | `SinglePatchMeasurement` |
//! | Measurement of several qubits | `MultiBodyMeasurement` |
//! | `±π/2` rotation | one `LogicalPauli` per qubit |
//! | `±π/4` rotation | `AncillaInit(|+i⟩)`, `MultiBodyMeasurement(P⊗Z)`, `SinglePatchMeasurement(X)`, conditional `π/2` |
//! | `±π/8` rotation | `MagicStateRequest`, `MultiBodyMeasurement(P⊗Z)`, conditional `π/4`, `SinglePatchMeasurement(X)`, conditional `π/2` |
//!
//! Corrections are lowered recursively and inherit their gadget's condition
//! through the operation table, so a nested correction only runs when every
//! enclosing condition holds.

use lsqecc_ir::{Angle, BlockKind, PauliBlock, PauliCircuit, PauliOperator};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::error::{CompileError, CompileResult};
use crate::lattice::PatchId;
use crate::ops::{EvaluationCondition, LogicalLatticeOperation, OpIndex, OperationKind, Outcome};
use crate::state::SymbolicState;

/// The lowered computation: logical qubit patches and the operation table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogicalLatticeComputation {
    logical_qubits: Vec<PatchId>,
    ops: Vec<LogicalLatticeOperation>,
}

impl LogicalLatticeComputation {
    /// Lower a circuit.
    ///
    /// The circuit must be in basic form and Y-free; blocks violating either
    /// requirement are rejected with the offending block index.
    #[instrument(skip(circuit), fields(num_qubits = circuit.num_qubits(), blocks = circuit.len()))]
    pub fn from_circuit(circuit: &PauliCircuit) -> CompileResult<Self> {
        let mut computation = Self {
            logical_qubits: (0..circuit.num_qubits()).map(|_| PatchId::new()).collect(),
            ops: vec![],
        };
        for (index, block) in circuit.iter().enumerate() {
            computation.lower_block(index, block)?;
        }
        debug!(
            "Lowered {} blocks into {} operations ({} magic states)",
            circuit.len(),
            computation.ops.len(),
            computation.count_magic_states()
        );
        Ok(computation)
    }

    fn lower_block(&mut self, index: usize, block: &PauliBlock) -> CompileResult<()> {
        if block.contains_y() {
            return Err(CompileError::NotYFree { block: index });
        }
        let targets: Vec<(PatchId, PauliOperator)> = block
            .ops_map()
            .into_iter()
            .map(|(qubit, op)| (self.logical_qubits[qubit], op))
            .collect();

        match block.kind() {
            BlockKind::Measurement { is_negative } => {
                let kind = match targets.as_slice() {
                    [] => return Err(CompileError::EmptyMeasurement { block: index }),
                    [(patch, basis)] => OperationKind::SinglePatchMeasurement {
                        patch: *patch,
                        basis: *basis,
                        is_negative,
                    },
                    _ => OperationKind::MultiBodyMeasurement {
                        patches: targets,
                        is_negative,
                    },
                };
                self.push(kind, None);
                Ok(())
            }
            BlockKind::Rotation(angle) => {
                if targets.is_empty() {
                    trace!(block = index, "Skipping identity rotation");
                    return Ok(());
                }
                self.lower_rotation(index, &targets, angle, None)
            }
        }
    }

    fn lower_rotation(
        &mut self,
        block: usize,
        targets: &[(PatchId, PauliOperator)],
        angle: Angle,
        condition: Option<EvaluationCondition>,
    ) -> CompileResult<()> {
        if angle.is_half() {
            for &(patch, op) in targets {
                self.push(OperationKind::LogicalPauli { patch, op }, condition);
            }
        } else if angle.is_quarter() {
            let ancilla = PatchId::new();
            self.push(
                OperationKind::AncillaInit {
                    patch: ancilla,
                    state: SymbolicState::YPlus,
                },
                condition,
            );
            let multi_body = self.push(Self::merge_with(targets, ancilla), condition);
            let ancilla_measurement = self.push(
                OperationKind::SinglePatchMeasurement {
                    patch: ancilla,
                    basis: PauliOperator::X,
                    is_negative: false,
                },
                condition,
            );
            let correction = EvaluationCondition::PiOverFourCorrection {
                multi_body,
                ancilla: ancilla_measurement,
                invert: angle.is_negative(),
            };
            self.lower_rotation(block, targets, Angle::pi_over(2), Some(correction))?;
        } else if angle.is_eighth() {
            let magic = PatchId::new();
            self.push(OperationKind::MagicStateRequest { patch: magic }, condition);
            let multi_body = self.push(Self::merge_with(targets, magic), condition);
            let first = EvaluationCondition::PiOverEightFirstCorrection {
                multi_body,
                invert: angle.is_negative(),
            };
            self.lower_rotation(block, targets, Angle::pi_over(4), Some(first))?;
            let magic_measurement = self.push(
                OperationKind::SinglePatchMeasurement {
                    patch: magic,
                    basis: PauliOperator::X,
                    is_negative: false,
                },
                condition,
            );
            let second = EvaluationCondition::PiOverEightSecondCorrection {
                magic: magic_measurement,
            };
            self.lower_rotation(block, targets, Angle::pi_over(2), Some(second))?;
        } else {
            return Err(CompileError::UnsupportedAngle { angle, block });
        }
        Ok(())
    }

    fn merge_with(targets: &[(PatchId, PauliOperator)], extra: PatchId) -> OperationKind {
        let mut patches = targets.to_vec();
        patches.push((extra, PauliOperator::Z));
        OperationKind::MultiBodyMeasurement {
            patches,
            is_negative: false,
        }
    }

    fn push(&mut self, kind: OperationKind, condition: Option<EvaluationCondition>) -> OpIndex {
        self.ops.push(LogicalLatticeOperation::new(kind, condition));
        OpIndex(self.ops.len() - 1)
    }

    /// Number of logical qubits.
    pub fn num_logical_qubits(&self) -> usize {
        self.logical_qubits.len()
    }

    /// Patch ids of the logical qubits, in qubit order.
    pub fn logical_qubits(&self) -> &[PatchId] {
        &self.logical_qubits
    }

    /// Patch id of one logical qubit.
    pub fn logical_qubit_id(&self, qubit: usize) -> Option<PatchId> {
        self.logical_qubits.get(qubit).copied()
    }

    /// The operation table, in execution order.
    pub fn operations(&self) -> &[LogicalLatticeOperation] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Number of magic states the computation consumes.
    pub fn count_magic_states(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op.kind(), OperationKind::MagicStateRequest { .. }))
            .count()
    }

    fn operation_checked(&self, index: OpIndex) -> CompileResult<&LogicalLatticeOperation> {
        self.ops.get(index.0).ok_or(CompileError::OperationOutOfRange {
            index: index.0,
            len: self.ops.len(),
        })
    }

    /// Record a measurement outcome. Outcomes are write-once.
    pub fn set_outcome(&mut self, index: OpIndex, outcome: Outcome) -> CompileResult<()> {
        let op = self.operation_checked(index)?;
        if !op.is_measurement() {
            return Err(CompileError::NotAMeasurement(index.0));
        }
        if op.outcome().is_some() {
            return Err(CompileError::OutcomeAlreadySet(index.0));
        }
        self.ops[index.0].set_outcome(outcome);
        Ok(())
    }

    /// Check if an operation runs.
    ///
    /// Unconditioned operations always run. A conditioned operation runs only
    /// if every measurement its condition reads runs too; when those outcomes
    /// are not known yet it is assumed to run, otherwise the condition decides.
    pub fn does_evaluate(&self, index: OpIndex) -> CompileResult<bool> {
        self.operation_checked(index)?;
        Ok(self.evaluates(index))
    }

    fn evaluates(&self, index: OpIndex) -> bool {
        let Some(condition) = self.ops[index.0].condition() else {
            return true;
        };
        if !condition
            .dependencies()
            .into_iter()
            .all(|dependency| self.evaluates(dependency))
        {
            return false;
        }

        let outcome = |op: OpIndex| self.ops[op.0].outcome();
        match condition {
            EvaluationCondition::PiOverFourCorrection {
                multi_body,
                ancilla,
                invert,
            } => match (outcome(multi_body), outcome(ancilla)) {
                (Some(a), Some(b)) => (a.value() * b.value() == -1) != invert,
                _ => true,
            },
            EvaluationCondition::PiOverEightFirstCorrection { multi_body, invert } => {
                outcome(multi_body).is_none_or(|o| (o == Outcome::Minus) != invert)
            }
            EvaluationCondition::PiOverEightSecondCorrection { magic } => {
                outcome(magic).is_none_or(|o| o == Outcome::Minus)
            }
        }
    }
}
