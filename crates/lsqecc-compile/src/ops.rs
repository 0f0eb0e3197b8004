//! Logical lattice operations.

use std::fmt;

use lsqecc_ir::PauliOperator;
use serde::{Deserialize, Serialize};

use crate::lattice::PatchId;
use crate::state::SymbolicState;

/// Position of an operation in a computation's operation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OpIndex(pub usize);

impl fmt::Display for OpIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Result of a measurement, an eigenvalue `±1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// `+1`
    Plus,
    /// `-1`
    Minus,
}

impl Outcome {
    /// The eigenvalue.
    pub fn value(self) -> i8 {
        match self {
            Outcome::Plus => 1,
            Outcome::Minus => -1,
        }
    }

    /// Parse an eigenvalue.
    pub fn from_value(value: i8) -> Option<Self> {
        match value {
            1 => Some(Outcome::Plus),
            -1 => Some(Outcome::Minus),
            _ => None,
        }
    }
}

/// Outcome-dependent predicate gating a correction.
///
/// Conditions refer to earlier measurements by their position in the
/// operation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvaluationCondition {
    /// Pauli correction of a `π/4` gadget: applies when the product of the
    /// multi-body and ancilla outcomes is `-1`, or `+1` when `invert` is set.
    PiOverFourCorrection {
        multi_body: OpIndex,
        ancilla: OpIndex,
        invert: bool,
    },
    /// Clifford correction of a `π/8` gadget: applies when the multi-body
    /// outcome is `-1`, or `+1` when `invert` is set.
    PiOverEightFirstCorrection { multi_body: OpIndex, invert: bool },
    /// Pauli correction of a `π/8` gadget: applies when the magic-state
    /// measurement outcome is `-1`.
    PiOverEightSecondCorrection { magic: OpIndex },
}

impl EvaluationCondition {
    /// The measurements this condition reads.
    pub fn dependencies(&self) -> Vec<OpIndex> {
        match *self {
            EvaluationCondition::PiOverFourCorrection {
                multi_body,
                ancilla,
                ..
            } => vec![multi_body, ancilla],
            EvaluationCondition::PiOverEightFirstCorrection { multi_body, .. } => vec![multi_body],
            EvaluationCondition::PiOverEightSecondCorrection { magic } => vec![magic],
        }
    }
}

/// What a logical lattice operation does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationKind {
    /// Measure one patch in the X or Z basis.
    SinglePatchMeasurement {
        patch: PatchId,
        basis: PauliOperator,
        is_negative: bool,
    },
    /// Jointly measure a Pauli product over several patches.
    MultiBodyMeasurement {
        patches: Vec<(PatchId, PauliOperator)>,
        is_negative: bool,
    },
    /// Apply a Pauli operator to one patch.
    LogicalPauli { patch: PatchId, op: PauliOperator },
    /// Prepare a fresh ancilla patch.
    AncillaInit { patch: PatchId, state: SymbolicState },
    /// Bind a fresh id to a pre-distilled magic state.
    MagicStateRequest { patch: PatchId },
}

/// One step of the logical lattice computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalLatticeOperation {
    kind: OperationKind,
    condition: Option<EvaluationCondition>,
    outcome: Option<Outcome>,
}

impl LogicalLatticeOperation {
    /// Create an operation.
    pub fn new(kind: OperationKind, condition: Option<EvaluationCondition>) -> Self {
        Self {
            kind,
            condition,
            outcome: None,
        }
    }

    /// What the operation does.
    pub fn kind(&self) -> &OperationKind {
        &self.kind
    }

    /// Condition on earlier outcomes, if any.
    pub fn condition(&self) -> Option<EvaluationCondition> {
        self.condition
    }

    /// Recorded outcome, for measurements whose outcome has been set.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub(crate) fn set_outcome(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
    }

    /// Check if the operation produces an outcome.
    pub fn is_measurement(&self) -> bool {
        matches!(
            self.kind,
            OperationKind::SinglePatchMeasurement { .. } | OperationKind::MultiBodyMeasurement { .. }
        )
    }

    /// Patches the operation touches.
    pub fn operating_patches(&self) -> Vec<PatchId> {
        match &self.kind {
            OperationKind::SinglePatchMeasurement { patch, .. }
            | OperationKind::LogicalPauli { patch, .. }
            | OperationKind::AncillaInit { patch, .. }
            | OperationKind::MagicStateRequest { patch } => vec![*patch],
            OperationKind::MultiBodyMeasurement { patches, .. } => {
                patches.iter().map(|(patch, _)| *patch).collect()
            }
        }
    }
}
