//! Symbolic patch states.
//!
//! Patches carry a coarse description of the logical state they hold. The
//! compiler never simulates amplitudes; it only tracks the named eigenstates
//! an operation produces, and falls back to [`SymbolicState::Unknown`].

use std::fmt;

use lsqecc_ir::PauliOperator;
use serde::{Deserialize, Serialize};

/// A named single-patch state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolicState {
    /// `|0⟩`
    Zero,
    /// `|1⟩`
    One,
    /// `|+⟩`
    Plus,
    /// `|-⟩`
    Minus,
    /// `|+i⟩`, the `+1` eigenstate of Y.
    YPlus,
    /// `|-i⟩`
    YMinus,
    /// Distilled magic state `|m⟩`.
    Magic,
    /// No tracked description.
    Unknown,
}

impl SymbolicState {
    /// The state after applying a Pauli operator, up to global phase.
    #[must_use]
    pub fn apply_pauli(self, op: PauliOperator) -> Self {
        use SymbolicState::*;
        match (op, self) {
            (PauliOperator::I, state) => state,
            (_, Unknown | Magic) => Unknown,
            (PauliOperator::X, Zero) | (PauliOperator::Y, Zero) => One,
            (PauliOperator::X, One) | (PauliOperator::Y, One) => Zero,
            (PauliOperator::Z, state @ (Zero | One)) => state,
            (PauliOperator::X, state @ (Plus | Minus)) => state,
            (_, Plus) => Minus,
            (_, Minus) => Plus,
            (PauliOperator::Y, state @ (YPlus | YMinus)) => state,
            (_, YPlus) => YMinus,
            (_, YMinus) => YPlus,
        }
    }
}

impl fmt::Display for SymbolicState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ket = match self {
            SymbolicState::Zero => "|0>",
            SymbolicState::One => "|1>",
            SymbolicState::Plus => "|+>",
            SymbolicState::Minus => "|->",
            SymbolicState::YPlus => "|+i>",
            SymbolicState::YMinus => "|-i>",
            SymbolicState::Magic => "|m>",
            SymbolicState::Unknown => "|?>",
        };
        f.write_str(ket)
    }
}

/// What happened to a patch during the current time slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activity {
    /// A Pauli operator was applied.
    Unitary(PauliOperator),
    /// The patch was measured in the given basis.
    Measurement(PauliOperator),
}

/// The state shown on a patch in one time slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatchState {
    /// Idle, holding a symbolic state.
    Symbolic(SymbolicState),
    /// Active in this slice; becomes `next` in the following one.
    Active {
        /// What the patch is doing.
        activity: Activity,
        /// State once the activity completes.
        next: SymbolicState,
    },
}

impl PatchState {
    /// Mark a Pauli operator applied to a patch in this state.
    #[must_use]
    pub fn with_pauli(self, op: PauliOperator) -> Self {
        PatchState::Active {
            activity: Activity::Unitary(op),
            next: self.settled().apply_pauli(op),
        }
    }

    /// Mark a measurement of a patch in this state.
    #[must_use]
    pub fn with_measurement(basis: PauliOperator) -> Self {
        PatchState::Active {
            activity: Activity::Measurement(basis),
            next: SymbolicState::Unknown,
        }
    }

    /// Check if the patch is being measured in this slice.
    pub fn is_measured(&self) -> bool {
        matches!(
            self,
            PatchState::Active {
                activity: Activity::Measurement(_),
                ..
            }
        )
    }

    /// The symbolic state this one settles into.
    pub fn settled(self) -> SymbolicState {
        match self {
            PatchState::Symbolic(state) => state,
            PatchState::Active { next, .. } => next,
        }
    }
}

impl From<SymbolicState> for PatchState {
    fn from(state: SymbolicState) -> Self {
        PatchState::Symbolic(state)
    }
}
