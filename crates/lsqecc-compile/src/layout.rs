//! Initial patch layouts.

use crate::error::CompileResult;
use crate::lattice::{Cell, Patch, PatchId, PatchLattice, PatchType};
use crate::state::SymbolicState;

/// The first time slice plus the resources the composer draws from.
#[derive(Debug, Clone, PartialEq)]
pub struct InitialLayout {
    /// Lattice with every logical qubit and pre-distilled state placed.
    pub lattice: PatchLattice,
    /// Representative cells of the magic-state patches, in consumption order.
    pub magic_states: Vec<Cell>,
    /// Cells where gadget ancillas may be initialized.
    pub ancilla_locations: Vec<Cell>,
}

/// Places logical qubits and resource states on an empty lattice.
pub trait LayoutInitializer: Send + Sync {
    /// Get the name of this layout.
    fn name(&self) -> &str;

    /// Build the initial layout.
    ///
    /// `qubits` are the logical qubit ids in qubit order; `num_magic_states`
    /// is how many magic states the computation will request.
    fn initial_layout(&self, qubits: &[PatchId], num_magic_states: usize)
    -> CompileResult<InitialLayout>;
}

/// Qubits on the top row with a free routing row beneath.
///
/// Logical qubit `j` sits at `(2j, 0)`. Row 1 is left free for ancilla
/// regions and row 2 holds the ancilla locations. Magic states are rotated
/// patches appended to the top row after the last column.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleLayout;

impl LayoutInitializer for SimpleLayout {
    fn name(&self) -> &str {
        "SimpleLayout"
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn initial_layout(
        &self,
        qubits: &[PatchId],
        num_magic_states: usize,
    ) -> CompileResult<InitialLayout> {
        let cols = (2 * qubits.len()).max(1) as i32;
        let mut lattice = PatchLattice::new(3, cols);

        for (j, &id) in qubits.iter().enumerate() {
            let cell = Cell::new(2 * j as i32, 0);
            lattice.add_patch(Patch::square(cell, PatchType::Qubit, SymbolicState::Zero).with_id(id))?;
        }

        let mut magic_states = Vec::with_capacity(num_magic_states);
        for k in 0..num_magic_states {
            let cell = Cell::new(cols + k as i32, 0);
            lattice.add_patch(Patch::rotated_square(
                cell,
                PatchType::DistillationQubit,
                SymbolicState::Magic,
            ))?;
            magic_states.push(cell);
        }

        let ancilla_locations = (0..cols).map(|col| Cell::new(col, 2)).collect();
        Ok(InitialLayout {
            lattice,
            magic_states,
            ancilla_locations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_layout() {
        let qubits = [PatchId::new(), PatchId::new(), PatchId::new()];
        let layout = SimpleLayout.initial_layout(&qubits, 2).unwrap();

        assert_eq!(layout.lattice.find_cell_by_patch_id(qubits[1]), Some(Cell::new(2, 0)));
        assert_eq!(layout.lattice.find_cell_by_patch_id(qubits[2]), Some(Cell::new(4, 0)));
        assert_eq!(layout.magic_states, vec![Cell::new(6, 0), Cell::new(7, 0)]);
        assert_eq!(layout.ancilla_locations.len(), 6);
        assert_eq!(layout.lattice.rows(), 3);
        assert_eq!(layout.lattice.cols(), 8);
        assert!(layout.ancilla_locations.iter().all(|&cell| layout.lattice.is_free(cell)));

        let magic = layout.lattice.patch_at(Cell::new(7, 0)).unwrap();
        assert_eq!(magic.patch_type(), PatchType::DistillationQubit);
        assert!(magic.id().is_none());
    }

    #[test]
    fn test_empty_layout() {
        let layout = SimpleLayout.initial_layout(&[], 0).unwrap();
        assert_eq!(layout.lattice.num_patches(), 0);
        assert_eq!(layout.ancilla_locations, vec![Cell::new(0, 2)]);
    }
}
