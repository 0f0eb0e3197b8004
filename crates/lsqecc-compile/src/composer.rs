//! Composition of logical operations into lattice time slices.

use std::collections::VecDeque;

use lsqecc_ir::PauliOperator;
use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::{debug, instrument, trace};

use crate::error::{CompileError, CompileResult};
use crate::lattice::{Cell, Patch, PatchId, PatchLattice, PatchType};
use crate::layout::LayoutInitializer;
use crate::lowering::LogicalLatticeComputation;
use crate::ops::{LogicalLatticeOperation, OpIndex, OperationKind};
use crate::routing::AncillaRegionRouter;
use crate::state::{PatchState, SymbolicState};

/// A sequence of lattice snapshots, one per applied operation.
///
/// Every applied operation marks its effect on the current slice, which is
/// then frozen; the following slice starts as a copy with the previous
/// merges undone and consumed ancillas removed.
#[derive(Debug, Clone, Serialize)]
pub struct LatticeSurgeryComputation {
    slices: Vec<PatchLattice>,
    #[serde(skip)]
    magic_states: VecDeque<Cell>,
    #[serde(skip)]
    ancilla_locations: Vec<Cell>,
    #[serde(skip)]
    consumed: FxHashSet<PatchId>,
    #[serde(skip)]
    router: AncillaRegionRouter,
}

impl LatticeSurgeryComputation {
    /// Start from the initial layout of a logical computation.
    pub fn new(
        logical: &LogicalLatticeComputation,
        layout: &dyn LayoutInitializer,
    ) -> CompileResult<Self> {
        let initial =
            layout.initial_layout(logical.logical_qubits(), logical.count_magic_states())?;
        debug!(
            "Initial layout '{}': {}x{} cells, {} magic states",
            layout.name(),
            initial.lattice.cols(),
            initial.lattice.rows(),
            initial.magic_states.len()
        );
        Ok(Self {
            slices: vec![initial.lattice],
            magic_states: initial.magic_states.into(),
            ancilla_locations: initial.ancilla_locations,
            consumed: FxHashSet::default(),
            router: AncillaRegionRouter,
        })
    }

    /// Lay out and apply every operation of a logical computation.
    ///
    /// Operations whose condition does not hold are skipped.
    #[instrument(skip_all, fields(ops = logical.len()))]
    pub fn compose(
        logical: &LogicalLatticeComputation,
        layout: &dyn LayoutInitializer,
    ) -> CompileResult<Self> {
        let mut computation = Self::new(logical, layout)?;
        for (index, op) in logical.operations().iter().enumerate() {
            if logical.does_evaluate(OpIndex(index))? {
                computation.apply_operation(op)?;
            } else {
                trace!(op = index, "Skipping operation whose condition does not hold");
            }
        }
        debug!("Composed {} time slices", computation.slices.len());
        Ok(computation)
    }

    /// Apply one operation and open the next time slice.
    pub fn apply_operation(&mut self, op: &LogicalLatticeOperation) -> CompileResult<()> {
        let mut lattice = self.current().clone();
        self.apply_to(&mut lattice, op.kind())?;
        if let Some(slice) = self.slices.last_mut() {
            *slice = lattice.clone();
        }

        lattice.clear_ancilla();
        lattice.clear_active_states(&self.consumed);
        self.slices.push(lattice);
        Ok(())
    }

    fn apply_to(&mut self, lattice: &mut PatchLattice, kind: &OperationKind) -> CompileResult<()> {
        match kind {
            OperationKind::SinglePatchMeasurement { patch, basis, .. } => {
                if !matches!(basis, PauliOperator::X | PauliOperator::Z) {
                    return Err(CompileError::InvalidMeasurementBasis(*basis));
                }
                let target = patch_mut(lattice, *patch)?;
                target.set_state(Some(PatchState::with_measurement(*basis)));
            }
            OperationKind::MultiBodyMeasurement { patches, .. } => {
                let request = patches
                    .iter()
                    .map(|&(id, op)| {
                        lattice
                            .find_cell_by_patch_id(id)
                            .map(|cell| (cell, op))
                            .ok_or(CompileError::PatchNotFound(id))
                    })
                    .collect::<CompileResult<Vec<_>>>()?;
                self.router.route(lattice, &request)?;
            }
            OperationKind::LogicalPauli { patch, op } => {
                let target = patch_mut(lattice, *patch)?;
                let state = target
                    .state()
                    .unwrap_or(PatchState::Symbolic(SymbolicState::Unknown));
                target.set_state(Some(state.with_pauli(*op)));
            }
            OperationKind::AncillaInit { patch, state } => {
                let cell = self
                    .ancilla_locations
                    .iter()
                    .copied()
                    .find(|&cell| lattice.is_free(cell))
                    .ok_or(CompileError::ResourceExhausted {
                        resource: "ancilla locations",
                    })?;
                lattice.add_patch(Patch::square(cell, PatchType::Qubit, *state).with_id(*patch))?;
                self.consumed.insert(*patch);
            }
            OperationKind::MagicStateRequest { patch } => {
                let cell = self
                    .magic_states
                    .pop_front()
                    .ok_or(CompileError::ResourceExhausted {
                        resource: "magic states",
                    })?;
                let index = lattice
                    .patch_index_at(cell)
                    .ok_or(CompileError::NotARepresentative(cell))?;
                if let Some(magic) = lattice.patch_mut(index) {
                    magic.set_id(*patch);
                }
                self.consumed.insert(*patch);
            }
        }
        Ok(())
    }

    fn current(&self) -> &PatchLattice {
        &self.slices[self.slices.len() - 1]
    }

    /// All time slices, the last one being the open slice.
    pub fn slices(&self) -> &[PatchLattice] {
        &self.slices
    }

    pub fn num_slices(&self) -> usize {
        self.slices.len()
    }

    /// Magic states not yet bound to a request.
    pub fn remaining_magic_states(&self) -> usize {
        self.magic_states.len()
    }

    /// Representative cell of a patch in the open slice.
    pub fn find_cell_by_patch_id(&self, id: PatchId) -> Option<Cell> {
        self.current().find_cell_by_patch_id(id)
    }

    /// Serialize the slices to JSON for external renderers.
    pub fn to_json(&self) -> CompileResult<String> {
        Ok(serde_json::to_string(&self.slices)?)
    }
}

fn patch_mut(lattice: &mut PatchLattice, id: PatchId) -> CompileResult<&mut Patch> {
    let index = lattice
        .patch_index_by_id(id)
        .ok_or(CompileError::PatchNotFound(id))?;
    lattice
        .patch_mut(index)
        .ok_or(CompileError::PatchNotFound(id))
}
