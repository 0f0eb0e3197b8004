//! Surface-code patches placed on a 2D grid of cells.
//!
//! A [`PatchLattice`] is one time slice of the computation. Cells are
//! addressed as `(col, row)`; row 0 is the top of the grid. Patches are
//! shared between slices and copied only when a slice modifies them, so
//! snapshotting a lattice for the next time step is cheap.

use std::fmt;
use std::sync::Arc;

use lsqecc_ir::PauliOperator;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CompileError, CompileResult};
use crate::state::{PatchState, SymbolicState};

/// Unique identifier for a patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PatchId(pub Uuid);

impl PatchId {
    /// Create a new random patch ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a patch ID from a string.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for PatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A grid cell, `(col, row)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    /// Column, growing to the right.
    pub col: i32,
    /// Row, growing downwards.
    pub row: i32,
}

impl Cell {
    /// Create a cell.
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// The adjacent cell in a direction.
    pub fn neighbour(self, orientation: Orientation) -> Cell {
        let (dc, dr) = orientation.delta();
        Cell::new(self.col + dc, self.row + dr)
    }

    /// The four adjacent cells, in [`Orientation::ALL`] order.
    pub fn neighbours(self) -> [Cell; 4] {
        Orientation::ALL.map(|orientation| self.neighbour(orientation))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// Side of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Top,
    Bottom,
    Left,
    Right,
}

impl Orientation {
    /// All four sides.
    pub const ALL: [Orientation; 4] = [
        Orientation::Top,
        Orientation::Bottom,
        Orientation::Left,
        Orientation::Right,
    ];

    /// Offset `(dcol, drow)` to the neighbouring cell on this side.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Orientation::Top => (0, -1),
            Orientation::Bottom => (0, 1),
            Orientation::Left => (-1, 0),
            Orientation::Right => (1, 0),
        }
    }

    /// The side of `from` that faces the adjacent cell `to`.
    pub fn between(from: Cell, to: Cell) -> Option<Orientation> {
        let delta = (to.col - from.col, to.row - from.row);
        Orientation::ALL.into_iter().find(|o| o.delta() == delta)
    }
}

/// Type of a patch boundary.
///
/// Solid boundaries carry Z-type logical operators, dashed boundaries X-type.
/// Stitched boundaries take part in the current lattice surgery merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeType {
    Solid,
    SolidStitched,
    Dashed,
    DashedStitched,
    /// Internal join between two ancilla cells.
    AncillaJoin,
}

impl EdgeType {
    /// Boundary type that exposes a Pauli operator, for X and Z only.
    pub fn for_pauli(op: PauliOperator) -> Option<EdgeType> {
        match op {
            PauliOperator::X => Some(EdgeType::Dashed),
            PauliOperator::Z => Some(EdgeType::Solid),
            PauliOperator::I | PauliOperator::Y => None,
        }
    }

    /// Stitched counterpart of a plain boundary.
    #[must_use]
    pub fn stitched(self) -> EdgeType {
        match self {
            EdgeType::Solid => EdgeType::SolidStitched,
            EdgeType::Dashed => EdgeType::DashedStitched,
            other => other,
        }
    }

    /// Plain counterpart of a stitched boundary.
    #[must_use]
    pub fn unstitched(self) -> EdgeType {
        match self {
            EdgeType::SolidStitched => EdgeType::Solid,
            EdgeType::DashedStitched => EdgeType::Dashed,
            other => other,
        }
    }

    /// Check if the boundary is stitched to an ancilla.
    pub fn is_stitched(self) -> bool {
        matches!(self, EdgeType::SolidStitched | EdgeType::DashedStitched)
    }
}

/// One side of one cell of a patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// The cell the edge belongs to.
    pub cell: Cell,
    /// Which side of the cell.
    pub orientation: Orientation,
    /// Boundary type.
    pub border_type: EdgeType,
}

impl Edge {
    /// Create an edge.
    pub fn new(cell: Cell, orientation: Orientation, border_type: EdgeType) -> Self {
        Self {
            cell,
            orientation,
            border_type,
        }
    }

    /// The cell on the other side of the edge.
    pub fn neighbouring_cell(&self) -> Cell {
        self.cell.neighbour(self.orientation)
    }
}

/// Role of a patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatchType {
    /// Logical qubit, including gadget ancillas.
    Qubit,
    /// Pre-distilled magic state.
    DistillationQubit,
    /// Transient merge region of a multi-body measurement.
    Ancilla,
}

/// A patch occupying one or more cells.
///
/// The first cell is the patch's representative and is used to address it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    patch_type: PatchType,
    state: Option<PatchState>,
    cells: Vec<Cell>,
    edges: Vec<Edge>,
    id: Option<PatchId>,
}

impl Patch {
    /// Create a single-cell patch without boundaries.
    pub fn new(patch_type: PatchType, state: Option<PatchState>, representative: Cell) -> Self {
        Self {
            patch_type,
            state,
            cells: vec![representative],
            edges: vec![],
            id: None,
        }
    }

    /// A square patch with dashed top and bottom, solid left and right.
    pub fn square(cell: Cell, patch_type: PatchType, state: SymbolicState) -> Self {
        Self::new(patch_type, Some(state.into()), cell)
            .with_edge(Edge::new(cell, Orientation::Top, EdgeType::Dashed))
            .with_edge(Edge::new(cell, Orientation::Bottom, EdgeType::Dashed))
            .with_edge(Edge::new(cell, Orientation::Left, EdgeType::Solid))
            .with_edge(Edge::new(cell, Orientation::Right, EdgeType::Solid))
    }

    /// A square patch with solid top and bottom, dashed left and right.
    pub fn rotated_square(cell: Cell, patch_type: PatchType, state: SymbolicState) -> Self {
        Self::new(patch_type, Some(state.into()), cell)
            .with_edge(Edge::new(cell, Orientation::Top, EdgeType::Solid))
            .with_edge(Edge::new(cell, Orientation::Bottom, EdgeType::Solid))
            .with_edge(Edge::new(cell, Orientation::Left, EdgeType::Dashed))
            .with_edge(Edge::new(cell, Orientation::Right, EdgeType::Dashed))
    }

    /// An edgeless ancilla cell.
    pub fn ancilla(cell: Cell) -> Self {
        Self::new(PatchType::Ancilla, None, cell)
    }

    /// Add a cell.
    #[must_use]
    pub fn with_cell(mut self, cell: Cell) -> Self {
        self.cells.push(cell);
        self
    }

    /// Add an edge.
    #[must_use]
    pub fn with_edge(mut self, edge: Edge) -> Self {
        self.edges.push(edge);
        self
    }

    /// Assign an identifier.
    #[must_use]
    pub fn with_id(mut self, id: PatchId) -> Self {
        self.id = Some(id);
        self
    }

    /// Role of the patch.
    pub fn patch_type(&self) -> PatchType {
        self.patch_type
    }

    /// Symbolic state, if tracked.
    pub fn state(&self) -> Option<PatchState> {
        self.state
    }

    /// Replace the symbolic state.
    pub fn set_state(&mut self, state: Option<PatchState>) {
        self.state = state;
    }

    /// Cells covered, representative first.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Boundary edges.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Identifier, unset for routing ancillas.
    pub fn id(&self) -> Option<PatchId> {
        self.id
    }

    /// Assign an identifier in place.
    pub fn set_id(&mut self, id: PatchId) {
        self.id = Some(id);
    }

    /// The addressing cell.
    pub fn representative(&self) -> Cell {
        self.cells[0]
    }

    /// Check if the patch covers a cell.
    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// Stitch the boundary on `cell` that faces `neighbour`.
    ///
    /// Returns whether a matching edge was found.
    pub fn stitch_edge_towards(&mut self, cell: Cell, neighbour: Cell) -> bool {
        let mut found = false;
        for edge in &mut self.edges {
            if edge.cell == cell && edge.neighbouring_cell() == neighbour {
                edge.border_type = edge.border_type.stitched();
                found = true;
            }
        }
        found
    }

    /// Add an ancilla join from `cell` towards `neighbour`, once.
    ///
    /// Only ancilla patches are joined. Returns whether a join was added.
    pub fn join_towards(&mut self, cell: Cell, neighbour: Cell) -> bool {
        if self.patch_type != PatchType::Ancilla || !self.contains(cell) {
            return false;
        }
        let Some(orientation) = Orientation::between(cell, neighbour) else {
            return false;
        };
        let exists = self
            .edges
            .iter()
            .any(|edge| edge.cell == cell && edge.orientation == orientation);
        if !exists {
            self.edges
                .push(Edge::new(cell, orientation, EdgeType::AncillaJoin));
        }
        !exists
    }

    /// Check if any boundary is stitched.
    pub fn has_stitched_edges(&self) -> bool {
        self.edges.iter().any(|edge| edge.border_type.is_stitched())
    }

    fn unstitch_all(&mut self) {
        for edge in &mut self.edges {
            edge.border_type = edge.border_type.unstitched();
        }
    }
}

/// One time slice of the patch layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatchLattice {
    patches: Vec<Arc<Patch>>,
    min_rows: i32,
    min_cols: i32,
}

impl PatchLattice {
    /// Create an empty lattice with minimum dimensions.
    pub fn new(min_rows: i32, min_cols: i32) -> Self {
        Self {
            patches: vec![],
            min_rows,
            min_cols,
        }
    }

    /// Number of rows: one past the lowest occupied row, at least `min_rows`.
    pub fn rows(&self) -> i32 {
        self.cells()
            .map(|cell| cell.row + 1)
            .fold(self.min_rows, i32::max)
    }

    /// Number of columns: one past the rightmost occupied column, at least `min_cols`.
    pub fn cols(&self) -> i32 {
        self.cells()
            .map(|cell| cell.col + 1)
            .fold(self.min_cols, i32::max)
    }

    /// Lower bound on the reported row count.
    pub fn set_min_rows(&mut self, min_rows: i32) {
        self.min_rows = min_rows;
    }

    /// Lower bound on the reported column count.
    pub fn set_min_cols(&mut self, min_cols: i32) {
        self.min_cols = min_cols;
    }

    /// Check if a cell lies inside the current grid.
    pub fn in_bounds(&self, cell: Cell) -> bool {
        (0..self.cols()).contains(&cell.col) && (0..self.rows()).contains(&cell.row)
    }

    fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.patches.iter().flat_map(|patch| patch.cells.iter().copied())
    }

    /// All occupied cells.
    pub fn occupied_cells(&self) -> FxHashSet<Cell> {
        self.cells().collect()
    }

    /// Iterate over the patches.
    pub fn patches(&self) -> impl Iterator<Item = &Patch> {
        self.patches.iter().map(Arc::as_ref)
    }

    /// Number of patches.
    pub fn num_patches(&self) -> usize {
        self.patches.len()
    }

    /// Place a patch. All of its cells must be free.
    pub fn add_patch(&mut self, patch: Patch) -> CompileResult<usize> {
        if let Some(&cell) = patch.cells.iter().find(|&&cell| !self.is_free(cell)) {
            return Err(CompileError::CellOccupied(cell));
        }
        self.patches.push(Arc::new(patch));
        Ok(self.patches.len() - 1)
    }

    /// Index of the patch covering a cell.
    pub fn patch_index_at(&self, cell: Cell) -> Option<usize> {
        self.patches.iter().position(|patch| patch.contains(cell))
    }

    /// The patch covering a cell.
    pub fn patch_at(&self, cell: Cell) -> Option<&Patch> {
        self.patch_index_at(cell).map(|index| self.patches[index].as_ref())
    }

    /// Mutable access to a patch, copying it out of any shared snapshot.
    pub fn patch_mut(&mut self, index: usize) -> Option<&mut Patch> {
        self.patches.get_mut(index).map(Arc::make_mut)
    }

    /// Check if no patch covers a cell.
    pub fn is_free(&self, cell: Cell) -> bool {
        self.patch_index_at(cell).is_none()
    }

    /// Anchor cell of the patch covering `cell`, or `cell` itself if free.
    pub fn representative(&self, cell: Cell) -> Cell {
        self.representative_of(cell).unwrap_or(cell)
    }

    /// Representative of the patch covering a cell.
    pub fn representative_of(&self, cell: Cell) -> Option<Cell> {
        self.patch_at(cell).map(Patch::representative)
    }

    /// Index of the patch with an identifier.
    pub fn patch_index_by_id(&self, id: PatchId) -> Option<usize> {
        self.patches.iter().position(|patch| patch.id == Some(id))
    }

    /// The patch with an identifier.
    pub fn patch_by_id(&self, id: PatchId) -> Option<&Patch> {
        self.patch_index_by_id(id)
            .map(|index| self.patches[index].as_ref())
    }

    /// Representative cell of the patch with an identifier.
    pub fn find_cell_by_patch_id(&self, id: PatchId) -> Option<Cell> {
        self.patch_by_id(id).map(Patch::representative)
    }

    /// Remove a patch.
    pub fn remove_patch(&mut self, index: usize) -> Option<Patch> {
        (index < self.patches.len())
            .then(|| Arc::unwrap_or_clone(self.patches.remove(index)))
    }

    /// Undo the previous slice's merge: unstitch every boundary, mark the
    /// merged patches' states unknown and drop the ancilla regions.
    pub fn clear_ancilla(&mut self) {
        self.patches
            .retain(|patch| patch.patch_type != PatchType::Ancilla);
        for patch in &mut self.patches {
            if patch.has_stitched_edges() {
                let patch = Arc::make_mut(patch);
                patch.unstitch_all();
                patch.state = Some(PatchState::Symbolic(SymbolicState::Unknown));
            }
        }
    }

    /// Settle the previous slice's activity markers.
    ///
    /// Measured patches whose ids are in `consumed` are removed; every other
    /// active patch moves to its next symbolic state.
    pub fn clear_active_states(&mut self, consumed: &FxHashSet<PatchId>) {
        self.patches.retain(|patch| {
            let measured = patch.state.is_some_and(|state| state.is_measured());
            !(measured && patch.id.is_some_and(|id| consumed.contains(&id)))
        });
        for patch in &mut self.patches {
            if let Some(state @ PatchState::Active { .. }) = patch.state {
                Arc::make_mut(patch).state = Some(PatchState::Symbolic(state.settled()));
            }
        }
    }
}
