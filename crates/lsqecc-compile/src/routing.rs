//! Ancilla routing for multi-body measurements.
//!
//! A multi-body measurement merges several patches through a chain of
//! ancilla cells. The router finds shortest chains through free cells,
//! entering and leaving patches only across boundaries of the type that
//! exposes the requested Pauli operator.

use std::collections::VecDeque;

use lsqecc_ir::PauliOperator;
use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, instrument};

use crate::error::{CompileError, CompileResult, RoutingError};
use crate::lattice::{Cell, EdgeType, Patch, PatchLattice};

/// Cells touched by one routed measurement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AncillaRegion {
    /// One path per target, from the source patch cell to the target patch
    /// cell, both ends included.
    pub paths: Vec<Vec<Cell>>,
    /// Cells that received a new ancilla patch.
    pub ancilla_cells: Vec<Cell>,
}

impl AncillaRegion {
    /// Number of ancilla patches allocated.
    pub fn num_ancillas(&self) -> usize {
        self.ancilla_cells.len()
    }
}

/// Routes ancilla regions through the free cells of a lattice.
#[derive(Debug, Clone, Copy, Default)]
pub struct AncillaRegionRouter;

impl AncillaRegionRouter {
    /// Connect the requested patches for a joint measurement.
    ///
    /// `request` maps representative cells to the Pauli operator measured on
    /// that patch. The first entry is the source; every other entry is
    /// reached from it. On failure the lattice is left untouched.
    #[instrument(skip_all, fields(patches = request.len()))]
    pub fn route(
        &self,
        lattice: &mut PatchLattice,
        request: &[(Cell, PauliOperator)],
    ) -> CompileResult<AncillaRegion> {
        validate(lattice, request)?;

        let graph = RoutingGraph::build(lattice, request);
        let (source, _) = request[0];
        let predecessors = graph.shortest_paths_from(source);

        let paths = request[1..]
            .iter()
            .map(|&(target, _)| {
                graph
                    .path_to(&predecessors, source, target)
                    .ok_or(RoutingError::NoPath {
                        from: source,
                        to: target,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut region = AncillaRegion::default();
        for path in paths {
            let path = trim_path(lattice, path);
            commit_path(lattice, &path, &mut region)?;
            region.paths.push(path);
        }
        debug!(
            "Routed {} paths through {} ancilla cells",
            region.paths.len(),
            region.num_ancillas()
        );
        Ok(region)
    }
}

fn validate(lattice: &PatchLattice, request: &[(Cell, PauliOperator)]) -> CompileResult<()> {
    if request.len() < 2 {
        return Err(RoutingError::TooFewPatches(request.len()).into());
    }
    let mut seen = FxHashSet::default();
    for &(cell, op) in request {
        if EdgeType::for_pauli(op).is_none() {
            return Err(CompileError::InvalidMeasurementBasis(op));
        }
        if lattice.representative_of(cell) != Some(cell) {
            return Err(CompileError::NotARepresentative(cell));
        }
        if !seen.insert(cell) {
            return Err(RoutingError::DuplicatePatch(cell).into());
        }
    }
    Ok(())
}

/// Directed cell graph of one routing request.
struct RoutingGraph {
    graph: DiGraph<Cell, ()>,
    nodes: FxHashMap<Cell, NodeIndex>,
}

impl RoutingGraph {
    fn build(lattice: &PatchLattice, request: &[(Cell, PauliOperator)]) -> Self {
        let mut graph = DiGraph::new();
        let mut nodes = FxHashMap::default();
        for row in 0..lattice.rows() {
            for col in 0..lattice.cols() {
                let cell = Cell::new(col, row);
                nodes.insert(cell, graph.add_node(cell));
            }
        }

        let free = |cell: Cell| lattice.in_bounds(cell) && lattice.is_free(cell);
        for (&cell, &node) in &nodes {
            if !free(cell) {
                continue;
            }
            for neighbour in cell.neighbours() {
                if free(neighbour) {
                    graph.add_edge(node, nodes[&neighbour], ());
                }
            }
        }

        let mut routing = Self { graph, nodes };
        for (position, &(representative, op)) in request.iter().enumerate() {
            let Some(patch) = lattice.patch_at(representative) else {
                continue;
            };
            routing.add_entries(patch, op, position == 0, free);
        }
        routing
    }

    /// Connect a patch's matching boundaries to the free cells beyond them.
    fn add_entries(
        &mut self,
        patch: &Patch,
        op: PauliOperator,
        outward: bool,
        free: impl Fn(Cell) -> bool,
    ) {
        let representative = patch.representative();
        for edge in patch.edges() {
            if EdgeType::for_pauli(op) != Some(edge.border_type) {
                continue;
            }
            let neighbour = edge.neighbouring_cell();
            if !free(neighbour) {
                continue;
            }
            let hops = [representative, edge.cell, neighbour];
            for pair in hops.windows(2) {
                let (from, to) = if outward {
                    (pair[0], pair[1])
                } else {
                    (pair[1], pair[0])
                };
                if from == to {
                    continue;
                }
                if let (Some(&a), Some(&b)) = (self.nodes.get(&from), self.nodes.get(&to)) {
                    self.graph.update_edge(a, b, ());
                }
            }
        }
    }

    /// Breadth-first search recording each reached node's predecessor.
    fn shortest_paths_from(&self, source: Cell) -> FxHashMap<NodeIndex, NodeIndex> {
        let mut predecessors = FxHashMap::default();
        let Some(&start) = self.nodes.get(&source) else {
            return predecessors;
        };
        let mut visited = FxHashSet::default();
        let mut queue = VecDeque::new();

        visited.insert(start);
        queue.push_back(start);
        while let Some(current) = queue.pop_front() {
            for neighbour in self.graph.neighbors(current) {
                if visited.insert(neighbour) {
                    predecessors.insert(neighbour, current);
                    queue.push_back(neighbour);
                }
            }
        }
        predecessors
    }

    fn path_to(
        &self,
        predecessors: &FxHashMap<NodeIndex, NodeIndex>,
        source: Cell,
        target: Cell,
    ) -> Option<Vec<Cell>> {
        let start = *self.nodes.get(&source)?;
        let mut node = *self.nodes.get(&target)?;
        let mut path = vec![self.graph[node]];
        while node != start {
            node = *predecessors.get(&node)?;
            path.push(self.graph[node]);
        }
        path.reverse();
        (path.len() >= 2).then_some(path)
    }
}

/// Drop leading and trailing cells that lie inside the endpoint patches, so
/// the path starts and ends on the boundary cells that face free space.
fn trim_path(lattice: &PatchLattice, mut path: Vec<Cell>) -> Vec<Cell> {
    let source = path[0];
    while path.len() > 2 && lattice.representative_of(path[1]) == Some(source) {
        path.remove(0);
    }
    let target = path[path.len() - 1];
    while path.len() > 2 && lattice.representative_of(path[path.len() - 2]) == Some(target) {
        path.pop();
    }
    path
}

fn commit_path(
    lattice: &mut PatchLattice,
    path: &[Cell],
    region: &mut AncillaRegion,
) -> CompileResult<()> {
    let last = path.len() - 1;
    stitch(lattice, path[0], path[1])?;
    stitch(lattice, path[last], path[last - 1])?;

    for i in 1..last {
        let cell = path[i];
        let index = match lattice.patch_index_at(cell) {
            Some(index) => index,
            None => {
                region.ancilla_cells.push(cell);
                lattice.add_patch(Patch::ancilla(cell))?
            }
        };
        if let Some(ancilla) = lattice.patch_mut(index) {
            ancilla.join_towards(cell, path[i + 1]);
            ancilla.join_towards(cell, path[i - 1]);
        }
    }
    Ok(())
}

fn stitch(lattice: &mut PatchLattice, cell: Cell, towards: Cell) -> CompileResult<()> {
    let index = lattice
        .patch_index_at(cell)
        .ok_or(CompileError::NotARepresentative(cell))?;
    if let Some(patch) = lattice.patch_mut(index) {
        patch.stitch_edge_towards(cell, towards);
    }
    Ok(())
}
