//! Dependency graphs over ordered operation sequences.

use std::collections::VecDeque;

use petgraph::Direction;
use petgraph::algo::{has_path_connecting, is_cyclic_directed};
use petgraph::graph::{DiGraph, NodeIndex as PetNodeIndex};
use rustc_hash::FxHashSet;

use crate::circuit::PauliCircuit;
use crate::error::{IrError, IrResult};

/// Node index type for dependency graphs.
pub type NodeIndex = PetNodeIndex<u32>;

/// A DAG of operations, with an edge from each operation to every earlier
/// operation it directly depends on.
///
/// The graph is built by walking the sequence backwards:
/// - The last operation becomes a terminal.
/// - Each earlier operation searches the current frontier (the operations
///   nobody depends on yet) and, breadth-first, their parents for the
///   nearest later operations it conflicts with.
/// - Found operations become its parents. A parent that is itself an
///   ancestor of another parent is dropped, so no edge is implied by a
///   longer path.
/// - An operation without parents is a terminal.
///
/// Edges point from the later operation (parent) to the earlier one (child).
#[derive(Debug, Clone)]
pub struct DependencyGraph<T> {
    graph: DiGraph<T, (), u32>,
    terminals: Vec<NodeIndex>,
}

impl<T> DependencyGraph<T> {
    /// Build a dependency graph from operations in program order.
    ///
    /// `depends(earlier, later)` reports whether `earlier` must stay before
    /// `later`.
    pub fn from_sequence<I, F>(ops: I, mut depends: F) -> Self
    where
        I: IntoIterator<Item = T>,
        F: FnMut(&T, &T) -> bool,
    {
        let ops: Vec<T> = ops.into_iter().collect();
        let mut graph: DiGraph<T, (), u32> = DiGraph::with_capacity(ops.len(), ops.len());
        let mut terminals = Vec::new();
        let mut frontier: Vec<NodeIndex> = Vec::new();

        for op in ops.into_iter().rev() {
            let node = graph.add_node(op);
            let mut candidates: Vec<NodeIndex> = Vec::new();
            let mut visited: FxHashSet<NodeIndex> = FxHashSet::default();
            let mut kept_frontier = Vec::with_capacity(frontier.len() + 1);

            for &leaf in &frontier {
                visited.insert(leaf);
                if depends(&graph[node], &graph[leaf]) {
                    candidates.push(leaf);
                    continue;
                }
                kept_frontier.push(leaf);

                let mut queue: VecDeque<NodeIndex> =
                    graph.neighbors_directed(leaf, Direction::Incoming).collect();
                while let Some(current) = queue.pop_front() {
                    if !visited.insert(current) {
                        continue;
                    }
                    if depends(&graph[node], &graph[current]) {
                        candidates.push(current);
                    } else {
                        queue.extend(graph.neighbors_directed(current, Direction::Incoming));
                    }
                }
            }

            // Keep only the nearest dependencies.
            let parents: Vec<NodeIndex> = candidates
                .iter()
                .copied()
                .filter(|&candidate| {
                    !candidates.iter().any(|&other| {
                        other != candidate && has_path_connecting(&graph, candidate, other, None)
                    })
                })
                .collect();

            if parents.is_empty() {
                terminals.push(node);
            }
            for parent in parents {
                graph.add_edge(parent, node, ());
            }
            kept_frontier.push(node);
            frontier = kept_frontier;
        }

        Self { graph, terminals }
    }

    /// Number of operations.
    pub fn num_nodes(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of dependency edges.
    pub fn num_edges(&self) -> usize {
        self.graph.edge_count()
    }

    /// Operations no later operation depends on.
    pub fn terminals(&self) -> &[NodeIndex] {
        &self.terminals
    }

    /// Get the operation stored at a node.
    pub fn node(&self, index: NodeIndex) -> Option<&T> {
        self.graph.node_weight(index)
    }

    /// Earlier operations a node depends on, sorted by index.
    pub fn children(&self, index: NodeIndex) -> Vec<NodeIndex> {
        self.sorted_neighbors(index, Direction::Outgoing)
    }

    /// Later operations depending on a node, sorted by index.
    pub fn parents(&self, index: NodeIndex) -> Vec<NodeIndex> {
        self.sorted_neighbors(index, Direction::Incoming)
    }

    fn sorted_neighbors(&self, index: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        let mut neighbors: Vec<NodeIndex> =
            self.graph.neighbors_directed(index, direction).collect();
        neighbors.sort_unstable();
        neighbors.dedup();
        neighbors
    }

    /// Breadth-first adjacency from the terminals, each node listed once
    /// with its children.
    pub fn generate_adjacency_list(&self) -> Vec<(NodeIndex, Vec<NodeIndex>)> {
        let mut seen: FxHashSet<NodeIndex> = self.terminals.iter().copied().collect();
        let mut queue: VecDeque<NodeIndex> = self.terminals.iter().copied().collect();
        let mut adjacency = Vec::with_capacity(self.graph.node_count());

        while let Some(node) = queue.pop_front() {
            let children = self.children(node);
            for &child in &children {
                if seen.insert(child) {
                    queue.push_back(child);
                }
            }
            adjacency.push((node, children));
        }
        adjacency
    }

    /// All `(parent, child)` edges, in adjacency-list order.
    pub fn generate_edge_list(&self) -> Vec<(NodeIndex, NodeIndex)> {
        self.generate_adjacency_list()
            .into_iter()
            .flat_map(|(parent, children)| children.into_iter().map(move |child| (parent, child)))
            .collect()
    }

    /// Check that the graph has no cycles.
    pub fn validate(&self) -> IrResult<()> {
        if is_cyclic_directed(&self.graph) {
            return Err(IrError::InvalidGraph("dependency cycle".into()));
        }
        Ok(())
    }

    /// Check if there is a dependency path from `from` down to `to`.
    pub fn has_path(&self, from: NodeIndex, to: NodeIndex) -> bool {
        has_path_connecting(&self.graph, from, to, None)
    }

    /// The underlying petgraph graph.
    pub fn graph(&self) -> &DiGraph<T, (), u32> {
        &self.graph
    }
}

impl DependencyGraph<usize> {
    /// Build the commutation dependency graph of a circuit.
    ///
    /// Nodes hold block indices. Two blocks depend on each other iff they do
    /// not commute.
    pub fn from_circuit_by_commutation(circuit: &PauliCircuit) -> Self {
        let blocks = circuit.blocks();
        Self::from_sequence(0..blocks.len(), |&earlier, &later| {
            !blocks[earlier].commutes_with_unchecked(&blocks[later])
        })
    }
}
