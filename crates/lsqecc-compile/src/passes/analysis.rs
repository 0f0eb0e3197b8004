//! Dependency analysis.

use lsqecc_ir::{DependencyGraph, PauliCircuit};
use tracing::debug;

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Record the commutation dependency graph of the circuit.
///
/// Blocks with no path between them in the graph may be scheduled in
/// parallel.
pub struct DependencyAnalysis;

impl Pass for DependencyAnalysis {
    fn name(&self) -> &'static str {
        "DependencyAnalysis"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, circuit: &mut PauliCircuit, properties: &mut PropertySet) -> CompileResult<()> {
        let graph = DependencyGraph::from_circuit_by_commutation(circuit);
        graph.validate()?;
        debug!(
            "Dependency graph: {} nodes, {} edges, {} terminals",
            graph.num_nodes(),
            graph.num_edges(),
            graph.terminals().len()
        );
        properties.dependencies = Some(graph);
        Ok(())
    }
}
