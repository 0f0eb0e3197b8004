//! End-to-end compilation.

use std::sync::Arc;

use lsqecc_ir::{DependencyGraph, PauliCircuit, RotationApproximator};
use tracing::{info, instrument};

use crate::composer::LatticeSurgeryComputation;
use crate::config::CompilerOptions;
use crate::error::CompileResult;
use crate::lowering::LogicalLatticeComputation;
use crate::manager::PassManagerBuilder;

/// Everything produced by one compilation.
#[derive(Debug, Clone)]
pub struct Compilation {
    /// The circuit after all passes, as handed to lowering.
    pub circuit: PauliCircuit,
    /// The lowered operation table.
    pub logical: LogicalLatticeComputation,
    /// Lattice time slices.
    pub lattice: LatticeSurgeryComputation,
    /// Dependency edges `(later, earlier)` between block indices of
    /// `circuit`, in parallel scheduling mode.
    pub dependencies: Option<Vec<(usize, usize)>>,
}

/// Compile a Pauli circuit to lattice surgery time slices.
///
/// ```
/// use std::sync::Arc;
/// use lsqecc_compile::{compile, CompilerOptions};
/// use lsqecc_ir::{Angle, NoApproximation, PauliBlock, PauliCircuit};
///
/// let mut circuit = PauliCircuit::new(2);
/// circuit.add_block(PauliBlock::parse_rotation("ZZ", Angle::pi_over(8)).unwrap()).unwrap();
/// circuit.add_block(PauliBlock::parse_measurement("XI", false).unwrap()).unwrap();
///
/// let compilation = compile(circuit, &CompilerOptions::default(), Arc::new(NoApproximation)).unwrap();
/// assert_eq!(compilation.logical.count_magic_states(), 1);
/// ```
#[instrument(skip_all, fields(num_qubits = circuit.num_qubits(), blocks = circuit.len()))]
pub fn compile(
    mut circuit: PauliCircuit,
    options: &CompilerOptions,
    approximator: Arc<dyn RotationApproximator>,
) -> CompileResult<Compilation> {
    let (pm, mut properties) = PassManagerBuilder::new()
        .with_options(options.clone())
        .with_approximator(approximator)
        .build();
    pm.run(&mut circuit, &mut properties)?;

    let logical = LogicalLatticeComputation::from_circuit(&circuit)?;
    let layout = options.layout.initializer();
    let lattice = LatticeSurgeryComputation::compose(&logical, layout.as_ref())?;

    info!(
        "Compiled {} blocks into {} operations over {} slices",
        circuit.len(),
        logical.len(),
        lattice.num_slices()
    );

    let dependencies = properties.dependencies.as_ref().map(block_edges);
    Ok(Compilation {
        circuit,
        logical,
        lattice,
        dependencies,
    })
}

fn block_edges(graph: &DependencyGraph<usize>) -> Vec<(usize, usize)> {
    graph
        .generate_edge_list()
        .into_iter()
        .filter_map(|(parent, child)| Some((*graph.node(parent)?, *graph.node(child)?)))
        .collect()
}
