//! Lattice Surgery Compilation
//!
//! This crate turns a Pauli-product circuit into a sequence of lattice
//! surgery time slices. It implements a pass-based front end over
//! [`lsqecc_ir::PauliCircuit`], gadget lowering to logical lattice
//! operations, and a slice composer that places patches and routes ancilla
//! regions on a 2D grid.
//!
//! # Overview
//!
//! 1. **Passes**: bring the circuit into basic form, remove Y symbols and
//!    eliminate `π/4` rotations
//! 2. **Lowering**: replace each block by its measurement gadget, with
//!    outcome-conditioned corrections
//! 3. **Composition**: apply each operation to a copy of the previous lattice
//!    slice, routing multi-body measurements through free cells
//!
//! # Architecture
//!
//! ```text
//! PauliCircuit
//!       │
//!       ▼
//! ┌─────────────┐
//! │ PassManager │ ◄── PropertySet (approximator, dependencies, stats)
//! └─────────────┘
//!       │
//!       ├── BasicForm
//!       ├── YFreeNormalization
//!       ├── LitinskiTransform + YFreeNormalization
//!       ├── DependencyAnalysis (parallel scheduling)
//!       └── LoweringVerification
//!       │
//!       ▼
//! LogicalLatticeComputation ──► LatticeSurgeryComputation
//!                                   │
//!                                   └── AncillaRegionRouter
//! ```
//!
//! # Example: End-to-End Compilation
//!
//! ```rust
//! use std::sync::Arc;
//! use lsqecc_compile::{compile, CompilerOptions};
//! use lsqecc_ir::{Angle, NoApproximation, PauliBlock, PauliCircuit};
//!
//! let mut circuit = PauliCircuit::new(2);
//! circuit.add_block(PauliBlock::parse_rotation("ZI", Angle::pi_over(8)).unwrap()).unwrap();
//! circuit.add_block(PauliBlock::parse_measurement("ZZ", false).unwrap()).unwrap();
//!
//! let compilation =
//!     compile(circuit, &CompilerOptions::default(), Arc::new(NoApproximation)).unwrap();
//!
//! println!("{} slices", compilation.lattice.num_slices());
//! ```
//!
//! # Gadgets
//!
//! | Block | Operations |
//! |-------|------------|
//! | Measurement | Single-patch or multi-body measurement |
//! | `±π/2` | Logical Pauli per qubit |
//! | `±π/4` | `|Y⟩` ancilla, merge, ancilla X measurement, conditional `π/2` |
//! | `±π/8` | Magic state, merge, conditional `π/4`, magic X measurement, conditional `π/2` |
//!
//! # Custom Passes
//!
//! Implement the [`Pass`] trait to add a pass to a [`PassManager`]:
//!
//! ```rust
//! use lsqecc_compile::{CircuitStats, CompileResult, Pass, PassKind, PropertySet};
//! use lsqecc_ir::PauliCircuit;
//!
//! struct CountMeasurements;
//!
//! impl Pass for CountMeasurements {
//!     fn name(&self) -> &str { "count_measurements" }
//!     fn kind(&self) -> PassKind { PassKind::Analysis }
//!
//!     fn run(&self, circuit: &mut PauliCircuit, props: &mut PropertySet) -> CompileResult<()> {
//!         props.stats = Some(CircuitStats {
//!             measurements: circuit.count_measurements(),
//!             ..CircuitStats::default()
//!         });
//!         Ok(())
//!     }
//! }
//! ```

pub mod composer;
pub mod config;
pub mod error;
pub mod lattice;
pub mod layout;
pub mod lowering;
pub mod manager;
pub mod ops;
pub mod pass;
pub mod pipeline;
pub mod property;
pub mod routing;
pub mod state;

// Built-in passes
pub mod passes;

pub use composer::LatticeSurgeryComputation;
pub use config::{CompilerOptions, LayoutType, SchedulingMode};
pub use error::{CompileError, CompileResult, RoutingError};
pub use lattice::{Cell, Edge, EdgeType, Orientation, Patch, PatchId, PatchLattice, PatchType};
pub use layout::{InitialLayout, LayoutInitializer, SimpleLayout};
pub use lowering::LogicalLatticeComputation;
pub use manager::{PassManager, PassManagerBuilder};
pub use ops::{EvaluationCondition, LogicalLatticeOperation, OpIndex, OperationKind, Outcome};
pub use pass::{Pass, PassKind};
pub use pipeline::{Compilation, compile};
pub use property::{CircuitStats, PropertySet};
pub use routing::{AncillaRegion, AncillaRegionRouter};
pub use state::{Activity, PatchState, SymbolicState};
