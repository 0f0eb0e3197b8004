//! Lattice Surgery Pauli-Product Intermediate Representation
//!
//! This crate provides the circuit representation the lattice surgery
//! compiler works on: ordered lists of multi-qubit Pauli product rotations and
//! measurements, together with the rewrites that bring a circuit into the
//! shape the lowering stage expects.
//!
//! # Core Components
//!
//! - **Pauli algebra**: [`PauliOperator`] with the single-qubit product table
//!   and commutation rule
//! - **Angles**: [`Angle`], an exact rational multiple of π
//! - **Blocks**: [`PauliBlock`], a rotation `exp(-i·aπ·P)` or a measurement of `±P`
//! - **Circuit**: [`PauliCircuit`] with the Litinski transform, Y-free
//!   normalization and basic-form decomposition
//! - **Dependencies**: [`DependencyGraph`], the commutation DAG exposing
//!   which blocks may run in parallel
//! - **Approximations**: [`RotationApproximator`] for angles outside the
//!   basic rotation set
//!
//! # Example: Removing Clifford Rotations
//!
//! ```rust
//! use lsqecc_ir::{Angle, PauliBlock, PauliCircuit};
//!
//! let mut circuit = PauliCircuit::new(2);
//! circuit.add_block(PauliBlock::parse_rotation("ZI", Angle::pi_over(4)).unwrap()).unwrap();
//! circuit.add_block(PauliBlock::parse_rotation("XZ", Angle::pi_over(8)).unwrap()).unwrap();
//! circuit.add_block(PauliBlock::parse_measurement("ZZ", false).unwrap()).unwrap();
//!
//! circuit.litinski_transform().unwrap();
//!
//! assert_eq!(circuit.count_rotations_by(Angle::pi_over(4)), 0);
//! assert_eq!(circuit.len(), 2);
//! ```
//!
//! # Example: Preparing a Circuit for Lowering
//!
//! ```rust
//! use lsqecc_ir::{Angle, NoApproximation, PauliBlock, PauliCircuit};
//!
//! let circuit = PauliCircuit::from_blocks(
//!     2,
//!     vec![PauliBlock::parse_rotation("YZ", Angle::new(3, 8)).unwrap()],
//! )
//! .unwrap();
//!
//! let prepared = circuit.basic_form(&NoApproximation).unwrap().y_free_equivalent();
//! assert!(prepared.iter().all(|block| !block.contains_y()));
//! assert!(prepared.iter().all(|block| block.angle().is_some_and(|a| a.is_basic())));
//! ```
//!
//! # Basic Rotation Set
//!
//! | Angle | Role | Lowered as |
//! |-------|------|------------|
//! | `±π/2` | Pauli | Tracked Pauli correction |
//! | `±π/4` | Clifford | `|Y⟩` ancilla gadget |
//! | `±π/8` | Non-Clifford | Magic-state gadget |

pub mod angle;
pub mod approximation;
pub mod block;
pub mod circuit;
pub mod dependency;
pub mod error;
pub mod pauli;

pub use angle::Angle;
pub use approximation::{ApproxGate, ApproximationTable, NoApproximation, RotationApproximator};
pub use block::{BlockKind, PauliBlock};
pub use circuit::PauliCircuit;
pub use dependency::{DependencyGraph, NodeIndex};
pub use error::{IrError, IrResult};
pub use pauli::{Coefficient, PauliOperator};
