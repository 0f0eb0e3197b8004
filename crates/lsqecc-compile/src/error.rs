//! Error types for the compilation crate.

use lsqecc_ir::{Angle, PauliOperator};
use thiserror::Error;

use crate::lattice::{Cell, PatchId};

/// Errors that can occur during compilation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// Error from the IR crate.
    #[error("IR error: {0}")]
    Ir(#[from] lsqecc_ir::IrError),

    /// Ancilla routing failed.
    #[error("Routing failed: {0}")]
    Routing(#[from] RoutingError),

    /// Rotation angle outside the lowerable set.
    #[error("Cannot lower rotation by {angle}π in block {block}")]
    UnsupportedAngle { angle: Angle, block: usize },

    /// Y symbol left in a block handed to lowering.
    #[error("Block {block} contains Y; normalize the circuit first")]
    NotYFree { block: usize },

    /// Measurement of the identity.
    #[error("Block {block} measures the identity")]
    EmptyMeasurement { block: usize },

    /// Lattice surgery can only measure in X or Z.
    #[error("Cannot measure in basis {0}")]
    InvalidMeasurementBasis(PauliOperator),

    /// A finite lattice resource ran out.
    #[error("No {resource} left on the lattice")]
    ResourceExhausted { resource: &'static str },

    /// Patch id not present on the lattice.
    #[error("Patch {0} not found on the lattice")]
    PatchNotFound(PatchId),

    /// Cell is not the representative of a placed patch.
    #[error("Cell {0} is not the representative of a patch")]
    NotARepresentative(Cell),

    /// Cell already covered by a patch.
    #[error("Cell {0} is already occupied")]
    CellOccupied(Cell),

    /// Operation index outside the computation.
    #[error("Operation {index} out of range for {len} operations")]
    OperationOutOfRange { index: usize, len: usize },

    /// Outcome set on a non-measurement.
    #[error("Operation {0} is not a measurement")]
    NotAMeasurement(usize),

    /// Outcome set twice.
    #[error("Outcome of operation {0} is already set")]
    OutcomeAlreadySet(usize),

    /// Invalid compiler configuration.
    #[error("Invalid compiler configuration: {0}")]
    InvalidConfiguration(String),

    /// Lattice or operation data could not be serialized.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Pass execution failed.
    #[error("Pass '{name}' failed: {reason}")]
    PassFailed { name: String, reason: String },
}

impl CompileError {
    /// Check if this error is an ancilla routing failure.
    pub fn is_routing_failure(&self) -> bool {
        matches!(self, CompileError::Routing(_))
    }
}

/// Failure to connect the patches of a multi-body measurement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RoutingError {
    /// No free path between two patches.
    #[error("no ancilla path from {from} to {to}")]
    NoPath { from: Cell, to: Cell },

    /// Fewer than two patches requested.
    #[error("a multi-body measurement needs at least two patches, got {0}")]
    TooFewPatches(usize),

    /// The same patch requested twice.
    #[error("patch at {0} requested more than once")]
    DuplicatePatch(Cell),
}

/// Result type for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;
