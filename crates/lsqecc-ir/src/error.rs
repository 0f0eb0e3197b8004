//! Error types for the IR crate.

use thiserror::Error;

use crate::angle::Angle;

/// Errors that can occur in IR operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// A block or operator list does not match the circuit's qubit count.
    #[error("Expected {expected} qubits, got {got}{}", format_context(.context))]
    QubitCountMismatch {
        /// Expected number of qubits.
        expected: usize,
        /// Actual number of qubits provided.
        got: usize,
        /// Optional operation name for context.
        context: Option<&'static str>,
    },

    /// Qubit index outside the block.
    #[error("Qubit {qubit} out of range for {num_qubits} qubits")]
    QubitOutOfRange {
        /// The offending qubit index.
        qubit: usize,
        /// Number of qubits in the block or circuit.
        num_qubits: usize,
    },

    /// Block index outside the circuit.
    #[error("Block index {index} out of range for circuit with {len} blocks")]
    BlockOutOfRange {
        /// The offending block index.
        index: usize,
        /// Number of blocks in the circuit.
        len: usize,
    },

    /// A Litinski step was requested on a block that is not a ±π/4 rotation.
    #[error("Block {index} is not a ±π/4 rotation")]
    NotQuarterRotation {
        /// The offending block index.
        index: usize,
    },

    /// The Litinski transform needs a measurement to absorb Clifford rotations.
    #[error("Circuit contains π/4 rotations but no measurement to absorb them")]
    MissingMeasurement,

    /// Rotation angle that cannot be decomposed into the basic rotation set.
    #[error("Unsupported rotation angle {angle}π{}", format_context(.context))]
    UnsupportedAngle {
        /// The angle, in units of π.
        angle: Angle,
        /// Optional reason.
        context: Option<&'static str>,
    },

    /// Unknown Pauli symbol.
    #[error("Invalid Pauli symbol '{0}'")]
    InvalidPauliSymbol(char),

    /// Unknown gate symbol in an approximation sequence.
    #[error("Invalid approximation gate '{0}'")]
    InvalidApproximationGate(char),

    /// Zero denominator in an angle.
    #[error("Angle denominator must be non-zero")]
    ZeroDenominator,

    /// Invalid dependency graph structure.
    #[error("Invalid dependency graph: {0}")]
    InvalidGraph(String),

    /// Join of an empty list of circuits.
    #[error("Cannot build a circuit from an empty list")]
    EmptyCircuitList,
}

/// Helper function to format optional context.
#[allow(clippy::ref_option)]
fn format_context(context: &Option<&'static str>) -> String {
    match context {
        Some(name) => format!(" ({name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IrError::QubitCountMismatch {
            expected: 3,
            got: 2,
            context: Some("add_block"),
        };
        assert_eq!(err.to_string(), "Expected 3 qubits, got 2 (add_block)");

        let err = IrError::UnsupportedAngle {
            angle: Angle::new(1, 3),
            context: None,
        };
        assert_eq!(err.to_string(), "Unsupported rotation angle 1/3π");
    }
}
