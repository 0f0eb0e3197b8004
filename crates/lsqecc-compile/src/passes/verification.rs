//! Verification that a circuit is ready for lowering.

use lsqecc_ir::{BlockKind, PauliCircuit};
use tracing::debug;

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::{CircuitStats, PropertySet};

/// Analysis pass that checks every block can be lowered to a gadget.
///
/// A block passes if it has no Y symbol and is either a measurement of a
/// non-identity product or a rotation by `±π/2`, `±π/4` or `±π/8`. Identity
/// rotations are global phases and are accepted. The counts of each block
/// class are recorded as [`CircuitStats`].
///
/// Add this pass after all rewriting passes to report a bad block by index
/// before any lattice work starts.
pub struct LoweringVerification;

impl Pass for LoweringVerification {
    fn name(&self) -> &'static str {
        "lowering_verification"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, circuit: &mut PauliCircuit, properties: &mut PropertySet) -> CompileResult<()> {
        let mut stats = CircuitStats::default();

        for (index, block) in circuit.iter().enumerate() {
            if block.contains_y() {
                return Err(self.failure(format!("block {index} contains Y")));
            }
            match block.kind() {
                BlockKind::Measurement { .. } if block.is_identity() => {
                    return Err(self.failure(format!("block {index} measures the identity")));
                }
                BlockKind::Measurement { .. } => stats.measurements += 1,
                BlockKind::Rotation(_) if block.is_identity() => {}
                BlockKind::Rotation(angle) if angle.is_half() => stats.pauli_rotations += 1,
                BlockKind::Rotation(angle) if angle.is_quarter() => stats.clifford_rotations += 1,
                BlockKind::Rotation(angle) if angle.is_eighth() => stats.magic_rotations += 1,
                BlockKind::Rotation(angle) => {
                    return Err(self.failure(format!(
                        "block {index} rotates by {angle}π, outside the basic set"
                    )));
                }
            }
        }

        debug!(
            "Verified {} blocks: {} pauli, {} clifford, {} magic, {} measurements",
            circuit.len(),
            stats.pauli_rotations,
            stats.clifford_rotations,
            stats.magic_rotations,
            stats.measurements
        );
        properties.stats = Some(stats);
        Ok(())
    }
}

impl LoweringVerification {
    fn failure(&self, reason: String) -> CompileError {
        CompileError::PassFailed {
            name: self.name().to_string(),
            reason,
        }
    }
}
