//! Litinski `π/4` elimination.

use lsqecc_ir::PauliCircuit;
use tracing::debug;

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Commute every `±π/4` rotation to the end of the circuit and drop it.
///
/// Requires at least one measurement whenever a `±π/4` rotation is present.
/// Anti-commuting neighbours absorb the rotation and may gain Y symbols, so
/// this pass is followed by [`YFreeNormalization`](super::YFreeNormalization).
pub struct LitinskiTransform;

impl Pass for LitinskiTransform {
    fn name(&self) -> &'static str {
        "LitinskiTransform"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &mut PauliCircuit, _properties: &mut PropertySet) -> CompileResult<()> {
        let before = circuit.len();
        circuit.litinski_transform()?;
        debug!("Litinski transform removed {} rotations", before - circuit.len());
        Ok(())
    }

    fn should_run(&self, circuit: &PauliCircuit, _properties: &PropertySet) -> bool {
        circuit.iter().any(|block| block.is_quarter_rotation())
    }
}
