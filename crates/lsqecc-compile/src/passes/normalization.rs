//! Normalization passes.

use lsqecc_ir::PauliCircuit;
use tracing::debug;

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Rewrite every rotation into `±π/2`, `±π/4` and `±π/8` rotations.
///
/// Dyadic angles are split exactly. Other angles are looked up in the
/// property set's approximator and fail with an unsupported-angle error when
/// no sequence is known.
pub struct BasicForm;

impl Pass for BasicForm {
    fn name(&self) -> &'static str {
        "BasicForm"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &mut PauliCircuit, properties: &mut PropertySet) -> CompileResult<()> {
        let before = circuit.len();
        *circuit = circuit.basic_form(properties.approximator.as_ref())?;
        debug!("Basic form: {} blocks -> {}", before, circuit.len());
        Ok(())
    }

    fn should_run(&self, circuit: &PauliCircuit, _properties: &PropertySet) -> bool {
        circuit
            .iter()
            .any(|block| block.angle().is_some_and(|angle| !angle.is_basic()))
    }
}

/// Replace every Y symbol by X, conjugating with Z-type `π/4` rotations.
pub struct YFreeNormalization;

impl Pass for YFreeNormalization {
    fn name(&self) -> &'static str {
        "YFreeNormalization"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &mut PauliCircuit, _properties: &mut PropertySet) -> CompileResult<()> {
        let before = circuit.len();
        *circuit = circuit.y_free_equivalent();
        debug!(
            "Y-free normalization added {} corrective rotations",
            circuit.len() - before
        );
        Ok(())
    }

    fn should_run(&self, circuit: &PauliCircuit, _properties: &PropertySet) -> bool {
        circuit.iter().any(|block| block.contains_y())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lsqecc_ir::{Angle, PauliBlock};

    #[test]
    fn test_basic_form_pass() {
        let mut circuit = PauliCircuit::from_blocks(
            2,
            vec![PauliBlock::parse_rotation("XZ", Angle::new(3, 8)).unwrap()],
        )
        .unwrap();
        let mut props = PropertySet::new();

        assert!(BasicForm.should_run(&circuit, &props));
        BasicForm.run(&mut circuit, &mut props).unwrap();
        assert_eq!(circuit.len(), 2);
        assert!(circuit.iter().all(|block| block.angle().is_some_and(|a| a.is_basic())));
        assert!(!BasicForm.should_run(&circuit, &props));
    }

    #[test]
    fn test_basic_form_without_approximation_fails() {
        let mut circuit = PauliCircuit::from_blocks(
            1,
            vec![PauliBlock::parse_rotation("Z", Angle::new(1, 3)).unwrap()],
        )
        .unwrap();
        assert!(BasicForm.run(&mut circuit, &mut PropertySet::new()).is_err());
    }

    #[test]
    fn test_y_free_pass() {
        let mut circuit = PauliCircuit::from_blocks(
            2,
            vec![PauliBlock::parse_rotation("YZ", Angle::pi_over(8)).unwrap()],
        )
        .unwrap();
        let mut props = PropertySet::new();

        assert!(YFreeNormalization.should_run(&circuit, &props));
        YFreeNormalization.run(&mut circuit, &mut props).unwrap();
        assert_eq!(circuit.len(), 3);
        assert!(!YFreeNormalization.should_run(&circuit, &props));
    }
}
