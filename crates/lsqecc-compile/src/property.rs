//! Property set shared between passes.

use std::fmt;
use std::sync::Arc;

use lsqecc_ir::{DependencyGraph, NoApproximation, RotationApproximator};

/// Block-level statistics recorded by the verification pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CircuitStats {
    /// Rotations by `±π/2`.
    pub pauli_rotations: usize,
    /// Rotations by `±π/4`.
    pub clifford_rotations: usize,
    /// Rotations by `±π/8`.
    pub magic_rotations: usize,
    pub measurements: usize,
}

impl CircuitStats {
    /// Total number of blocks counted.
    pub fn total(&self) -> usize {
        self.pauli_rotations + self.clifford_rotations + self.magic_rotations + self.measurements
    }
}

/// Properties shared between passes.
///
/// # Standard Properties
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `approximator` | [`RotationApproximator`] | Gate sequences for angles outside the dyadic set |
/// | `dependencies` | [`DependencyGraph`] | Commutation dependencies, set by the dependency analysis |
/// | `stats` | [`CircuitStats`] | Block counts, set by the verification pass |
pub struct PropertySet {
    /// Approximation source for the basic-form pass.
    pub approximator: Arc<dyn RotationApproximator>,

    /// Dependency graph over block indices of the current circuit.
    pub dependencies: Option<DependencyGraph<usize>>,

    /// Statistics of a lowering-ready circuit.
    pub stats: Option<CircuitStats>,
}

impl PropertySet {
    /// Create a property set without an approximation source.
    pub fn new() -> Self {
        Self {
            approximator: Arc::new(NoApproximation),
            dependencies: None,
            stats: None,
        }
    }

    /// Set the approximation source.
    #[must_use]
    pub fn with_approximator(mut self, approximator: Arc<dyn RotationApproximator>) -> Self {
        self.approximator = approximator;
        self
    }
}

impl Default for PropertySet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PropertySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertySet")
            .field("dependencies", &self.dependencies.as_ref().map(DependencyGraph::num_edges))
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lsqecc_ir::{Angle, ApproximationTable};

    #[test]
    fn test_default_has_no_approximations() {
        let props = PropertySet::new();
        assert!(props.approximator.approximate(Angle::new(1, 3)).is_none());
        assert!(props.dependencies.is_none());
    }

    #[test]
    fn test_with_approximator() {
        let mut table = ApproximationTable::new(10);
        table.insert_str(Angle::new(1, 3), "HT").unwrap();
        let props = PropertySet::new().with_approximator(Arc::new(table));
        assert!(props.approximator.approximate(Angle::new(1, 3)).is_some());
    }

    #[test]
    fn test_debug_lists_typed_properties() {
        let mut props = PropertySet::new();
        props.stats = Some(CircuitStats {
            magic_rotations: 2,
            measurements: 1,
            ..CircuitStats::default()
        });
        let debug = format!("{props:?}");
        assert!(debug.contains("dependencies: None"));
        assert!(debug.contains("magic_rotations: 2"));
        assert_eq!(props.stats.map(|stats| stats.total()), Some(3));
    }
}
