//! Pass manager for orchestrating compilation.

use std::sync::Arc;

use lsqecc_ir::{PauliCircuit, RotationApproximator};
use tracing::{debug, info, instrument};

use crate::config::{CompilerOptions, SchedulingMode};
use crate::error::CompileResult;
use crate::pass::Pass;
use crate::passes::{
    BasicForm, DependencyAnalysis, LitinskiTransform, LoweringVerification, YFreeNormalization,
};
use crate::property::PropertySet;

/// Manages and executes a sequence of compilation passes.
pub struct PassManager {
    /// The passes to execute, in order.
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    /// Create a new empty pass manager.
    pub fn new() -> Self {
        Self { passes: vec![] }
    }

    /// Add a pass to the manager.
    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Run all passes on the given circuit.
    #[instrument(skip(self, circuit, properties))]
    pub fn run(&self, circuit: &mut PauliCircuit, properties: &mut PropertySet) -> CompileResult<()> {
        info!(
            "Running pass manager with {} passes on circuit with {} qubits",
            self.passes.len(),
            circuit.num_qubits()
        );

        for pass in &self.passes {
            if pass.should_run(circuit, properties) {
                debug!("Running pass: {}", pass.name());
                pass.run(circuit, properties)?;
                debug!("Pass {} completed, blocks: {}", pass.name(), circuit.len());
            } else {
                debug!("Skipping pass: {}", pass.name());
            }
        }

        info!(
            "Pass manager completed, blocks: {}, measurements: {}",
            circuit.len(),
            circuit.count_measurements()
        );

        Ok(())
    }

    /// Names of the passes, in order.
    pub fn pass_names(&self) -> Vec<&str> {
        self.passes.iter().map(|pass| pass.name()).collect()
    }

    /// Get the number of passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Check if the manager has no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for the standard pass pipeline.
///
/// The pipeline brings a circuit into basic form, removes Y symbols and,
/// unless disabled, eliminates `π/4` rotations with the Litinski transform
/// followed by a second Y-free normalization. Parallel scheduling adds a
/// dependency analysis. Lowering verification always runs last.
pub struct PassManagerBuilder {
    options: CompilerOptions,
    properties: PropertySet,
}

impl PassManagerBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            options: CompilerOptions::default(),
            properties: PropertySet::new(),
        }
    }

    /// Set the compiler options.
    #[must_use]
    pub fn with_options(mut self, options: CompilerOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the initial properties.
    #[must_use]
    pub fn with_properties(mut self, properties: PropertySet) -> Self {
        self.properties = properties;
        self
    }

    /// Set the approximation source for non-dyadic angles.
    #[must_use]
    pub fn with_approximator(mut self, approximator: Arc<dyn RotationApproximator>) -> Self {
        self.properties.approximator = approximator;
        self
    }

    /// Build the pass manager and return it with the properties.
    pub fn build(self) -> (PassManager, PropertySet) {
        let mut pm = PassManager::new();

        pm.add_pass(BasicForm);
        pm.add_pass(YFreeNormalization);

        if self.options.apply_litinski_transform {
            pm.add_pass(LitinskiTransform);
            pm.add_pass(YFreeNormalization);
        }

        if self.options.scheduling == SchedulingMode::Parallel {
            pm.add_pass(DependencyAnalysis);
        }

        pm.add_pass(LoweringVerification);

        (pm, self.properties)
    }
}

impl Default for PassManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
