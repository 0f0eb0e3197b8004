//! Compiler configuration.

use serde::{Deserialize, Serialize};

use crate::error::{CompileError, CompileResult};
use crate::layout::{LayoutInitializer, SimpleLayout};

/// Initial patch placement strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutType {
    /// A row of qubit patches with pre-distilled magic states to the right.
    #[default]
    SimplePreDistilledStates,
}

impl LayoutType {
    /// The initializer implementing this layout.
    pub fn initializer(self) -> Box<dyn LayoutInitializer> {
        match self {
            LayoutType::SimplePreDistilledStates => Box::new(SimpleLayout),
        }
    }
}

/// How the compiled operations are scheduled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulingMode {
    /// One operation per time slice, in program order.
    #[default]
    Sequential,
    /// Sequential slices, annotated with the commutation dependencies of the
    /// processed circuit for an external scheduler.
    Parallel,
}

/// Options for [`compile`](crate::compile).
///
/// ```
/// use lsqecc_compile::{CompilerOptions, SchedulingMode};
///
/// let options = CompilerOptions::from_yaml_str("scheduling: parallel").unwrap();
/// assert_eq!(options.scheduling, SchedulingMode::Parallel);
/// assert!(options.apply_litinski_transform);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerOptions {
    pub layout: LayoutType,
    /// Commute `π/4` rotations past the measurements and drop them.
    pub apply_litinski_transform: bool,
    pub scheduling: SchedulingMode,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            layout: LayoutType::default(),
            apply_litinski_transform: true,
            scheduling: SchedulingMode::default(),
        }
    }
}

impl CompilerOptions {
    /// Parse options from YAML. Missing fields take their defaults.
    pub fn from_yaml_str(yaml: &str) -> CompileResult<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| CompileError::InvalidConfiguration(e.to_string()))
    }

    /// Serialize the options to YAML.
    pub fn to_yaml_string(&self) -> CompileResult<String> {
        serde_yaml_ng::to_string(self).map_err(|e| CompileError::InvalidConfiguration(e.to_string()))
    }

    #[must_use]
    pub fn with_litinski_transform(mut self, enabled: bool) -> Self {
        self.apply_litinski_transform = enabled;
        self
    }

    #[must_use]
    pub fn with_scheduling(mut self, scheduling: SchedulingMode) -> Self {
        self.scheduling = scheduling;
        self
    }
}
