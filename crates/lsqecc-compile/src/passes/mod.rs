//! Built-in circuit passes.
//!
//! - [`normalization`]: rewrites into the form lowering accepts
//! - [`litinski`]: `π/4` elimination
//! - [`analysis`]: dependency analysis for schedulers
//! - [`verification`]: lowering-readiness check

pub mod analysis;
pub mod litinski;
pub mod normalization;
pub mod verification;

pub use analysis::DependencyAnalysis;
pub use litinski::LitinskiTransform;
pub use normalization::{BasicForm, YFreeNormalization};
pub use verification::LoweringVerification;
