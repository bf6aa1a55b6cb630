// crates/feature-gate-core/src/runtime/mod.rs
// ============================================================================
// Module: Feature Gate Runtime
// Description: Declaration registry, flag-set resolver, and gate evaluator.
// Purpose: Compute and evaluate the governing flag set for a single call.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime modules implement the per-call pipeline: [`resolve`] merges
//! declarations into a [`ResolvedFlagSet`], then [`GateEvaluator`] checks each
//! flag in order. Every transport adapter must call into the same pipeline.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod gate;
pub mod registry;
pub mod resolver;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use gate::FeatureCheck;
pub use gate::GateEvaluator;
pub use gate::GateTrace;
pub use registry::DEFAULT_MAX_FEATURES_PER_DECLARATION;
pub use registry::DeclarationLimits;
pub use registry::DeclarationRegistry;
pub use registry::DeclarationRegistryBuilder;
pub use resolver::EndpointMetadata;
pub use resolver::FlagResolution;
pub use resolver::ResolvedFlagSet;
pub use resolver::resolve;
