// crates/feature-gate-core/src/lib.rs
// ============================================================================
// Module: Feature Gate Core Library
// Description: Public API surface for the Feature Gate core.
// Purpose: Expose declarations, the flag-set resolver, and the gate evaluator.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Feature Gate core decides, for a single RPC call, whether the call may
//! proceed given the feature flags that govern it. Gate declarations are
//! registered explicitly against request message types and endpoints, resolved
//! into a deduplicated flag set per call, and evaluated sequentially against a
//! pluggable [`FeatureEvaluator`] with short-circuit on the first disabled flag.
//!
//! The core is transport-agnostic; call-shape adapters live in
//! `feature-gate-grpc`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use interfaces::FeatureEvaluationError;
pub use interfaces::FeatureEvaluator;
pub use runtime::DEFAULT_MAX_FEATURES_PER_DECLARATION;
pub use runtime::DeclarationLimits;
pub use runtime::DeclarationRegistry;
pub use runtime::DeclarationRegistryBuilder;
pub use runtime::EndpointMetadata;
pub use runtime::FeatureCheck;
pub use runtime::FlagResolution;
pub use runtime::GateEvaluator;
pub use runtime::GateTrace;
pub use runtime::ResolvedFlagSet;
pub use runtime::resolve;
