// crates/feature-gate-providers/src/lib.rs
// ============================================================================
// Module: Feature Gate Providers
// Description: Built-in feature evaluation backends.
// Purpose: Provide zero-dependency evaluators usable without a flag service.
// Dependencies: feature-gate-core, serde
// ============================================================================

//! ## Overview
//! This crate ships two [`feature_gate_core::FeatureEvaluator`]
//! implementations: a static in-memory table that can be toggled at runtime
//! and an environment-variable reader. Both treat unknown features as
//! disabled unless configured otherwise and report malformed state as backend
//! errors rather than as a disabled flag.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod env;
pub mod static_table;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use env::EnvFeatureEvaluator;
pub use env::EnvEvaluatorConfig;
pub use static_table::StaticEvaluatorConfig;
pub use static_table::StaticFeatureEvaluator;
