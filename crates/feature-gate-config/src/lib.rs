// crates/feature-gate-config/src/lib.rs
// ============================================================================
// Module: Feature Gate Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for feature-gate.toml semantics.
// Dependencies: feature-gate-core, feature-gate-providers, serde, toml
// ============================================================================

//! ## Overview
//! `feature-gate-config` defines the configuration model for the feature gate:
//! service-scope and endpoint-scope declarations, resolution limits, the audit
//! sink, and the evaluation backend. Validation is strict and fail-closed.
//!
//! Request-type declarations are not configurable; they are registered in code
//! next to the message types they describe.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
