// crates/feature-gate-core/src/core/mod.rs
// ============================================================================
// Module: Feature Gate Core Types
// Description: Identifiers, gate declarations, and gate outcomes.
// Purpose: Provide the canonical data model shared by every layer.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Core types are immutable value objects. Validation happens at construction
//! boundaries so the resolver and evaluator never see malformed names.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod declaration;
pub mod identifiers;
pub mod outcome;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use declaration::DeclarationError;
pub use declaration::FeatureGateDeclaration;
pub use identifiers::EndpointPath;
pub use identifiers::FeatureName;
pub use identifiers::MAX_FEATURE_NAME_LENGTH;
pub use identifiers::MAX_SERVICE_NAME_LENGTH;
pub use identifiers::RequestType;
pub use identifiers::ServiceName;
pub use outcome::GateOutcome;
