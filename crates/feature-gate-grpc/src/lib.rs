// crates/feature-gate-grpc/src/lib.rs
// ============================================================================
// Module: Feature Gate gRPC Library
// Description: Feature flag gating for tonic request pipelines.
// Purpose: Reject calls to disabled features before handler code runs.
// Dependencies: feature-gate-core, feature-gate-config, tonic
// ============================================================================

//! ## Overview
//! `feature-gate-grpc` wraps service handlers with a feature gate. Every call
//! shape (unary, client streaming, server streaming, duplex) runs the same
//! decision once before the handler: resolve the call's flag set from the
//! declaration registry, evaluate it against the feature backend, and either
//! invoke the handler untouched or fail with `NOT_FOUND`.
//!
//! Each decision is reported to a [`GateAuditSink`] as a JSON line.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod error;
pub mod interceptor;
pub mod setup;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::FileGateAuditSink;
pub use audit::GateAuditSink;
pub use audit::GateDecisionEvent;
pub use audit::GateDecisionEventParams;
pub use audit::GateDecisionOutcome;
pub use audit::NoopGateAuditSink;
pub use audit::StderrGateAuditSink;
pub use error::GateError;
pub use interceptor::FeatureGateInterceptor;
pub use setup::SetupError;
pub use setup::SharedEvaluator;
pub use setup::build_audit_sink;
pub use setup::build_evaluator;
