// crates/feature-gate-grpc/src/setup.rs
// ============================================================================
// Module: Feature Gate Setup
// Description: Builds an interceptor from feature-gate.toml.
// Purpose: Wire config scopes, backend, and audit sink in one fail-closed step.
// Dependencies: feature-gate-config, feature-gate-providers
// ============================================================================

//! ## Overview
//! Setup merges request-type declarations registered in code with the service
//! and endpoint declarations from configuration, selects the feature backend,
//! and opens the audit sink. Any invalid piece aborts startup.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use feature_gate_config::AuditConfig;
use feature_gate_config::AuditSinkKind;
use feature_gate_config::ConfigError;
use feature_gate_config::EvaluatorConfig;
use feature_gate_config::FeatureGateConfig;
use feature_gate_core::DeclarationError;
use feature_gate_core::DeclarationRegistryBuilder;
use feature_gate_core::FeatureEvaluator;
use feature_gate_providers::EnvFeatureEvaluator;
use feature_gate_providers::StaticFeatureEvaluator;
use thiserror::Error;

use crate::audit::FileGateAuditSink;
use crate::audit::GateAuditSink;
use crate::audit::NoopGateAuditSink;
use crate::audit::StderrGateAuditSink;
use crate::interceptor::FeatureGateInterceptor;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Feature backend selected at runtime.
pub type SharedEvaluator = Arc<dyn FeatureEvaluator>;

/// Setup failures.
#[derive(Debug, Error)]
pub enum SetupError {
    /// Configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Declarations could not form a registry.
    #[error("invalid declarations: {0}")]
    Declaration(#[from] DeclarationError),
    /// The audit sink could not be opened.
    #[error("audit sink error: {0}")]
    Audit(String),
}

// ============================================================================
// SECTION: Builders
// ============================================================================

impl FeatureGateInterceptor<SharedEvaluator> {
    /// Builds an interceptor from configuration plus code-declared request types.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] when declarations, the backend, or the audit sink
    /// are invalid.
    pub fn from_config(
        config: &FeatureGateConfig,
        declarations: DeclarationRegistryBuilder,
    ) -> Result<Self, SetupError> {
        config.validate()?;
        let registry = config.apply_declarations(declarations)?.build()?;
        let evaluator = build_evaluator(&config.evaluator)?;
        let audit = build_audit_sink(&config.audit)?;
        Ok(Self::new(registry, evaluator).with_audit_sink(audit))
    }
}

/// Creates the configured feature backend.
///
/// # Errors
///
/// Returns [`SetupError::Declaration`] when a static flag name is invalid.
pub fn build_evaluator(config: &EvaluatorConfig) -> Result<SharedEvaluator, SetupError> {
    match config {
        EvaluatorConfig::Static(table) => Ok(Arc::new(StaticFeatureEvaluator::new(table)?)),
        EvaluatorConfig::Env(env) => Ok(Arc::new(EnvFeatureEvaluator::new(env.clone()))),
    }
}

/// Creates the configured audit sink.
///
/// # Errors
///
/// Returns [`SetupError::Audit`] when the log file cannot be opened.
pub fn build_audit_sink(config: &AuditConfig) -> Result<Arc<dyn GateAuditSink>, SetupError> {
    match config.sink {
        AuditSinkKind::Stderr => Ok(Arc::new(StderrGateAuditSink)),
        AuditSinkKind::None => Ok(Arc::new(NoopGateAuditSink)),
        AuditSinkKind::File => {
            let path = config.path.as_deref().ok_or_else(|| {
                SetupError::Audit("audit.path is required for the file sink".to_string())
            })?;
            let sink =
                FileGateAuditSink::new(path).map_err(|err| SetupError::Audit(err.to_string()))?;
            Ok(Arc::new(sink))
        }
    }
}
