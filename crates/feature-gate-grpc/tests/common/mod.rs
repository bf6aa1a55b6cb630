// crates/feature-gate-grpc/tests/common/mod.rs
// ============================================================================
// Module: gRPC Test Support
// Description: Scripted backends, recording audit sink, and fixtures.
// Purpose: Observe backend queries, handler invocations, and audit events.
// Dependencies: feature-gate-core, feature-gate-grpc, async-trait
// ============================================================================

//! Shared fixtures for feature-gate-grpc integration tests.

#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Shared fixtures are not used by every test binary."
)]

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use feature_gate_core::DeclarationRegistry;
use feature_gate_core::EndpointPath;
use feature_gate_core::FeatureEvaluationError;
use feature_gate_core::FeatureEvaluator;
use feature_gate_core::FeatureGateDeclaration;
use feature_gate_core::FeatureName;
use feature_gate_grpc::FeatureGateInterceptor;
use feature_gate_grpc::GateAuditSink;
use feature_gate_grpc::GateDecisionEvent;

// ============================================================================
// SECTION: Messages
// ============================================================================

/// Unary request message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub ledger: String,
}

/// Unary response message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReply {
    pub rows: u32,
}

/// Streamed request message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestChunk {
    pub bytes: u32,
}

/// Request message without declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingRequest;

// ============================================================================
// SECTION: Backends
// ============================================================================

/// Evaluator answering from a fixed table and recording every query.
///
/// Unknown features are disabled.
#[derive(Debug, Default)]
pub struct ScriptedEvaluator {
    answers: BTreeMap<String, Result<bool, FeatureEvaluationError>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enabled(mut self, feature: &str) -> Self {
        self.answers.insert(feature.to_string(), Ok(true));
        self
    }

    pub fn disabled(mut self, feature: &str) -> Self {
        self.answers.insert(feature.to_string(), Ok(false));
        self
    }

    pub fn failing(mut self, feature: &str, error: FeatureEvaluationError) -> Self {
        self.answers.insert(feature.to_string(), Err(error));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeatureEvaluator for ScriptedEvaluator {
    async fn is_enabled(&self, feature: &FeatureName) -> Result<bool, FeatureEvaluationError> {
        self.calls.lock().unwrap().push(feature.as_str().to_string());
        self.answers.get(feature.as_str()).cloned().unwrap_or(Ok(false))
    }
}

/// Evaluator that never answers.
#[derive(Debug, Default)]
pub struct PendingEvaluator {
    started: Mutex<usize>,
}

impl PendingEvaluator {
    pub fn started(&self) -> usize {
        *self.started.lock().unwrap()
    }
}

#[async_trait]
impl FeatureEvaluator for PendingEvaluator {
    async fn is_enabled(&self, _feature: &FeatureName) -> Result<bool, FeatureEvaluationError> {
        *self.started.lock().unwrap() += 1;
        std::future::pending::<Result<bool, FeatureEvaluationError>>().await
    }
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// Audit sink keeping events in memory.
#[derive(Default)]
pub struct RecordingAuditSink {
    events: Mutex<Vec<GateDecisionEvent>>,
}

impl RecordingAuditSink {
    pub fn events(&self) -> Vec<GateDecisionEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl GateAuditSink for RecordingAuditSink {
    fn record(&self, event: &GateDecisionEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

// ============================================================================
// SECTION: Fixtures
// ============================================================================

pub const EXPORT_PATH: &str = "/billing.Ledger/Export";
pub const INGEST_PATH: &str = "/billing.Ledger/Ingest";
pub const PING_PATH: &str = "/billing.Ledger/Ping";
pub const TAIL_PATH: &str = "/billing.Ledger/Tail";
pub const SYNC_PATH: &str = "/billing.Ledger/Sync";

/// Builds a declaration from literal names.
pub fn gate(names: &[&str]) -> FeatureGateDeclaration {
    FeatureGateDeclaration::from_names(names.iter().copied()).unwrap()
}

/// Parses an endpoint path literal.
pub fn path(raw: &str) -> EndpointPath {
    EndpointPath::parse(raw).unwrap()
}

/// Interceptor over a shared backend with an in-memory audit sink.
pub fn interceptor<E: FeatureEvaluator>(
    registry: DeclarationRegistry,
    evaluator: E,
) -> (FeatureGateInterceptor<E>, Arc<RecordingAuditSink>) {
    let audit = Arc::new(RecordingAuditSink::default());
    let sink: Arc<dyn GateAuditSink> = audit.clone();
    (FeatureGateInterceptor::new(registry, evaluator).with_audit_sink(sink), audit)
}
