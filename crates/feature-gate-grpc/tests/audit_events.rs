// crates/feature-gate-grpc/tests/audit_events.rs
// ============================================================================
// Module: Audit Event Tests
// Description: Decision events for allow, deny, error, and ungated calls.
// Purpose: Ensure every completed decision is logged with accurate fields.
// Dependencies: feature-gate-grpc, serde_json, tempfile, tokio
// ============================================================================

//! Audit event tests for feature-gate-grpc.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Tests assert on fixed fixtures."
)]

mod common;

use std::sync::Arc;

use common::EXPORT_PATH;
use common::ExportRequest;
use common::PING_PATH;
use common::PingRequest;
use common::ScriptedEvaluator;
use common::gate;
use common::path;
use feature_gate_core::DeclarationRegistry;
use feature_gate_core::FeatureEvaluationError;
use feature_gate_grpc::FeatureGateInterceptor;
use feature_gate_grpc::FileGateAuditSink;
use feature_gate_grpc::GateAuditSink;
use feature_gate_grpc::GateDecisionOutcome;
use serde_json::Value;

/// Registry gating `ExportRequest` on the given features.
fn export_registry(names: &[&str]) -> DeclarationRegistry {
    DeclarationRegistry::builder().request_type::<ExportRequest>(gate(names)).build().unwrap()
}

#[tokio::test]
async fn allowed_decision_is_logged() {
    let backend = ScriptedEvaluator::new().enabled("a").enabled("b");
    let (interceptor, audit) = common::interceptor(export_registry(&["a", "b"]), backend);

    interceptor.ensure_enabled::<ExportRequest>(&path(EXPORT_PATH)).await.unwrap();

    let events = audit.events();
    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.event, "feature_gate_decision");
    assert_eq!(event.endpoint, EXPORT_PATH);
    assert!(event.request_type.ends_with("ExportRequest"));
    assert!(event.gated);
    assert_eq!(event.feature_count, 2);
    assert_eq!(event.evaluations, 2);
    assert_eq!(event.outcome, GateDecisionOutcome::Allowed);
    assert_eq!(event.denied_feature, None);
    assert_eq!(event.error_kind, None);
}

#[tokio::test]
async fn denied_decision_names_the_feature() {
    let backend = ScriptedEvaluator::new().enabled("x").disabled("y");
    let (interceptor, audit) = common::interceptor(export_registry(&["x", "y", "z"]), backend);

    interceptor.ensure_enabled::<ExportRequest>(&path(EXPORT_PATH)).await.unwrap_err();

    let event = &audit.events()[0];
    assert_eq!(event.outcome, GateDecisionOutcome::Denied);
    assert_eq!(event.denied_feature.as_deref(), Some("y"));
    assert_eq!(event.feature_count, 3);
    assert_eq!(event.evaluations, 2);
    assert_eq!(event.error_kind, None);
}

#[tokio::test]
async fn backend_failure_is_logged_as_error() {
    let backend = ScriptedEvaluator::new()
        .failing("a", FeatureEvaluationError::Unavailable("down".to_string()));
    let (interceptor, audit) = common::interceptor(export_registry(&["a"]), backend);

    interceptor.ensure_enabled::<ExportRequest>(&path(EXPORT_PATH)).await.unwrap_err();

    let event = &audit.events()[0];
    assert_eq!(event.outcome, GateDecisionOutcome::Error);
    assert_eq!(event.error_kind, Some("unavailable"));
    assert_eq!(event.denied_feature, None);
    assert_eq!(event.evaluations, 0);
}

#[tokio::test]
async fn ungated_decision_is_logged_without_evaluations() {
    let (interceptor, audit) =
        common::interceptor(export_registry(&["a"]), ScriptedEvaluator::new());

    interceptor.ensure_enabled::<PingRequest>(&path(PING_PATH)).await.unwrap();

    let event = &audit.events()[0];
    assert!(!event.gated);
    assert_eq!(event.feature_count, 0);
    assert_eq!(event.evaluations, 0);
    assert_eq!(event.outcome, GateDecisionOutcome::Allowed);
}

#[tokio::test]
async fn file_sink_appends_json_lines() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("gate-audit.log");
    let sink: Arc<dyn GateAuditSink> = Arc::new(FileGateAuditSink::new(&log_path).unwrap());
    let backend = ScriptedEvaluator::new().disabled("b");
    let interceptor =
        FeatureGateInterceptor::new(export_registry(&["b"]), backend).with_audit_sink(sink);

    interceptor.ensure_enabled::<ExportRequest>(&path(EXPORT_PATH)).await.unwrap_err();
    interceptor.ensure_enabled::<PingRequest>(&path(PING_PATH)).await.unwrap();

    let content = std::fs::read_to_string(&log_path).unwrap();
    let lines: Vec<Value> =
        content.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["event"], "feature_gate_decision");
    assert_eq!(lines[0]["outcome"], "denied");
    assert_eq!(lines[0]["denied_feature"], "b");
    assert_eq!(lines[1]["outcome"], "allowed");
    assert_eq!(lines[1]["gated"], false);
    assert!(lines[1]["elapsed_us"].is_u64());
}
